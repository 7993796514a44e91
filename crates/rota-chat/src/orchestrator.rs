//! The retrieval-augmented chat orchestrator.
//!
//! One `process_chat` call runs the whole pipeline: classify the message,
//! retrieve matching cases, render them into a context string, generate an
//! answer, write one audit record. Every stage has a defined fallback, so
//! the method is total: no input and no collaborator failure produces an
//! error at this boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use rota_core::types::{AuditDetails, AuditRecord, ChatMessage, DateRange, MessageRole};
use rota_epr::EprAdapter;

use crate::clients::{AuditSink, GenerativeClient, SpeechClient};
use crate::context;
use crate::intent::{self, QueryIntent};
use crate::types::{QueryContext, StoreStatus, SystemStatus};

/// Persona prompt sent with every generative call.
pub const SYSTEM_PROMPT: &str = "You are TOM, a theatre operations assistant for hospital staff. \
You help with operating theatre scheduling queries. \
Be concise and professional. Use British medical terminology. \
Base your answers on the theatre case data provided in the context. \
If the context contains no relevant data, say so clearly rather than guessing. \
Prioritise patient safety in all responses.";

/// Prefix of the degraded answer returned when generation is unavailable.
/// The raw context string follows so the user still gets the data found.
pub const AI_UNAVAILABLE_APOLOGY: &str =
    "I apologize, but I'm having trouble connecting to the AI service. \
However, I can share what I found:";

/// Coordinates the record store, generative client, speech client, and audit
/// sink for the chat pipeline. Cheap to share: all collaborators are behind
/// `Arc`, and the only mutable state is the initialized flag.
pub struct Orchestrator {
    adapter: Arc<dyn EprAdapter>,
    generative: Arc<dyn GenerativeClient>,
    speech: Arc<dyn SpeechClient>,
    audit: Arc<dyn AuditSink>,
    initialized: AtomicBool,
}

impl Orchestrator {
    pub fn new(
        adapter: Arc<dyn EprAdapter>,
        generative: Arc<dyn GenerativeClient>,
        speech: Arc<dyn SpeechClient>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            adapter,
            generative,
            speech,
            audit,
            initialized: AtomicBool::new(false),
        }
    }

    /// Probe collaborators and mark the pipeline ready.
    ///
    /// Idempotent and infallible: degraded collaborators are logged, never
    /// propagated. Concurrent callers may both run the probes; the flag
    /// only ever moves false -> true.
    pub async fn initialize(&self) {
        if self.initialized.load(Ordering::SeqCst) {
            return;
        }

        info!(system = %self.adapter.system_name(), "initializing chat pipeline");

        let health = self.adapter.health_check().await;
        if health.healthy {
            debug!(message = health.message.as_deref().unwrap_or(""), "record store healthy");
        } else {
            warn!(
                message = health.message.as_deref().unwrap_or(""),
                "record store unhealthy; queries will return empty results"
            );
        }
        if !self.generative.is_ready() {
            warn!("generative client not configured; answers will fall back to raw context");
        }
        if !self.speech.is_ready() {
            warn!("speech client not configured; speech synthesis disabled");
        }

        self.initialized.store(true, Ordering::SeqCst);
    }

    /// Run one chat turn end to end. Always returns an assistant message.
    pub async fn process_chat(&self, message: &str, user_id: Option<&str>) -> ChatMessage {
        self.initialize().await;

        let query = self.query_theatre_data(message).await;
        let context_string = context::build(&query);

        let content = match self
            .generative
            .generate(SYSTEM_PROMPT, &context_string, message)
            .await
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "generation failed; falling back to raw context");
                fallback_answer(&context_string)
            }
        };

        let record = AuditRecord::new(
            user_id.unwrap_or("anonymous"),
            "chat_query",
            "theatre_cases",
            AuditDetails {
                query: message.to_string(),
                cases_found: query.cases.len(),
                query_type: query.query_type.clone(),
            },
        );
        if let Err(err) = self.audit.record(&record).await {
            error!(error = %err, "failed to write audit record");
        }

        ChatMessage {
            id: Uuid::new_v4(),
            role: MessageRole::Assistant,
            content,
            timestamp: Utc::now(),
            user_id: user_id.map(str::to_string),
            context: Some(context_string),
        }
    }

    /// Classify the message and run the matching retrieval accessor.
    ///
    /// Retrieval failure downgrades to an empty case list tagged "error";
    /// it never propagates.
    pub async fn query_theatre_data(&self, message: &str) -> QueryContext {
        let intent = intent::classify(message);
        debug!(query_type = intent.query_type(), "classified query");

        let date_range = match &intent {
            QueryIntent::Today | QueryIntent::Default | QueryIntent::List { tomorrow: false } => {
                Some(DateRange::today())
            }
            QueryIntent::Tomorrow | QueryIntent::List { tomorrow: true } => {
                Some(DateRange::tomorrow())
            }
            _ => None,
        };

        let result = match &intent {
            QueryIntent::Today | QueryIntent::Default | QueryIntent::List { tomorrow: false } => {
                self.adapter.get_cases_for_today().await
            }
            QueryIntent::Tomorrow | QueryIntent::List { tomorrow: true } => {
                self.adapter.get_cases_for_tomorrow().await
            }
            QueryIntent::BySurgeon { name } => self.adapter.get_cases_by_surgeon(name).await,
            QueryIntent::ByTheatre { theatre } => self.adapter.get_cases_by_theatre(theatre).await,
            // classify never yields Error; retrieval failure produces it below.
            QueryIntent::Error => Ok(Vec::new()),
        };

        match result {
            Ok(cases) => QueryContext {
                cases,
                query_type: intent.query_type().to_string(),
                date_range,
            },
            Err(err) => {
                warn!(error = %err, "retrieval failed; downgrading to empty result");
                QueryContext {
                    cases: Vec::new(),
                    query_type: QueryIntent::Error.query_type().to_string(),
                    date_range: None,
                }
            }
        }
    }

    /// Synthesize speech for an answer. `None` means unavailable and the
    /// caller should fall back to text only.
    pub async fn generate_speech(&self, text: &str) -> Option<Vec<u8>> {
        if !self.speech.is_ready() {
            return None;
        }
        self.speech.synthesize(text).await
    }

    /// Aggregate collaborator health. Never errors; probe failures surface
    /// as unhealthy/zero values.
    pub async fn system_status(&self) -> SystemStatus {
        let health = self.adapter.health_check().await;
        let cases_today = self
            .adapter
            .get_cases_for_today()
            .await
            .map(|cases| cases.len())
            .unwrap_or(0);

        SystemStatus {
            store: StoreStatus {
                system: self.adapter.system_name().to_string(),
                configured: self.adapter.is_configured(),
                healthy: health.healthy,
                cases_today,
            },
            generative: self.generative.deployment_info(),
            speech: self.speech.voice_info(),
            initialized: self.initialized.load(Ordering::SeqCst),
        }
    }
}

/// Compose the degraded answer shown when generation is unavailable.
fn fallback_answer(context_string: &str) -> String {
    format!("{}\n\n{}", AI_UNAVAILABLE_APOLOGY, context_string)
}

// =============================================================================
// Tests
// =============================================================================
