//! Collaborator traits for the chat pipeline.
//!
//! The orchestrator only ever sees these seams; concrete Azure clients and
//! test doubles plug in behind them. Every trait method that can fail does
//! so with [`ChatError`] so the orchestrator can downgrade the stage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use rota_core::types::AuditRecord;

use crate::error::ChatError;

/// Identity of the generative deployment backing the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub configured: bool,
    pub deployment: String,
}

/// Identity of the TTS voice backing speech synthesis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub configured: bool,
    pub voice: String,
}

/// A chat-completions backend.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Whether the client has what it needs to take requests.
    fn is_ready(&self) -> bool;

    fn deployment_info(&self) -> DeploymentInfo;

    /// Produce an answer grounded in `context`. Implementations return
    /// `Err(ChatError::Llm)` when unconfigured or when the upstream call
    /// fails; the orchestrator handles the fallback.
    async fn generate(
        &self,
        system_prompt: &str,
        context: &str,
        user_message: &str,
    ) -> Result<String, ChatError>;
}

/// A text-to-speech backend.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    fn is_ready(&self) -> bool;

    fn voice_info(&self) -> VoiceInfo;

    /// Synthesize `text` to audio bytes. `None` means unavailable; callers
    /// fall back to text-only output.
    async fn synthesize(&self, text: &str) -> Option<Vec<u8>>;
}

/// Destination for compliance audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &AuditRecord) -> Result<(), ChatError>;
}

/// Audit sink that emits each record as a structured log event.
///
/// The default sink: audit entries land in the same stream as the rest of
/// the service logs, ready for log shipping to pick up.
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), ChatError> {
        info!(
            audit_id = %record.id,
            user_id = %record.user_id,
            action = %record.action,
            resource = %record.resource,
            query = %record.details.query,
            cases_found = record.details.cases_found,
            query_type = %record.details.query_type,
            "audit"
        );
        Ok(())
    }
}
