//! The retrieval-augmented chat pipeline for theatre scheduling queries.
//!
//! A user message is classified into a query intent, matching cases are
//! fetched from the record store, rendered into a bounded context string,
//! and handed to a generative client; every stage degrades to a defined
//! fallback so the caller always receives a usable answer.

pub mod clients;
pub mod context;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod types;

pub use clients::{AuditSink, DeploymentInfo, GenerativeClient, SpeechClient, TracingAuditSink, VoiceInfo};
pub use error::ChatError;
pub use intent::{classify, QueryIntent};
pub use orchestrator::{Orchestrator, AI_UNAVAILABLE_APOLOGY, SYSTEM_PROMPT};
pub use types::{QueryContext, StoreStatus, SystemStatus};
