//! Error types for the chat pipeline.

use rota_core::error::RotaError;
use rota_epr::EprError;

/// Errors raised by chat collaborators.
///
/// Every variant is caught inside the orchestrator and converted into a
/// degraded stage value; nothing here escapes `process_chat`.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("generative client error: {0}")]
    Llm(String),
    #[error("speech synthesis error: {0}")]
    Speech(String),
    #[error("audit sink error: {0}")]
    Audit(String),
    #[error("record store error: {0}")]
    Store(String),
}

impl From<EprError> for ChatError {
    fn from(err: EprError) -> Self {
        ChatError::Store(err.to_string())
    }
}

impl From<ChatError> for RotaError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Llm(msg) => RotaError::Llm(msg),
            ChatError::Speech(msg) => RotaError::Speech(msg),
            ChatError::Audit(msg) => RotaError::Audit(msg),
            ChatError::Store(msg) => RotaError::Store(msg),
        }
    }
}
