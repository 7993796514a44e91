//! Error types for record-store adapters.

use rota_core::error::RotaError;

/// Errors from an EPR backend.
///
/// `NotConfigured` marks a missing integration (degraded mode, non-fatal);
/// `Upstream` marks a configured backend whose call failed; `CaseNotFound`
/// is raised only by update/delete on a missing id — lookups return
/// `Option`/empty instead.
#[derive(Debug, thiserror::Error)]
pub enum EprError {
    #[error("record store not configured")]
    NotConfigured,
    #[error("upstream record store failure: {0}")]
    Upstream(String),
    #[error("case not found: {0}")]
    CaseNotFound(String),
}

impl From<EprError> for RotaError {
    fn from(err: EprError) -> Self {
        match err {
            EprError::NotConfigured => RotaError::Config("record store not configured".to_string()),
            other => RotaError::Store(other.to_string()),
        }
    }
}
