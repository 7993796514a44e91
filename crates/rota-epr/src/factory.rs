//! Configuration-tag to adapter resolution.

use std::sync::Arc;

use tracing::info;

use rota_core::types::EprSystem;

use crate::adapter::EprAdapter;
use crate::manual::ManualEntryAdapter;

/// Create the adapter for the configured EPR backend.
///
/// Backends without a live integration resolve to the manual-entry adapter
/// explicitly; the log line makes the substitution visible rather than
/// silent.
pub fn create_adapter(system: EprSystem) -> Arc<dyn EprAdapter> {
    match system {
        EprSystem::Manual => {
            info!("Using manual entry adapter");
            Arc::new(ManualEntryAdapter::new())
        }
        EprSystem::Epic
        | EprSystem::Cerner
        | EprSystem::Tpp
        | EprSystem::Emis
        | EprSystem::Other => {
            info!(
                backend = %system,
                "No live integration for this EPR backend; using manual entry"
            );
            Arc::new(ManualEntryAdapter::new())
        }
    }
}
