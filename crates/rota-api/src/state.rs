//! Application state shared across route handlers.

use std::sync::Arc;
use std::time::Instant;

use rota_chat::Orchestrator;
use rota_epr::EprAdapter;

/// Shared handler state. Cheap to clone; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The chat pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Direct record-store handle for the `/cases` CRUD surface.
    pub adapter: Arc<dyn EprAdapter>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, adapter: Arc<dyn EprAdapter>) -> Self {
        Self {
            orchestrator,
            adapter,
            start_time: Instant::now(),
        }
    }
}
