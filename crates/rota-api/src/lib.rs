//! HTTP surface for the Rota theatre assistant.
//!
//! A thin axum layer over the chat orchestrator and the record store: the
//! only request validation lives here, everything else is delegated. JSON
//! in, JSON out, except `/speech` which streams MP3 bytes.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
