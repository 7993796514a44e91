//! Shared domain types, configuration, and errors for the Rota theatre
//! operations assistant.
//!
//! Everything here is EPR-agnostic: the same `TheatreCase` shape is produced
//! by every record-store backend, so the chat pipeline never needs to know
//! which hospital system the data came from.

pub mod config;
pub mod error;
pub mod types;

pub use config::RotaConfig;
pub use error::{Result, RotaError};
pub use types::*;
