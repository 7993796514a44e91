//! Record-store adapters for the Rota theatre assistant.
//!
//! Every EPR backend is reached through the [`EprAdapter`] trait, so the
//! chat pipeline depends on one uniform capability surface regardless of
//! which hospital system holds the schedule. The [`factory`] maps a
//! configuration tag to a concrete adapter; trusts without a digital EPR
//! integration get the in-memory [`ManualEntryAdapter`].

pub mod adapter;
pub mod error;
pub mod factory;
pub mod manual;

pub use adapter::{CaseDraft, CaseUpdate, EprAdapter, HealthStatus};
pub use error::EprError;
pub use factory::create_adapter;
pub use manual::ManualEntryAdapter;
