//! Pipeline value types shared across chat stages.

use serde::{Deserialize, Serialize};

use rota_core::types::{DateRange, TheatreCase};

use crate::clients::{DeploymentInfo, VoiceInfo};

/// Retrieval output for one chat turn: the matched cases plus the audit tag
/// describing how they were selected.
#[derive(Clone, Debug)]
pub struct QueryContext {
    /// Cases in store order; may be empty.
    pub cases: Vec<TheatreCase>,
    /// The resolved query tag, e.g. "today" or "surgeon". Set to "error"
    /// when retrieval failed and the case list was downgraded to empty.
    pub query_type: String,
    /// The scheduling window queried, where the intent implies one.
    pub date_range: Option<DateRange>,
}

/// Read-only aggregate of collaborator health, served at `/status`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub store: StoreStatus,
    pub generative: DeploymentInfo,
    pub speech: VoiceInfo,
    pub initialized: bool,
}

/// Record-store portion of [`SystemStatus`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreStatus {
    /// Backend tag, e.g. "manual" or "epic".
    pub system: String,
    pub configured: bool,
    pub healthy: bool,
    /// Cases scheduled for the current local day; 0 when the probe fails.
    pub cases_today: usize,
}
