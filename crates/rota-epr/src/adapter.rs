//! The uniform capability surface over theatre scheduling backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use rota_core::types::{
    CasePriority, CaseStatus, DateRange, EprSystem, TheatreCase,
};

use crate::error::EprError;

/// Result of a backend health probe.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Fields accepted when creating a case. Anything omitted gets a store-side
/// default so manual entry stays low-friction.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CaseDraft {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub patient_age: Option<u8>,
    pub procedure: Option<String>,
    pub procedure_code: Option<String>,
    pub surgeon: Option<String>,
    pub anaesthetist: Option<String>,
    pub theatre: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub estimated_duration_mins: Option<u32>,
    pub status: Option<CaseStatus>,
    pub priority: Option<CasePriority>,
    pub special_requirements: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Partial update applied to an existing case. `None` fields are untouched.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CaseUpdate {
    pub patient_name: Option<String>,
    pub procedure: Option<String>,
    pub surgeon: Option<String>,
    pub anaesthetist: Option<String>,
    pub theatre: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub estimated_duration_mins: Option<u32>,
    pub status: Option<CaseStatus>,
    pub priority: Option<CasePriority>,
    pub special_requirements: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Uniform adapter over an EPR scheduling backend.
///
/// Concrete backends implement the required CRUD and query surface; the
/// date/surgeon/theatre accessors and the health probe come with default
/// implementations built on `get_cases`, which backends may override with
/// native queries where the upstream system supports them.
#[async_trait]
pub trait EprAdapter: Send + Sync {
    /// Which backend this adapter talks to.
    fn system_name(&self) -> EprSystem;

    /// Whether the backend has the credentials/connection it needs.
    fn is_configured(&self) -> bool;

    /// All cases, optionally restricted to a scheduling window.
    async fn get_cases(&self, range: Option<DateRange>) -> Result<Vec<TheatreCase>, EprError>;

    /// Lookup by id. A missing id is an empty result, not an error.
    async fn get_case(&self, id: &str) -> Result<Option<TheatreCase>, EprError>;

    async fn create_case(&self, draft: CaseDraft) -> Result<TheatreCase, EprError>;

    /// Apply a partial update. Fails with [`EprError::CaseNotFound`] when
    /// the target id does not exist.
    async fn update_case(&self, id: &str, update: CaseUpdate) -> Result<TheatreCase, EprError>;

    /// Remove a case. Fails with [`EprError::CaseNotFound`] when the target
    /// id does not exist.
    async fn delete_case(&self, id: &str) -> Result<(), EprError>;

    /// Cases scheduled within the current local calendar day.
    async fn get_cases_for_today(&self) -> Result<Vec<TheatreCase>, EprError> {
        self.get_cases(Some(DateRange::today())).await
    }

    /// Cases scheduled within the next local calendar day.
    async fn get_cases_for_tomorrow(&self) -> Result<Vec<TheatreCase>, EprError> {
        self.get_cases(Some(DateRange::tomorrow())).await
    }

    /// Case-insensitive substring match on the surgeon name.
    async fn get_cases_by_surgeon(&self, fragment: &str) -> Result<Vec<TheatreCase>, EprError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .get_cases(None)
            .await?
            .into_iter()
            .filter(|c| c.surgeon.to_lowercase().contains(&needle))
            .collect())
    }

    /// Case-insensitive substring match on the theatre identifier.
    async fn get_cases_by_theatre(&self, identifier: &str) -> Result<Vec<TheatreCase>, EprError> {
        let needle = identifier.to_lowercase();
        Ok(self
            .get_cases(None)
            .await?
            .into_iter()
            .filter(|c| c.theatre.to_lowercase().contains(&needle))
            .collect())
    }

    /// Probe the backend by attempting a read.
    async fn health_check(&self) -> HealthStatus {
        match self.get_cases(None).await {
            Ok(cases) => HealthStatus {
                healthy: true,
                message: Some(format!(
                    "{} connected successfully. {} cases found.",
                    self.system_name(),
                    cases.len()
                )),
            },
            Err(e) => HealthStatus {
                healthy: false,
                message: Some(format!("{} health check failed: {}", self.system_name(), e)),
            },
        }
    }

    /// Live feed of today's cases, for backends that support subscriptions.
    ///
    /// Optional capability: callers check for `Some` rather than assuming
    /// support. The default is no subscription support.
    fn subscribe_today(&self) -> Option<broadcast::Receiver<Vec<TheatreCase>>> {
        None
    }
}

impl CaseDraft {
    /// Materialize a full case from the draft, filling store-side defaults.
    pub fn into_case(self, id: String, source_system: EprSystem) -> TheatreCase {
        let now = Utc::now();
        TheatreCase {
            patient_id: self
                .patient_id
                .unwrap_or_else(|| format!("PAT_{}", uuid::Uuid::new_v4().simple())),
            patient_name: self.patient_name,
            patient_age: self.patient_age,
            procedure: self
                .procedure
                .unwrap_or_else(|| "Unknown procedure".to_string()),
            procedure_code: self.procedure_code,
            surgeon: self.surgeon.unwrap_or_else(|| "Not assigned".to_string()),
            anaesthetist: self.anaesthetist,
            theatre: self.theatre.unwrap_or_else(|| "Not assigned".to_string()),
            scheduled_date: self.scheduled_date.unwrap_or(now),
            scheduled_time: self.scheduled_time,
            estimated_duration_mins: self.estimated_duration_mins,
            status: self.status.unwrap_or_default(),
            priority: self.priority,
            special_requirements: self.special_requirements.unwrap_or_default(),
            notes: self.notes,
            source_system,
            source_id: Some(id.clone()),
            created_at: Some(now),
            updated_at: Some(now),
            id,
        }
    }
}

impl CaseUpdate {
    /// Apply the non-empty fields onto an existing case in place.
    pub fn apply(self, case: &mut TheatreCase) {
        if let Some(v) = self.patient_name {
            case.patient_name = Some(v);
        }
        if let Some(v) = self.procedure {
            case.procedure = v;
        }
        if let Some(v) = self.surgeon {
            case.surgeon = v;
        }
        if let Some(v) = self.anaesthetist {
            case.anaesthetist = Some(v);
        }
        if let Some(v) = self.theatre {
            case.theatre = v;
        }
        if let Some(v) = self.scheduled_date {
            case.scheduled_date = v;
        }
        if let Some(v) = self.scheduled_time {
            case.scheduled_time = Some(v);
        }
        if let Some(v) = self.estimated_duration_mins {
            case.estimated_duration_mins = Some(v);
        }
        if let Some(v) = self.status {
            case.status = v;
        }
        if let Some(v) = self.priority {
            case.priority = Some(v);
        }
        if let Some(v) = self.special_requirements {
            case.special_requirements = v;
        }
        if let Some(v) = self.notes {
            case.notes = Some(v);
        }
        case.updated_at = Some(Utc::now());
    }
}
