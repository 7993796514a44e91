use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle status of a theatre case.
///
/// Created and mutated store-side; the chat pipeline only reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Delayed,
    Emergency,
}

impl CaseStatus {
    /// The snake_case tag used in serialized records and context strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Scheduled => "scheduled",
            CaseStatus::Confirmed => "confirmed",
            CaseStatus::InProgress => "in_progress",
            CaseStatus::Completed => "completed",
            CaseStatus::Cancelled => "cancelled",
            CaseStatus::Delayed => "delayed",
            CaseStatus::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical priority of a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Routine,
    Urgent,
    Emergency,
    Elective,
}

/// The EPR backend a record originated from. Doubles as the configuration
/// tag that selects an adapter at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EprSystem {
    Epic,
    Cerner,
    Tpp,
    Emis,
    #[default]
    Manual,
    Other,
}

impl EprSystem {
    /// Parse a configuration tag, case-insensitively.
    ///
    /// Unknown tags map to `Other`; the adapter factory resolves those to
    /// the manual-entry backend explicitly, never silently.
    pub fn parse(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "epic" => EprSystem::Epic,
            "cerner" => EprSystem::Cerner,
            "tpp" => EprSystem::Tpp,
            "emis" => EprSystem::Emis,
            "manual" => EprSystem::Manual,
            _ => EprSystem::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EprSystem::Epic => "epic",
            EprSystem::Cerner => "cerner",
            EprSystem::Tpp => "tpp",
            EprSystem::Emis => "emis",
            EprSystem::Manual => "manual",
            EprSystem::Other => "other",
        }
    }
}

impl std::fmt::Display for EprSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a chat message author.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

// =============================================================================
// Flexible timestamps
// =============================================================================

/// Serde helper accepting either an RFC 3339 string or epoch seconds.
///
/// Backends represent scheduled dates differently (ISO strings, numeric
/// timestamps); this keeps `scheduled_date` always resolvable to a concrete
/// instant regardless of the source format.
pub mod flexible_instant {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Epoch(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(d: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(d)? {
            Raw::Epoch(secs) => Utc
                .timestamp_opt(secs, 0)
                .single()
                .ok_or_else(|| serde::de::Error::custom("epoch seconds out of range")),
            Raw::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(serde::de::Error::custom),
        }
    }

    pub fn serialize<S>(dt: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&dt.to_rfc3339())
    }
}

// =============================================================================
// TheatreCase
// =============================================================================

/// A scheduled operating-theatre case, normalized across EPR backends.
///
/// `id` is unique within a store. The chat pipeline treats cases as
/// read-only snapshots; all mutation happens through the record store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TheatreCase {
    pub id: String,
    pub patient_id: String,
    /// Optional for privacy; context strings fall back to `patient_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_age: Option<u8>,
    pub procedure: String,
    /// SNOMED/OPCS code, where the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_code: Option<String>,
    pub surgeon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anaesthetist: Option<String>,
    pub theatre: String,
    #[serde(with = "flexible_instant")]
    pub scheduled_date: DateTime<Utc>,
    /// Display time string, e.g. "09:00". Absent means not yet slotted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_mins: Option<u32>,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<CasePriority>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub source_system: EprSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Date ranges
// =============================================================================

/// A half-open `[start, end)` window in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// The window covering one local calendar day.
    pub fn local_day(date: NaiveDate) -> Self {
        Self {
            start: local_midnight_utc(date.and_time(NaiveTime::MIN)),
            end: local_midnight_utc((date + Duration::days(1)).and_time(NaiveTime::MIN)),
        }
    }

    /// The current local calendar day.
    pub fn today() -> Self {
        Self::local_day(Local::now().date_naive())
    }

    /// The next local calendar day.
    pub fn tomorrow() -> Self {
        Self::local_day(Local::now().date_naive() + Duration::days(1))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Resolve a naive local midnight to UTC, tolerating DST gaps.
fn local_midnight_utc(ndt: NaiveDateTime) -> DateTime<Utc> {
    match ndt.and_local_timezone(Local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST transition: treat the naive time as UTC.
        LocalResult::None => Utc.from_utc_datetime(&ndt),
    }
}

// =============================================================================
// Chat messages
// =============================================================================

/// The orchestrator's output for one processed chat turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The raw retrieval context handed to the generative model, kept for
    /// traceability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

// =============================================================================
// Audit records
// =============================================================================

/// Structured payload of one audit entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditDetails {
    pub query: String,
    pub cases_found: usize,
    pub query_type: String,
}

/// One compliance audit entry, written by the orchestrator, owned by the
/// audit sink.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub action: String,
    pub resource: String,
    pub details: AuditDetails,
    pub gdpr_compliant: bool,
    pub data_encrypted: bool,
}

impl AuditRecord {
    pub fn new(user_id: &str, action: &str, resource: &str, details: AuditDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
            action: action.to_string(),
            resource: resource.to_string(),
            details,
            gdpr_compliant: true,
            data_encrypted: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
