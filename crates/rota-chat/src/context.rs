//! Deterministic context-string rendering for retrieved cases.
//!
//! The output is the grounding text handed to the generative model, and it
//! is also what users see verbatim when generation is unavailable, so the
//! format is stable: byte-for-byte reproducible for a given case list.

use chrono::{Datelike, Duration, Local, NaiveDate};

use rota_core::types::TheatreCase;

use crate::types::QueryContext;

/// Fixed sentinel returned for an empty case list. Keeps the downstream
/// prompt well-formed; never an empty string.
pub const EMPTY_SCHEDULE_NOTICE: &str = "No theatre cases found for this query. \
The theatre schedule may be empty or the database may need updating.";

/// Render the retrieval result into the bounded context block.
pub fn build(context: &QueryContext) -> String {
    render(&context.cases, Local::now().date_naive())
}

/// Render against an explicit reference date. `today` is the local calendar
/// day used for the "Today"/"Tomorrow" date labels.
pub fn render(cases: &[TheatreCase], today: NaiveDate) -> String {
    if cases.is_empty() {
        return EMPTY_SCHEDULE_NOTICE.to_string();
    }

    let blocks: Vec<String> = cases
        .iter()
        .enumerate()
        .map(|(idx, case)| render_case(idx + 1, case, today))
        .collect();

    format!(
        "Theatre Cases ({} total):\n\n{}",
        cases.len(),
        blocks.join("\n\n")
    )
}

fn render_case(index: usize, case: &TheatreCase, today: NaiveDate) -> String {
    let case_date = case.scheduled_date.with_timezone(&Local).date_naive();
    let date_label = if case_date == today {
        "Today".to_string()
    } else if case_date == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        format!(
            "{:02}/{:02}/{:04}",
            case_date.day(),
            case_date.month(),
            case_date.year()
        )
    };

    let patient = case
        .patient_name
        .as_deref()
        .unwrap_or(case.patient_id.as_str());
    let time = case.scheduled_time.as_deref().unwrap_or("Not scheduled");

    let mut block = format!(
        "{}. {}\n   - Patient: {}\n   - Surgeon: {}\n   - Theatre: {}\n   - Time: {}\n   - Date: {}\n   - Status: {}",
        index, case.procedure, patient, case.surgeon, case.theatre, time, date_label, case.status
    );
    if !case.special_requirements.is_empty() {
        block.push_str("\n   - Special requirements: ");
        block.push_str(&case.special_requirements.join(", "));
    }
    block
}

// =============================================================================
// Tests
// =============================================================================
