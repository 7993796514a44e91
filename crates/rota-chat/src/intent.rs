//! Keyword-based query intent classification.
//!
//! Deliberately simple: literal keyword matching with a fixed precedence
//! order, not NLP. The precedence is observable behaviour — inputs that
//! contain several keywords ("list tomorrow's schedule for today") must
//! resolve the same way every time — so the rule order here is load-bearing.

use regex::Regex;
use std::sync::LazyLock;

// Rule 4: role word followed by a name token.
static SURGEON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:surgeon|doctor|consultant)\s+(\w+)").expect("Invalid surgeon regex"));

// Rule 4 presence check, independent of whether a name follows.
static ROLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"surgeon|doctor|consultant").expect("Invalid role regex"));

// Rule 5: theatre/room followed by a number or a single letter.
static THEATRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:theatre|room)\s+(\d+|[a-z])\b").expect("Invalid theatre regex"));

// Rule 5 presence check.
static ROOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"theatre|room").expect("Invalid room regex"));

/// Classified purpose of a user query, driving which retrieval accessor
/// runs. Built fresh per message, immutable, discarded after use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryIntent {
    /// Cases scheduled for the current day.
    Today,
    /// Cases scheduled for the next day.
    Tomorrow,
    /// A list/schedule request, sub-resolved to today or tomorrow.
    List { tomorrow: bool },
    /// Cases assigned to a surgeon matching the captured name fragment.
    BySurgeon { name: String },
    /// Cases in the captured theatre/room.
    ByTheatre { theatre: String },
    /// No keyword matched; retrieves the same as `Today`.
    Default,
    /// Retrieval failed; carries an empty result set.
    Error,
}

impl QueryIntent {
    /// The tag recorded in audit entries and query metadata.
    ///
    /// `List` reports the day it resolved to, matching what was actually
    /// retrieved.
    pub fn query_type(&self) -> &'static str {
        match self {
            QueryIntent::Today => "today",
            QueryIntent::Tomorrow => "tomorrow",
            QueryIntent::List { tomorrow: true } => "tomorrow",
            QueryIntent::List { tomorrow: false } => "today",
            QueryIntent::BySurgeon { .. } => "surgeon",
            QueryIntent::ByTheatre { .. } => "theatre",
            QueryIntent::Default => "default",
            QueryIntent::Error => "error",
        }
    }
}

/// Classify a raw user message. Pure, total, case-insensitive.
///
/// Rules run in precedence order; the first match wins. A role or room
/// keyword without a capturable parameter degrades to `Default` rather
/// than failing the request.
pub fn classify(text: &str) -> QueryIntent {
    let lower = text.to_lowercase();

    if lower.contains("today") || lower.contains("current") {
        return QueryIntent::Today;
    }
    if lower.contains("tomorrow") {
        return QueryIntent::Tomorrow;
    }
    if lower.contains("list") || lower.contains("schedule") {
        return QueryIntent::List {
            tomorrow: lower.contains("tomorrow"),
        };
    }
    if ROLE_RE.is_match(&lower) {
        if let Some(caps) = SURGEON_RE.captures(&lower) {
            return QueryIntent::BySurgeon {
                name: caps[1].to_string(),
            };
        }
        // Bare mention of a role word with no following name.
        return QueryIntent::Default;
    }
    if ROOM_RE.is_match(&lower) {
        if let Some(caps) = THEATRE_RE.captures(&lower) {
            return QueryIntent::ByTheatre {
                theatre: caps[1].to_string(),
            };
        }
        return QueryIntent::Default;
    }

    QueryIntent::Default
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Rule 1: today / current ----

    #[test]
    fn test_today_keyword() {
        assert_eq!(classify("What's on today?"), QueryIntent::Today);
        assert_eq!(classify("TODAY please"), QueryIntent::Today);
        assert_eq!(classify("current theatre load"), QueryIntent::Today);
    }

    #[test]
    fn test_today_beats_lower_rules() {
        // "today" wins even when surgeon/theatre keywords are present.
        assert_eq!(
            classify("which surgeon is on today"),
            QueryIntent::Today
        );
        assert_eq!(classify("theatre 3 today"), QueryIntent::Today);
    }

    // ---- Rule 2: tomorrow ----

    #[test]
    fn test_tomorrow_keyword() {
        assert_eq!(classify("what about tomorrow"), QueryIntent::Tomorrow);
    }

    #[test]
    fn test_today_checked_before_tomorrow() {
        // Rule order: "today" is checked first, so both present yields Today.
        assert_eq!(classify("today and tomorrow"), QueryIntent::Today);
    }

    #[test]
    fn test_schedule_for_tomorrow_is_tomorrow() {
        // "tomorrow" is checked before "schedule", so the direct rule wins.
        assert_eq!(classify("schedule for tomorrow"), QueryIntent::Tomorrow);
    }

    // ---- Rule 3: list / schedule ----

    #[test]
    fn test_list_keyword_resolves_to_today() {
        assert_eq!(
            classify("list the cases"),
            QueryIntent::List { tomorrow: false }
        );
        assert_eq!(
            classify("show me the schedule"),
            QueryIntent::List { tomorrow: false }
        );
    }

    #[test]
    fn test_list_query_type_reports_resolved_day() {
        assert_eq!(QueryIntent::List { tomorrow: false }.query_type(), "today");
        assert_eq!(QueryIntent::List { tomorrow: true }.query_type(), "tomorrow");
    }

    // ---- Rule 4: surgeon ----

    #[test]
    fn test_surgeon_with_name() {
        assert_eq!(
            classify("what is surgeon smith doing"),
            QueryIntent::BySurgeon {
                name: "smith".to_string()
            }
        );
        assert_eq!(
            classify("cases for Doctor Patel"),
            QueryIntent::BySurgeon {
                name: "patel".to_string()
            }
        );
        assert_eq!(
            classify("consultant jones please"),
            QueryIntent::BySurgeon {
                name: "jones".to_string()
            }
        );
    }

    #[test]
    fn test_bare_surgeon_degrades_to_default() {
        // A role word with no following name must not fail the request.
        assert_eq!(classify("surgeon"), QueryIntent::Default);
        assert_eq!(classify("who is the surgeon"), QueryIntent::Default);
    }

    // ---- Rule 5: theatre / room ----

    #[test]
    fn test_theatre_with_number() {
        assert_eq!(
            classify("what's in theatre 3"),
            QueryIntent::ByTheatre {
                theatre: "3".to_string()
            }
        );
        assert_eq!(
            classify("room 12 status"),
            QueryIntent::ByTheatre {
                theatre: "12".to_string()
            }
        );
    }

    #[test]
    fn test_theatre_with_single_letter() {
        assert_eq!(
            classify("theatre b please"),
            QueryIntent::ByTheatre {
                theatre: "b".to_string()
            }
        );
    }

    #[test]
    fn test_bare_theatre_degrades_to_default() {
        assert_eq!(classify("the theatre"), QueryIntent::Default);
        // A following word is not a single letter or number.
        assert_eq!(classify("theatre staffing"), QueryIntent::Default);
    }

    // ---- Rule 6: default ----

    #[test]
    fn test_unmatched_text_is_default() {
        assert_eq!(classify("hello there"), QueryIntent::Default);
        assert_eq!(classify(""), QueryIntent::Default);
        assert_eq!(classify("🩺"), QueryIntent::Default);
    }

    // ---- Precedence interplay ----

    #[test]
    fn test_list_tomorrow_schedule_for_today() {
        // All three keywords present: rule 1 wins.
        assert_eq!(
            classify("list tomorrow's schedule for today"),
            QueryIntent::Today
        );
    }

    #[test]
    fn test_list_beats_surgeon() {
        assert_eq!(
            classify("list cases for surgeon smith"),
            QueryIntent::List { tomorrow: false }
        );
    }

    #[test]
    fn test_query_type_tags() {
        assert_eq!(QueryIntent::Today.query_type(), "today");
        assert_eq!(QueryIntent::Tomorrow.query_type(), "tomorrow");
        assert_eq!(
            QueryIntent::BySurgeon {
                name: "x".to_string()
            }
            .query_type(),
            "surgeon"
        );
        assert_eq!(
            QueryIntent::ByTheatre {
                theatre: "1".to_string()
            }
            .query_type(),
            "theatre"
        );
        assert_eq!(QueryIntent::Default.query_type(), "default");
        assert_eq!(QueryIntent::Error.query_type(), "error");
    }

    // ---- Robustness ----

    #[test]
    fn test_classify_never_panics_on_odd_input() {
        for input in [
            "surgeon ",
            "theatre ",
            "room\n",
            "doctor\t",
            "a".repeat(10_000).as_str(),
            "ÉLÈVE TOMORROW",
        ] {
            let _ = classify(input);
        }
        assert_eq!(classify("ÉLÈVE TOMORROW"), QueryIntent::Tomorrow);
    }
}
