//! Waitlist priority tiers, statuses, follow-up dates, and triage ordering.
//!
//! This module lives in `core` (zero internal deps) so the Postgres adapter,
//! the in-memory adapter, and the API layer all share one definition of
//! what "due" means and how due entries are ranked.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority tier of a waitlist entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    /// Tier level, `LOW` = 0 through `HIGH` = 2. Used for `sort_by=priority`.
    pub fn level(self) -> i16 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    /// Triage rank, 0 is the most urgent tier.
    ///
    /// Due follow-ups are ordered by this rank rather than by declaration or
    /// alphabetical order of the tier names.
    pub fn urgency_rank(self) -> i16 {
        2 - self.level()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid priority '{s}'. Must be one of: LOW, MEDIUM, HIGH"
                ))
            })
    }
}

impl TryFrom<String> for Priority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a waitlist entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum WaitlistStatus {
    #[default]
    Waiting,
    Contacted,
    Scheduled,
    Removed,
}

impl WaitlistStatus {
    pub const ALL: [WaitlistStatus; 4] = [
        WaitlistStatus::Waiting,
        WaitlistStatus::Contacted,
        WaitlistStatus::Scheduled,
        WaitlistStatus::Removed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WaitlistStatus::Waiting => "WAITING",
            WaitlistStatus::Contacted => "CONTACTED",
            WaitlistStatus::Scheduled => "SCHEDULED",
            WaitlistStatus::Removed => "REMOVED",
        }
    }

    /// Statuses a staff member would normally move an entry to next.
    ///
    /// Advisory only: updates may write any status.
    pub fn recommended_transitions(self) -> &'static [WaitlistStatus] {
        match self {
            WaitlistStatus::Waiting => &[
                WaitlistStatus::Contacted,
                WaitlistStatus::Scheduled,
                WaitlistStatus::Removed,
            ],
            WaitlistStatus::Contacted => &[
                WaitlistStatus::Scheduled,
                WaitlistStatus::Removed,
                WaitlistStatus::Waiting,
            ],
            WaitlistStatus::Scheduled | WaitlistStatus::Removed => &[],
        }
    }
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitlistStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaitlistStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'. Must be one of: WAITING, CONTACTED, SCHEDULED, REMOVED"
                ))
            })
    }
}

impl TryFrom<String> for WaitlistStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whether `from -> to` follows the usual workflow. Writing the same status
/// again is always considered fine.
pub fn is_recommended_transition(from: WaitlistStatus, to: WaitlistStatus) -> bool {
    from == to || from.recommended_transitions().contains(&to)
}

// ---------------------------------------------------------------------------
// Follow-up dates
// ---------------------------------------------------------------------------

/// Parse a follow-up date from an ISO-8601 string.
///
/// Accepts a plain date (`2025-04-01`) or a full timestamp
/// (`2025-04-01T09:30:00Z`, `2025-04-01T09:30:00.000`), in which case the
/// time of day is dropped.
pub fn parse_follow_up_date(raw: &str) -> Result<Date, CoreError> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.date());
    }

    Err(CoreError::Validation(format!(
        "Invalid date '{raw}'. Expected an ISO-8601 date such as 2025-04-01"
    )))
}

/// Start of the current calendar day in server-local time.
pub fn today_local() -> Date {
    chrono::Local::now().date_naive()
}

/// Whether an entry needs contacting on or before `today`.
pub fn is_due(follow_up_date: Option<Date>, status: WaitlistStatus, today: Date) -> bool {
    status != WaitlistStatus::Removed && follow_up_date.is_some_and(|d| d <= today)
}

/// Triage ordering for due follow-ups: most urgent tier first, then the
/// oldest follow-up date.
pub fn compare_due(a: (Priority, Date), b: (Priority, Date)) -> Ordering {
    a.0.urgency_rank()
        .cmp(&b.0.urgency_rank())
        .then_with(|| a.1.cmp(&b.1))
}

/// Compare optional dates the way PostgreSQL does by default: NULL sorts
/// after every value in ascending order.
pub fn compare_nullable_dates(a: Option<Date>, b: Option<Date>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Column a waitlist listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    FollowUpDate,
    Priority,
    Status,
}

impl SortField {
    /// Accepts both `snake_case` and `camelCase` spellings.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "created_at" | "createdAt" => Some(SortField::CreatedAt),
            "updated_at" | "updatedAt" => Some(SortField::UpdatedAt),
            "follow_up_date" | "followUpDate" => Some(SortField::FollowUpDate),
            "priority" => Some(SortField::Priority),
            "status" => Some(SortField::Status),
            _ => None,
        }
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::from_name(s.trim()).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid sort field '{s}'. Must be one of: created_at, updated_at, \
                 follow_up_date, priority, status"
            ))
        })
    }
}

impl TryFrom<String> for SortField {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Direction of a listing sort. Listings default to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Apply this direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(CoreError::Validation(format!(
                "Invalid sort order '{s}'. Must be 'asc' or 'desc'"
            ))),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validate an inclusive follow-up date range.
pub fn validate_follow_up_range(from: Option<Date>, to: Option<Date>) -> Result<(), CoreError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(CoreError::Validation(format!(
            "follow_up_from ({from}) must not be after follow_up_to ({to})"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(s: &str) -> Date {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // -- Priority / status parsing -------------------------------------------

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("MEDIUM".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!(" Low ".parse::<Priority>().unwrap(), Priority::Low);
    }

    #[test]
    fn unknown_priority_rejected() {
        let err = "URGENT".parse::<Priority>().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("URGENT"));
    }

    #[test]
    fn defaults_are_medium_and_waiting() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(WaitlistStatus::default(), WaitlistStatus::Waiting);
    }

    #[test]
    fn status_deserializes_from_json_string() {
        let status: WaitlistStatus = serde_json::from_str("\"contacted\"").unwrap();
        assert_eq!(status, WaitlistStatus::Contacted);
        assert!(serde_json::from_str::<WaitlistStatus>("\"ARCHIVED\"").is_err());
    }

    #[test]
    fn enums_serialize_upper_case() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        assert_eq!(
            serde_json::to_string(&WaitlistStatus::Removed).unwrap(),
            "\"REMOVED\""
        );
    }

    #[test]
    fn high_is_most_urgent() {
        assert!(Priority::High.urgency_rank() < Priority::Medium.urgency_rank());
        assert!(Priority::Medium.urgency_rank() < Priority::Low.urgency_rank());
    }

    // -- Transitions ---------------------------------------------------------

    #[test]
    fn waiting_can_move_to_contacted() {
        assert!(is_recommended_transition(
            WaitlistStatus::Waiting,
            WaitlistStatus::Contacted
        ));
    }

    #[test]
    fn contacted_can_return_to_waiting() {
        assert!(is_recommended_transition(
            WaitlistStatus::Contacted,
            WaitlistStatus::Waiting
        ));
    }

    #[test]
    fn leaving_removed_is_off_diagram() {
        assert!(!is_recommended_transition(
            WaitlistStatus::Removed,
            WaitlistStatus::Waiting
        ));
        assert!(is_recommended_transition(
            WaitlistStatus::Removed,
            WaitlistStatus::Removed
        ));
    }

    // -- Dates ---------------------------------------------------------------

    #[test]
    fn parses_plain_date() {
        assert_eq!(parse_follow_up_date("2025-04-01").unwrap(), date("2025-04-01"));
    }

    #[test]
    fn parses_timestamp_and_drops_time() {
        assert_eq!(
            parse_follow_up_date("2025-04-15T13:45:00Z").unwrap(),
            date("2025-04-15")
        );
        assert_eq!(
            parse_follow_up_date("2025-04-15T08:00:00.000").unwrap(),
            date("2025-04-15")
        );
    }

    #[test]
    fn rejects_garbage_date() {
        assert_matches!(
            parse_follow_up_date("next tuesday"),
            Err(CoreError::Validation(_))
        );
        assert!(parse_follow_up_date("2025-02-30").is_err());
    }

    #[test]
    fn due_includes_today_and_past() {
        let today = date("2025-04-10");
        assert!(is_due(Some(date("2025-04-10")), WaitlistStatus::Waiting, today));
        assert!(is_due(Some(date("2025-01-01")), WaitlistStatus::Contacted, today));
        assert!(!is_due(Some(date("2025-04-11")), WaitlistStatus::Waiting, today));
        assert!(!is_due(None, WaitlistStatus::Waiting, today));
    }

    #[test]
    fn removed_is_never_due() {
        let today = date("2025-04-10");
        assert!(!is_due(Some(date("2024-12-01")), WaitlistStatus::Removed, today));
    }

    // -- Ordering ------------------------------------------------------------

    #[test]
    fn same_date_orders_by_urgency() {
        let d = date("2025-04-01");
        assert_eq!(
            compare_due((Priority::High, d), (Priority::Low, d)),
            Ordering::Less
        );
    }

    #[test]
    fn same_priority_orders_oldest_first() {
        assert_eq!(
            compare_due(
                (Priority::Medium, date("2025-03-01")),
                (Priority::Medium, date("2025-04-01"))
            ),
            Ordering::Less
        );
    }

    #[test]
    fn nulls_sort_last_ascending() {
        assert_eq!(
            compare_nullable_dates(None, Some(date("2025-01-01"))),
            Ordering::Greater
        );
        assert_eq!(
            SortOrder::Desc.apply(compare_nullable_dates(None, Some(date("2025-01-01")))),
            Ordering::Less
        );
    }

    #[test]
    fn sort_field_accepts_both_spellings() {
        assert_eq!("createdAt".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!(
            "follow_up_date".parse::<SortField>().unwrap(),
            SortField::FollowUpDate
        );
        assert!("name".parse::<SortField>().is_err());
    }

    #[test]
    fn sort_order_defaults_to_desc() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(validate_follow_up_range(Some(date("2025-05-01")), Some(date("2025-04-01"))).is_err());
        assert!(validate_follow_up_range(Some(date("2025-03-01")), Some(date("2025-04-30"))).is_ok());
        assert!(validate_follow_up_range(None, Some(date("2025-04-30"))).is_ok());
    }
}
