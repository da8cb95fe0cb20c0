//! Waitlist entry model, request DTOs, resolved store inputs, and the
//! client-joined views returned by the API.

use carebook_core::text::deserialize_clearable;
use carebook_core::types::{Date, DbId, Timestamp};
use carebook_core::waitlist::{Priority, SortField, SortOrder, WaitlistStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::client::{Client, ClientSummary};

/// A row from the `waitlist_entries` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WaitlistEntry {
    pub id: DbId,
    pub client_id: DbId,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub requested_service: Option<String>,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: WaitlistStatus,
    pub follow_up_date: Option<Date>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for creating a waitlist entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWaitlistEntry {
    #[serde(alias = "clientId")]
    pub client_id: DbId,
    pub priority: Option<Priority>,
    #[serde(alias = "requestedService")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub requested_service: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub notes: Option<String>,
    pub status: Option<WaitlistStatus>,
    /// ISO-8601 date or timestamp; parsed by the service.
    #[serde(alias = "followUpDate")]
    pub follow_up_date: Option<String>,
}

/// Request body for a partial update. Absent fields are left untouched.
///
/// `requested_service`, `notes` and `follow_up_date` are clearable: an
/// explicit `null` removes the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWaitlistEntry {
    #[serde(alias = "clientId")]
    pub client_id: Option<DbId>,
    pub priority: Option<Priority>,
    #[serde(
        default,
        alias = "requestedService",
        deserialize_with = "deserialize_clearable"
    )]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub requested_service: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_clearable")]
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub notes: Option<Option<String>>,
    pub status: Option<WaitlistStatus>,
    #[serde(
        default,
        alias = "followUpDate",
        deserialize_with = "deserialize_clearable"
    )]
    pub follow_up_date: Option<Option<String>>,
}

/// Query parameters for `GET /waitlist`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitlistFilterParams {
    pub priority: Option<Priority>,
    pub status: Option<WaitlistStatus>,
    #[serde(alias = "clientId")]
    pub client_id: Option<DbId>,
    #[serde(alias = "followUpFrom")]
    pub follow_up_from: Option<String>,
    #[serde(alias = "followUpTo")]
    pub follow_up_to: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<SortField>,
    #[serde(alias = "sortOrder")]
    pub sort_order: Option<SortOrder>,
}

// ---------------------------------------------------------------------------
// Resolved store inputs
// ---------------------------------------------------------------------------

/// A fully-resolved entry ready to insert: defaults applied, date parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaitlistEntry {
    pub client_id: DbId,
    pub priority: Priority,
    pub requested_service: Option<String>,
    pub notes: Option<String>,
    pub status: WaitlistStatus,
    pub follow_up_date: Option<Date>,
    pub created_by: Option<DbId>,
}

/// A resolved partial update. `None` means "leave unchanged"; for the
/// clearable fields `Some(None)` means "set to NULL".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaitlistPatch {
    pub client_id: Option<DbId>,
    pub priority: Option<Priority>,
    pub requested_service: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub status: Option<WaitlistStatus>,
    pub follow_up_date: Option<Option<Date>>,
}

/// The row written by an update, with the status it had just before.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UpdatedEntry {
    #[sqlx(flatten)]
    pub entry: WaitlistEntry,
    #[sqlx(try_from = "String")]
    pub previous_status: WaitlistStatus,
}

/// A resolved listing query. Every filter is optional and they combine
/// with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaitlistQuery {
    pub priority: Option<Priority>,
    pub status: Option<WaitlistStatus>,
    pub client_id: Option<DbId>,
    /// Inclusive lower bound on `follow_up_date`.
    pub follow_up_from: Option<Date>,
    /// Inclusive upper bound on `follow_up_date`.
    pub follow_up_to: Option<Date>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// An entry joined with its client summary.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistEntryWithClient {
    #[serde(flatten)]
    pub entry: WaitlistEntry,
    pub client: ClientSummary,
}

/// An entry joined with the full client record.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistEntryDetail {
    #[serde(flatten)]
    pub entry: WaitlistEntry,
    pub client: Client,
}
