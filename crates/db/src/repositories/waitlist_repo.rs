//! Repository for the `waitlist_entries` table.

use carebook_core::types::{Date, DbId};
use carebook_core::waitlist::{Priority, SortField, WaitlistStatus};
use sqlx::PgPool;

use crate::models::waitlist::{
    NewWaitlistEntry, UpdatedEntry, WaitlistEntry, WaitlistPatch, WaitlistQuery,
};

/// Column list for waitlist_entries queries.
const COLUMNS: &str = "id, client_id, priority, requested_service, notes, status, \
    follow_up_date, created_by, created_at, updated_at";

/// Provides CRUD and triage queries for waitlist entries.
pub struct WaitlistRepo;

impl WaitlistRepo {
    /// Insert a resolved entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewWaitlistEntry,
    ) -> Result<WaitlistEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO waitlist_entries
                (client_id, priority, requested_service, notes, status, follow_up_date, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(input.client_id)
            .bind(input.priority.as_str())
            .bind(&input.requested_service)
            .bind(&input.notes)
            .bind(input.status.as_str())
            .bind(input.follow_up_date)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM waitlist_entries WHERE id = $1");
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries matching every supplied filter, ordered by the requested
    /// field with `id` as tie-breaker.
    pub async fn list(
        pool: &PgPool,
        params: &WaitlistQuery,
    ) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        let direction = params.sort_order.as_sql();
        let query = format!(
            "SELECT {COLUMNS} FROM waitlist_entries
             WHERE ($1::TEXT IS NULL OR priority = $1)
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::BIGINT IS NULL OR client_id = $3)
               AND ($4::DATE IS NULL OR follow_up_date >= $4)
               AND ($5::DATE IS NULL OR follow_up_date <= $5)
             ORDER BY {sort} {direction}, id {direction}",
            sort = sort_expression(params.sort_by),
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(params.priority.map(Priority::as_str))
            .bind(params.status.map(WaitlistStatus::as_str))
            .bind(params.client_id)
            .bind(params.follow_up_from)
            .bind(params.follow_up_to)
            .fetch_all(pool)
            .await
    }

    /// Entries whose follow-up date is on or before `today` and which have
    /// not been removed, most urgent tier first, then most overdue.
    pub async fn list_due(pool: &PgPool, today: Date) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM waitlist_entries
             WHERE follow_up_date <= $1
               AND status <> $2
             ORDER BY {urgency} ASC, follow_up_date ASC, id ASC",
            urgency = urgency_expression(),
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(today)
            .bind(WaitlistStatus::Removed.as_str())
            .fetch_all(pool)
            .await
    }

    /// All entries for one client, newest first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM waitlist_entries
             WHERE client_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update, returning the updated row together with its
    /// prior status, or `None` if no entry has that ID.
    ///
    /// Scalar fields use `COALESCE`. The clearable fields take a "provided"
    /// flag so an explicit NULL can overwrite the stored value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &WaitlistPatch,
    ) -> Result<Option<UpdatedEntry>, sqlx::Error> {
        let query = format!(
            "WITH previous AS (
                SELECT id AS previous_id, status AS previous_status
                FROM waitlist_entries WHERE id = $1 FOR UPDATE
             )
             UPDATE waitlist_entries SET
                client_id = COALESCE($2, client_id),
                priority = COALESCE($3, priority),
                requested_service = CASE WHEN $4 THEN $5 ELSE requested_service END,
                notes = CASE WHEN $6 THEN $7 ELSE notes END,
                status = COALESCE($8, status),
                follow_up_date = CASE WHEN $9 THEN $10 ELSE follow_up_date END
             FROM previous
             WHERE id = previous.previous_id
             RETURNING {COLUMNS}, previous.previous_status"
        );
        sqlx::query_as::<_, UpdatedEntry>(&query)
            .bind(id)
            .bind(patch.client_id)
            .bind(patch.priority.map(Priority::as_str))
            .bind(patch.requested_service.is_some())
            .bind(patch.requested_service.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.notes.is_some())
            .bind(patch.notes.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.status.map(WaitlistStatus::as_str))
            .bind(patch.follow_up_date.is_some())
            .bind(patch.follow_up_date.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an entry, returning the deleted row or `None` if absent.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<WaitlistEntry>, sqlx::Error> {
        let query = format!("DELETE FROM waitlist_entries WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, WaitlistEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// SQL expression for a whitelisted sort field.
fn sort_expression(field: SortField) -> String {
    match field {
        SortField::CreatedAt => "created_at".to_string(),
        SortField::UpdatedAt => "updated_at".to_string(),
        SortField::FollowUpDate => "follow_up_date".to_string(),
        SortField::Status => "status".to_string(),
        SortField::Priority => priority_case(Priority::level),
    }
}

/// SQL expression ranking priorities by urgency (0 = most urgent).
fn urgency_expression() -> String {
    priority_case(Priority::urgency_rank)
}

/// Render `CASE priority WHEN 'LOW' THEN .. END` from a rank function so the
/// SQL ordering can never drift from the Rust one.
fn priority_case(rank: fn(Priority) -> i16) -> String {
    let arms: String = Priority::ALL
        .into_iter()
        .map(|p| format!(" WHEN '{}' THEN {}", p.as_str(), rank(p)))
        .collect();
    format!("CASE priority{arms} END")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_case_ranks_high_first() {
        assert_eq!(
            urgency_expression(),
            "CASE priority WHEN 'LOW' THEN 2 WHEN 'MEDIUM' THEN 1 WHEN 'HIGH' THEN 0 END"
        );
    }

    #[test]
    fn priority_sort_uses_tier_level() {
        assert_eq!(
            sort_expression(SortField::Priority),
            "CASE priority WHEN 'LOW' THEN 0 WHEN 'MEDIUM' THEN 1 WHEN 'HIGH' THEN 2 END"
        );
        assert_eq!(sort_expression(SortField::CreatedAt), "created_at");
    }
}
