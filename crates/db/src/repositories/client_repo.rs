//! Repository for the `clients` table.

use carebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, ClientSummary, CreateClient, UpdateClient};

/// Column list for clients queries.
const COLUMNS: &str = "id, first_name, last_name, email, phone, date_of_birth, notes, \
    created_at, updated_at";

/// Column list for the summary projection.
const SUMMARY_COLUMNS: &str = "id, first_name, last_name, email, phone";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Create a new client, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients
                (first_name, last_name, email, phone, date_of_birth, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.date_of_birth)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a client by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients alphabetically by last then first name.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Fetch summaries for a set of client IDs. Unknown IDs are skipped.
    pub async fn find_summaries(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ClientSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM clients WHERE id = ANY($1)");
        sqlx::query_as::<_, ClientSummary>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Update a client by ID, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                date_of_birth = COALESCE($6, date_of_birth),
                notes = COALESCE($7, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.date_of_birth)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client by ID. Waitlist entries cascade. Returns `true` if a
    /// row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
