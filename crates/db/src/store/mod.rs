//! Storage interface consumed by the service layer.
//!
//! Services depend on these traits rather than on `PgPool` so the same
//! business rules run against PostgreSQL in production and against the
//! in-memory adapter in tests. Adapters translate their native failures into
//! [`StoreError`] before anything above this layer inspects them.

use async_trait::async_trait;
use carebook_core::types::{Date, DbId};

use crate::models::client::{Client, ClientSummary, CreateClient, UpdateClient};
use crate::models::waitlist::{
    NewWaitlistEntry, UpdatedEntry, WaitlistEntry, WaitlistPatch, WaitlistQuery,
};

#[cfg(any(test, feature = "memory-store"))]
pub mod memory;
pub mod postgres;

/// SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Constraint name the memory adapter reports for a missing client.
pub const WAITLIST_CLIENT_FK: &str = "waitlist_entries_client_id_fkey";

/// Typed persistence failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("duplicate value violates unique constraint: {constraint}")]
    Duplicate { constraint: String },

    /// A foreign key points at a record that does not exist (or was deleted
    /// concurrently).
    #[error("referenced record not found: {constraint}")]
    MissingReference { constraint: String },

    /// Anything the adapter does not recognise, passed through as-is.
    #[error("store error: {0}")]
    Unknown(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                StoreError::Duplicate {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                }
            }
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(PG_FOREIGN_KEY_VIOLATION) =>
            {
                StoreError::MissingReference {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                }
            }
            other => StoreError::Unknown(Box::new(other)),
        }
    }
}

/// Client record persistence.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert_client(&self, input: &CreateClient) -> StoreResult<Client>;

    async fn find_client(&self, id: DbId) -> StoreResult<Option<Client>>;

    async fn list_clients(&self, limit: i64, offset: i64) -> StoreResult<Vec<Client>>;

    /// Summaries for the given IDs, in no particular order. Unknown IDs are
    /// skipped.
    async fn client_summaries(&self, ids: &[DbId]) -> StoreResult<Vec<ClientSummary>>;

    /// Fails with [`StoreError::NotFound`] if no client has `id`.
    async fn update_client(&self, id: DbId, input: &UpdateClient) -> StoreResult<Client>;

    /// Fails with [`StoreError::NotFound`] if no client has `id`.
    async fn delete_client(&self, id: DbId) -> StoreResult<()>;
}

/// Waitlist entry persistence.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn insert_entry(&self, entry: &NewWaitlistEntry) -> StoreResult<WaitlistEntry>;

    async fn find_entry(&self, id: DbId) -> StoreResult<Option<WaitlistEntry>>;

    async fn list_entries(&self, query: &WaitlistQuery) -> StoreResult<Vec<WaitlistEntry>>;

    /// Entries with `follow_up_date <= today` whose status is not `REMOVED`,
    /// most urgent first, then oldest follow-up first.
    async fn list_due_entries(&self, today: Date) -> StoreResult<Vec<WaitlistEntry>>;

    /// Entries for one client, newest first.
    async fn list_entries_for_client(&self, client_id: DbId) -> StoreResult<Vec<WaitlistEntry>>;

    /// Apply `patch` and return the new row with the status it replaced.
    /// Fails with [`StoreError::NotFound`] if no entry has `id`.
    async fn update_entry(&self, id: DbId, patch: &WaitlistPatch) -> StoreResult<UpdatedEntry>;

    /// Hard delete. Fails with [`StoreError::NotFound`] if no entry has `id`.
    async fn delete_entry(&self, id: DbId) -> StoreResult<WaitlistEntry>;
}

/// Liveness probe for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}
