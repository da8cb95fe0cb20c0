//! PostgreSQL adapter for the storage traits.

use async_trait::async_trait;
use carebook_core::types::{Date, DbId};

use super::{ClientStore, StoreError, StoreHealth, StoreResult, WaitlistStore};
use crate::models::client::{Client, ClientSummary, CreateClient, UpdateClient};
use crate::models::waitlist::{
    NewWaitlistEntry, UpdatedEntry, WaitlistEntry, WaitlistPatch, WaitlistQuery,
};
use crate::repositories::{ClientRepo, WaitlistRepo};
use crate::DbPool;

/// Storage backed by a shared connection pool. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn insert_client(&self, input: &CreateClient) -> StoreResult<Client> {
        Ok(ClientRepo::create(&self.pool, input).await?)
    }

    async fn find_client(&self, id: DbId) -> StoreResult<Option<Client>> {
        Ok(ClientRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_clients(&self, limit: i64, offset: i64) -> StoreResult<Vec<Client>> {
        Ok(ClientRepo::list(&self.pool, limit, offset).await?)
    }

    async fn client_summaries(&self, ids: &[DbId]) -> StoreResult<Vec<ClientSummary>> {
        Ok(ClientRepo::find_summaries(&self.pool, ids).await?)
    }

    async fn update_client(&self, id: DbId, input: &UpdateClient) -> StoreResult<Client> {
        ClientRepo::update(&self.pool, id, input)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_client(&self, id: DbId) -> StoreResult<()> {
        if ClientRepo::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[async_trait]
impl WaitlistStore for PgStore {
    async fn insert_entry(&self, entry: &NewWaitlistEntry) -> StoreResult<WaitlistEntry> {
        Ok(WaitlistRepo::create(&self.pool, entry).await?)
    }

    async fn find_entry(&self, id: DbId) -> StoreResult<Option<WaitlistEntry>> {
        Ok(WaitlistRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_entries(&self, query: &WaitlistQuery) -> StoreResult<Vec<WaitlistEntry>> {
        Ok(WaitlistRepo::list(&self.pool, query).await?)
    }

    async fn list_due_entries(&self, today: Date) -> StoreResult<Vec<WaitlistEntry>> {
        Ok(WaitlistRepo::list_due(&self.pool, today).await?)
    }

    async fn list_entries_for_client(&self, client_id: DbId) -> StoreResult<Vec<WaitlistEntry>> {
        Ok(WaitlistRepo::list_by_client(&self.pool, client_id).await?)
    }

    async fn update_entry(&self, id: DbId, patch: &WaitlistPatch) -> StoreResult<UpdatedEntry> {
        WaitlistRepo::update(&self.pool, id, patch)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete_entry(&self, id: DbId) -> StoreResult<WaitlistEntry> {
        WaitlistRepo::delete(&self.pool, id)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
