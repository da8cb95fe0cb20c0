//! In-memory adapter for the storage traits.
//!
//! Mirrors the PostgreSQL adapter's filtering, ordering, foreign-key and
//! cascade behaviour closely enough for service and HTTP tests. Only compiled
//! for tests or with the `memory-store` feature; the production binary
//! always uses [`super::postgres::PgStore`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use carebook_core::types::{Date, DbId, Timestamp};
use carebook_core::waitlist::{compare_due, compare_nullable_dates, is_due, SortField};

use super::{
    ClientStore, StoreError, StoreHealth, StoreResult, WaitlistStore, WAITLIST_CLIENT_FK,
};
use crate::models::client::{Client, ClientSummary, CreateClient, UpdateClient};
use crate::models::waitlist::{
    NewWaitlistEntry, UpdatedEntry, WaitlistEntry, WaitlistPatch, WaitlistQuery,
};

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_client_id: DbId,
    last_entry_id: DbId,
    last_tick: Option<Timestamp>,
    clients: BTreeMap<DbId, Client>,
    entries: BTreeMap<DbId, WaitlistEntry>,
}

impl MemoryState {
    /// Strictly increasing "now", so insertion order is always recoverable
    /// from `created_at` even within one clock tick.
    fn tick(&mut self) -> Timestamp {
        let now = chrono::Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    fn require_client(&self, client_id: DbId) -> StoreResult<()> {
        if self.clients.contains_key(&client_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference {
                constraint: WAITLIST_CLIENT_FK.to_string(),
            })
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unknown("memory store lock poisoned".into()))
    }
}

fn matches_query(entry: &WaitlistEntry, query: &WaitlistQuery) -> bool {
    query.priority.map_or(true, |p| entry.priority == p)
        && query.status.map_or(true, |s| entry.status == s)
        && query.client_id.map_or(true, |c| entry.client_id == c)
        && query
            .follow_up_from
            .map_or(true, |from| entry.follow_up_date.is_some_and(|d| d >= from))
        && query
            .follow_up_to
            .map_or(true, |to| entry.follow_up_date.is_some_and(|d| d <= to))
}

fn compare_by(field: SortField, a: &WaitlistEntry, b: &WaitlistEntry) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::FollowUpDate => compare_nullable_dates(a.follow_up_date, b.follow_up_date),
        SortField::Priority => a.priority.level().cmp(&b.priority.level()),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn insert_client(&self, input: &CreateClient) -> StoreResult<Client> {
        let mut state = self.lock()?;
        state.last_client_id += 1;
        let now = state.tick();
        let client = Client {
            id: state.last_client_id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            date_of_birth: input.date_of_birth,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        state.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn find_client(&self, id: DbId) -> StoreResult<Option<Client>> {
        Ok(self.lock()?.clients.get(&id).cloned())
    }

    async fn list_clients(&self, limit: i64, offset: i64) -> StoreResult<Vec<Client>> {
        let state = self.lock()?;
        let mut clients: Vec<Client> = state.clients.values().cloned().collect();
        clients.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(clients
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn client_summaries(&self, ids: &[DbId]) -> StoreResult<Vec<ClientSummary>> {
        let state = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.clients.get(id))
            .map(ClientSummary::from)
            .collect())
    }

    async fn update_client(&self, id: DbId, input: &UpdateClient) -> StoreResult<Client> {
        let mut state = self.lock()?;
        let now = state.tick();
        let client = state.clients.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(first_name) = &input.first_name {
            client.first_name = first_name.clone();
        }
        if let Some(last_name) = &input.last_name {
            client.last_name = last_name.clone();
        }
        if let Some(email) = &input.email {
            client.email = Some(email.clone());
        }
        if let Some(phone) = &input.phone {
            client.phone = Some(phone.clone());
        }
        if let Some(date_of_birth) = input.date_of_birth {
            client.date_of_birth = Some(date_of_birth);
        }
        if let Some(notes) = &input.notes {
            client.notes = Some(notes.clone());
        }
        client.updated_at = now;
        Ok(client.clone())
    }

    async fn delete_client(&self, id: DbId) -> StoreResult<()> {
        let mut state = self.lock()?;
        state.clients.remove(&id).ok_or(StoreError::NotFound)?;
        state.entries.retain(|_, entry| entry.client_id != id);
        Ok(())
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    async fn insert_entry(&self, input: &NewWaitlistEntry) -> StoreResult<WaitlistEntry> {
        let mut state = self.lock()?;
        state.require_client(input.client_id)?;
        state.last_entry_id += 1;
        let now = state.tick();
        let entry = WaitlistEntry {
            id: state.last_entry_id,
            client_id: input.client_id,
            priority: input.priority,
            requested_service: input.requested_service.clone(),
            notes: input.notes.clone(),
            status: input.status,
            follow_up_date: input.follow_up_date,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn find_entry(&self, id: DbId) -> StoreResult<Option<WaitlistEntry>> {
        Ok(self.lock()?.entries.get(&id).cloned())
    }

    async fn list_entries(&self, query: &WaitlistQuery) -> StoreResult<Vec<WaitlistEntry>> {
        let state = self.lock()?;
        let mut rows: Vec<WaitlistEntry> = state
            .entries
            .values()
            .filter(|entry| matches_query(entry, query))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            query
                .sort_order
                .apply(compare_by(query.sort_by, a, b).then_with(|| a.id.cmp(&b.id)))
        });
        Ok(rows)
    }

    async fn list_due_entries(&self, today: Date) -> StoreResult<Vec<WaitlistEntry>> {
        let state = self.lock()?;
        let mut rows: Vec<WaitlistEntry> = state
            .entries
            .values()
            .filter(|entry| is_due(entry.follow_up_date, entry.status, today))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let by_triage = match (a.follow_up_date, b.follow_up_date) {
                (Some(da), Some(db)) => compare_due((a.priority, da), (b.priority, db)),
                _ => compare_nullable_dates(a.follow_up_date, b.follow_up_date),
            };
            by_triage.then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn list_entries_for_client(&self, client_id: DbId) -> StoreResult<Vec<WaitlistEntry>> {
        let state = self.lock()?;
        let mut rows: Vec<WaitlistEntry> = state
            .entries
            .values()
            .filter(|entry| entry.client_id == client_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn update_entry(&self, id: DbId, patch: &WaitlistPatch) -> StoreResult<UpdatedEntry> {
        let mut state = self.lock()?;
        if !state.entries.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(client_id) = patch.client_id {
            state.require_client(client_id)?;
        }
        let now = state.tick();
        let entry = state.entries.get_mut(&id).ok_or(StoreError::NotFound)?;
        let previous_status = entry.status;
        if let Some(client_id) = patch.client_id {
            entry.client_id = client_id;
        }
        if let Some(priority) = patch.priority {
            entry.priority = priority;
        }
        if let Some(requested_service) = &patch.requested_service {
            entry.requested_service = requested_service.clone();
        }
        if let Some(notes) = &patch.notes {
            entry.notes = notes.clone();
        }
        if let Some(status) = patch.status {
            entry.status = status;
        }
        if let Some(follow_up_date) = patch.follow_up_date {
            entry.follow_up_date = follow_up_date;
        }
        entry.updated_at = now;
        Ok(UpdatedEntry {
            entry: entry.clone(),
            previous_status,
        })
    }

    async fn delete_entry(&self, id: DbId) -> StoreResult<WaitlistEntry> {
        self.lock()?.entries.remove(&id).ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }
}
