//! Waitlist entry lifecycle and follow-up triage.

use std::collections::HashMap;
use std::sync::Arc;

use carebook_core::actor::Actor;
use carebook_core::error::CoreError;
use carebook_core::roles::can_remove_waitlist_entries;
use carebook_core::text::{normalize_clearable, normalize_optional};
use carebook_core::types::{Date, DbId};
use carebook_core::waitlist::{
    is_recommended_transition, parse_follow_up_date, today_local, validate_follow_up_range,
    WaitlistStatus,
};
use carebook_db::models::client::{Client, ClientSummary};
use carebook_db::models::waitlist::{
    CreateWaitlistEntry, NewWaitlistEntry, UpdateWaitlistEntry, UpdatedEntry, WaitlistEntry,
    WaitlistEntryDetail, WaitlistEntryWithClient, WaitlistFilterParams, WaitlistPatch,
    WaitlistQuery,
};
use carebook_db::store::{ClientStore, StoreError, WaitlistStore};

use super::not_found_as;
use crate::error::{AppError, AppResult};

const ENTRY_ENTITY: &str = "WaitlistEntry";
const CLIENT_ENTITY: &str = "Client";

/// Creates, queries, updates and removes waitlist entries.
#[derive(Clone)]
pub struct WaitlistService {
    entries: Arc<dyn WaitlistStore>,
    clients: Arc<dyn ClientStore>,
}

impl WaitlistService {
    pub fn new(entries: Arc<dyn WaitlistStore>, clients: Arc<dyn ClientStore>) -> Self {
        Self { entries, clients }
    }

    /// Add a client to the waitlist.
    ///
    /// The client must exist; otherwise nothing is written. Missing
    /// `priority` and `status` default to `MEDIUM` and `WAITING`.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateWaitlistEntry,
    ) -> AppResult<WaitlistEntryWithClient> {
        let client = self.require_client(input.client_id).await?;

        let new_entry = NewWaitlistEntry {
            client_id: client.id,
            priority: input.priority.unwrap_or_default(),
            requested_service: normalize_optional(input.requested_service.as_deref()),
            notes: normalize_optional(input.notes.as_deref()),
            status: input.status.unwrap_or_default(),
            follow_up_date: parse_optional_date(input.follow_up_date.as_deref())?,
            created_by: Some(actor.user_id),
        };

        let entry = self
            .entries
            .insert_entry(&new_entry)
            .await
            .map_err(|err| match err {
                StoreError::MissingReference { .. } => client_not_found(new_entry.client_id),
                other => other.into(),
            })?;
        Ok(WaitlistEntryWithClient {
            entry,
            client: ClientSummary::from(&client),
        })
    }

    /// List entries matching every supplied filter.
    pub async fn find_all(
        &self,
        params: WaitlistFilterParams,
    ) -> AppResult<Vec<WaitlistEntryWithClient>> {
        let query = WaitlistQuery {
            priority: params.priority,
            status: params.status,
            client_id: params.client_id,
            follow_up_from: parse_optional_date(params.follow_up_from.as_deref())?,
            follow_up_to: parse_optional_date(params.follow_up_to.as_deref())?,
            sort_by: params.sort_by.unwrap_or_default(),
            sort_order: params.sort_order.unwrap_or_default(),
        };
        validate_follow_up_range(query.follow_up_from, query.follow_up_to)?;

        let entries = self.entries.list_entries(&query).await?;
        self.attach_summaries(entries).await
    }

    /// Fetch one entry together with its full client record.
    pub async fn find_one(&self, id: DbId) -> AppResult<WaitlistEntryDetail> {
        let entry = self
            .entries
            .find_entry(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: ENTRY_ENTITY,
                id,
            })?;
        let client = self.require_client(entry.client_id).await?;
        Ok(WaitlistEntryDetail { entry, client })
    }

    /// Apply a partial update. Only the fields present in `input` change;
    /// an explicit `null` clears `requested_service`, `notes` or
    /// `follow_up_date`.
    ///
    /// A new `client_id` is checked before anything is written. Status moves
    /// outside the usual workflow are logged and then applied.
    pub async fn update(
        &self,
        actor: &Actor,
        id: DbId,
        input: UpdateWaitlistEntry,
    ) -> AppResult<WaitlistEntryWithClient> {
        if let Some(client_id) = input.client_id {
            self.require_client(client_id).await?;
        }

        let patch = WaitlistPatch {
            client_id: input.client_id,
            priority: input.priority,
            requested_service: normalize_clearable(input.requested_service),
            notes: normalize_clearable(input.notes),
            status: input.status,
            follow_up_date: parse_clearable_date(input.follow_up_date)?,
        };

        let UpdatedEntry {
            entry,
            previous_status,
        } = self
            .entries
            .update_entry(id, &patch)
            .await
            .map_err(|err| match patch.client_id {
                // The client was deleted between the check above and the write.
                Some(client_id) if matches!(err, StoreError::MissingReference { .. }) => {
                    client_not_found(client_id)
                }
                _ => not_found_as(err, ENTRY_ENTITY, id),
            })?;

        if let Some(next) = patch.status {
            note_unusual_transition(actor, id, previous_status, next);
        }

        let client = self.summary_for(entry.client_id).await?;
        Ok(WaitlistEntryWithClient { entry, client })
    }

    /// Hard-delete an entry and return it as it was.
    pub async fn remove(&self, actor: &Actor, id: DbId) -> AppResult<WaitlistEntry> {
        if !can_remove_waitlist_entries(&actor.role) {
            return Err(CoreError::Forbidden(
                "Clinician or Admin role required to remove waitlist entries".into(),
            )
            .into());
        }

        self.entries
            .delete_entry(id)
            .await
            .map_err(|err| not_found_as(err, ENTRY_ENTITY, id))
    }

    /// Follow-ups due today in server-local time.
    pub async fn due_follow_ups(&self) -> AppResult<Vec<WaitlistEntryWithClient>> {
        self.due_follow_ups_as_of(today_local()).await
    }

    /// Entries due on or before `today` that have not been removed, most
    /// urgent tier first, then the oldest follow-up date.
    pub async fn due_follow_ups_as_of(
        &self,
        today: Date,
    ) -> AppResult<Vec<WaitlistEntryWithClient>> {
        let entries = self.entries.list_due_entries(today).await?;
        self.attach_summaries(entries).await
    }

    /// Every entry for one client, newest first.
    pub async fn find_by_client(
        &self,
        client_id: DbId,
    ) -> AppResult<Vec<WaitlistEntryWithClient>> {
        let client = self.require_client(client_id).await?;
        let summary = ClientSummary::from(&client);

        let entries = self.entries.list_entries_for_client(client_id).await?;
        Ok(entries
            .into_iter()
            .map(|entry| WaitlistEntryWithClient {
                entry,
                client: summary.clone(),
            })
            .collect())
    }

    // -- helpers --

    async fn require_client(&self, id: DbId) -> AppResult<Client> {
        let client = self.clients.find_client(id).await?;
        client.ok_or_else(|| {
            CoreError::NotFound {
                entity: CLIENT_ENTITY,
                id,
            }
            .into()
        })
    }

    async fn summary_for(&self, client_id: DbId) -> AppResult<ClientSummary> {
        let summary = self.clients.client_summaries(&[client_id]).await?.pop();
        summary.ok_or_else(|| {
            CoreError::NotFound {
                entity: CLIENT_ENTITY,
                id: client_id,
            }
            .into()
        })
    }

    async fn attach_summaries(
        &self,
        entries: Vec<WaitlistEntry>,
    ) -> AppResult<Vec<WaitlistEntryWithClient>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<DbId> = entries.iter().map(|e| e.client_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let summaries: HashMap<DbId, ClientSummary> = self
            .clients
            .client_summaries(&ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(entries
            .into_iter()
            .filter_map(|entry| match summaries.get(&entry.client_id) {
                Some(summary) => Some(WaitlistEntryWithClient {
                    client: summary.clone(),
                    entry,
                }),
                None => {
                    tracing::warn!(
                        waitlist_entry_id = entry.id,
                        client_id = entry.client_id,
                        "Skipping waitlist entry whose client no longer exists",
                    );
                    None
                }
            })
            .collect())
    }
}

fn note_unusual_transition(
    actor: &Actor,
    id: DbId,
    previous: WaitlistStatus,
    next: WaitlistStatus,
) {
    if !is_recommended_transition(previous, next) {
        tracing::warn!(
            waitlist_entry_id = id,
            user_id = actor.user_id,
            from = %previous,
            to = %next,
            "Waitlist status change outside the usual workflow",
        );
    }
}

fn client_not_found(id: DbId) -> AppError {
    CoreError::NotFound {
        entity: CLIENT_ENTITY,
        id,
    }
    .into()
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<Date>, CoreError> {
    raw.map(parse_follow_up_date).transpose()
}

/// Parse a clearable follow-up date. `null` and blank both clear it.
fn parse_clearable_date(raw: Option<Option<String>>) -> Result<Option<Option<Date>>, CoreError> {
    normalize_clearable(raw)
        .map(|inner| parse_optional_date(inner.as_deref()))
        .transpose()
}
