use std::sync::Arc;

use carebook_db::store::{ClientStore, StoreHealth, WaitlistStore};

use crate::config::ServerConfig;
use crate::services::clients::ClientService;
use crate::services::waitlist::WaitlistService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (accessed by the auth extractors).
    pub config: Arc<ServerConfig>,
    /// Liveness probe for the backing store.
    pub health: Arc<dyn StoreHealth>,
    /// Waitlist entry lifecycle and triage.
    pub waitlist: WaitlistService,
    /// Client records.
    pub clients: ClientService,
}

impl AppState {
    /// Wire every service to one storage adapter.
    pub fn new<S>(config: ServerConfig, store: Arc<S>) -> Self
    where
        S: ClientStore + WaitlistStore + StoreHealth + 'static,
    {
        let client_store: Arc<dyn ClientStore> = store.clone();
        let waitlist_store: Arc<dyn WaitlistStore> = store.clone();

        Self {
            config: Arc::new(config),
            health: store,
            waitlist: WaitlistService::new(waitlist_store, Arc::clone(&client_store)),
            clients: ClientService::new(client_store),
        }
    }
}
