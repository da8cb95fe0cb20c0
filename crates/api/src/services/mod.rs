//! Business operations shared by the HTTP handlers.
//!
//! Services hold `Arc<dyn ...>` storage handles and take the acting user as
//! an explicit [`carebook_core::actor::Actor`] argument, so they can be
//! exercised directly against the in-memory store in tests.

pub mod clients;
pub mod waitlist;

use carebook_core::error::CoreError;
use carebook_core::types::DbId;
use carebook_db::store::StoreError;

use crate::error::AppError;

/// Turn a store-level "no such row" into a domain `NotFound` naming the
/// entity. Every other store error passes through unchanged.
pub(crate) fn not_found_as(err: StoreError, entity: &'static str, id: DbId) -> AppError {
    match err {
        StoreError::NotFound => CoreError::NotFound { entity, id }.into(),
        other => other.into(),
    }
}
