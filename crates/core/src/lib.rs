//! Domain types and rules for the Carebook practice CRM.
//!
//! Zero internal dependencies: everything here is shared by the storage
//! adapters in `carebook-db` and the HTTP layer in `carebook-api`.

pub mod actor;
pub mod error;
pub mod field_errors;
pub mod pagination;
pub mod roles;
pub mod text;
pub mod types;
pub mod waitlist;
