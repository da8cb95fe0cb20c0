//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod waitlist_repo;

pub use client_repo::ClientRepo;
pub use waitlist_repo::WaitlistRepo;
