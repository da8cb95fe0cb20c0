//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers authenticate the caller, delegate to the matching service in
//! [`crate::services`], and wrap results in [`crate::response::DataResponse`].

pub mod clients;
pub mod waitlist;
