//! Identity of the user performing an operation.

use crate::types::DbId;

/// The authenticated user on whose behalf a service call is made.
///
/// Passed explicitly into every service operation that records or checks
/// who is acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }
}
