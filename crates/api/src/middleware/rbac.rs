//! Role gates for routes whose only access rule is the caller's role.
//!
//! Rules that must hold for every caller, such as who may remove waitlist
//! entries, are checked inside the services against the explicit actor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use carebook_core::error::CoreError;
use carebook_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated caller holding the `admin` role; anyone else gets 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role == ROLE_ADMIN {
            Ok(RequireAdmin(user))
        } else {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Admin route refused");
            Err(CoreError::Forbidden("Admin role required".into()).into())
        }
    }
}
