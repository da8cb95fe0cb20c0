//! Handlers for the `/waitlist` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use carebook_core::types::DbId;
use carebook_db::models::waitlist::{
    CreateWaitlistEntry, UpdateWaitlistEntry, WaitlistEntry, WaitlistEntryDetail,
    WaitlistEntryWithClient, WaitlistFilterParams,
};

use crate::error::AppResult;
use crate::extract::{AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::{self, DataResponse};
use crate::state::AppState;

/// POST /api/v1/waitlist
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateWaitlistEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<WaitlistEntryWithClient>>)> {
    let created = state.waitlist.create(&auth.actor(), input).await?;

    tracing::info!(
        waitlist_entry_id = created.entry.id,
        client_id = created.entry.client_id,
        priority = %created.entry.priority,
        user_id = auth.user_id,
        "Waitlist entry created",
    );

    Ok(response::created(created))
}

/// GET /api/v1/waitlist
///
/// Supports `priority`, `status`, `client_id`, `follow_up_from`,
/// `follow_up_to`, `sort_by` and `sort_order` query parameters.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<WaitlistFilterParams>,
) -> AppResult<Json<DataResponse<Vec<WaitlistEntryWithClient>>>> {
    let entries = state.waitlist.find_all(params).await?;
    Ok(response::ok(entries))
}

/// GET /api/v1/waitlist/due-follow-ups
pub async fn due_follow_ups(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<WaitlistEntryWithClient>>>> {
    let entries = state.waitlist.due_follow_ups().await?;
    Ok(response::ok(entries))
}

/// GET /api/v1/waitlist/client/{client_id}
pub async fn list_by_client(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WaitlistEntryWithClient>>>> {
    let entries = state.waitlist.find_by_client(client_id).await?;
    Ok(response::ok(entries))
}

/// GET /api/v1/waitlist/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WaitlistEntryDetail>>> {
    let entry = state.waitlist.find_one(id).await?;
    Ok(response::ok(entry))
}

/// PUT /api/v1/waitlist/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateWaitlistEntry>,
) -> AppResult<Json<DataResponse<WaitlistEntryWithClient>>> {
    let updated = state.waitlist.update(&auth.actor(), id, input).await?;

    tracing::info!(
        waitlist_entry_id = id,
        status = %updated.entry.status,
        user_id = auth.user_id,
        "Waitlist entry updated",
    );

    Ok(response::ok(updated))
}

/// DELETE /api/v1/waitlist/{id}
///
/// Requires the clinician or admin role. Returns the deleted entry.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WaitlistEntry>>> {
    let removed = state.waitlist.remove(&auth.actor(), id).await?;

    tracing::info!(
        waitlist_entry_id = id,
        client_id = removed.client_id,
        user_id = auth.user_id,
        "Waitlist entry removed",
    );

    Ok(response::ok(removed))
}
