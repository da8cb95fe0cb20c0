//! Handlers for the `/clients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use carebook_core::pagination::PageRequest;
use carebook_core::types::DbId;
use carebook_db::models::client::{Client, CreateClient, UpdateClient};

use crate::error::AppResult;
use crate::extract::{AppQuery, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{self, DataResponse};
use crate::state::AppState;

/// POST /api/v1/clients
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    let client = state.clients.create(input).await?;

    tracing::info!(client_id = client.id, user_id = auth.user_id, "Client created");

    Ok(response::created(client))
}

/// GET /api/v1/clients?limit=&offset=
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageRequest>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let clients = state.clients.list(page).await?;
    Ok(response::ok(clients))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = state.clients.get(id).await?;
    Ok(response::ok(client))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = state.clients.update(id, input).await?;

    tracing::info!(client_id = id, user_id = auth.user_id, "Client updated");

    Ok(response::ok(client))
}

/// DELETE /api/v1/clients/{id}
///
/// Admin only. Also removes the client's waitlist entries.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.clients.delete(id).await?;

    tracing::info!(client_id = id, user_id = admin.user_id, "Client deleted");

    Ok(StatusCode::NO_CONTENT)
}
