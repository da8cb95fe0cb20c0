pub mod clients;
pub mod health;
pub mod waitlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /waitlist                                        list, create
/// /waitlist/due-follow-ups                         entries due today (GET)
/// /waitlist/client/{client_id}                     entries for one client (GET)
/// /waitlist/{id}                                   get, update, delete (delete: clinician/admin)
///
/// /clients                                         list, create
/// /clients/{id}                                    get, update, delete (delete: admin)
/// ```
///
/// Every route requires a Bearer access token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/waitlist", waitlist::router())
        .nest("/clients", clients::router())
}
