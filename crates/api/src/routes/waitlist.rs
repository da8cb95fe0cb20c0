//! Route definitions for the `/waitlist` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::waitlist;
use crate::state::AppState;

/// Routes mounted at `/waitlist`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /due-follow-ups        -> due_follow_ups
/// GET    /client/{client_id}    -> list_by_client
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(waitlist::list).post(waitlist::create))
        .route("/due-follow-ups", get(waitlist::due_follow_ups))
        .route("/client/{client_id}", get(waitlist::list_by_client))
        .route(
            "/{id}",
            get(waitlist::get_by_id)
                .put(waitlist::update)
                .delete(waitlist::delete),
        )
}
