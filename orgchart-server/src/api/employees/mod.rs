//! Employee API Module
//!
//! Reads are public; every mutation passes the global `require_auth`
//! layer, so handlers receive an authenticated [`CurrentUser`](crate::auth::CurrentUser).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Employee router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/data", get(handler::data))
        .route("/tree", get(handler::tree))
        .route("/update-supervisor", post(handler::update_supervisor))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/subordinates", get(handler::subordinates))
        .route(
            "/{id}/reassign-subordinates",
            post(handler::reassign_subordinates),
        )
}
