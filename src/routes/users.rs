//! User CRUD routes under `/api/users`.

use crate::handlers::users::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(list).post(create))
        .route(
            "/api/users/:id",
            get(read).put(update).delete(delete_handler),
        )
        .with_state(state)
}
