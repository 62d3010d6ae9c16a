pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::collection::{handlers, Collection};
use crate::models::Record;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/jobs", collection_routes(state.jobs))
        .nest("/api/targets", collection_routes(state.targets))
        // Browser client: `/` serves index.html from the static directory
        .fallback_service(ServeDir::new(&state.config.static_dir))
}

/// The five CRUD routes for one collection, mounted under its `/api/...` prefix.
fn collection_routes<R: Record>(collection: Arc<Collection<R>>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::handle_list::<R>).post(handlers::handle_replace_all::<R>),
        )
        .route("/add", post(handlers::handle_add::<R>))
        .route(
            "/:id",
            put(handlers::handle_update::<R>).delete(handlers::handle_delete::<R>),
        )
        .with_state(collection)
}
