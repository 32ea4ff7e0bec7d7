//! planner-server: the planner REST API over a JSON-file document store.

pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod singleton;
pub mod state;

use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router. `/api/*` routes require authorization;
/// `/health` does not.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .merge(routes::tasks::router())
        .merge(routes::notes::router())
        .merge(routes::day_notes::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
