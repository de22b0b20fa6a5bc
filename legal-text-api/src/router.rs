use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::{app_state::AppState, routes};

pub fn create(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .nest("/books", routes::books::router())
        .nest("/search", routes::search::router())
        .nest("/browse", routes::browse::router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
