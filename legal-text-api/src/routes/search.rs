use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    domain::models::{CollectionId, SearchResults},
    AppState,
};

use super::{
    extract::{AppPath, AppQuery},
    ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(search))
}

#[derive(Debug, Clone, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
}

#[instrument(name = "GET /search/:id", skip(app_state))]
async fn search(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<CollectionId>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<SearchResults>, ApiError> {
    let results = app_state.library.search(&id, &query.query).await?;
    Ok(Json(results))
}
