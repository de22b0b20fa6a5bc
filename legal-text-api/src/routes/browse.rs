use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    domain::models::{BrowsedArticle, CollectionId},
    AppState,
};

use super::{
    extract::AppPath,
    ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/:b_id", get(browse))
}

#[instrument(name = "GET /browse/:id/:b_id", skip(app_state))]
async fn browse(
    State(app_state): State<AppState>,
    AppPath((id, b_id)): AppPath<(CollectionId, usize)>,
) -> Result<Json<BrowsedArticle>, ApiError> {
    let article = app_state.library.browse(&id, b_id).await?;
    Ok(Json(article))
}
