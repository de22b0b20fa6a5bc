use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    auth::Actor,
    domain::models::{Book, CollectionId, NewArticle},
    AppState,
};

use super::{
    extract::{AppJson, AppPath, AppQuery},
    ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(register_book))
        .route("/:id", get(get_book).delete(remove_book))
        .route("/:id/toggle-editable", post(toggle_editable))
        .route("/:id/articles", post(import_articles))
}

#[instrument(name = "GET /books", skip(app_state))]
async fn list_books(State(app_state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = app_state.library.list_books().await?;
    Ok(Json(books))
}

#[instrument(name = "GET /books/:id", skip(app_state))]
async fn get_book(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<CollectionId>,
) -> Result<Json<Book>, ApiError> {
    let book = app_state.library.get_book(&id).await?;
    Ok(Json(book))
}

#[derive(Debug, Deserialize)]
struct RegisterBookBody {
    collection: CollectionId,
    title: String,
}

#[instrument(name = "POST /books", skip(app_state))]
async fn register_book(
    _actor: Actor,
    State(app_state): State<AppState>,
    AppJson(body): AppJson<RegisterBookBody>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = app_state
        .library
        .register_book(&body.collection, &body.title)
        .await?;

    Ok((StatusCode::CREATED, Json(book)))
}

#[derive(Debug, Serialize)]
struct EditableResponse {
    collection: CollectionId,
    editable: bool,
}

#[instrument(name = "POST /books/:id/toggle-editable", skip(app_state))]
async fn toggle_editable(
    _actor: Actor,
    State(app_state): State<AppState>,
    AppPath(id): AppPath<CollectionId>,
) -> Result<Json<EditableResponse>, ApiError> {
    let editable = app_state.library.toggle_editable(&id).await?;

    Ok(Json(EditableResponse {
        collection: id,
        editable,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct RemoveBookQuery {
    #[serde(default)]
    purge: bool,
}

#[instrument(name = "DELETE /books/:id", skip(app_state))]
async fn remove_book(
    _actor: Actor,
    State(app_state): State<AppState>,
    AppPath(id): AppPath<CollectionId>,
    AppQuery(query): AppQuery<RemoveBookQuery>,
) -> Result<StatusCode, ApiError> {
    app_state.library.remove_book(&id, query.purge).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct ImportResponse {
    imported: usize,
}

#[instrument(name = "POST /books/:id/articles", skip(app_state, articles))]
async fn import_articles(
    _actor: Actor,
    State(app_state): State<AppState>,
    AppPath(id): AppPath<CollectionId>,
    AppJson(articles): AppJson<Vec<NewArticle>>,
) -> Result<Json<ImportResponse>, ApiError> {
    let imported = app_state.library.import_articles(&id, articles).await?;
    Ok(Json(ImportResponse { imported }))
}
