//! Book routes
//!
//! - `GET /` all books, `POST /` title search
//! - `GET /add` empty form, `POST /add` insert
//! - `GET /:id` edit form, `POST /:id` update
//! - `GET /stats/:pipeline` author statistics as JSON
//! - `GET /health`

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::WebError;
use super::views;
use crate::books::{Book, BookForm, RecordStore, StoreResult};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Runs a store call on the blocking pool
    async fn run<T, F>(&self, f: F) -> Result<T, WebError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RecordStore) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || f(store.as_ref())).await?;
        Ok(result?)
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

/// Create the book routes
pub fn book_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_books).post(search_books))
        .route("/add", get(add_form).post(add_book))
        .route("/stats/:pipeline", get(author_statistics))
        .route("/:id", get(book_detail).post(update_book))
        .with_state(state)
}

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn list_books(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let books = state
        .run(|store| Ok(store.read_all()?.collect::<Result<Vec<Book>, _>>()?))
        .await?;
    Ok(Html(views::book_list(&books, None)))
}

async fn search_books(
    State(state): State<AppState>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> Result<Html<String>, WebError> {
    let Form(form) = form?;
    let search = form.search.clone();
    let books = state
        .run(move |store| Ok(store.search(&search)?.collect::<Result<Vec<Book>, _>>()?))
        .await?;
    Ok(Html(views::book_list(&books, Some(&form.search))))
}

async fn add_form() -> Html<String> {
    Html(views::add_form(None, &BookForm::default()))
}

async fn add_book(
    State(state): State<AppState>,
    form: Result<Form<BookForm>, FormRejection>,
) -> Result<Html<String>, WebError> {
    let Form(form) = form?;
    let submitted = form.clone();
    let id = state.run(move |store| store.insert(&submitted)).await?;
    Ok(Html(views::add_form(Some(id), &form)))
}

async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let lookup = id.clone();
    let book = state
        .run(move |store| store.get_by_id(&lookup))
        .await?
        .ok_or(WebError::NotFound(id))?;
    Ok(Html(views::book_detail(&book, false)))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<BookForm>, FormRejection>,
) -> Result<Html<String>, WebError> {
    let Form(form) = form?;
    let lookup = id.clone();
    let book = state
        .run(move |store| {
            store.update_by_id(&lookup, &form)?;
            store.get_by_id(&lookup)
        })
        .await?
        .ok_or(WebError::NotFound(id))?;
    Ok(Html(views::book_detail(&book, true)))
}

async fn author_statistics(
    State(state): State<AppState>,
    Path(pipeline): Path<String>,
) -> Result<Json<Value>, WebError> {
    let documents = state
        .run(move |store| Ok(store.author_stats(&pipeline)?.collect::<Vec<Value>>()))
        .await?;
    Ok(Json(json!({ "author_statistics": documents })))
}
