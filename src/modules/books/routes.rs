//! HTTP handlers for the books module.
//!
//! Handlers parse the request, call the service, and translate
//! [`BookError`] outcomes into [`AppError`] responses. Status mapping is a
//! total function of the service result.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use bookshelf_http::error::AppError;

use super::models::{BookEnvelope, BookList};
use super::service::{BookError, BookService};

pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{isbn}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Invalid(violations) => {
                let details = violations
                    .iter()
                    .filter_map(|v| serde_json::to_value(v).ok())
                    .collect();
                AppError::validation(details, "book payload failed validation")
            }
            BookError::DuplicateIsbn(isbn) => {
                AppError::duplicate_key(format!("book {isbn} already exists"))
            }
            BookError::NotFound(isbn) => AppError::not_found(format!("book {isbn} not found")),
            BookError::Store(e) => AppError::Internal(e.into()),
        }
    }
}

/// GET / — every stored book.
async fn list_books(
    State(service): State<Arc<BookService>>,
) -> Result<Json<BookList>, AppError> {
    let books = service.list_all().await?;
    Ok(Json(BookList { books }))
}

/// POST / — create a book from a full payload, isbn included.
async fn create_book(
    State(service): State<Arc<BookService>>,
    Json(candidate): Json<Value>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let book = service.create(&candidate).await?;
    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

/// GET /{isbn}
async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = service.get_one(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

/// PUT /{isbn} — full-record replace; the body's isbn (if any) is ignored.
async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(isbn): Path<String>,
    Json(candidate): Json<Value>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = service.update(&isbn, &candidate).await?;
    Ok(Json(BookEnvelope { book }))
}

/// DELETE /{isbn}
async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(isbn): Path<String>,
) -> Result<Json<Value>, AppError> {
    service.remove(&isbn).await?;
    Ok(Json(json!({ "message": "Book deleted" })))
}
