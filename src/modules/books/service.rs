//! Orchestration of validation and persistence for books.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use super::models::Book;
use super::store::{BookStore, StoreError};
use super::validate::{validate, Mode, Violation};

/// Service-level outcomes, passed through unchanged to the handler layer.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("book payload failed validation")]
    Invalid(Vec<Violation>),

    #[error("book {0} already exists")]
    DuplicateIsbn(String),

    #[error("book {0} not found")]
    NotFound(String),

    #[error("store failure: {0}")]
    Store(sqlx::Error),
}

impl From<StoreError> for BookError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(isbn) => BookError::NotFound(isbn),
            StoreError::DuplicateKey(isbn) => BookError::DuplicateIsbn(isbn),
            StoreError::Database(e) => BookError::Store(e),
        }
    }
}

/// Stateless orchestrator over an injected [`BookStore`].
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Book>, BookError> {
        Ok(self.store.list_all().await?)
    }

    /// Validate in Create mode, then persist. A duplicate isbn surfaces as
    /// [`BookError::DuplicateIsbn`], distinct from validation failure.
    pub async fn create(&self, candidate: &Value) -> Result<Book, BookError> {
        let book = validate(candidate, Mode::Create).map_err(BookError::Invalid)?;
        Ok(self.store.insert(&book).await?)
    }

    pub async fn get_one(&self, isbn: &str) -> Result<Book, BookError> {
        self.store
            .get_by_isbn(isbn)
            .await?
            .ok_or_else(|| BookError::NotFound(isbn.to_string()))
    }

    /// Full-record replace. Validation runs before the store is touched;
    /// only a valid payload can reach `replace`.
    pub async fn update(&self, isbn: &str, candidate: &Value) -> Result<Book, BookError> {
        let book = validate(candidate, Mode::Update { isbn }).map_err(BookError::Invalid)?;
        Ok(self.store.replace(&book).await?)
    }

    pub async fn remove(&self, isbn: &str) -> Result<(), BookError> {
        Ok(self.store.delete_by_isbn(isbn).await?)
    }
}
