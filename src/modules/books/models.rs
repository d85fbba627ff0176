use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored book. All eight attributes are always present; partial records
/// are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Primary key; immutable after creation.
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// Response body for the list endpoint: `{"books": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

/// Response body for single-book endpoints: `{"book": {...}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookEnvelope {
    pub book: Book,
}
