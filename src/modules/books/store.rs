//! Persistence for books: the `BookStore` seam, the Postgres-backed store,
//! and an in-memory store for tests and local development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;

use bookshelf_db::{is_unique_violation, PgPool};

use super::models::Book;

/// Store-level outcomes, translated from the backing engine's errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(String),

    #[error("book {0} already exists")]
    DuplicateKey(String),

    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

/// The four persistence operations for books.
///
/// Each operation is a single statement, atomic at the store level;
/// uniqueness of `isbn` is enforced by the store's primary key.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every stored book, store-native order.
    async fn list_all(&self) -> Result<Vec<Book>, StoreError>;

    /// The matching book, or `None`. Absence is not an error.
    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    /// Persist a new book; `DuplicateKey` if the isbn is taken.
    async fn insert(&self, book: &Book) -> Result<Book, StoreError>;

    /// Overwrite all non-key attributes of the row keyed by `book.isbn`;
    /// `NotFound` if no such row exists.
    async fn replace(&self, book: &Book) -> Result<Book, StoreError>;

    /// Remove the row keyed by `isbn`; `NotFound` if no such row exists.
    async fn delete_by_isbn(&self, isbn: &str) -> Result<(), StoreError>;
}

/// Postgres-backed store over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year FROM books",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year \
             FROM books WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn insert(&self, book: &Book) -> Result<Book, StoreError> {
        let result = sqlx::query_as::<_, Book>(
            "INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(stored) => Ok(stored),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateKey(book.isbn.clone())),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn replace(&self, book: &Book) -> Result<Book, StoreError> {
        let updated = sqlx::query_as::<_, Book>(
            "UPDATE books \
             SET amazon_url = $2, author = $3, language = $4, pages = $5, \
                 publisher = $6, title = $7, year = $8 \
             WHERE isbn = $1 \
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| StoreError::NotFound(book.isbn.clone()))
    }

    async fn delete_by_isbn(&self, isbn: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(isbn.to_string()));
        }

        Ok(())
    }
}

/// In-memory store with the same outcome semantics as [`PgBookStore`].
/// Used by tests; handy as a throwaway backend during development.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<BTreeMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.get(isbn).cloned())
    }

    async fn insert(&self, book: &Book) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.isbn) {
            return Err(StoreError::DuplicateKey(book.isbn.clone()));
        }
        books.insert(book.isbn.clone(), book.clone());
        Ok(book.clone())
    }

    async fn replace(&self, book: &Book) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        if !books.contains_key(&book.isbn) {
            return Err(StoreError::NotFound(book.isbn.clone()));
        }
        books.insert(book.isbn.clone(), book.clone());
        Ok(book.clone())
    }

    async fn delete_by_isbn(&self, isbn: &str) -> Result<(), StoreError> {
        let mut books = self.books.write().await;
        if books.remove(isbn).is_none() {
            return Err(StoreError::NotFound(isbn.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            isbn: "1234567890".to_string(),
            amazon_url: "https://amazon.com/bookybook".to_string(),
            author: "Samantha".to_string(),
            language: "Spanish".to_string(),
            pages: 200,
            publisher: "Hatchett Books".to_string(),
            title: "Big Book".to_string(),
            year: 2024,
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = MemoryBookStore::new();
        let book = sample_book();

        let stored = store.insert(&book).await.unwrap();
        assert_eq!(stored, book);

        let fetched = store.get_by_isbn(&book.isbn).await.unwrap();
        assert_eq!(fetched, Some(book));
    }

    #[tokio::test]
    async fn get_on_missing_isbn_is_absent_not_an_error() {
        let store = MemoryBookStore::new();
        assert_eq!(store.get_by_isbn("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_insert_fails_and_keeps_one_row() {
        let store = MemoryBookStore::new();
        let book = sample_book();
        store.insert(&book).await.unwrap();

        let mut second = book.clone();
        second.title = "Other Title".to_string();
        let err = store.insert(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(isbn) if isbn == book.isbn));

        let books = store.list_all().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Big Book");
    }

    #[tokio::test]
    async fn replace_overwrites_all_non_key_fields() {
        let store = MemoryBookStore::new();
        store.insert(&sample_book()).await.unwrap();

        let mut replacement = sample_book();
        replacement.title = "new book".to_string();
        replacement.year = 1989;

        let updated = store.replace(&replacement).await.unwrap();
        assert_eq!(updated.isbn, "1234567890");
        assert_eq!(updated.title, "new book");
        assert_eq!(updated.year, 1989);

        let fetched = store.get_by_isbn("1234567890").await.unwrap().unwrap();
        assert_eq!(fetched, replacement);
    }

    #[tokio::test]
    async fn replace_and_delete_on_missing_isbn_both_fail_without_mutation() {
        let store = MemoryBookStore::new();
        store.insert(&sample_book()).await.unwrap();

        let mut missing = sample_book();
        missing.isbn = "0000000000".to_string();
        assert!(matches!(
            store.replace(&missing).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_by_isbn("0000000000").await,
            Err(StoreError::NotFound(_))
        ));

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = MemoryBookStore::new();
        let book = sample_book();
        store.insert(&book).await.unwrap();

        store.delete_by_isbn(&book.isbn).await.unwrap();
        assert_eq!(store.get_by_isbn(&book.isbn).await.unwrap(), None);
    }
}
