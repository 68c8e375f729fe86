//! Repository layer for book storage

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

/// Free-text filter matched as a substring against title, author, genre and
/// the decimal rendering of the year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub text: String,
    pub case_insensitive: bool,
}

impl SearchFilter {
    pub fn new(text: impl Into<String>, case_insensitive: bool) -> Self {
        Self {
            text: text.into(),
            case_insensitive,
        }
    }

    /// In-process equivalent of the SQL predicate
    pub fn matches(&self, book: &Book) -> bool {
        let year = book.year.to_string();
        let fields = [book.title.as_str(), book.author.as_str(), book.genre.as_str(), year.as_str()];
        if self.case_insensitive {
            let needle = self.text.to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&needle))
        } else {
            fields.iter().any(|f| f.contains(self.text.as_str()))
        }
    }

    /// `%text%` with LIKE wildcards in the text escaped so they match literally
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.text.len() + 2);
        pattern.push('%');
        for c in self.text.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Persistence contract for books
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Books ordered newest first, skipping `offset`, at most `limit`
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Book>>;

    async fn count(&self) -> AppResult<i64>;

    /// Every book matching the filter, newest first
    async fn search(&self, filter: &SearchFilter) -> AppResult<Vec<Book>>;

    async fn get(&self, id: i32) -> AppResult<Option<Book>>;

    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    /// Returns `None` when no book has this id
    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>>;

    /// Returns `false` when no book has this id
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Round-trip to the backing store
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the store handle
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    /// Repository backed by the given PostgreSQL pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(Arc::new(books::PgBookStore::new(pool)))
    }

    /// Repository keeping everything in process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::MemoryBookStore::new()))
    }
}
