//! In-process book store for development runs and tests

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{BookStore, SearchFilter};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

#[derive(Default)]
struct Shelf {
    next_id: i32,
    books: Vec<Book>,
}

impl Shelf {
    /// Snapshot ordered the way listings expect: newest first, then by id
    fn newest_first(&self) -> Vec<Book> {
        let mut books = self.books.clone();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        books
    }
}

#[derive(Default)]
pub struct MemoryBookStore {
    shelf: RwLock<Shelf>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Book>> {
        let offset = usize::try_from(offset)
            .map_err(|_| AppError::Internal(format!("OFFSET must not be negative: {}", offset)))?;
        let limit = usize::try_from(limit)
            .map_err(|_| AppError::Internal(format!("LIMIT must not be negative: {}", limit)))?;

        let shelf = self.shelf.read().await;
        Ok(shelf.newest_first().into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.shelf.read().await.books.len() as i64)
    }

    async fn search(&self, filter: &SearchFilter) -> AppResult<Vec<Book>> {
        let shelf = self.shelf.read().await;
        Ok(shelf
            .newest_first()
            .into_iter()
            .filter(|book| filter.matches(book))
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let shelf = self.shelf.read().await;
        Ok(shelf.books.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut shelf = self.shelf.write().await;
        shelf.next_id += 1;
        let now = Utc::now();
        let created = Book {
            id: shelf.next_id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year,
            created_at: now,
            updated_at: now,
        };
        shelf.books.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>> {
        let mut shelf = self.shelf.write().await;
        let Some(existing) = shelf.books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        existing.title = book.title.clone();
        existing.author = book.author.clone();
        existing.genre = book.genre.clone();
        existing.year = book.year;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut shelf = self.shelf.write().await;
        let before = shelf.books.len();
        shelf.books.retain(|b| b.id != id);
        Ok(shelf.books.len() < before)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
