//! PostgreSQL book store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::{BookStore, SearchFilter};
use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, author, genre, year, created_at, updated_at";

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create the books table and its listing index when missing
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id SERIAL PRIMARY KEY,
                title TEXT NOT NULL CHECK (title <> ''),
                author TEXT NOT NULL CHECK (author <> ''),
                genre TEXT NOT NULL,
                year INTEGER NOT NULL CHECK (year >= 1700),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS books_created_at_idx ON books (created_at DESC, id DESC)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn search(&self, filter: &SearchFilter) -> AppResult<Vec<Book>> {
        let op = if filter.case_insensitive { "ILIKE" } else { "LIKE" };
        // year is compared through its text rendering, not numerically
        let query = format!(
            r#"
            SELECT {columns} FROM books
            WHERE title {op} $1
               OR author {op} $1
               OR genre {op} $1
               OR year::text {op} $1
            ORDER BY created_at DESC, id DESC
            "#,
            columns = BOOK_COLUMNS,
            op = op
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(filter.like_pattern())
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO books (title, author, genre, year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let created = sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(book.year)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>> {
        let query = format!(
            r#"
            UPDATE books SET
                title = $1,
                author = $2,
                genre = $3,
                year = $4,
                updated_at = $5
            WHERE id = $6
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.genre)
            .bind(book.year)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
