//! Write paths: create, update and delete with field validation

use crate::{
    error::{AppError, AppResult, ValidationFailure},
    models::book::{Book, BookForm},
    repository::Repository,
};

#[derive(Clone)]
pub struct MutationService {
    repository: Repository,
}

impl MutationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new book.
    ///
    /// Invalid input comes back as `AppError::Validation` holding the
    /// submitted values, and nothing is written.
    pub async fn create(&self, form: BookForm) -> AppResult<Book> {
        let new_book = form.validated().map_err(|errors| {
            tracing::debug!("Rejected new book: {:?}", errors);
            AppError::Validation(ValidationFailure {
                book: BookForm { id: None, ..form.clone() },
                errors,
            })
        })?;

        let created = self.repository.books.create(&new_book).await?;
        tracing::info!("Created book id={} title={:?}", created.id, created.title);
        Ok(created)
    }

    /// Update an existing book.
    ///
    /// On validation failure the returned form carries `id` so the edit view
    /// still targets the right book.
    pub async fn update(&self, id: i32, form: BookForm) -> AppResult<Book> {
        if self.repository.books.get(id).await?.is_none() {
            return Err(not_found(id));
        }

        let changes = form.validated().map_err(|errors| {
            tracing::debug!("Rejected update of book id={}: {:?}", id, errors);
            AppError::Validation(ValidationFailure {
                book: BookForm { id: Some(id), ..form.clone() },
                errors,
            })
        })?;

        let updated = self
            .repository
            .books
            .update(id, &changes)
            .await?
            // deleted between lookup and write
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Updated book id={}", id);
        Ok(updated)
    }

    /// Permanently delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if self.repository.books.get(id).await?.is_none() {
            return Err(not_found(id));
        }
        if !self.repository.books.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book with id {} not found", id))
}
