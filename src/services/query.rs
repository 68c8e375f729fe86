//! Read paths: paginated listing, free-text search and single lookups

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        page::{BookPage, Pagination, SearchResults, PAGE_SIZE},
    },
    repository::{Repository, SearchFilter},
};

#[derive(Clone)]
pub struct QueryService {
    repository: Repository,
    case_insensitive: bool,
}

impl QueryService {
    pub fn new(repository: Repository, case_insensitive: bool) -> Self {
        Self {
            repository,
            case_insensitive,
        }
    }

    /// Fetch one listing page, newest books first.
    ///
    /// A page with no books (past the end, or not a positive number) yields
    /// `AppError::EmptyPage` so callers can show a not-found view.
    pub async fn list_page(&self, page: i64) -> AppResult<BookPage> {
        let offset = match Pagination::offset_for(page) {
            Some(offset) if page >= 1 => offset,
            _ => return Err(AppError::EmptyPage(page)),
        };
        let books = self.repository.books.list(offset, PAGE_SIZE).await?;
        let total_count = self.repository.books.count().await?;

        if books.is_empty() {
            tracing::debug!("Listing page {} is empty ({} books in total)", page, total_count);
            return Err(AppError::EmptyPage(page));
        }

        Ok(BookPage {
            books,
            pagination: Pagination::new(page, total_count),
        })
    }

    /// Every book whose title, author, genre or year contains `text`
    pub async fn search(&self, text: &str) -> AppResult<SearchResults> {
        let filter = SearchFilter::new(text, self.case_insensitive);
        let books = self.repository.books.search(&filter).await?;
        tracing::debug!("Search {:?} matched {} books", text, books.len());

        Ok(SearchResults {
            total_results: books.len(),
            books,
            query: text.to_string(),
        })
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
