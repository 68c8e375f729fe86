//! Data models for Bookshelf

pub mod book;
pub mod page;

// Re-export commonly used types
pub use book::{Book, BookForm, FieldError, NewBook};
pub use page::{BookPage, Pagination, SearchResults, PAGE_SIZE};
