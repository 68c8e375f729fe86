//! Bookshelf Library Catalog
//!
//! A small catalog web application: paginated listing, free-text search and
//! create/update/delete of books, served as HTML pages and a JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;
pub mod views;
pub mod web;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
    pub views: Arc<views::Views>,
}

impl AppState {
    pub fn new(services: services::Services, views: views::Views) -> Self {
        Self {
            services: Arc::new(services),
            views: Arc::new(views),
        }
    }
}
