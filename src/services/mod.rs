//! Business logic services

pub mod mutation;
pub mod query;

use crate::{config::SearchConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub query: query::QueryService,
    pub mutation: mutation::MutationService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, search: &SearchConfig) -> Self {
        Self {
            query: query::QueryService::new(repository.clone(), search.case_insensitive),
            mutation: mutation::MutationService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the backing store answers
    pub async fn ping_store(&self) -> crate::error::AppResult<()> {
        self.repository.books.ping().await
    }
}
