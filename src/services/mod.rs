//! Business logic services

pub mod genres;
pub mod validation;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub genres: genres::GenresService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            genres: genres::GenresService::new(repository.clone()),
            repository,
        }
    }
}
