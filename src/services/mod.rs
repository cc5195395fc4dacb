//! Business logic services

pub mod catalog;
pub mod loans;
pub mod users;

use std::sync::Arc;

use crate::{config::AuthConfig, error::AppResult, repository::Repository};

use loans::{Clock, SystemClock};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and the system clock
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self::with_clock(repository, auth_config, Arc::new(SystemClock))
    }

    /// Create all services with an explicit clock (tests use a fixed one)
    pub fn with_clock(
        repository: Repository,
        auth_config: AuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), clock),
            users: users::UsersService::new(repository.clone(), auth_config),
            repository,
        }
    }

    /// Check that the database answers, for readiness probing
    pub async fn ping_database(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
