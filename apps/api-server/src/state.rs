//! Application state - shared across all handlers.

use std::sync::Arc;

use thiserror::Error;

use quill_core::ports::{
    CategoryRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use quill_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    #[error("Failed to connect to database: {0}")]
    Database(String),
}

impl AppState {
    /// Build the application state with appropriate implementations.
    #[cfg(feature = "postgres")]
    pub async fn build(config: &AppConfig) -> Result<Self, StartupError> {
        use quill_infra::database::{
            PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository, connect,
        };

        let db_config = config
            .database
            .as_ref()
            .ok_or(StartupError::MissingDatabaseUrl)?;

        let db = connect(db_config)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;

        tracing::info!("Application state initialized (postgres)");

        Ok(Self::with_repositories(
            Arc::new(PostgresUserRepository::new(db.clone())),
            Arc::new(PostgresCategoryRepository::new(db.clone())),
            Arc::new(PostgresPostRepository::new(db)),
            config.jwt.clone(),
        ))
    }

    /// Build the application state with appropriate implementations.
    #[cfg(not(feature = "postgres"))]
    pub async fn build(config: &AppConfig) -> Result<Self, StartupError> {
        tracing::warn!("Running without postgres feature - data is kept in memory");
        Ok(Self::in_memory(config.jwt.clone()))
    }

    /// State backed by the in-memory repositories.
    #[cfg(any(test, not(feature = "postgres")))]
    pub fn in_memory(jwt: JwtConfig) -> Self {
        use quill_infra::{
            InMemoryCategoryRepository, InMemoryPostRepository, InMemoryUserRepository,
        };

        Self::with_repositories(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryCategoryRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            jwt,
        )
    }

    fn with_repositories(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        posts: Arc<dyn PostRepository>,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            users,
            categories,
            posts,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::default()),
        }
    }
}
