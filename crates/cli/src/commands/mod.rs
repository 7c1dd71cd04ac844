//! CLI subcommand implementations.

pub mod migrate;
pub mod staff;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use reservations_web::db::{RepositoryError, create_pool};
use reservations_web::services::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Account creation rejected.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Connect using `RESERVATIONS_DATABASE_URL`, falling back to `DATABASE_URL`.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("RESERVATIONS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("RESERVATIONS_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(create_pool(&SecretString::from(database_url)).await?)
}
