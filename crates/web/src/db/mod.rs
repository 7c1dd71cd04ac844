//! Persistence for reservations and staff accounts.
//!
//! # Schema: `reservations`
//!
//! ## Tables
//!
//! - `reservation` - Guest reservations
//! - `staff_user` - Back-office accounts
//! - `session` - tower-sessions storage
//!
//! Each store is a trait with a `PostgreSQL` implementation and an in-memory
//! implementation used by tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p reservations-cli -- migrate
//! ```

pub mod memory;
pub mod reservations;
pub mod staff;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::{InMemoryReservationStore, InMemoryStaffStore};
pub use reservations::{PgReservationRepository, ReservationStore};
pub use staff::{PgStaffRepository, StaffStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(err.to_string())
            }
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_failures_are_unavailable() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::PoolTimedOut),
            RepositoryError::Unavailable(_)
        ));
        assert!(matches!(
            RepositoryError::from(sqlx::Error::PoolClosed),
            RepositoryError::Unavailable(_)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::RowNotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn test_other_errors_stay_database() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::Protocol("bad frame".to_string())),
            RepositoryError::Database(_)
        ));
    }
}
