//! Errors raised while registering or signing in staff accounts.

use thiserror::Error;

use reservations_core::UsernameError;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Unknown account or wrong password. The two are never distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username is already taken")]
    UserAlreadyExists,

    #[error("password rejected: {0}")]
    WeakPassword(String),

    #[error("account store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Argon2 failed to hash, or a stored hash could not be parsed.
    #[error("password hashing failed")]
    PasswordHash,
}
