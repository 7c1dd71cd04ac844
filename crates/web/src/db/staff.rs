//! Staff account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use reservations_core::{StaffUserId, Username};

use super::RepositoryError;
use crate::models::StaffUser;

/// Persistence boundary for back-office accounts.
#[async_trait]
pub trait StaffStore: Send + Sync {
    /// Create an account.
    ///
    /// Returns `RepositoryError::Conflict` when the username is taken.
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        is_staff: bool,
    ) -> Result<StaffUser, RepositoryError>;

    /// Look up an account by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StaffUser>, RepositoryError>;

    /// Every account, oldest first.
    async fn list_all(&self) -> Result<Vec<StaffUser>, RepositoryError>;
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` staff account queries.
#[derive(Debug, sqlx::FromRow)]
struct StaffUserRow {
    id: i32,
    username: String,
    password_hash: String,
    is_staff: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<StaffUserRow> for StaffUser {
    type Error = RepositoryError;

    fn try_from(row: StaffUserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: StaffUserId::new(row.id),
            username,
            password_hash: row.password_hash,
            is_staff: row.is_staff,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// `PostgreSQL` implementation of [`StaffStore`].
#[derive(Debug, Clone)]
pub struct PgStaffRepository {
    pool: PgPool,
}

impl PgStaffRepository {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffStore for PgStaffRepository {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
        is_staff: bool,
    ) -> Result<StaffUser, RepositoryError> {
        let row = sqlx::query_as::<_, StaffUserRow>(
            r"
            INSERT INTO reservations.staff_user (username, password_hash, is_staff)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, is_staff, created_at
            ",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .bind(is_staff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::from(e)
        })?;

        row.try_into()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StaffUser>, RepositoryError> {
        let row = sqlx::query_as::<_, StaffUserRow>(
            r"
            SELECT id, username, password_hash, is_staff, created_at
            FROM reservations.staff_user
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_all(&self) -> Result<Vec<StaffUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, StaffUserRow>(
            r"
            SELECT id, username, password_hash, is_staff, created_at
            FROM reservations.staff_user
            ORDER BY created_at, id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
