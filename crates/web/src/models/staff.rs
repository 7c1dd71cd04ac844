//! Staff account domain types.

use chrono::{DateTime, Utc};

use reservations_core::{StaffUserId, Username};

/// A back-office account (domain type).
///
/// Accounts with `is_staff = false` can sign in but hold no back-office
/// capability.
#[derive(Debug, Clone)]
pub struct StaffUser {
    /// Unique account ID.
    pub id: StaffUserId,
    /// Login name.
    pub username: Username,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Whether the account may use the back office.
    pub is_staff: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
