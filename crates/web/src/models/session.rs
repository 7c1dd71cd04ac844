//! Session-related types for back-office authentication.

use serde::{Deserialize, Serialize};

use reservations_core::{StaffUserId, Username};

use super::staff::StaffUser;

/// Session-stored identity of the signed-in account.
///
/// Minimal data stored in the session; the password hash never leaves the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Account database ID.
    pub id: StaffUserId,
    /// Login name.
    pub username: Username,
    /// Staff capability flag.
    pub is_staff: bool,
}

impl From<&StaffUser> for CurrentUser {
    fn from(user: &StaffUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current signed-in account.
    pub const CURRENT_USER: &str = "current_user";
}
