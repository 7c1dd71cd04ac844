//! Staff account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a back-office account
//! rsv-cli staff create -u host -p 'a long password'
//!
//! # Create an account without back-office access
//! rsv-cli staff create -u trainee -p 'a long password' --non-staff
//!
//! # List accounts
//! rsv-cli staff list
//! ```

use reservations_core::StaffUserId;
use reservations_web::db::{PgStaffRepository, StaffStore};
use reservations_web::services::AuthService;

use super::{CommandError, connect};

/// Create a new account.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the username is invalid or taken, or the
/// password is too short.
pub async fn create_user(
    username: &str,
    password: &str,
    is_staff: bool,
) -> Result<StaffUserId, CommandError> {
    let pool = connect().await?;
    let store = PgStaffRepository::new(pool);

    tracing::info!("Creating account: {} (staff: {})", username, is_staff);
    let user = AuthService::new(&store)
        .register(username, password, is_staff)
        .await?;

    tracing::info!(
        "Account created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(user.id)
}

/// Print every account.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable.
pub async fn list_users() -> Result<(), CommandError> {
    let pool = connect().await?;
    let users = PgStaffRepository::new(pool).list_all().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{:>5}  {:<30}  {:<5}  CREATED", "ID", "USERNAME", "STAFF");
        for user in &users {
            println!(
                "{:>5}  {:<30}  {:<5}  {}",
                user.id.as_i32(),
                user.username.as_str(),
                if user.is_staff { "yes" } else { "no" },
                user.created_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    Ok(())
}
