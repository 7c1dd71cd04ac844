//! Session middleware configuration.
//!
//! Production sessions live in `PostgreSQL` (`reservations.session`) via
//! tower-sessions; tests can pass any other `SessionStore`.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "rsv_session";

/// Session expiry time in seconds (12 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 12 * 60 * 60;

/// Create the `PostgreSQL` session store in the `reservations` schema.
///
/// The session table must be created via migration.
///
/// # Errors
///
/// Returns the store's message if the schema or table name is rejected.
pub fn create_session_store(pool: &PgPool) -> Result<PostgresStore, String> {
    PostgresStore::new(pool.clone())
        .with_schema_name("reservations")?
        .with_table_name("session")
}

/// Create the session layer over `store`.
///
/// # Arguments
///
/// * `store` - Session backend
/// * `config` - Server configuration (for determining HTTPS mode)
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AppConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
