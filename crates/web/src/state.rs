//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::{PgReservationRepository, PgStaffRepository, ReservationStore, StaffStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    reservations: Arc<dyn ReservationStore>,
    staff: Arc<dyn StaffStore>,
}

impl AppState {
    /// Create a new application state from explicit stores.
    #[must_use]
    pub fn new(
        config: AppConfig,
        reservations: Arc<dyn ReservationStore>,
        staff: Arc<dyn StaffStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                reservations,
                staff,
            }),
        }
    }

    /// Create application state backed by `PostgreSQL`.
    #[must_use]
    pub fn with_pool(config: AppConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgReservationRepository::new(pool.clone())),
            Arc::new(PgStaffRepository::new(pool)),
        )
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the reservation store.
    #[must_use]
    pub fn reservations(&self) -> &dyn ReservationStore {
        self.inner.reservations.as_ref()
    }

    /// Get the staff account store.
    #[must_use]
    pub fn staff(&self) -> &dyn StaffStore {
        self.inner.staff.as_ref()
    }
}
