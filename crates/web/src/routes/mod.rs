//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Store readiness check
//!
//! # Public
//! GET  /                              - Redirect to /reserve
//! GET  /reserve                       - Reservation form
//! POST /reserve                       - Submit reservation
//! GET  /reserve/success               - Submission acknowledgment
//!
//! # Back office (staff only)
//! GET  /reservations?q=&date=         - List / search
//! GET  /reservations/{id}             - Detail
//! GET  /reservations/{id}/edit        - Edit form
//! POST /reservations/{id}/edit        - Save edit
//! GET  /reservations/{id}/delete      - Delete confirmation
//! POST /reservations/{id}/delete      - Delete (requires confirm)
//!
//! # Auth
//! GET  /auth/login                    - Login page
//! POST /auth/login                    - Password login
//! POST /auth/logout                   - Logout
//! ```

pub mod auth;
pub mod health;
pub mod reservations;
pub mod reserve;

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use chrono::NaiveDate;

use crate::middleware::require_staff;
use crate::state::AppState;

/// The current local date, used as "today" by validation and creation.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Create the public reservation routes router.
pub fn reserve_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reserve::new_page).post(reserve::submit))
        .route("/success", get(reserve::success))
}

/// Create the back-office routes router.
///
/// Every route sits behind [`require_staff`].
pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reservations::index))
        .route("/{id}", get(reservations::show))
        .route(
            "/{id}/edit",
            get(reservations::edit_page).post(reservations::update),
        )
        .route(
            "/{id}/delete",
            get(reservations::delete_page).post(reservations::delete),
        )
        .route_layer(middleware::from_fn(require_staff))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/reserve") }))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/reserve", reserve_routes())
        .nest("/reservations", reservation_routes())
        .nest("/auth", auth_routes())
}
