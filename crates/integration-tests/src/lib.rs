//! Integration tests for the reservations manager.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process HTTP tests (no database needed)
//! cargo test -p reservations-integration-tests
//!
//! # Include the PostgreSQL repository tests
//! RESERVATIONS_TEST_DATABASE_URL=postgres://... \
//!     cargo test -p reservations-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `public_submit` - Public reservation form
//! - `backoffice` - Staff list, search, detail, edit and delete
//! - `auth` - Login, logout and the staff gate
//! - `postgres_repository` - `PostgreSQL` store (ignored by default)
//! - `live_server` - Smoke test against a running server (ignored by default)
//!
//! [`TestApp`] drives the real router in-process with in-memory stores and a
//! `tower_sessions::MemoryStore`. Cookies are carried by hand between
//! requests.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{Days, NaiveDate};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use reservations_core::{Reservation, ReservationFields};
use reservations_web::config::AppConfig;
use reservations_web::db::{InMemoryReservationStore, InMemoryStaffStore, ReservationStore};
use reservations_web::middleware::create_session_layer;
use reservations_web::services::AuthService;
use reservations_web::state::AppState;

/// Password used for every account created by [`TestApp`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Upper bound on response bodies read by tests.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for in-process tests.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: SecretString::from("postgres://unused"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost".to_string(),
        venue_name: "Test Bistro".to_string(),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The server's notion of today.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// A date `days` after today.
#[must_use]
pub fn days_from_today(days: u64) -> NaiveDate {
    today()
        .checked_add_days(Days::new(days))
        .expect("date in range")
}

/// A date `days` before today.
#[must_use]
pub fn days_before_today(days: u64) -> NaiveDate {
    today()
        .checked_sub_days(Days::new(days))
        .expect("date in range")
}

/// Encode `pairs` as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// The `name=value` part of the session cookie set by this response.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter(|value| value.starts_with(reservations_web::middleware::SESSION_COOKIE_NAME))
            .filter_map(|value| value.split(';').next())
            .map(str::to_string)
            .next_back()
    }

    /// A header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// In-process application under test.
pub struct TestApp {
    router: Router,
    pub reservations: Arc<InMemoryReservationStore>,
    pub staff: Arc<InMemoryStaffStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build the router over fresh, empty stores.
    #[must_use]
    pub fn new() -> Self {
        let config = test_config();
        let reservations = Arc::new(InMemoryReservationStore::new());
        let staff = Arc::new(InMemoryStaffStore::new());
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(config, reservations.clone(), staff.clone());

        Self {
            router: reservations_web::app(state, session_layer),
            reservations,
            staff,
        }
    }

    /// Send one request through the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        form: Option<String>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET uri`.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, cookie, None).await
    }

    /// `POST uri` with a form body.
    pub async fn post_form(
        &self,
        uri: &str,
        pairs: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> TestResponse {
        self.request(Method::POST, uri, cookie, Some(form_body(pairs)))
            .await
    }

    /// Create an account with [`TEST_PASSWORD`].
    pub async fn create_account(&self, username: &str, is_staff: bool) {
        AuthService::new(self.staff.as_ref())
            .register(username, TEST_PASSWORD, is_staff)
            .await
            .expect("account created");
    }

    /// Log in through `POST /auth/login` and return the session cookie.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_form(
                "/auth/login",
                &[("username", username), ("password", TEST_PASSWORD)],
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "login failed");
        response.session_cookie().expect("session cookie set")
    }

    /// Create a staff account and return its session cookie.
    pub async fn staff_session(&self) -> String {
        self.create_account("host", true).await;
        self.login("host").await
    }

    /// Create a non-staff account and return its session cookie.
    pub async fn visitor_session(&self) -> String {
        self.create_account("visitor", false).await;
        self.login("visitor").await
    }

    /// Store a reservation directly, bypassing validation.
    pub async fn seed(
        &self,
        first_name: &str,
        last_name: &str,
        date: NaiveDate,
        created_on: NaiveDate,
    ) -> Reservation {
        self.reservations
            .create(
                ReservationFields {
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    date,
                    party_size: 2,
                    notes: None,
                },
                created_on,
            )
            .await
            .expect("seeded reservation")
    }

    /// Every stored reservation, in listing order.
    pub async fn stored(&self) -> Vec<Reservation> {
        self.reservations.list().await.expect("store available")
    }
}
