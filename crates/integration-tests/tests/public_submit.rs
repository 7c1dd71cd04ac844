//! Integration tests for the public reservation form.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};

use reservations_integration_tests::{
    TestApp, days_before_today, days_from_today, form_body, today,
};

fn iso(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// =============================================================================
// Form Display
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_form() {
    let app = TestApp::new();
    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/reserve"));
}

#[tokio::test]
async fn test_empty_form_renders() {
    let app = TestApp::new();
    let response = app.get("/reserve", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Book a table"));
    assert!(response.body.contains("name=\"first_name\""));
    assert!(response.body.contains("name=\"party_size\""));
    assert!(response.body.contains("Test Bistro"));
    assert!(!response.body.contains("class=\"error\""));
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_valid_submission_creates_reservation() {
    let app = TestApp::new();
    let date = iso(days_from_today(14));

    let response = app
        .post_form(
            "/reserve",
            &[
                ("first_name", "  Jane "),
                ("last_name", "Doe"),
                ("date", &date),
                ("party_size", "4"),
                ("notes", "Window seat please"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/reserve/success"));

    let stored = app.stored().await;
    assert_eq!(stored.len(), 1);
    let reservation = &stored[0];
    assert_eq!(reservation.first_name, "Jane");
    assert_eq!(reservation.last_name, "Doe");
    assert_eq!(reservation.date, days_from_today(14));
    assert_eq!(reservation.party_size, 4);
    assert_eq!(reservation.created_at, today());
    assert_eq!(reservation.notes.as_deref(), Some("Window seat please"));
}

#[tokio::test]
async fn test_blank_notes_are_stored_as_absent() {
    let app = TestApp::new();
    let date = iso(days_from_today(1));

    let response = app
        .post_form(
            "/reserve",
            &[
                ("first_name", "Jane"),
                ("last_name", "Doe"),
                ("date", &date),
                ("party_size", "2"),
                ("notes", "   "),
            ],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(app.stored().await[0].notes, None);
}

#[tokio::test]
async fn test_success_page_renders() {
    let app = TestApp::new();
    let response = app.get("/reserve/success", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Thank you"));
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_today_is_rejected() {
    let app = TestApp::new();
    let date = iso(today());

    let response = app
        .post_form(
            "/reserve",
            &[
                ("first_name", "Jane"),
                ("last_name", "Doe"),
                ("date", &date),
                ("party_size", "2"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Date must be greater than current date"));
    assert!(app.reservations.is_empty().await);
}

#[tokio::test]
async fn test_invalid_submission_echoes_values_and_stores_nothing() {
    let app = TestApp::new();
    let date = iso(days_before_today(3));

    let response = app
        .post_form(
            "/reserve",
            &[
                ("first_name", "Jane"),
                ("last_name", ""),
                ("date", &date),
                ("party_size", "2"),
                ("notes", "Birthday"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field is required."));
    assert!(response.body.contains("Date must be greater than current date"));
    assert!(response.body.contains("value=\"Jane\""));
    assert!(response.body.contains(&format!("value=\"{date}\"")));
    assert!(response.body.contains(">Birthday</textarea>"));
    assert!(app.reservations.is_empty().await);
}

#[tokio::test]
async fn test_every_field_reports_its_own_error() {
    let app = TestApp::new();
    let long_notes = "n".repeat(1001);

    let response = app
        .post_form(
            "/reserve",
            &[
                ("first_name", ""),
                ("last_name", "   "),
                ("date", "not a date"),
                ("party_size", "0"),
                ("notes", &long_notes),
            ],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body.matches("This field is required.").count(), 2);
    assert!(response.body.contains("Enter a valid date."));
    assert!(
        response
            .body
            .contains("Ensure this value is greater than or equal to 1.")
    );
    assert!(
        response
            .body
            .contains("Ensure this value has at most 1000 characters (it has 1001).")
    );
    assert!(app.reservations.is_empty().await);
}

#[tokio::test]
async fn test_missing_fields_are_required() {
    let app = TestApp::new();
    let response = app.post_form("/reserve", &[], None).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body.matches("This field is required.").count(), 4);
}

#[tokio::test]
async fn test_undecodable_body_is_rejected_and_stores_nothing() {
    let app = TestApp::new();
    let date = iso(days_from_today(3));
    let body = form_body(&[
        ("first_name", "Jane"),
        ("first_name", "Janet"),
        ("last_name", "Doe"),
        ("date", &date),
        ("party_size", "2"),
    ]);

    let response = app.request(Method::POST, "/reserve", None, Some(body)).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!response.body.contains("This field is required."));
    assert!(response.location().is_none());
    assert!(app.reservations.is_empty().await);
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_store_outage_is_internal_error() {
    let app = TestApp::new();
    app.reservations.set_unavailable(true);
    let date = iso(days_from_today(5));

    let response = app
        .post_form(
            "/reserve",
            &[
                ("first_name", "Jane"),
                ("last_name", "Doe"),
                ("date", &date),
                ("party_size", "2"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Internal server error");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");

    let response = app.get("/health/ready", None).await;
    assert_eq!(response.status, StatusCode::OK);

    app.reservations.set_unavailable(true);
    let response = app.get("/health/ready", None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let app = TestApp::new();
    let response = app.get("/reserve", None).await;

    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
    assert!(response.header("content-security-policy").is_some());
    assert!(response.header("x-request-id").is_some());
}
