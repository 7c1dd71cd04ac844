//! Smoke test against a running server.
//!
//! Start the server, create a staff account, then:
//!
//! ```bash
//! RESERVATIONS_LIVE_URL=http://localhost:3000 \
//! RESERVATIONS_LIVE_USERNAME=host RESERVATIONS_LIVE_PASSWORD=... \
//!     cargo test -p reservations-integration-tests --test live_server -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::{Client, StatusCode, redirect::Policy};

use reservations_integration_tests::days_from_today;

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("client builds")
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_submit_then_find_in_back_office() {
    let base = env("RESERVATIONS_LIVE_URL");
    let client = client();
    let marker = uuid::Uuid::new_v4().simple().to_string();
    let date = days_from_today(30).format("%Y-%m-%d").to_string();

    let response = client
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{base}/reserve"))
        .form(&[
            ("first_name", "Smoke"),
            ("last_name", marker.as_str()),
            ("date", date.as_str()),
            ("party_size", "2"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .post(format!("{base}/auth/login"))
        .form(&[
            ("username", env("RESERVATIONS_LIVE_USERNAME")),
            ("password", env("RESERVATIONS_LIVE_PASSWORD")),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{base}/reservations"))
        .query(&[("q", marker.as_str())])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(&format!("{marker} Smoke")));
}
