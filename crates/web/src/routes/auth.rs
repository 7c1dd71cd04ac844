//! Authentication route handlers.
//!
//! Password login for back-office accounts. Sessions are cycled on login
//! and cleared on logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user};
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Where a successful login lands when no usable `next` was given.
const DEFAULT_LANDING: &str = "/reservations";

const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

// =============================================================================
// Form / Query Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Login page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub venue: String,
    pub error: Option<String>,
    pub username: String,
    pub next: String,
    pub current_user: Option<CurrentUser>,
}

/// Only same-site absolute paths are followed after login.
#[must_use]
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path
        }
        _ => DEFAULT_LANDING,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalUser(current_user): OptionalUser,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        venue: state.config().venue_name.clone(),
        error: None,
        username: String::new(),
        next: safe_next(query.next.as_deref()).to_string(),
        current_user,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = safe_next(form.next.as_deref()).to_string();

    let user = match AuthService::new(state.staff())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed");
            return Ok(LoginTemplate {
                venue: state.config().venue_name.clone(),
                error: Some(INVALID_LOGIN_MESSAGE.to_string()),
                username: form.username,
                next,
                current_user: None,
            }
            .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session cycle failed: {e}")))?;
    set_current_user(&session, &CurrentUser::from(&user))
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    tracing::info!(user_id = %user.id, is_staff = user.is_staff, "Login succeeded");
    Ok(Redirect::to(&next).into_response())
}

/// Log out and return to the login page.
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session cycle failed: {e}")))?;
    clear_sentry_user();

    Ok(Redirect::to("/auth/login").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/reservations/3")), "/reservations/3");
        assert_eq!(
            safe_next(Some("/reservations?q=doe")),
            "/reservations?q=doe"
        );
    }

    #[test]
    fn test_safe_next_rejects_external_targets() {
        assert_eq!(safe_next(None), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("https://evil.example")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("//evil.example")), DEFAULT_LANDING);
        assert_eq!(safe_next(Some("/\\evil.example")), DEFAULT_LANDING);
    }
}
