//! Back-office authorization gate.
//!
//! [`require_staff`] is layered in front of every back-office route with
//! `Router::route_layer`, so no workflow handler runs unless the session
//! holds an account with the staff capability. Handlers read the admitted
//! account with `Extension<CurrentUser>`.

use axum::{
    extract::{FromRequestParts, OriginalUri, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tower_sessions::Session;

use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentUser, session_keys};

/// Why a request was refused by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// Nobody is signed in.
    #[error("authentication required")]
    Anonymous,
    /// The signed-in account lacks the staff capability.
    #[error("staff access required")]
    NotStaff,
}

/// Decide whether `user` may use the back office.
///
/// # Errors
///
/// Returns `AuthorizationError::Anonymous` when `user` is `None` and
/// `AuthorizationError::NotStaff` when the account is not staff.
pub fn authorize(user: Option<&CurrentUser>) -> Result<&CurrentUser, AuthorizationError> {
    match user {
        None => Err(AuthorizationError::Anonymous),
        Some(user) if !user.is_staff => Err(AuthorizationError::NotStaff),
        Some(user) => Ok(user),
    }
}

/// Login URL that returns to `target` after a successful sign-in.
#[must_use]
pub fn login_redirect_url(target: &str) -> String {
    format!("/auth/login?next={}", urlencoding::encode(target))
}

/// Middleware admitting only staff accounts.
///
/// Anonymous requests are redirected (303) to the login page with the
/// original path in `next`; signed-in non-staff accounts get 403.
pub async fn require_staff(session: Session, mut request: Request, next: Next) -> Response {
    let user = match current_user(&session).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    match authorize(user.as_ref()) {
        Ok(user) => {
            tracing::Span::current().record("username", user.username.as_str());
            set_sentry_user(user.id.as_i32(), user.username.as_str());
            request.extensions_mut().insert(user.clone());
        }
        Err(AuthorizationError::Anonymous) => {
            // Nested routers see a stripped URI; redirect back to the full path
            let uri = request
                .extensions()
                .get::<OriginalUri>()
                .map_or_else(|| request.uri(), |original| &original.0);
            let target = uri
                .path_and_query()
                .map_or_else(|| uri.path().to_string(), ToString::to_string);
            tracing::debug!(next = %target, "Anonymous back-office request");
            return Redirect::to(&login_redirect_url(&target)).into_response();
        }
        Err(err @ AuthorizationError::NotStaff) => {
            tracing::warn!(
                username = user.as_ref().map(|u| u.username.as_str()),
                "Non-staff account refused"
            );
            return AppError::Forbidden(err.to_string()).into_response();
        }
    }

    next.run(request).await
}

/// Read the signed-in account from the session.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session store fails.
pub async fn current_user(session: &Session) -> Result<Option<CurrentUser>, AppError> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))
}

/// Helper to store the signed-in account in the session.
///
/// # Errors
///
/// Returns error if the session cannot be updated.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the signed-in account from the session (logout).
///
/// # Errors
///
/// Returns error if the session cannot be updated.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

/// Extractor that optionally gets the signed-in account.
///
/// Unlike [`require_staff`], this never rejects the request.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>().cloned() {
            Some(session) => current_user(&session).await?,
            None => None,
        };

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reservations_core::{StaffUserId, Username};

    fn user(is_staff: bool) -> CurrentUser {
        CurrentUser {
            id: StaffUserId::new(1),
            username: Username::parse("host").unwrap(),
            is_staff,
        }
    }

    #[test]
    fn test_anonymous_is_refused() {
        assert_eq!(authorize(None), Err(AuthorizationError::Anonymous));
    }

    #[test]
    fn test_non_staff_is_refused() {
        let visitor = user(false);
        assert_eq!(authorize(Some(&visitor)), Err(AuthorizationError::NotStaff));
    }

    #[test]
    fn test_staff_is_admitted() {
        let staff = user(true);
        assert_eq!(authorize(Some(&staff)).unwrap(), &staff);
    }

    #[test]
    fn test_login_redirect_url_encodes_target() {
        assert_eq!(
            login_redirect_url("/reservations?q=doe"),
            "/auth/login?next=%2Freservations%3Fq%3Ddoe"
        );
    }
}
