//! Back-office reservation handlers.
//!
//! Every handler here runs behind `require_staff`, which places the admitted
//! account in request extensions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::{Path, Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use reservations_core::{
    Reservation, ReservationFilter, ReservationForm, ReservationId, ValidationErrors, parse_date,
};

use super::today;
use crate::error::AppError;
use crate::filters;
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Query / Form Types
// =============================================================================

/// List page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Name search term.
    pub q: Option<String>,
    /// Exact date filter, as typed.
    pub date: Option<String>,
}

impl ListQuery {
    /// Build the store filter. An empty or unparseable date is ignored.
    #[must_use]
    pub fn filter(&self) -> ReservationFilter {
        ReservationFilter {
            search: self.q.clone(),
            date: self.date.as_deref().and_then(parse_date),
        }
    }
}

/// Delete confirmation form data.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteForm {
    /// Whether the user explicitly confirmed the deletion.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirm.as_deref().is_some_and(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            )
        })
    }
}

/// The submitted form, or an empty one when the body is missing or undecodable.
///
/// Lets the handlers resolve the reservation first, so an unknown id is a 404
/// whatever the body looks like.
fn submitted<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Form body rejected, treating as empty");
            T::default()
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Reservation list page template.
#[derive(Template, WebTemplate)]
#[template(path = "reservations/index.html")]
pub struct ReservationListTemplate {
    pub venue: String,
    pub user: CurrentUser,
    pub reservations: Vec<Reservation>,
    pub query: String,
    pub date: String,
}

/// Reservation detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "reservations/show.html")]
pub struct ReservationDetailTemplate {
    pub venue: String,
    pub user: CurrentUser,
    pub reservation: Reservation,
}

/// Reservation edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "reservations/edit.html")]
pub struct ReservationEditTemplate {
    pub venue: String,
    pub user: CurrentUser,
    pub reservation: Reservation,
    pub form: ReservationForm,
    pub errors: ValidationErrors,
}

/// Delete confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "reservations/delete.html")]
pub struct ReservationDeleteTemplate {
    pub venue: String,
    pub user: CurrentUser,
    pub reservation: Reservation,
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a path id. Anything that is not a valid id is simply not found.
fn parse_id(raw: &str) -> Result<ReservationId, AppError> {
    raw.parse::<i32>()
        .map(ReservationId::new)
        .map_err(|_| AppError::NotFound(format!("reservation {raw}")))
}

async fn load(state: &AppState, raw_id: &str) -> Result<Reservation, AppError> {
    let id = parse_id(raw_id)?;
    state.reservations().get(id).await.map_err(|e| match e {
        crate::db::RepositoryError::NotFound => AppError::NotFound(format!("reservation {id}")),
        other => other.into(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// List reservations, optionally narrowed by name and date.
#[instrument(skip(state, user), fields(username = %user.username))]
pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.filter();
    let reservations = state.reservations().list_filtered(&filter).await?;

    Ok(ReservationListTemplate {
        venue: state.config().venue_name.clone(),
        user,
        reservations,
        query: query.q.unwrap_or_default(),
        date: filter
            .date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    })
}

/// Show one reservation.
#[instrument(skip(state, user), fields(username = %user.username))]
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = load(&state, &id).await?;

    Ok(ReservationDetailTemplate {
        venue: state.config().venue_name.clone(),
        user,
        reservation,
    })
}

/// Display the edit form pre-populated from the stored record.
#[instrument(skip(state, user), fields(username = %user.username))]
pub async fn edit_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = load(&state, &id).await?;

    Ok(ReservationEditTemplate {
        venue: state.config().venue_name.clone(),
        user,
        form: ReservationForm::from(&reservation),
        reservation,
        errors: ValidationErrors::default(),
    })
}

/// Handle the edit form.
///
/// The new values are validated against today; the date rule applies to the
/// submitted date, not the stored one.
#[instrument(skip(state, user, form), fields(username = %user.username))]
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    form: Result<Form<ReservationForm>, FormRejection>,
) -> Result<Response, AppError> {
    let reservation = load(&state, &id).await?;
    let form = submitted(form);

    match form.validate(today()) {
        Ok(fields) => {
            let updated = state.reservations().update(reservation.id, fields).await?;
            tracing::info!(reservation_id = %updated.id, "Reservation updated");
            Ok(Redirect::to(&format!("/reservations/{}", updated.id)).into_response())
        }
        Err(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            ReservationEditTemplate {
                venue: state.config().venue_name.clone(),
                user,
                reservation,
                form,
                errors,
            },
        )
            .into_response()),
    }
}

/// Display the delete confirmation prompt. Never mutates.
#[instrument(skip(state, user), fields(username = %user.username))]
pub async fn delete_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = load(&state, &id).await?;

    Ok(ReservationDeleteTemplate {
        venue: state.config().venue_name.clone(),
        user,
        reservation,
    })
}

/// Delete a reservation once the user confirmed.
///
/// Without a truthy `confirm` field, including when no form body was sent,
/// the confirmation prompt is shown again.
#[instrument(skip(state, user, form), fields(username = %user.username))]
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let reservation = load(&state, &id).await?;

    if !submitted(form).is_confirmed() {
        return Ok(ReservationDeleteTemplate {
            venue: state.config().venue_name.clone(),
            user,
            reservation,
        }
        .into_response());
    }

    state.reservations().delete(reservation.id).await?;
    tracing::info!(
        reservation_id = %reservation.id,
        reservation = %reservation,
        "Reservation deleted"
    );

    Ok(Redirect::to("/reservations").into_response())
}
