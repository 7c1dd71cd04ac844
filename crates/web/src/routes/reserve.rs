//! Public reservation submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use reservations_core::{ReservationForm, ValidationErrors};

use super::today;
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Reservation form page template.
#[derive(Template, WebTemplate)]
#[template(path = "reserve/new.html")]
pub struct NewReservationTemplate {
    pub venue: String,
    pub form: ReservationForm,
    pub errors: ValidationErrors,
}

/// Submission acknowledgment template.
#[derive(Template, WebTemplate)]
#[template(path = "reserve/success.html")]
pub struct SuccessTemplate {
    pub venue: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display an empty reservation form.
pub async fn new_page(State(state): State<AppState>) -> impl IntoResponse {
    NewReservationTemplate {
        venue: state.config().venue_name.clone(),
        form: ReservationForm::default(),
        errors: ValidationErrors::default(),
    }
}

/// Handle reservation form submission.
///
/// A valid form is stored with today's date as `created_at` and redirects to
/// the acknowledgment page. An invalid form is shown again with the submitted
/// values and 422, and nothing is stored.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ReservationForm>,
) -> Result<Response, AppError> {
    let today = today();

    match form.validate(today) {
        Ok(fields) => {
            let reservation = state.reservations().create(fields, today).await?;
            tracing::info!(
                reservation_id = %reservation.id,
                date = %reservation.date,
                party_size = reservation.party_size,
                "Reservation submitted"
            );
            Ok(Redirect::to("/reserve/success").into_response())
        }
        Err(errors) => {
            tracing::debug!(invalid_fields = errors.len(), "Reservation form rejected");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                NewReservationTemplate {
                    venue: state.config().venue_name.clone(),
                    form,
                    errors,
                },
            )
                .into_response())
        }
    }
}

/// Display the submission acknowledgment.
pub async fn success(State(state): State<AppState>) -> impl IntoResponse {
    SuccessTemplate {
        venue: state.config().venue_name.clone(),
    }
}
