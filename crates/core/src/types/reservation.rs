//! The reservation entity and its form validator.
//!
//! [`ReservationForm`] carries untrusted input exactly as submitted. Calling
//! [`ReservationForm::validate`] with the current date yields either
//! [`ReservationFields`] ready to persist or a [`ValidationErrors`] set with
//! one entry per failed rule. The same validator serves both creation and
//! editing.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::ReservationId;

/// Maximum length of `first_name` and `last_name`, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of `notes`, in characters.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Smallest accepted party size.
pub const MIN_PARTY_SIZE: u32 = 1;

/// Largest party size the storage column can hold.
#[allow(clippy::cast_sign_loss)]
pub const MAX_PARTY_SIZE: u32 = i32::MAX as u32;

/// Accepted input formats for the reservation date, tried in order.
const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

const REQUIRED_MESSAGE: &str = "This field is required.";
const INVALID_DATE_MESSAGE: &str = "Enter a valid date.";
const DATE_NOT_IN_FUTURE_MESSAGE: &str = "Date must be greater than current date";
const INVALID_NUMBER_MESSAGE: &str = "Enter a whole number.";

/// A persisted reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Store-assigned identifier.
    pub id: ReservationId,
    /// Guest's first name.
    pub first_name: String,
    /// Guest's last name.
    pub last_name: String,
    /// Day of the visit.
    pub date: NaiveDate,
    /// Number of guests, at least one.
    pub party_size: u32,
    /// Day the reservation was submitted. Never changes after creation.
    pub created_at: NaiveDate,
    /// Free-form notes from the guest.
    pub notes: Option<String>,
}

impl Reservation {
    /// Build a reservation from validated fields plus the store-assigned values.
    #[must_use]
    pub fn from_fields(id: ReservationId, fields: ReservationFields, created_at: NaiveDate) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            date: fields.date,
            party_size: fields.party_size,
            created_at,
            notes: fields.notes,
        }
    }

    /// Overwrite every editable field, keeping `id` and `created_at`.
    pub fn apply(&mut self, fields: ReservationFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.date = fields.date;
        self.party_size = fields.party_size;
        self.notes = fields.notes;
    }

    /// The editable fields of this reservation.
    #[must_use]
    pub fn fields(&self) -> ReservationFields {
        ReservationFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date: self.date,
            party_size: self.party_size,
            notes: self.notes.clone(),
        }
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.last_name, self.first_name)
    }
}

/// Validated, editable reservation fields.
///
/// Only [`ReservationForm::validate`] produces this type, so holding one means
/// every rule passed against the date given to the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFields {
    pub first_name: String,
    pub last_name: String,
    pub date: NaiveDate,
    pub party_size: u32,
    pub notes: Option<String>,
}

/// Reservation form input exactly as submitted.
///
/// Every field is a raw string so that an invalid submission can be shown
/// back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub party_size: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<&Reservation> for ReservationForm {
    fn from(reservation: &Reservation) -> Self {
        Self {
            first_name: reservation.first_name.clone(),
            last_name: reservation.last_name.clone(),
            date: reservation.date.format("%Y-%m-%d").to_string(),
            party_size: reservation.party_size.to_string(),
            notes: reservation.notes.clone(),
        }
    }
}

impl ReservationForm {
    /// Validate the form against `today`.
    ///
    /// All rules run; the error set holds one entry for each failing field,
    /// in field order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when any field fails its rule.
    pub fn validate(&self, today: NaiveDate) -> Result<ReservationFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let first_name = errors.check(Field::FirstName, validate_name(&self.first_name));
        let last_name = errors.check(Field::LastName, validate_name(&self.last_name));
        let date = errors.check(Field::Date, validate_date(&self.date, today));
        let party_size = errors.check(Field::PartySize, validate_party_size(&self.party_size));
        let notes = errors.check(Field::Notes, validate_notes(self.notes.as_deref()));

        match (first_name, last_name, date, party_size, notes) {
            (Some(first_name), Some(last_name), Some(date), Some(party_size), Some(notes)) => {
                Ok(ReservationFields {
                    first_name,
                    last_name,
                    date,
                    party_size,
                    notes,
                })
            }
            _ => Err(errors),
        }
    }

    /// Notes as entered, or an empty string for template display.
    #[must_use]
    pub fn notes_or_empty(&self) -> &str {
        self.notes.as_deref().unwrap_or_default()
    }
}

fn validate_name(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    check_max_length(value, MAX_NAME_LENGTH)?;
    Ok(value.to_string())
}

fn validate_date(value: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    let date = parse_date(value).ok_or_else(|| INVALID_DATE_MESSAGE.to_string())?;
    if date <= today {
        return Err(DATE_NOT_IN_FUTURE_MESSAGE.to_string());
    }
    Ok(date)
}

fn validate_party_size(value: &str) -> Result<u32, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    let size = value
        .parse::<i64>()
        .map_err(|_| INVALID_NUMBER_MESSAGE.to_string())?;
    if size < i64::from(MIN_PARTY_SIZE) {
        return Err(format!(
            "Ensure this value is greater than or equal to {MIN_PARTY_SIZE}."
        ));
    }
    u32::try_from(size)
        .ok()
        .filter(|size| *size <= MAX_PARTY_SIZE)
        .ok_or_else(|| format!("Ensure this value is less than or equal to {MAX_PARTY_SIZE}."))
}

fn validate_notes(value: Option<&str>) -> Result<Option<String>, String> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    check_max_length(value, MAX_NOTES_LENGTH)?;
    Ok(Some(value.to_string()))
}

fn check_max_length(value: &str, max: usize) -> Result<(), String> {
    let length = value.chars().count();
    if length > max {
        return Err(format!(
            "Ensure this value has at most {max} characters (it has {length})."
        ));
    }
    Ok(())
}

/// Parse a date in any of the accepted input formats.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

// =============================================================================
// Errors
// =============================================================================

/// A reservation form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Date,
    PartySize,
    Notes,
}

impl Field {
    /// The form field name as submitted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Date => "date",
            Self::PartySize => "party_size",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every rule failure from one validation run, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("reservation has {} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Returns true when no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failed rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All failures in field order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages reported for the named form field.
    ///
    /// Takes the field name as submitted so templates can look errors up
    /// without importing [`Field`].
    #[must_use]
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field.as_str() == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    fn check<T>(&mut self, field: Field, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(FieldError { field, message });
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn valid_form() -> ReservationForm {
        ReservationForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date: "2026-10-16".to_string(),
            party_size: "2".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_valid_form_produces_fields() {
        let fields = valid_form().validate(today()).unwrap();
        assert_eq!(fields.first_name, "Jane");
        assert_eq!(fields.last_name, "Doe");
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(fields.party_size, 2);
        assert_eq!(fields.notes, None);
    }

    #[test]
    fn test_date_today_or_earlier_is_rejected() {
        for date in ["2026-10-15", "2026-10-14", "2020-01-01"] {
            let form = ReservationForm {
                date: date.to_string(),
                ..valid_form()
            };
            let errors = form.validate(today()).unwrap_err();
            assert_eq!(
                errors.messages("date"),
                vec!["Date must be greater than current date"],
                "date {date} should be rejected"
            );
        }
    }

    #[test]
    fn test_date_after_today_is_accepted() {
        for date in ["2026-10-16", "2027-01-01", "12/31/2026"] {
            let form = ReservationForm {
                date: date.to_string(),
                ..valid_form()
            };
            assert!(form.validate(today()).is_ok(), "date {date} should pass");
        }
    }

    #[test]
    fn test_unparseable_date() {
        let form = ReservationForm {
            date: "next tuesday".to_string(),
            ..valid_form()
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.messages("date"), vec!["Enter a valid date."]);
    }

    #[test]
    fn test_all_errors_are_collected() {
        let form = ReservationForm {
            first_name: "   ".to_string(),
            last_name: "x".repeat(256),
            date: "2026-10-01".to_string(),
            party_size: "0".to_string(),
            notes: Some("n".repeat(1001)),
        };
        let errors = form.validate(today()).unwrap_err();

        let fields: Vec<Field> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                Field::FirstName,
                Field::LastName,
                Field::Date,
                Field::PartySize,
                Field::Notes
            ]
        );
        assert_eq!(errors.messages("first_name"), vec!["This field is required."]);
        assert_eq!(
            errors.messages("last_name"),
            vec!["Ensure this value has at most 255 characters (it has 256)."]
        );
        assert_eq!(
            errors.messages("party_size"),
            vec!["Ensure this value is greater than or equal to 1."]
        );
        assert_eq!(
            errors.messages("notes"),
            vec!["Ensure this value has at most 1000 characters (it has 1001)."]
        );
    }

    #[test]
    fn test_error_summary_reflects_failures() {
        assert!(ValidationErrors::default().is_empty());

        let form = ReservationForm {
            first_name: String::new(),
            party_size: "two".to_string(),
            ..valid_form()
        };
        let errors = form.validate(today()).unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.messages("party_size"), vec!["Enter a whole number."]);
        assert!(errors.messages("last_name").is_empty());
    }

    #[test]
    fn test_name_length_counts_characters_not_bytes() {
        let form = ReservationForm {
            first_name: "é".repeat(255),
            ..valid_form()
        };
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn test_party_size_rules() {
        let cases = [
            ("", "This field is required."),
            ("two", "Enter a whole number."),
            ("1.5", "Enter a whole number."),
            ("-3", "Ensure this value is greater than or equal to 1."),
            (
                "2147483648",
                "Ensure this value is less than or equal to 2147483647.",
            ),
        ];
        for (input, message) in cases {
            let form = ReservationForm {
                party_size: input.to_string(),
                ..valid_form()
            };
            let errors = form.validate(today()).unwrap_err();
            assert_eq!(errors.messages("party_size"), vec![message], "input {input:?}");
        }
    }

    #[test]
    fn test_blank_notes_are_absent() {
        let form = ReservationForm {
            notes: Some("   ".to_string()),
            ..valid_form()
        };
        assert_eq!(form.validate(today()).unwrap().notes, None);

        let form = ReservationForm {
            notes: Some(" window seat ".to_string()),
            ..valid_form()
        };
        assert_eq!(
            form.validate(today()).unwrap().notes.as_deref(),
            Some("window seat")
        );
    }

    #[test]
    fn test_form_from_reservation_round_trips() {
        let fields = valid_form().validate(today()).unwrap();
        let reservation = Reservation::from_fields(ReservationId::new(1), fields.clone(), today());
        let form = ReservationForm::from(&reservation);
        assert_eq!(form.date, "2026-10-16");
        assert_eq!(form.validate(today()).unwrap(), fields);
    }

    #[test]
    fn test_apply_keeps_id_and_created_at() {
        let fields = valid_form().validate(today()).unwrap();
        let mut reservation = Reservation::from_fields(ReservationId::new(9), fields, today());

        let edited = ReservationForm {
            first_name: "Janet".to_string(),
            party_size: "4".to_string(),
            ..valid_form()
        }
        .validate(today())
        .unwrap();
        reservation.apply(edited);

        assert_eq!(reservation.id, ReservationId::new(9));
        assert_eq!(reservation.created_at, today());
        assert_eq!(reservation.first_name, "Janet");
        assert_eq!(reservation.party_size, 4);
    }

    #[test]
    fn test_display_is_last_then_first() {
        let fields = valid_form().validate(today()).unwrap();
        let reservation = Reservation::from_fields(ReservationId::new(1), fields, today());
        assert_eq!(reservation.to_string(), "Doe Jane");
    }
}
