//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Local::now().year())
}

/// Formats a party size as "1 guest" or "N guests".
///
/// Usage in templates: `{{ reservation.party_size|guests }}`
#[askama::filter_fn]
pub fn guests(party_size: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(guest_label(&party_size.to_string()))
}

fn guest_label(count: &str) -> String {
    if count == "1" {
        "1 guest".to_string()
    } else {
        format!("{count} guests")
    }
}
