//! Listing order and search filtering for reservations.
//!
//! Every store sorts and filters with the rules defined here so that the
//! back office shows the same sequence whichever backend serves it.

use core::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::reservation::Reservation;

/// Total order used by every reservation listing.
///
/// Date descending, then `created_at` descending, then id descending so that
/// records created on the same day list the most recent insert first.
#[must_use]
pub fn listing_order(a: &Reservation, b: &Reservation) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Criteria for narrowing a reservation listing.
///
/// The default filter matches every reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFilter {
    /// Case-insensitive substring of the first or last name.
    pub search: Option<String>,
    /// Exact reservation date.
    pub date: Option<NaiveDate>,
}

impl ReservationFilter {
    /// Filter by name substring only.
    #[must_use]
    pub fn search(term: Option<&str>) -> Self {
        Self {
            search: term.map(str::to_string),
            date: None,
        }
    }

    /// The effective search term, or `None` when blank.
    ///
    /// Whitespace only decides blankness; a non-blank term is matched as
    /// submitted, surrounding spaces included.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .filter(|term| !term.trim().is_empty())
    }

    /// Whether `reservation` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let Some(date) = self.date
            && reservation.date != date
        {
            return false;
        }

        self.search_term().is_none_or(|term| {
            let needle = term.to_lowercase();
            reservation.first_name.to_lowercase().contains(&needle)
                || reservation.last_name.to_lowercase().contains(&needle)
        })
    }
}
