//! Core types for the reservations manager.
//!
//! This module provides type-safe wrappers and validation for domain concepts.

pub mod id;
pub mod listing;
pub mod reservation;
pub mod username;

pub use id::*;
pub use listing::{ReservationFilter, listing_order};
pub use reservation::{
    Field, FieldError, Reservation, ReservationFields, ReservationForm, ValidationErrors,
    parse_date,
};
pub use username::{Username, UsernameError};
