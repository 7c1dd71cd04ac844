//! Reservations Core - Shared types library.
//!
//! This crate provides the types used across all reservations components:
//! - `web` - Public reservation form and staff back office
//! - `cli` - Command-line tools for migrations and staff accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The reservation validator lives here so that the same rules
//! apply wherever a reservation is created or edited.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, the reservation entity and form validator,
//!   listing order and search filters, staff usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
