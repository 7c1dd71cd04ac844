//! Domain models for the web server.

pub mod session;
pub mod staff;

pub use session::{CurrentUser, keys as session_keys};
pub use staff::StaffUser;
