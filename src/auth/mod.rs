//! Authentication
//!
//! Handles:
//! - Email lookup against the user directory
//! - Registration of new residents and admins
//! - Demo quick-login by role

mod directory;

pub use directory::{Registration, UserDirectory};
