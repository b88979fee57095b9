//! Data layer module
//!
//! Holds all session state in memory:
//! - Domain models
//! - Entity store (collections + current user)
//! - Notification log and toast
//! - Demo seed dataset

mod models;
mod notifier;
pub mod seed;
mod store;

pub use models::*;
pub use notifier::{Notifier, Toast};
pub use store::{EntityStore, NewPost, NewShift, ReportDraft, ReportFilter, StoreContents};

#[cfg(test)]
pub(crate) use store::test_support as store_test_support;
