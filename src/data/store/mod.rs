//! Entity store
//!
//! Owns every mutable collection of a session plus the logged-in user.
//!
//! Collections are held as `Arc<Vec<_>>` snapshots. A mutation never edits a
//! snapshot in place: it builds the next vector and swaps the `Arc`, so a
//! reader holding an older snapshot keeps a consistent view and can detect a
//! change with `Arc::ptr_eq`.
//!
//! Operations take `&mut self`, which serializes them; none can observe a
//! collection half-way through another.

mod forum;
mod reports;
mod shifts;

pub use forum::NewPost;
pub use reports::{ReportDraft, ReportFilter};
pub use shifts::NewShift;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::models::*;
use super::notifier::{Notifier, Toast};
use super::seed;
use crate::error::{AppError, Result};

/// Initial collections for a new store
#[derive(Debug, Clone, Default)]
pub struct StoreContents {
    pub reports: Vec<Report>,
    pub shifts: Vec<Shift>,
    pub posts: Vec<ForumPost>,
    pub contacts: Vec<Contact>,
    pub notifications: Vec<AppNotification>,
}

impl StoreContents {
    /// The bundled demo dataset, with timestamps relative to `now`
    pub fn demo(now: DateTime<Utc>) -> Self {
        Self {
            reports: seed::reports(now),
            shifts: seed::shifts(now),
            posts: seed::posts(now),
            contacts: seed::contacts(),
            notifications: seed::notifications(now),
        }
    }
}

/// In-memory owner of all domain collections for one session
#[derive(Debug)]
pub struct EntityStore {
    reports: Arc<Vec<Report>>,
    shifts: Arc<Vec<Shift>>,
    posts: Arc<Vec<ForumPost>>,
    contacts: Arc<Vec<Contact>>,
    notifier: Notifier,
    current_user: Option<User>,
}

impl EntityStore {
    /// Create a store from initial contents
    ///
    /// # Arguments
    /// * `contents` - Initial collections (see [`StoreContents::demo`])
    /// * `toast_duration` - How long a toast stays visible
    pub fn new(contents: StoreContents, toast_duration: Duration) -> Self {
        Self {
            reports: Arc::new(contents.reports),
            shifts: Arc::new(contents.shifts),
            posts: Arc::new(contents.posts),
            contacts: Arc::new(contents.contacts),
            notifier: Notifier::new(contents.notifications, toast_duration),
            current_user: None,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Make `user` the current user and greet them
    pub fn login(&mut self, user: User) {
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        let title = format!("Welcome, {}!", user.first_name());
        self.current_user = Some(user);
        self.notifier.emit(
            &title,
            "You have signed in to Siskamling Online.",
            NotificationSeverity::Success,
        );
    }

    /// Clear the current user and any pending toast
    ///
    /// Collections and the notification log are kept.
    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.notifier.dismiss_toast();
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Snapshot of all reports, newest first
    pub fn reports(&self) -> Arc<Vec<Report>> {
        Arc::clone(&self.reports)
    }

    /// Snapshot of all patrol shifts, in insertion order
    pub fn shifts(&self) -> Arc<Vec<Shift>> {
        Arc::clone(&self.shifts)
    }

    /// Snapshot of all forum posts, newest first
    pub fn posts(&self) -> Arc<Vec<ForumPost>> {
        Arc::clone(&self.posts)
    }

    pub fn contacts(&self) -> Arc<Vec<Contact>> {
        Arc::clone(&self.contacts)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Snapshot of the notification log, newest first
    pub fn notifications(&self) -> Arc<Vec<AppNotification>> {
        self.notifier.notifications()
    }

    pub fn unread_count(&self) -> usize {
        self.notifier.unread_count()
    }

    /// Mark one notification read; emits nothing
    pub fn mark_notification_read(&mut self, id: &str) -> Result<()> {
        self.notifier.mark_read(id)?;
        record_mutation("mark_notification_read");
        Ok(())
    }

    /// Mark every notification read; emits nothing
    pub fn mark_all_notifications_read(&mut self) {
        self.notifier.mark_all_read();
        record_mutation("mark_all_notifications_read");
    }

    pub fn pending_toast(&self) -> Option<&Toast> {
        self.notifier.pending_toast()
    }

    pub fn dismiss_toast(&mut self) {
        self.notifier.dismiss_toast();
    }

    // =========================================================================
    // Guards
    // =========================================================================

    fn require_user(&self) -> Result<&User> {
        self.current_user
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized.recorded())
    }

    fn require_admin(&self) -> Result<&User> {
        let user = self.require_user()?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Admin-only operation refused");
            return Err(AppError::Forbidden.recorded());
        }
        Ok(user)
    }
}

fn record_mutation(operation: &str) {
    use crate::metrics::MUTATIONS_TOTAL;
    MUTATIONS_TOTAL.with_label_values(&[operation]).inc();
}

/// Trimmed copy of a required text field
fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)).recorded());
    }
    Ok(value.to_string())
}

/// Copy of `items` with the element at `index` swapped for `item`
fn replaced<T: Clone>(items: &[T], index: usize, item: T) -> Arc<Vec<T>> {
    let mut next = items.to_vec();
    next[index] = item;
    Arc::new(next)
}

/// Copy of `items` with `item` at the end
fn pushed<T: Clone>(items: &[T], item: T) -> Arc<Vec<T>> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    Arc::new(next)
}

/// Copy of `items` without the element at `index`
fn removed<T: Clone>(items: &[T], index: usize) -> Arc<Vec<T>> {
    let mut next = items.to_vec();
    next.remove(index);
    Arc::new(next)
}

/// Copy of `items` with `item` in front
fn prepended<T: Clone>(items: &[T], item: T) -> Arc<Vec<T>> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.push(item);
    next.extend_from_slice(items);
    Arc::new(next)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn admin() -> User {
        seed::users().remove(0)
    }

    pub fn resident() -> User {
        seed::users().remove(1)
    }

    pub fn demo_store() -> EntityStore {
        EntityStore::new(StoreContents::demo(Utc::now()), Duration::from_millis(3000))
    }

    pub fn empty_store() -> EntityStore {
        EntityStore::new(StoreContents::default(), Duration::from_millis(3000))
    }

    pub fn store_as(user: User) -> EntityStore {
        let mut store = demo_store();
        store.login(user);
        store
    }
}
