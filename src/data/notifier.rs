//! Notification log and toast slot
//!
//! `Notifier::emit` is the single entry point mutation operations use to
//! tell the user something happened. It never fails.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use prometheus::IntGauge;
use tokio::time::Instant;

use super::models::{AppNotification, EntityId, NotificationSeverity};

/// Transient on-screen message
///
/// At most one exists at a time. It expires on its own after the
/// configured interval or when dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: NotificationSeverity,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Owner of the notification log (newest first) and the toast slot
///
/// The unread gauge is shared by every live notifier. Each one adds its own
/// unread count and moves the gauge by deltas, so the gauge is the sum over
/// all sessions.
pub struct Notifier {
    notifications: Arc<Vec<AppNotification>>,
    toast: Option<Toast>,
    toast_duration: Duration,
    unread_gauge: IntGauge,
}

impl Notifier {
    pub fn new(initial: Vec<AppNotification>, toast_duration: Duration) -> Self {
        use crate::metrics::UNREAD_NOTIFICATIONS;
        Self::with_gauge(initial, toast_duration, UNREAD_NOTIFICATIONS.clone())
    }

    /// Like [`Notifier::new`], reporting unread counts into `unread_gauge`
    pub(crate) fn with_gauge(
        initial: Vec<AppNotification>,
        toast_duration: Duration,
        unread_gauge: IntGauge,
    ) -> Self {
        let notifier = Self {
            notifications: Arc::new(initial),
            toast: None,
            toast_duration,
            unread_gauge,
        };
        notifier.unread_gauge.add(notifier.unread_count() as i64);
        notifier
    }

    /// Append a notification and replace the current toast
    ///
    /// The toast timer restarts on every call.
    pub fn emit(&mut self, title: &str, message: &str, severity: NotificationSeverity) {
        let notification = AppNotification {
            id: EntityId::new().0,
            title: title.to_string(),
            message: message.to_string(),
            severity,
            created_at: chrono::Utc::now(),
            is_read: false,
        };

        let mut next = Vec::with_capacity(self.notifications.len() + 1);
        next.push(notification);
        next.extend(self.notifications.iter().cloned());
        self.notifications = Arc::new(next);

        self.toast = Some(Toast {
            message: message.to_string(),
            severity,
            expires_at: Instant::now() + self.toast_duration,
        });

        use crate::metrics::NOTIFICATIONS_EMITTED_TOTAL;
        NOTIFICATIONS_EMITTED_TOTAL
            .with_label_values(&[severity.as_str()])
            .inc();
        self.unread_gauge.inc();

        tracing::debug!(%severity, title = %title, "Notification emitted");
    }

    /// Snapshot of the notification log, newest first
    pub fn notifications(&self) -> Arc<Vec<AppNotification>> {
        Arc::clone(&self.notifications)
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Flip one notification to read
    ///
    /// # Errors
    /// `NotFound` if no notification has this id; nothing changes.
    pub fn mark_read(&mut self, id: &str) -> crate::error::Result<()> {
        let Some(target) = self.notifications.iter().find(|n| n.id == id) else {
            return Err(crate::error::AppError::NotFound.recorded());
        };
        let flips = !target.is_read;

        self.notifications = Arc::new(
            self.notifications
                .iter()
                .map(|n| {
                    if n.id == id {
                        AppNotification {
                            is_read: true,
                            ..n.clone()
                        }
                    } else {
                        n.clone()
                    }
                })
                .collect(),
        );
        if flips {
            self.unread_gauge.dec();
        }
        Ok(())
    }

    pub fn mark_all_read(&mut self) {
        let flipped = self.unread_count();
        self.notifications = Arc::new(
            self.notifications
                .iter()
                .map(|n| AppNotification {
                    is_read: true,
                    ..n.clone()
                })
                .collect(),
        );
        self.unread_gauge.sub(flipped as i64);
    }

    /// The live toast, if one is showing and has not expired
    pub fn pending_toast(&self) -> Option<&Toast> {
        self.toast.as_ref().filter(|toast| !toast.is_expired())
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.unread_gauge.sub(self.unread_count() as i64);
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("notifications", &self.notifications.len())
            .field("toast", &self.toast)
            .field("toast_duration", &self.toast_duration)
            .finish_non_exhaustive()
    }
}
