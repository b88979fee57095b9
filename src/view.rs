//! View router
//!
//! Tracks which screen is active and cuts the matching slice of store
//! state for it. Views only ever receive snapshots.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::{AppNotification, Contact, EntityStore, ForumPost, Report, Shift, User};
use crate::service::WeekView;

/// Number of reports on the dashboard
const RECENT_REPORTS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppView {
    #[default]
    Dashboard,
    Reporting,
    Schedule,
    Forum,
    Contacts,
    AiAssistant,
}

impl AppView {
    pub const ALL: [AppView; 6] = [
        AppView::Dashboard,
        AppView::Reporting,
        AppView::Schedule,
        AppView::Forum,
        AppView::Contacts,
        AppView::AiAssistant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Reporting => "reporting",
            Self::Schedule => "schedule",
            Self::Forum => "forum",
            Self::Contacts => "contacts",
            Self::AiAssistant => "ai_assistant",
        }
    }
}

impl fmt::Display for AppView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State handed to the active view for one render pass
#[derive(Debug, Clone)]
pub enum ViewSlice {
    Dashboard {
        user: Option<User>,
        recent_reports: Vec<Report>,
        next_shift: Option<Shift>,
        notifications: Arc<Vec<AppNotification>>,
        unread_count: usize,
        can_manage_reports: bool,
    },
    Reporting {
        reports: Arc<Vec<Report>>,
    },
    Schedule {
        shifts: Arc<Vec<Shift>>,
        week: WeekView,
        is_admin: bool,
    },
    Forum {
        posts: Arc<Vec<ForumPost>>,
        viewer_id: Option<String>,
    },
    Contacts {
        emergency: Vec<Contact>,
        directory: Vec<Contact>,
    },
    AiAssistant,
}

/// Active view plus the schedule's displayed week
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    active: AppView,
    /// `None` follows the current date
    week: Option<WeekView>,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_view(&self) -> AppView {
        self.active
    }

    /// Switch views; every view is always reachable
    pub fn set_view(&mut self, view: AppView) {
        if view != self.active {
            tracing::debug!(from = %self.active, to = %view, "View changed");
        }
        self.active = view;
    }

    /// Back to the dashboard and the current week
    pub fn reset(&mut self) {
        self.active = AppView::Dashboard;
        self.week = None;
    }

    /// Week shown on the schedule
    pub fn week(&self, today: NaiveDate) -> WeekView {
        self.week.unwrap_or_else(|| WeekView::containing(today))
    }

    pub fn previous_week(&mut self, today: NaiveDate) -> WeekView {
        let week = self.week(today).previous();
        self.week = Some(week);
        week
    }

    pub fn next_week(&mut self, today: NaiveDate) -> WeekView {
        let week = self.week(today).next();
        self.week = Some(week);
        week
    }

    /// Slice of `store` for the active view
    pub fn render(&self, store: &EntityStore, today: NaiveDate) -> ViewSlice {
        let user = store.current_user();
        match self.active {
            AppView::Dashboard => ViewSlice::Dashboard {
                user: user.cloned(),
                recent_reports: store.reports().iter().take(RECENT_REPORTS).cloned().collect(),
                next_shift: next_shift(&store.shifts(), today),
                notifications: store.notifications(),
                unread_count: store.unread_count(),
                can_manage_reports: user.is_some_and(User::is_admin),
            },
            AppView::Reporting => ViewSlice::Reporting {
                reports: store.reports(),
            },
            AppView::Schedule => ViewSlice::Schedule {
                shifts: store.shifts(),
                week: self.week(today),
                is_admin: user.is_some_and(User::is_admin),
            },
            AppView::Forum => ViewSlice::Forum {
                posts: store.posts(),
                viewer_id: user.map(|u| u.id.clone()),
            },
            AppView::Contacts => {
                let (emergency, directory): (Vec<Contact>, Vec<Contact>) =
                    store.contacts().iter().cloned().partition(|c| c.is_emergency);
                ViewSlice::Contacts {
                    emergency,
                    directory,
                }
            }
            AppView::AiAssistant => ViewSlice::AiAssistant,
        }
    }
}

/// Earliest shift dated `today` or later, by date then start time
fn next_shift(shifts: &[Shift], today: NaiveDate) -> Option<Shift> {
    shifts
        .iter()
        .filter(|s| s.date >= today)
        .min_by_key(|s| (s.date, s.start_time))
        .cloned()
}
