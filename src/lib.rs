//! Neighborwatch - in-memory state for a neighborhood-watch (Siskamling) app
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Session (AppState)                         │
//! │  - Login / logout                                           │
//! │  - View router (active view + render slices)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Report preparation (delay + AI advice)                   │
//! │  - Safety assistant chat                                    │
//! │  - Patrol calendar                                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - Entity store (reports, shifts, posts, contacts)          │
//! │  - Notification log + toast                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `data`: Models, entity store, notifications, seed data
//! - `service`: Flows that await collaborators, calendar logic
//! - `ai`: Generative-AI collaborator (Gemini)
//! - `auth`: User directory
//! - `view`: View router
//! - `config`: Configuration management
//! - `error`: Error types

pub mod ai;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;
pub mod view;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::data::{
    AppNotification, Contact, EntityStore, ForumPost, NewPost, NewShift, Report, ReportDraft,
    ReportStatus, Shift, ShiftStatus, StoreContents, Toast, User, UserRole,
};
use crate::error::{AppError, Result};
use crate::view::{AppView, ViewRouter, ViewSlice};

/// One user session: the store, the router and the collaborators
///
/// Independent sessions may coexist; each owns its own store.
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    store: EntityStore,
    router: ViewRouter,
    directory: auth::UserDirectory,
    reporting: service::ReportingService,
    chat: service::AssistantChat,
}

impl AppState {
    /// Initialize a session from configuration
    ///
    /// The AI transport is chosen from `ai.api_key`; the store starts from
    /// the demo dataset when `seed.enabled` is set.
    ///
    /// # Errors
    /// Returns error if the AI client cannot be constructed
    pub fn new(config: config::AppConfig) -> Result<Self> {
        let assistant = Arc::new(ai::SafetyAssistant::from_config(&config.ai)?);
        Ok(Self::with_assistant(config, assistant))
    }

    /// Initialize a session around an existing assistant
    pub fn with_assistant(config: config::AppConfig, assistant: Arc<ai::SafetyAssistant>) -> Self {
        metrics::init_metrics();

        let contents = if config.seed.enabled {
            StoreContents::demo(Utc::now())
        } else {
            StoreContents::default()
        };
        let store = EntityStore::new(contents, config.notifications.toast_duration());

        tracing::info!(
            seeded = config.seed.enabled,
            reports = store.reports().len(),
            shifts = store.shifts().len(),
            "Session initialized"
        );

        Self {
            store,
            router: ViewRouter::new(),
            directory: auth::UserDirectory::default(),
            reporting: service::ReportingService::new(Arc::clone(&assistant), &config.reporting),
            chat: service::AssistantChat::new(assistant),
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn directory(&self) -> &auth::UserDirectory {
        &self.directory
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn current_user(&self) -> Option<&User> {
        self.store.current_user()
    }

    pub fn login(&mut self, user: User) {
        self.store.login(user);
    }

    /// Sign in by email; the password is not checked
    pub fn login_with_email(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.directory.authenticate(email, password)?;
        self.store.login(user.clone());
        Ok(user)
    }

    /// Sign in as the first user with `role`
    pub fn quick_login(&mut self, role: UserRole) -> Result<User> {
        let user = self
            .directory
            .quick_login(role)
            .ok_or_else(|| AppError::NotFound.recorded())?;
        self.store.login(user.clone());
        Ok(user)
    }

    /// Create an account and sign in with it
    pub fn register(&mut self, registration: auth::Registration) -> Result<User> {
        let user = self.directory.register_user(registration)?;
        self.store.login(user.clone());
        Ok(user)
    }

    /// Sign out: back to the dashboard, toast and chat cleared
    pub fn logout(&mut self) {
        self.store.logout();
        self.router.reset();
        self.chat.reset();
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn active_view(&self) -> AppView {
        self.router.active_view()
    }

    pub fn set_view(&mut self, view: AppView) {
        self.router.set_view(view);
    }

    pub fn router_mut(&mut self) -> &mut ViewRouter {
        &mut self.router
    }

    /// Slice of state for the active view
    pub fn render(&self, today: NaiveDate) -> ViewSlice {
        self.router.render(&self.store, today)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    pub fn reports(&self) -> Arc<Vec<Report>> {
        self.store.reports()
    }

    pub fn shifts(&self) -> Arc<Vec<Shift>> {
        self.store.shifts()
    }

    pub fn posts(&self) -> Arc<Vec<ForumPost>> {
        self.store.posts()
    }

    pub fn contacts(&self) -> Arc<Vec<Contact>> {
        self.store.contacts()
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// On-demand advice for a report still being written
    pub async fn preview_advisory(
        &self,
        description: &str,
        kind: data::IncidentKind,
    ) -> Option<String> {
        self.reporting.preview_advisory(description, kind).await
    }

    /// File a report and return to the dashboard
    ///
    /// The store is only touched after the submission delay and the AI
    /// advice have been awaited.
    pub async fn submit_report(&mut self, draft: ReportDraft) -> Result<Report> {
        if self.store.current_user().is_none() {
            return Err(AppError::Unauthorized.recorded());
        }
        let draft = self.reporting.prepare(draft).await?;
        let report = self.store.submit_report(draft)?;
        self.router.set_view(AppView::Dashboard);
        Ok(report)
    }

    pub fn update_report_status(&mut self, id: &str, status: ReportStatus) -> Result<Report> {
        self.store.update_report_status(id, status)
    }

    // =========================================================================
    // Forum
    // =========================================================================

    pub fn add_forum_post(&mut self, post: NewPost) -> Result<ForumPost> {
        self.store.add_forum_post(post)
    }

    pub fn delete_forum_post(&mut self, id: &str) -> Result<ForumPost> {
        self.store.delete_forum_post(id)
    }

    pub fn toggle_like_post(&mut self, id: &str) -> Result<ForumPost> {
        self.store.toggle_like_post(id)
    }

    pub fn add_comment(&mut self, post_id: &str, content: &str) -> Result<data::Comment> {
        self.store.add_comment(post_id, content)
    }

    // =========================================================================
    // Schedule
    // =========================================================================

    pub fn add_shift(&mut self, shift: NewShift) -> Result<Shift> {
        self.store.add_shift(shift)
    }

    pub fn update_shift_status(&mut self, id: &str, status: ShiftStatus) -> Result<Shift> {
        self.store.update_shift_status(id, status)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn notifications(&self) -> Arc<Vec<AppNotification>> {
        self.store.notifications()
    }

    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    pub fn mark_read(&mut self, id: &str) -> Result<()> {
        self.store.mark_notification_read(id)
    }

    pub fn mark_all_read(&mut self) {
        self.store.mark_all_notifications_read();
    }

    pub fn pending_toast(&self) -> Option<&Toast> {
        self.store.pending_toast()
    }

    pub fn dismiss_toast(&mut self) {
        self.store.dismiss_toast();
    }

    // =========================================================================
    // Assistant
    // =========================================================================

    pub fn chat_messages(&self) -> &[service::ChatMessage] {
        self.chat.messages()
    }

    pub async fn send_chat_message(&mut self, message: &str) -> Result<String> {
        self.chat.send(message).await
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `logging.level`. Calling this again after a
/// subscriber is installed does nothing.
pub fn init_tracing(logging: &config::LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("neighborwatch={}", logging.level).into());

    let result = if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
