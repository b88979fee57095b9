//! Error types for Neighborwatch
//!
//! Every fallible operation in the crate returns `AppError`.
//! Errors never terminate a session: callers surface them as an
//! inline message or ignore them, and the store is left untouched.

use thiserror::Error;

use crate::data::ReportStatus;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// while a session performs operations against the entity store
/// or its collaborators.
#[derive(Debug, Error)]
pub enum AppError {
    /// Entity with the given identifier does not exist
    #[error("Resource not found")]
    NotFound,

    /// Operation requires a logged-in user
    #[error("Authentication required")]
    Unauthorized,

    /// Operation is reserved for administrators
    #[error("Access denied")]
    Forbidden,

    /// Input rejected before any state change
    #[error("Validation error: {0}")]
    Validation(String),

    /// Report status may only move forward
    #[error("Invalid report status transition: {from} -> {to}")]
    InvalidTransition { from: ReportStatus, to: ReportStatus },

    /// Registration with an email that is already known
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generative-AI service answered with an error
    #[error("AI service error: {0}")]
    AiService(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable label, used as a metric label
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::Validation(_) => "validation",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::DuplicateEmail(_) => "duplicate_email",
            AppError::Config(_) => "config",
            AppError::AiService(_) => "ai_service",
            AppError::HttpClient(_) => "http_client",
            AppError::Internal(_) => "internal",
        }
    }

    /// Record this error in the error counter and hand it back
    pub(crate) fn recorded(self) -> Self {
        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[self.kind()]).inc();
        self
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
