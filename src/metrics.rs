//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Store Metrics
    pub static ref MUTATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("neighborwatch_mutations_total", "Total number of applied mutation operations"),
        &["operation"]
    ).expect("metric can be created");
    pub static ref NOTIFICATIONS_EMITTED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("neighborwatch_notifications_emitted_total", "Total number of notifications emitted"),
        &["severity"]
    ).expect("metric can be created");
    pub static ref UNREAD_NOTIFICATIONS: IntGauge = IntGauge::new(
        "neighborwatch_unread_notifications",
        "Current number of unread notifications"
    ).expect("metric can be created");

    // AI Metrics
    pub static ref AI_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("neighborwatch_ai_requests_total", "Total number of generative-AI requests"),
        &["purpose", "outcome"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("neighborwatch_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; only the first call registers.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(MUTATIONS_TOTAL.clone()))
            .expect("MUTATIONS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(NOTIFICATIONS_EMITTED_TOTAL.clone()))
            .expect("NOTIFICATIONS_EMITTED_TOTAL can be registered");
        REGISTRY
            .register(Box::new(UNREAD_NOTIFICATIONS.clone()))
            .expect("UNREAD_NOTIFICATIONS can be registered");
        REGISTRY
            .register(Box::new(AI_REQUESTS_TOTAL.clone()))
            .expect("AI_REQUESTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(ERRORS_TOTAL.clone()))
            .expect("ERRORS_TOTAL can be registered");

        tracing::info!("Metrics registry initialized");
    });
}

/// Render all registered metrics in Prometheus text format.
pub fn gather_metrics() -> Result<String, crate::error::AppError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder
        .encode_to_string(&metric_families)
        .map_err(|e| crate::error::AppError::Internal(e.into()))
}
