//! Neighborwatch demo session
//!
//! Walks one scripted session against the in-memory store and prints the
//! resulting metrics. Useful for checking configuration and the AI key.

use neighborwatch::data::{IncidentKind, ReportDraft, UserRole};
use neighborwatch::{AppState, config, init_tracing};

/// Application entry point
///
/// # Setup
/// 1. Load configuration from file and environment
/// 2. Initialize tracing/logging
/// 3. Initialize AppState
/// 4. Run the scripted session
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration
    let config = config::AppConfig::load()?;

    // 2. Initialize tracing/logging
    init_tracing(&config.logging);
    tracing::info!(
        model = %config.ai.model,
        ai_enabled = config.ai.api_key.is_some(),
        "Configuration loaded"
    );

    // 3. Initialize application state
    let mut state = AppState::new(config)?;

    // 4. Scripted session
    let resident = state.quick_login(UserRole::Resident)?;
    tracing::info!(user = %resident.name, "Signed in");

    let draft = ReportDraft::new(
        IncidentKind::Suspicious,
        "Two unknown motorbikes circling the block without plates",
        &state.config.reporting.default_location,
    );
    let report = state.submit_report(draft).await?;
    tracing::info!(
        report_id = %report.id,
        advice = report.ai_analysis.as_deref().unwrap_or("-"),
        "Report filed"
    );

    let reply = state
        .send_chat_message("What should I do if I hear glass breaking at night?")
        .await?;
    tracing::info!(%reply, "Assistant answered");

    state.logout();
    state.quick_login(UserRole::Admin)?;
    state.update_report_status(&report.id, neighborwatch::data::ReportStatus::Processed)?;
    tracing::info!(unread = state.unread_count(), "Admin reviewed report");

    println!("{}", neighborwatch::metrics::gather_metrics()?);
    Ok(())
}
