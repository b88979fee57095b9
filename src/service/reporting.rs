//! Reporting service
//!
//! First half of report submission: everything that awaits. The caller
//! applies the prepared draft with `EntityStore::submit_report`, so the
//! store is never held across the network call.

use std::sync::Arc;
use std::time::Duration;

use crate::ai::SafetyAssistant;
use crate::config::ReportingConfig;
use crate::data::{IncidentKind, ReportDraft};
use crate::error::Result;

/// Prepares report drafts for submission
#[derive(Clone)]
pub struct ReportingService {
    assistant: Arc<SafetyAssistant>,
    submit_delay: Duration,
    min_description_for_advisory: usize,
    default_location: String,
}

impl ReportingService {
    pub fn new(assistant: Arc<SafetyAssistant>, config: &ReportingConfig) -> Self {
        Self {
            assistant,
            submit_delay: config.submit_delay(),
            min_description_for_advisory: config.min_description_for_advisory,
            default_location: config.default_location.clone(),
        }
    }

    /// Empty draft with the configured location pre-filled
    pub fn blank_draft(&self, kind: IncidentKind) -> ReportDraft {
        ReportDraft::new(kind, "", &self.default_location)
    }

    /// Validate, wait out the submission delay and attach advice
    ///
    /// Advice is requested only when the draft has none yet and the
    /// description is long enough to be worth analysing. A failed request
    /// attaches the fallback text.
    ///
    /// # Errors
    /// `Validation` if description or location is blank; nothing is awaited.
    pub async fn prepare(&self, mut draft: ReportDraft) -> Result<ReportDraft> {
        draft.validate()?;

        tokio::time::sleep(self.submit_delay).await;

        if draft.ai_analysis.is_none()
            && draft.description.trim().chars().count() > self.min_description_for_advisory
        {
            let advice = self
                .assistant
                .analyze_security_report(draft.description.trim(), draft.kind)
                .await;
            draft.ai_analysis = Some(advice);
        }

        tracing::debug!(
            kind = %draft.kind,
            has_advice = draft.ai_analysis.is_some(),
            "Report draft prepared"
        );
        Ok(draft)
    }

    /// On-demand "AI check" while the form is still open
    ///
    /// Returns `None` for a blank description.
    pub async fn preview_advisory(&self, description: &str, kind: IncidentKind) -> Option<String> {
        let description = description.trim();
        if description.is_empty() {
            return None;
        }
        Some(self.assistant.analyze_security_report(description, kind).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ANALYSIS_FALLBACK, MockTextGenerator, SafetyAssistant};
    use crate::error::AppError;

    fn service(mock: MockTextGenerator) -> ReportingService {
        let assistant = SafetyAssistant::new(Arc::new(mock), Duration::from_secs(5));
        ReportingService::new(Arc::new(assistant), &ReportingConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn prepare_attaches_advice_after_delay() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok(Some("Call 110.".to_string())));
        let service = service(mock);

        let start = tokio::time::Instant::now();
        let draft = service
            .prepare(ReportDraft::new(
                IncidentKind::Suspicious,
                "Man climbing the fence",
                "Gg. Kutilang",
            ))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(draft.ai_analysis.as_deref(), Some("Call 110."));
    }

    #[tokio::test(start_paused = true)]
    async fn prepare_keeps_existing_advice_and_skips_short_text() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().times(0);
        let service = service(mock);

        let mut checked = ReportDraft::new(IncidentKind::Theft, "Bicycle gone", "Jl. Merpati");
        checked.ai_analysis = Some("Already advised".to_string());
        let checked = service.prepare(checked).await.unwrap();
        assert_eq!(checked.ai_analysis.as_deref(), Some("Already advised"));

        let short = service
            .prepare(ReportDraft::new(IncidentKind::Other, "Noise", "Jl. Merpati"))
            .await
            .unwrap();
        assert!(short.ai_analysis.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn prepare_stores_fallback_when_ai_fails() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .returning(|_| Err(AppError::AiService("down".to_string())));

        let draft = service(mock)
            .prepare(ReportDraft::new(
                IncidentKind::Theft,
                "Helmet stolen from parked motorbike",
                "Jl. Merpati",
            ))
            .await
            .unwrap();

        assert_eq!(draft.ai_analysis.as_deref(), Some(ANALYSIS_FALLBACK));
    }

    #[tokio::test]
    async fn prepare_rejects_blank_location() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().times(0);

        let err = service(mock)
            .prepare(ReportDraft::new(IncidentKind::Theft, "Helmet stolen", "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn blank_draft_prefills_location() {
        let draft = service(MockTextGenerator::new()).blank_draft(IncidentKind::Guest);
        assert_eq!(draft.location, ReportingConfig::default().default_location);
        assert!(draft.description.is_empty());
        assert!(draft.validate().is_err());
    }

    #[tokio::test]
    async fn preview_skips_blank_description() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok(Some("Stay inside.".to_string())));
        let service = service(mock);

        assert!(service.preview_advisory("  ", IncidentKind::Other).await.is_none());
        assert_eq!(
            service
                .preview_advisory("Strangers near the school", IncidentKind::Suspicious)
                .await
                .as_deref(),
            Some("Stay inside.")
        );
    }
}
