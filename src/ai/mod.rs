//! Generative-AI collaborator
//!
//! `TextGenerator` is the transport seam: one request in, optional text out.
//! `SafetyAssistant` sits on top of it and never fails. Every transport
//! error, timeout or empty reply becomes one of the fixed fallback strings.

mod gemini;

pub use gemini::GeminiClient;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::AiConfig;
use crate::data::IncidentKind;
use crate::error::{AppError, Result};

/// Advice used when the analysis request fails
pub const ANALYSIS_FALLBACK: &str =
    "Unable to generate AI advice at this moment. Proceed with caution.";
/// Advice used when the model answers with no text
pub const ANALYSIS_EMPTY: &str = "Report received. Please stay safe.";
/// Chat reply used when the request fails
pub const CHAT_FALLBACK: &str =
    "I'm having trouble connecting to the safety database. Please try again later.";
/// Chat reply used when the model answers with no text
pub const CHAT_EMPTY: &str = "I couldn't understand that. How can I help with your safety?";

/// Persona given to the model for chat replies
pub const SYSTEM_INSTRUCTION: &str = "You are 'Siskamling AI', a helpful neighborhood security \
assistant. You answer questions about home safety, emergency preparedness, and community \
guidelines. Keep answers concise and practical.";

/// One request to a text model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_instruction: Option<String>,
    /// Earlier messages of the conversation, oldest first
    pub history: Vec<String>,
    pub prompt: String,
}

/// Text-completion transport
///
/// `Ok(None)` means the model answered without any text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>>;
}

/// Generator used when no API key is configured; every request fails
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<Option<String>> {
        Err(AppError::AiService("no API key configured".to_string()))
    }
}

/// Safety advice and chat on top of a `TextGenerator`
#[derive(Clone)]
pub struct SafetyAssistant {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl SafetyAssistant {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Pick the transport from configuration
    ///
    /// Without an API key the assistant runs offline and always answers
    /// with fallbacks.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let generator: Arc<dyn TextGenerator> = match &config.api_key {
            Some(key) if !key.trim().is_empty() => Arc::new(GeminiClient::new(config, key)?),
            _ => {
                tracing::warn!("No AI API key configured, safety assistant runs offline");
                Arc::new(OfflineGenerator)
            }
        };
        Ok(Self::new(generator, config.timeout()))
    }

    /// Short safety note for a freshly filed report
    pub async fn analyze_security_report(&self, description: &str, kind: IncidentKind) -> String {
        let request = GenerationRequest {
            system_instruction: None,
            history: Vec::new(),
            prompt: analysis_prompt(description, kind),
        };
        self.complete("analysis", request, ANALYSIS_EMPTY, ANALYSIS_FALLBACK)
            .await
    }

    /// Conversational reply, with earlier messages as context
    pub async fn safety_chat_response(&self, message: &str, history: &[String]) -> String {
        let request = GenerationRequest {
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            history: history.to_vec(),
            prompt: message.to_string(),
        };
        self.complete("chat", request, CHAT_EMPTY, CHAT_FALLBACK)
            .await
    }

    async fn complete(
        &self,
        purpose: &str,
        request: GenerationRequest,
        empty: &str,
        fallback: &str,
    ) -> String {
        use crate::metrics::AI_REQUESTS_TOTAL;

        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(request)).await;
        let (label, text) = match outcome {
            Ok(Ok(Some(text))) if !text.trim().is_empty() => ("ok", text.trim().to_string()),
            Ok(Ok(_)) => ("empty", empty.to_string()),
            Ok(Err(e)) => {
                let e = e.recorded();
                tracing::error!(purpose, error = %e, "AI request failed");
                ("error", fallback.to_string())
            }
            Err(_) => {
                let e = AppError::AiService(format!("timed out after {:?}", self.timeout)).recorded();
                tracing::error!(purpose, error = %e, "AI request failed");
                ("timeout", fallback.to_string())
            }
        };

        AI_REQUESTS_TOTAL.with_label_values(&[purpose, label]).inc();
        text
    }
}

fn analysis_prompt(description: &str, kind: IncidentKind) -> String {
    format!(
        "You are a neighborhood security AI assistant.\n\
         A user is reporting a security incident.\n\
         Type: {}\n\
         Description: {}\n\n\
         Provide a very brief (max 2 sentences) safety advice for the reporter.\n\
         If it sounds like an emergency, emphasize calling the police immediately.\n\
         Tone: Calm, authoritative, and helpful.",
        kind, description
    )
}
