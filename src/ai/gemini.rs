//! Gemini REST transport
//!
//! Calls `POST {base_url}/models/{model}:generateContent`.

use async_trait::async_trait;
use serde::Deserialize;

use super::{GenerationRequest, TextGenerator};
use crate::config::AiConfig;
use crate::error::{AppError, Result};

/// HTTP client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    endpoint: url::Url,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client for the configured model
    ///
    /// # Errors
    /// `Config` if the endpoint URL cannot be built; `HttpClient` if the
    /// HTTP client cannot be constructed.
    pub fn new(config: &AiConfig, api_key: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("neighborwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint_url(&config.base_url, &config.model)?,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::AiService(format!(
                "Gemini rejected request: HTTP {} {}",
                status,
                detail.chars().take(200).collect::<String>()
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        tracing::debug!(candidates = body.candidates.len(), "Gemini reply received");
        Ok(reply_text(body))
    }
}

fn endpoint_url(base_url: &str, model: &str) -> Result<url::Url> {
    let raw = format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        urlencoding::encode(model)
    );
    url::Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid AI endpoint {}: {}", raw, e)))
}

/// Request JSON: history turns alternate user/model ending with the prompt
fn request_body(request: &GenerationRequest) -> serde_json::Value {
    let turns = request.history.len();
    let mut contents: Vec<serde_json::Value> = request
        .history
        .iter()
        .enumerate()
        .map(|(i, text)| {
            // The latest history entry is a model reply when the prompt follows it.
            let role = if (turns - i) % 2 == 0 { "user" } else { "model" };
            serde_json::json!({ "role": role, "parts": [{ "text": text }] })
        })
        .collect();
    contents.push(serde_json::json!({
        "role": "user",
        "parts": [{ "text": request.prompt }]
    }));

    let mut body = serde_json::json!({ "contents": contents });
    if let Some(instruction) = &request.system_instruction {
        body["systemInstruction"] = serde_json::json!({ "parts": [{ "text": instruction }] });
    }
    body
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate, `None` when blank
fn reply_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        let url = endpoint_url(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.5-flash",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn body_without_instruction_has_single_turn() {
        let body = request_body(&GenerationRequest {
            prompt: "Check this".to_string(),
            ..Default::default()
        });
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Check this");
    }

    #[test]
    fn body_alternates_roles_and_carries_instruction() {
        let body = request_body(&GenerationRequest {
            system_instruction: Some("Be brief".to_string()),
            history: vec!["Greeting".to_string(), "Question".to_string(), "Answer".to_string()],
            prompt: "Follow-up".to_string(),
        });

        let roles: Vec<&str> = body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, ["model", "user", "model", "user"]);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief");
    }

    #[test]
    fn reply_text_reads_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Call 110 " }, { "text": "now." }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(reply_text(response).as_deref(), Some("Call 110 now."));
    }

    #[test]
    fn reply_text_is_none_without_text() {
        for json in [
            serde_json::json!({}),
            serde_json::json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
            serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] }),
        ] {
            let response: GenerateContentResponse = serde_json::from_value(json).unwrap();
            assert!(reply_text(response).is_none());
        }
    }

    #[test]
    fn client_builds_from_config() {
        let config = AiConfig {
            api_key: Some("key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_seconds: 30,
        };
        let client = GeminiClient::new(&config, "key").unwrap();
        assert!(client.endpoint.as_str().ends_with(":generateContent"));
    }
}
