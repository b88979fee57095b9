//! Safety assistant chat
//!
//! Keeps the transcript of one chat session with the AI assistant.

use std::sync::Arc;

use serde::Serialize;

use crate::ai::SafetyAssistant;
use crate::error::{AppError, Result};

/// Opening line of every chat
pub const GREETING: &str =
    "Hello! I am the Siskamling AI security assistant. How can I help with neighborhood safety?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// One chat session
pub struct AssistantChat {
    assistant: Arc<SafetyAssistant>,
    messages: Vec<ChatMessage>,
}

impl AssistantChat {
    pub fn new(assistant: Arc<SafetyAssistant>) -> Self {
        Self {
            assistant,
            messages: vec![greeting()],
        }
    }

    /// Transcript, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Ask the assistant something
    ///
    /// The question is recorded before the reply is awaited. Failures come
    /// back as the assistant's fallback reply, not as an error.
    ///
    /// # Errors
    /// `Validation` if the message is blank; the transcript is unchanged.
    pub async fn send(&mut self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("message is required".to_string()).recorded());
        }

        let history: Vec<String> = self.messages.iter().map(|m| m.text.clone()).collect();
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: message.to_string(),
        });

        let reply = self
            .assistant
            .safety_chat_response(message, &history)
            .await;
        self.messages.push(ChatMessage {
            role: ChatRole::Model,
            text: reply.clone(),
        });
        tracing::debug!(turns = self.messages.len(), "Assistant replied");

        Ok(reply)
    }

    /// Drop the conversation and start over from the greeting
    pub fn reset(&mut self) {
        self.messages = vec![greeting()];
    }
}

fn greeting() -> ChatMessage {
    ChatMessage {
        role: ChatRole::Model,
        text: GREETING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ai::{CHAT_FALLBACK, MockTextGenerator};

    fn chat(mock: MockTextGenerator) -> AssistantChat {
        AssistantChat::new(Arc::new(SafetyAssistant::new(
            Arc::new(mock),
            Duration::from_secs(5),
        )))
    }

    #[test]
    fn starts_with_greeting() {
        let chat = chat(MockTextGenerator::new());
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, ChatRole::Model);
        assert_eq!(chat.messages()[0].text, GREETING);
    }

    #[tokio::test]
    async fn send_passes_prior_turns_and_records_both_sides() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .withf(|req| req.history == vec![GREETING.to_string()] && req.prompt == "Any tips?")
            .times(1)
            .returning(|_| Ok(Some("Lock doors at night.".to_string())));
        let mut chat = chat(mock);

        let reply = chat.send("  Any tips? ").await.unwrap();

        assert_eq!(reply, "Lock doors at night.");
        let roles: Vec<ChatRole> = chat.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, [ChatRole::Model, ChatRole::User, ChatRole::Model]);
        assert_eq!(chat.messages()[1].text, "Any tips?");
    }

    #[tokio::test]
    async fn failure_is_recorded_as_fallback_reply() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .returning(|_| Err(AppError::AiService("down".to_string())));
        let mut chat = chat(mock);

        assert_eq!(chat.send("Hello").await.unwrap(), CHAT_FALLBACK);
        assert_eq!(chat.messages().last().unwrap().text, CHAT_FALLBACK);
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().times(0);
        let mut chat = chat(mock);

        assert!(matches!(chat.send("   ").await, Err(AppError::Validation(_))));
        assert_eq!(chat.messages().len(), 1);
    }
}
