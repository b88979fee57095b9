//! Common test utilities for E2E tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use neighborwatch::ai::{GenerationRequest, SafetyAssistant, TextGenerator};
use neighborwatch::data::UserRole;
use neighborwatch::error::{AppError, Result};
use neighborwatch::{AppState, config};

/// What the scripted generator answers with
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Fail,
}

/// Text generator that replays queued replies and records every request
///
/// Once the queue is drained it keeps answering with the fallback reply.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Reply>, fallback: Reply) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match reply {
            Reply::Text(text) => Ok(Some(text)),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(AppError::AiService("scripted failure".to_string())),
        }
    }
}

/// Test session instance
pub struct TestSession {
    pub state: AppState,
    pub generator: Arc<ScriptedGenerator>,
}

impl TestSession {
    /// Seeded session, nobody logged in, AI answers "Stay alert."
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TestSessionBuilder {
        TestSessionBuilder::default()
    }
}

pub struct TestSessionBuilder {
    seeded: bool,
    replies: Vec<Reply>,
    fallback: Reply,
    login_as: Option<UserRole>,
    toast_duration_ms: u64,
}

impl Default for TestSessionBuilder {
    fn default() -> Self {
        Self {
            seeded: true,
            replies: Vec::new(),
            fallback: Reply::Text("Stay alert.".to_string()),
            login_as: None,
            toast_duration_ms: 3000,
        }
    }
}

impl TestSessionBuilder {
    pub fn unseeded(mut self) -> Self {
        self.seeded = false;
        self
    }

    pub fn reply(mut self, reply: Reply) -> Self {
        self.replies.push(reply);
        self
    }

    /// Every AI request fails
    pub fn failing_ai(mut self) -> Self {
        self.fallback = Reply::Fail;
        self
    }

    pub fn logged_in_as(mut self, role: UserRole) -> Self {
        self.login_as = Some(role);
        self
    }

    pub fn build(self) -> TestSession {
        let config = test_config(self.seeded, self.toast_duration_ms);
        let generator = Arc::new(ScriptedGenerator::new(self.replies, self.fallback));
        let assistant = Arc::new(SafetyAssistant::new(
            generator.clone(),
            Duration::from_secs(config.ai.timeout_seconds),
        ));

        let mut state = AppState::with_assistant(config, assistant);
        if let Some(role) = self.login_as {
            state.quick_login(role).unwrap();
        }

        TestSession { state, generator }
    }
}

/// Create test configuration
pub fn test_config(seeded: bool, toast_duration_ms: u64) -> config::AppConfig {
    config::AppConfig {
        ai: config::AiConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_seconds: 5,
        },
        notifications: config::NotificationConfig { toast_duration_ms },
        reporting: config::ReportingConfig {
            submit_delay_ms: 1000,
            min_description_for_advisory: 5,
            default_location: "Jl. Merpati No. 4, RT 05".to_string(),
        },
        seed: config::SeedConfig { enabled: seeded },
        logging: config::LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
    }
}
