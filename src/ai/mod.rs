//! # AI Module
//!
//! Villager speech from a text-generation service.
//!
//! The [`GreetingGenerator`] builds prompts and calls a [`GenerationBackend`]
//! under a hard timeout. It never fails: timeouts, refused connections, error
//! statuses and garbled bodies all turn into one of a few in-character
//! fallback lines. The [`GreetingDispatcher`] runs those calls on a tokio
//! runtime so the frame loop only ever polls.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod prompt;
pub mod traits;

pub use client::*;
pub use dispatch::*;
pub use error::*;
pub use prompt::*;
pub use traits::*;

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS};
use crate::game::NpcRole;
use crate::{HamletError, HamletResult};

/// Lines spoken when the generation service cannot answer.
pub const FALLBACK_LINES: [&str; 4] = [
    "I'm sorry, I cannot talk right now...",
    "My thoughts are elsewhere at the moment.",
    "Perhaps we can speak later.",
    "I'm not feeling very talkative today.",
];

/// Picks a fallback line uniformly at random.
pub fn fallback_line() -> &'static str {
    let index = rand::thread_rng().gen_range(0..FALLBACK_LINES.len());
    FALLBACK_LINES[index]
}

/// A line of villager speech and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLine {
    pub text: String,
    /// True when the backend could not answer and a canned line was used
    pub fallback: bool,
}

impl SpokenLine {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: false,
        }
    }

    /// A random line from [`FALLBACK_LINES`].
    pub fn fallback() -> Self {
        Self {
            text: fallback_line().to_string(),
            fallback: true,
        }
    }
}

/// Runtime configuration of the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreeterConfig {
    /// Base URL of the service, without the `/api/generate` path
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Upper bound on a single request, in milliseconds
    pub timeout_ms: u64,
}

impl GreeterConfig {
    /// Checks that the configuration can be used.
    pub fn validate(&self) -> HamletResult<()> {
        if self.timeout_ms == 0 {
            return Err(HamletError::InvalidConfig(
                "generation timeout must be greater than zero".to_string(),
            ));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(HamletError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.model.trim().is_empty() {
            return Err(HamletError::InvalidConfig(
                "model name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Produces villager lines, falling back when the backend cannot.
pub struct GreetingGenerator {
    backend: Arc<dyn GenerationBackend>,
    timeout: Duration,
}

impl GreetingGenerator {
    /// Wraps `backend`, bounding every call by `timeout`.
    pub fn new(backend: Arc<dyn GenerationBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Builds a generator talking to the configured Ollama endpoint.
    pub fn from_config(config: &GreeterConfig) -> HamletResult<Self> {
        config.validate()?;
        let backend = OllamaBackend::new(&config.endpoint, &config.model, config.timeout())?;
        Ok(Self::new(Arc::new(backend), config.timeout()))
    }

    /// Generator that only ever speaks fallback lines.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(OfflineBackend),
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// A one-sentence greeting from `npc_name`.
    pub async fn greeting(&self, npc_name: &str, role: NpcRole) -> String {
        self.greeting_line(npc_name, role).await.text
    }

    /// `npc_name`'s answer to something the player said.
    pub async fn respond(&self, npc_name: &str, role: NpcRole, utterance: &str) -> String {
        self.respond_line(npc_name, role, utterance).await.text
    }

    /// Like [`GreetingGenerator::greeting`], also telling whether the line is a fallback.
    pub async fn greeting_line(&self, npc_name: &str, role: NpcRole) -> SpokenLine {
        self.ask(greeting_prompt(npc_name, role)).await
    }

    /// Like [`GreetingGenerator::respond`], also telling whether the line is a fallback.
    pub async fn respond_line(&self, npc_name: &str, role: NpcRole, utterance: &str) -> SpokenLine {
        self.ask(response_prompt(npc_name, role, utterance)).await
    }

    /// Whether the backend answers its probe within the timeout.
    pub async fn is_available(&self) -> bool {
        tokio::time::timeout(self.timeout, self.backend.is_available())
            .await
            .unwrap_or(false)
    }

    async fn ask(&self, prompt: String) -> SpokenLine {
        let result = match tokio::time::timeout(self.timeout, self.backend.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout),
        };

        match result {
            Ok(text) if !text.trim().is_empty() => SpokenLine::generated(text.trim()),
            Ok(_) => {
                warn!("{} returned an empty line, using fallback", self.backend.name());
                SpokenLine::fallback()
            }
            Err(GenerationError::Timeout) => {
                warn!(
                    "{} did not answer within {}ms, using fallback",
                    self.backend.name(),
                    self.timeout.as_millis()
                );
                SpokenLine::fallback()
            }
            Err(e) => {
                warn!("{} request failed: {}", self.backend.name(), e);
                SpokenLine::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Instant;

    struct ScriptedBackend {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn answering(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|_| GenerationError::Unavailable("connection refused".into()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct HangingBackend;

    #[async_trait]
    impl GenerationBackend for HangingBackend {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            std::future::pending().await
        }

        async fn is_available(&self) -> bool {
            std::future::pending().await
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    #[test]
    fn test_greeting_uses_backend_text() {
        let backend = Arc::new(ScriptedBackend::answering("  Well met, detective.\n"));
        let generator = GreetingGenerator::new(backend.clone(), Duration::from_secs(1));

        let text = tokio_test::block_on(generator.greeting("Blacksmith", NpcRole::Blacksmith));
        assert_eq!(text, "Well met, detective.");

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("You are Blacksmith, a blacksmith"));
    }

    #[test]
    fn test_respond_sends_utterance() {
        let backend = Arc::new(ScriptedBackend::answering("I was at the inn."));
        let generator = GreetingGenerator::new(backend.clone(), Duration::from_secs(1));

        let text = tokio_test::block_on(generator.respond(
            "Innkeeper",
            NpcRole::Innkeeper,
            "Where were you?",
        ));
        assert_eq!(text, "I was at the inn.");
        assert!(backend.prompts.lock().unwrap()[0].ends_with("Detective asks: Where were you?"));
    }

    #[test]
    fn test_lines_report_their_origin() {
        let generated = GreetingGenerator::new(
            Arc::new(ScriptedBackend::answering("Mind the sparks.")),
            Duration::from_secs(1),
        );
        let line = tokio_test::block_on(generated.greeting_line("Blacksmith", NpcRole::Blacksmith));
        assert_eq!(line, SpokenLine::generated("Mind the sparks."));

        let failing =
            GreetingGenerator::new(Arc::new(ScriptedBackend::failing()), Duration::from_secs(1));
        let line = tokio_test::block_on(failing.respond_line("Merchant", NpcRole::Merchant, "Why?"));
        assert!(line.fallback);
        assert!(FALLBACK_LINES.contains(&line.text.as_str()));
    }

    #[test]
    fn test_failure_falls_back() {
        let generator =
            GreetingGenerator::new(Arc::new(ScriptedBackend::failing()), Duration::from_secs(1));
        let text = tokio_test::block_on(generator.greeting("Merchant", NpcRole::Merchant));
        assert!(!text.is_empty());
        assert!(FALLBACK_LINES.contains(&text.as_str()));
    }

    #[test]
    fn test_empty_text_falls_back() {
        let generator =
            GreetingGenerator::new(Arc::new(ScriptedBackend::answering("   ")), Duration::from_secs(1));
        let text = tokio_test::block_on(generator.greeting("Merchant", NpcRole::Merchant));
        assert!(FALLBACK_LINES.contains(&text.as_str()));
    }

    #[test]
    fn test_timeout_falls_back_within_bound() {
        let timeout = Duration::from_millis(100);
        let generator = GreetingGenerator::new(Arc::new(HangingBackend), timeout);

        let start = Instant::now();
        let text = tokio_test::block_on(generator.greeting("Innkeeper", NpcRole::Innkeeper));
        let elapsed = start.elapsed();

        assert!(FALLBACK_LINES.contains(&text.as_str()));
        assert!(elapsed >= timeout);
        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
    }

    #[test]
    fn test_hanging_availability_check_reports_unavailable() {
        let generator = GreetingGenerator::new(Arc::new(HangingBackend), Duration::from_millis(50));
        assert!(!tokio_test::block_on(generator.is_available()));
    }

    #[test]
    fn test_offline_generator() {
        let generator = GreetingGenerator::offline();
        assert_eq!(generator.backend_name(), "offline");
        let text = tokio_test::block_on(generator.greeting("Blacksmith", NpcRole::Blacksmith));
        assert!(FALLBACK_LINES.contains(&text.as_str()));
    }

    #[test]
    fn test_fallback_line_is_from_set() {
        for _ in 0..100 {
            assert!(FALLBACK_LINES.contains(&fallback_line()));
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(GreeterConfig::default().validate().is_ok());

        let zero_timeout = GreeterConfig {
            timeout_ms: 0,
            ..GreeterConfig::default()
        };
        assert!(matches!(
            zero_timeout.validate(),
            Err(HamletError::InvalidConfig(_))
        ));

        let bad_endpoint = GreeterConfig {
            endpoint: "localhost:11434".to_string(),
            ..GreeterConfig::default()
        };
        assert!(bad_endpoint.validate().is_err());

        let no_model = GreeterConfig {
            model: " ".to_string(),
            ..GreeterConfig::default()
        };
        assert!(no_model.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() -> HamletResult<()> {
        let config = GreeterConfig::default();
        let json = serde_json::to_string(&config)?;
        let back: GreeterConfig = serde_json::from_str(&json)?;
        assert_eq!(back, config);
        assert_eq!(back.timeout(), Duration::from_secs(3));
        Ok(())
    }
}
