//! Ollama-compatible generation client.
//!
//! Speaks the non-streaming `/api/generate` protocol:
//!
//! ```text
//! POST {base_url}/api/generate
//! {"model": "...", "prompt": "...", "stream": false}
//!
//! 200 OK
//! {"response": "...", "done": true, ...}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::{GenerationBackend, GenerationError};

/// Request body for `/api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Response body of a non-streaming `/api/generate` call.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Backend talking to a local Ollama instance over HTTP.
pub struct OllamaBackend {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Creates a client for `base_url` using `model`.
    ///
    /// `timeout` bounds every HTTP call made by this client.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        // The service runs on the player's machine; never route it through a proxy.
        let http = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| GenerationError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("POST {} (model {})", url, self.model);
        let resp = self.http.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            warn!("Generation service returned HTTP {}: {}", status, detail);
            return Err(GenerationError::RequestFailed(format!("HTTP {}", status)));
        }

        let raw = resp.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&raw)?;
        if !parsed.done {
            debug!("Generation service reported an unfinished response");
        }

        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Generation service probe failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Backend with no service behind it. Every call fails, so every line is a
/// fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

#[async_trait]
impl GenerationBackend for OfflineBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(
            "no generation service configured".into(),
        ))
    }

    async fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "offline"
    }
}
