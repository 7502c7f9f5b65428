//! Generation backend errors.
//!
//! None of these reach the frame loop: [`crate::GreetingGenerator`] turns every
//! one of them into a fallback line.

use thiserror::Error;

/// Errors that can occur while talking to the generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP request failed or the service answered with an error status.
    #[error("generation request failed: {0}")]
    RequestFailed(String),

    /// Request did not complete in time.
    #[error("generation request timed out")]
    Timeout,

    /// Service could not be reached.
    #[error("generation service unavailable: {0}")]
    Unavailable(String),

    /// Response body was not the expected JSON.
    #[error("malformed generation response: {0}")]
    Malformed(String),

    /// Service answered but produced no text.
    #[error("generation service returned an empty response")]
    EmptyResponse,

    /// Backend could not be constructed.
    #[error("generation backend configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else if err.is_connect() {
            GenerationError::Unavailable(err.to_string())
        } else if err.is_decode() {
            GenerationError::Malformed(err.to_string())
        } else {
            GenerationError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Malformed(err.to_string())
    }
}
