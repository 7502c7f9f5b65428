//! # Dialogue Module
//!
//! The single conversation box shown to the player.

use log::info;
use serde::{Deserialize, Serialize};

/// Longest text shown by [`DialogueSession::summary`] before truncation.
const SUMMARY_CHARS: usize = 30;

/// At most one active speaker/text pair.
///
/// Opening always replaces whatever was shown before. Closing clears both
/// fields, so an inactive session never exposes stale text.
///
/// # Examples
///
/// ```
/// use hamlet::DialogueSession;
///
/// let mut dialogue = DialogueSession::new();
/// dialogue.open("Merchant", "Fine wares today!");
/// assert!(dialogue.is_active());
///
/// dialogue.close();
/// assert!(!dialogue.is_active());
/// assert_eq!(dialogue.text(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueSession {
    active: bool,
    speaker: String,
    text: String,
}

impl DialogueSession {
    /// Creates a closed session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `text` spoken by `speaker`, replacing any open conversation.
    pub fn open(&mut self, speaker: impl Into<String>, text: impl Into<String>) {
        self.active = true;
        self.speaker = speaker.into();
        self.text = text.into();
        info!("[{}]: {}", self.speaker, self.text);
    }

    /// Hides the box and forgets its contents.
    pub fn close(&mut self) {
        if self.active {
            info!("Dialogue with {} closed", self.speaker);
        }
        self.active = false;
        self.speaker.clear();
        self.text.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Name of the current speaker, empty when closed.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Current line, empty when closed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// One-line description for status displays.
    pub fn summary(&self) -> String {
        if !self.active {
            return "No dialogue".to_string();
        }

        if self.text.chars().count() > SUMMARY_CHARS {
            let head: String = self.text.chars().take(SUMMARY_CHARS).collect();
            format!("{}: {}...", self.speaker, head)
        } else {
            format!("{}: {}", self.speaker, self.text)
        }
    }
}
