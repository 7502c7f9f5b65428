//! # AI Traits
//!
//! Seams between the simulation, the generation service and the dispatcher.

use crate::ai::{GenerationError, GreetingReply};
use crate::game::Npc;
use async_trait::async_trait;

/// A text-generation service.
///
/// Implementations may fail freely; callers wrap every call in a timeout and a
/// fallback.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generates a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Cheap reachability probe.
    async fn is_available(&self) -> bool {
        true
    }

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Where the simulation sends conversation requests.
///
/// Requests must return immediately; replies are collected later with
/// [`GreetingSource::poll`]. At most one request is outstanding and a new one
/// replaces the old.
pub trait GreetingSource {
    /// Asks `npc` to greet the player.
    fn request_greeting(&mut self, npc: &Npc);

    /// Asks `npc` to answer something the player said.
    fn request_response(&mut self, npc: &Npc, utterance: &str);

    /// Returns the finished reply, once.
    fn poll(&mut self) -> Option<GreetingReply>;

    /// Drops the outstanding request, if any. Returns whether one existed.
    fn cancel(&mut self) -> bool;

    fn is_pending(&self) -> bool;
}
