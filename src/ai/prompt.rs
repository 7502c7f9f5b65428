//! Prompt templates for villager speech.

use crate::game::NpcRole;

/// Prompt asking a villager to greet the detective in one sentence.
///
/// # Examples
///
/// ```
/// use hamlet::{greeting_prompt, NpcRole};
///
/// let prompt = greeting_prompt("Blacksmith", NpcRole::Blacksmith);
/// assert!(prompt.starts_with("You are Blacksmith, a blacksmith"));
/// ```
pub fn greeting_prompt(npc_name: &str, role: NpcRole) -> String {
    format!(
        "You are {}, a {} in a medieval village. \
         Greet a detective who just approached you. \
         Be brief and in character (1 sentence).",
        npc_name, role
    )
}

/// Prompt asking a villager to answer the detective in one or two sentences.
pub fn response_prompt(npc_name: &str, role: NpcRole, utterance: &str) -> String {
    format!(
        "You are {}, a {} in a medieval village. \
         A detective is investigating something in the village. \
         Respond to them in character. Keep it brief (1-2 sentences). \
         Detective asks: {}",
        npc_name, role, utterance
    )
}
