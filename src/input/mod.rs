//! # Input Module
//!
//! Keyboard polling for the macroquad host, translated into [`PlayerIntent`]s.

use crate::game::PlayerIntent;
use macroquad::prelude::*;

/// Questions the detective cycles through when asking a villager something.
pub const DETECTIVE_QUESTIONS: [&str; 3] = [
    "Have you noticed anything strange in the village lately?",
    "Where were you last night?",
    "Who do you trust around here?",
];

/// Input handler for processing player commands.
///
/// Movement is continuous while a key is held; every other command fires
/// once per key press.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
    next_question: usize,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    pub fn new() -> Self {
        Self::with_vi_keys(false)
    }

    /// Creates an input handler that also accepts hjkl for movement.
    pub fn with_vi_keys(enabled: bool) -> Self {
        Self {
            vi_keys_enabled: enabled,
            next_question: 0,
        }
    }

    /// Keys that steer the player, as `[left, right, up, down]`.
    pub fn movement_keys(&self) -> [Vec<KeyCode>; 4] {
        let mut keys = [
            vec![KeyCode::A, KeyCode::Left],
            vec![KeyCode::D, KeyCode::Right],
            vec![KeyCode::W, KeyCode::Up],
            vec![KeyCode::S, KeyCode::Down],
        ];
        if self.vi_keys_enabled {
            for (set, key) in keys
                .iter_mut()
                .zip([KeyCode::H, KeyCode::L, KeyCode::K, KeyCode::J])
            {
                set.push(key);
            }
        }
        keys
    }

    /// Collects this frame's intents.
    ///
    /// Escape closes an open dialogue; with no dialogue open it quits.
    pub fn poll(&mut self, dialogue_active: bool) -> Vec<PlayerIntent> {
        let mut intents = Vec::new();

        if is_key_pressed(KeyCode::Escape) {
            intents.push(if dialogue_active {
                PlayerIntent::CloseDialogue
            } else {
                PlayerIntent::Quit
            });
        }

        if is_key_pressed(KeyCode::E) {
            intents.push(PlayerIntent::Interact);
        }

        if is_key_pressed(KeyCode::T) && dialogue_active {
            intents.push(PlayerIntent::Ask(self.next_question().to_string()));
        }

        let [left, right, up, down] = self
            .movement_keys()
            .map(|keys| keys.iter().any(|&key| is_key_down(key)));
        let (dx, dy) = movement_axis(left, right, up, down);
        if dx != 0.0 || dy != 0.0 {
            intents.push(PlayerIntent::Move { dx, dy });
        }

        intents
    }

    /// Returns the next question in rotation.
    pub fn next_question(&mut self) -> &'static str {
        let question = DETECTIVE_QUESTIONS[self.next_question % DETECTIVE_QUESTIONS.len()];
        self.next_question += 1;
        question
    }
}

/// Folds held direction keys into a world-space axis. Up is +y.
///
/// Opposite keys cancel out.
pub fn movement_axis(left: bool, right: bool, up: bool, down: bool) -> (f32, f32) {
    let axis = |neg: bool, pos: bool| match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    (axis(left, right), axis(down, up))
}
