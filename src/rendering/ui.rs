//! # User Interface Elements
//!
//! The dialogue box drawn over the map.

use crate::dialogue::DialogueSession;
use macroquad::prelude::*;

/// Screen-space rectangle of the dialogue box plus its text layout.
#[derive(Debug, Clone, Copy)]
pub struct DialogueBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
}

impl Default for DialogueBox {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 0.0,
            width: 600.0,
            height: 150.0,
            font_size: 20.0,
        }
    }
}

impl DialogueBox {
    /// Box anchored 50 pixels above the bottom of a screen `screen_height` tall.
    pub fn anchored_bottom(screen_height: f32) -> Self {
        let mut dialogue_box = Self::default();
        dialogue_box.y = screen_height - dialogue_box.height - 50.0;
        dialogue_box
    }

    /// Characters that fit on one line at the current font size.
    pub fn chars_per_line(&self) -> usize {
        ((self.width - 30.0) / (self.font_size * 0.5)).max(1.0) as usize
    }

    /// Draws the open dialogue, or a "thinking" note while a reply is pending.
    pub fn render(&self, dialogue: &DialogueSession, pending_speaker: Option<&str>) {
        if dialogue.is_active() {
            self.draw_frame();
            draw_text(
                dialogue.speaker(),
                self.x + 15.0,
                self.y + 28.0,
                self.font_size + 4.0,
                GOLD,
            );
            for (i, line) in wrap_text(dialogue.text(), self.chars_per_line())
                .iter()
                .take(4)
                .enumerate()
            {
                draw_text(
                    line,
                    self.x + 15.0,
                    self.y + 58.0 + i as f32 * (self.font_size + 4.0),
                    self.font_size,
                    WHITE,
                );
            }
            draw_text(
                "E / ESC: close   T: ask a question",
                self.x + 15.0,
                self.y + self.height - 10.0,
                14.0,
                GRAY,
            );
        } else if let Some(speaker) = pending_speaker {
            draw_text(
                &format!("{} is thinking...", speaker),
                self.x + 15.0,
                self.y + self.height - 10.0,
                self.font_size,
                LIGHTGRAY,
            );
        }
    }

    fn draw_frame(&self) {
        draw_rectangle(
            self.x,
            self.y,
            self.width,
            self.height,
            Color::new(0.0, 0.0, 0.0, 0.8),
        );
        draw_rectangle_lines(self.x, self.y, self.width, self.height, 2.0, WHITE);
    }
}

/// Greedy word wrap at `max_chars` characters per line.
///
/// Words longer than a line are put on a line of their own rather than split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("Well met.", 20), ["Well met."]);
        assert!(wrap_text("   ", 20).is_empty());
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        let lines = wrap_text("I heard strange noises last night", 12);
        assert_eq!(lines, ["I heard", "strange", "noises last", "night"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
    }

    #[test]
    fn test_wrap_keeps_long_words_whole() {
        assert_eq!(wrap_text("a Blacksmithery b", 5), ["a", "Blacksmithery", "b"]);
    }

    #[test]
    fn test_box_layout() {
        let dialogue_box = DialogueBox::anchored_bottom(768.0);
        assert_eq!(dialogue_box.y, 568.0);
        assert_eq!(dialogue_box.chars_per_line(), 57);
    }
}
