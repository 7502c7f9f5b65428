//! # Display Management
//!
//! Screen management and 2D rendering of the village using macroquad.

use crate::game::{Entity, GameState, NpcColor, Position, TileType};
use crate::rendering::DialogueBox;
use macroquad::prelude::*;

const PLAYER_RADIUS: f32 = 12.0;
const NPC_RADIUS: f32 = 10.0;
/// Screen height kept free under the map for the message log.
const MESSAGE_AREA_HEIGHT: f32 = 90.0;
const MIN_SCALE: f32 = 0.25;

/// Macroquad display manager for the game.
///
/// Draws the map with its origin at the bottom-left of the map area, since
/// world space grows north while screen space grows down.
pub struct MacroquadDisplay {
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
    /// Screen pixels per world unit
    pub scale: f32,
    /// UI panel width in pixels
    pub ui_panel_width: f32,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// The conversation box
    pub dialogue_box: DialogueBox,
}

impl MacroquadDisplay {
    /// Creates a display sized to the current window.
    pub fn new() -> Self {
        let screen_width = screen_width();
        let screen_height = screen_height();

        Self {
            screen_width,
            screen_height,
            scale: 1.0,
            ui_panel_width: 300.0,
            messages: Vec::new(),
            max_messages: 100,
            dialogue_box: DialogueBox::anchored_bottom(screen_height),
        }
    }

    /// Renders the complete game screen.
    ///
    /// `pending_speaker` names the villager whose reply is still outstanding.
    pub fn render_game(&mut self, game_state: &GameState, pending_speaker: Option<&str>) {
        self.screen_width = screen_width();
        self.screen_height = screen_height();
        self.scale = fit_scale(
            self.screen_width,
            self.screen_height,
            self.ui_panel_width,
            game_state.grid.pixel_width(),
            game_state.grid.pixel_height(),
        );
        self.dialogue_box = DialogueBox::anchored_bottom(self.screen_height);

        clear_background(Color::new(0.1, 0.1, 0.15, 1.0));

        self.render_map(game_state);
        self.render_npcs(game_state);
        self.render_player(game_state);
        self.render_ui(game_state, pending_speaker);
        self.render_messages(game_state);
        self.dialogue_box.render(&game_state.dialogue, pending_speaker);
    }

    /// Converts a world position to screen pixels.
    pub fn world_to_screen(&self, game_state: &GameState, pos: Position) -> Vec2 {
        vec2(
            pos.x * self.scale,
            (game_state.grid.pixel_height() - pos.y) * self.scale,
        )
    }

    fn render_map(&self, game_state: &GameState) {
        let grid = &game_state.grid;
        let size = grid.tile_size() * self.scale;

        for (x, y, tile) in grid.tiles() {
            let (wx, wy) = grid.tile_to_world(x, y);
            // Top-left corner on screen is the tile's north-west corner.
            let top_left = self.world_to_screen(game_state, Position::new(wx, wy + grid.tile_size()));
            draw_rectangle(top_left.x, top_left.y, size, size, tile_color(tile));
        }
    }

    fn render_npcs(&self, game_state: &GameState) {
        for npc in &game_state.npcs {
            let at = self.world_to_screen(game_state, npc.position());
            draw_circle(at.x, at.y, NPC_RADIUS * self.scale, npc_color(npc.color));
            draw_circle(at.x, at.y, 2.0 * self.scale, WHITE);
        }
    }

    fn render_player(&self, game_state: &GameState) {
        let at = self.world_to_screen(game_state, game_state.player.position());
        draw_circle(at.x, at.y, PLAYER_RADIUS * self.scale, RED);
    }

    /// Renders the side panel.
    fn render_ui(&self, game_state: &GameState, pending_speaker: Option<&str>) {
        let panel_x = self.screen_width - self.ui_panel_width + 20.0;
        let mut line_y = 30.0;
        let line_height = 20.0;

        draw_text("HAMLET", panel_x, line_y, 24.0, WHITE);
        line_y += line_height * 2.0;

        let player = &game_state.player;
        let (tx, ty) = game_state
            .grid
            .world_to_tile(player.position.x, player.position.y);
        draw_text(
            &format!("Tile: ({}, {})", tx, ty),
            panel_x,
            line_y,
            18.0,
            WHITE,
        );
        line_y += line_height;

        draw_text(
            &format!("Time: {:.0}s", game_state.elapsed),
            panel_x,
            line_y,
            18.0,
            WHITE,
        );
        line_y += line_height;

        let nearby = game_state
            .nearby_npc()
            .map(|npc| npc.name.as_str())
            .unwrap_or("nobody");
        draw_text(
            &format!("Nearby: {}", nearby),
            panel_x,
            line_y,
            18.0,
            WHITE,
        );
        line_y += line_height;

        draw_text(
            &game_state.dialogue.summary(),
            panel_x,
            line_y,
            16.0,
            SKYBLUE,
        );
        line_y += line_height;

        if let Some(speaker) = pending_speaker {
            draw_text(
                &format!("Waiting on {}", speaker),
                panel_x,
                line_y,
                16.0,
                LIGHTGRAY,
            );
        }
        line_y += line_height * 2.0;

        draw_text("Controls:", panel_x, line_y, 18.0, GREEN);
        line_y += line_height;

        let controls = [
            "WASD/Arrow keys: Move",
            "E: Talk / close",
            "T: Ask a question",
            "ESC: Close / quit",
        ];
        for control in &controls {
            draw_text(control, panel_x, line_y, 16.0, WHITE);
            line_y += line_height;
        }
    }

    /// Renders the message area.
    fn render_messages(&self, game_state: &GameState) {
        let message_count = 3;
        let line_height = 18.0;
        let message_area_y = game_state.grid.pixel_height() * self.scale + 30.0;
        let start_index = self.messages.len().saturating_sub(message_count);

        for (i, message) in self.messages.iter().skip(start_index).enumerate() {
            let y = message_area_y + i as f32 * line_height;
            draw_text(message, 10.0, y, 16.0, WHITE);
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        // Keep only the most recent messages
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest scale at which the map fits left of the side panel with the
/// message log underneath. Never below a quarter size.
pub fn fit_scale(
    screen_width: f32,
    screen_height: f32,
    panel_width: f32,
    map_width: f32,
    map_height: f32,
) -> f32 {
    let horizontal = (screen_width - panel_width) / map_width;
    let vertical = (screen_height - MESSAGE_AREA_HEIGHT) / map_height;
    horizontal.min(vertical).max(MIN_SCALE)
}

/// Fill colour of a tile.
pub fn tile_color(tile: TileType) -> Color {
    match tile {
        TileType::Wall => DARKGRAY,
        TileType::Water => BLUE,
        TileType::Tree => GREEN,
        TileType::Empty => LIGHTGRAY,
    }
}

/// Body colour of a villager.
pub fn npc_color(color: NpcColor) -> Color {
    match color {
        NpcColor::Blue => BLUE,
        NpcColor::Green => GREEN,
        NpcColor::Yellow => YELLOW,
    }
}
