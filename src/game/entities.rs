//! # Entities
//!
//! The player and the villagers who wander the map.

use crate::config::{NPC_SPEED, PLAYER_SPEED};
use crate::game::{new_entity_id, Direction, EntityId, Position, TileGrid, WanderState};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common read-only view of anything standing on the map.
pub trait Entity {
    /// Display name.
    fn name(&self) -> &str;

    /// Current world position.
    fn position(&self) -> Position;
}

/// What a villager does for a living. Fed into generation prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcRole {
    Blacksmith,
    Innkeeper,
    Merchant,
    Villager,
}

impl NpcRole {
    /// Derives a role from a villager's name, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamlet::NpcRole;
    ///
    /// assert_eq!(NpcRole::from_name("Innkeeper"), NpcRole::Innkeeper);
    /// assert_eq!(NpcRole::from_name("Old Tom"), NpcRole::Villager);
    /// ```
    pub fn from_name(name: &str) -> NpcRole {
        match name.to_lowercase().as_str() {
            "blacksmith" => NpcRole::Blacksmith,
            "innkeeper" => NpcRole::Innkeeper,
            "merchant" => NpcRole::Merchant,
            _ => NpcRole::Villager,
        }
    }

    /// Lowercase noun used in prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            NpcRole::Blacksmith => "blacksmith",
            NpcRole::Innkeeper => "innkeeper",
            NpcRole::Merchant => "merchant",
            NpcRole::Villager => "villager",
        }
    }
}

impl fmt::Display for NpcRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cosmetic tint a villager is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcColor {
    Blue,
    Green,
    Yellow,
}

/// A non-player character.
///
/// Construction does not check the map. [`crate::GameState::add_npc`] rejects
/// villagers on blocked tiles, and after that the position only changes
/// through the wander update once the destination passed a walkability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    /// Unique identifier
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Role used for dialogue prompts
    pub role: NpcRole,
    /// Cosmetic tint
    pub color: NpcColor,
    /// Movement speed in world units per second
    pub speed: f32,
    /// Current world position
    position: Position,
    /// Idle/moving state machine
    pub wander: WanderState,
}

impl Npc {
    /// Creates a villager standing idle at `position`.
    ///
    /// The first idle period lasts a random `[0, 3]` seconds and a random
    /// direction is preselected, so villagers created together do not all
    /// start walking on the same frame.
    pub fn new<R: Rng + ?Sized>(
        name: impl Into<String>,
        position: Position,
        color: NpcColor,
        rng: &mut R,
    ) -> Self {
        let name = name.into();
        let role = NpcRole::from_name(&name);
        let timer = rng.gen_range(0.0..=3.0);
        let direction = Direction::cardinal()[rng.gen_range(0..4)];

        Self {
            id: new_entity_id(),
            name,
            role,
            color,
            speed: NPC_SPEED,
            position,
            wander: WanderState::idle_facing(timer, direction),
        }
    }

    /// Creates a villager centred on a tile of `grid`.
    pub fn on_tile<R: Rng + ?Sized>(
        name: impl Into<String>,
        grid: &TileGrid,
        tile: (i32, i32),
        color: NpcColor,
        rng: &mut R,
    ) -> Self {
        Self::new(name, grid.tile_center(tile.0, tile.1), color, rng)
    }

    /// Places the villager without any walkability check. Test setup only.
    #[cfg(test)]
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn commit_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Checks whether a point is within `radius` of this villager.
    pub fn is_within(&self, point: Position, radius: f32) -> bool {
        self.position.distance(point) <= radius
    }
}

impl Entity for Npc {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Position {
        self.position
    }
}

/// The player-controlled detective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Display name
    pub name: String,
    /// Current world position
    pub position: Position,
    /// Movement speed in world units per second
    pub speed: f32,
}

impl Player {
    /// Creates a new player at the given position.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamlet::{Player, Position};
    ///
    /// let player = Player::new("Detective", Position::new(176.0, 240.0));
    /// assert_eq!(player.speed, 150.0);
    /// ```
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            speed: PLAYER_SPEED,
        }
    }

    /// Attempts to move by `(dx, dy)` scaled by speed and `dt`.
    ///
    /// The whole step is rejected if the destination tile is not walkable.
    /// Returns whether the player moved.
    pub fn try_move(&mut self, dx: f32, dy: f32, dt: f32, grid: &TileGrid) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        let step = self.speed * dt;
        let destination = Position::new(self.position.x + dx * step, self.position.y + dy * step);
        if grid.is_walkable_world(destination) {
            self.position = destination;
            true
        } else {
            false
        }
    }
}

impl Entity for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Position {
        self.position
    }
}
