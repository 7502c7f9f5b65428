//! # Game Module
//!
//! Core simulation state, world representation and villager behaviour.
//!
//! This module contains the fundamental building blocks of Hamlet:
//! - The static tile grid and its coordinate conversions
//! - The player and villager entities
//! - The wander state machine driving villagers
//! - Interaction range checks
//! - The per-tick simulation state

pub mod entities;
pub mod interaction;
pub mod state;
pub mod wander;
pub mod world;

pub use entities::*;
pub use interaction::*;
pub use state::*;
pub use wander::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point in world space, measured in world units.
///
/// The y axis grows north, so a tile row with a larger index is drawn higher
/// on screen.
///
/// # Examples
///
/// ```
/// use hamlet::Position;
///
/// let pos = Position::new(3.0, 4.0);
/// assert_eq!(pos.distance(Position::origin()), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Calculates the Euclidean distance to another position.
    pub fn distance(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns this position moved by `distance` along `direction`.
    pub fn step(self, direction: Direction, distance: f32) -> Position {
        let (dx, dy) = direction.to_unit();
        Position::new(self.x + dx * distance, self.y + dy * distance)
    }
}

/// Cardinal directions a villager can walk in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    North,
    West,
    South,
}

impl Direction {
    /// Converts a direction to a unit vector in world space.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamlet::Direction;
    ///
    /// assert_eq!(Direction::North.to_unit(), (0.0, 1.0));
    /// ```
    pub fn to_unit(self) -> (f32, f32) {
        match self {
            Direction::East => (1.0, 0.0),
            Direction::North => (0.0, 1.0),
            Direction::West => (-1.0, 0.0),
            Direction::South => (0.0, -1.0),
        }
    }

    /// Returns the 4 cardinal directions in counter-clockwise order from east.
    pub fn cardinal() -> [Direction; 4] {
        [
            Direction::East,
            Direction::North,
            Direction::West,
            Direction::South,
        ]
    }
}

/// Unique identifier for villagers.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5.0, 10.0);
        assert_eq!(pos.x, 5.0);
        assert_eq!(pos.y, 10.0);
    }

    #[test]
    fn test_position_distance() {
        let pos1 = Position::new(0.0, 0.0);
        let pos2 = Position::new(3.0, 4.0);
        assert_eq!(pos1.distance(pos2), 5.0);
        assert_eq!(pos2.distance(pos1), 5.0);
    }

    #[test]
    fn test_position_step() {
        let pos = Position::new(10.0, 10.0);
        assert_eq!(pos.step(Direction::East, 2.5), Position::new(12.5, 10.0));
        assert_eq!(pos.step(Direction::North, 2.5), Position::new(10.0, 12.5));
        assert_eq!(pos.step(Direction::West, 2.5), Position::new(7.5, 10.0));
        assert_eq!(pos.step(Direction::South, 2.5), Position::new(10.0, 7.5));
    }

    #[test]
    fn test_cardinal_directions_are_distinct() {
        let dirs = Direction::cardinal();
        for (i, a) in dirs.iter().enumerate() {
            for b in dirs.iter().skip(i + 1) {
                assert_ne!(a.to_unit(), b.to_unit());
            }
        }
    }

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = new_entity_id();
        let id2 = new_entity_id();
        assert_ne!(id1, id2);
    }
}
