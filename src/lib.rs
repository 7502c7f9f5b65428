//! # Hamlet
//!
//! A top-down village exploration prototype in which villagers speak through a
//! local text-generation service.
//!
//! ## Architecture Overview
//!
//! The simulation core is small and engine-agnostic:
//!
//! - **World**: a fixed tile grid answering walkability and coordinate queries
//! - **Entities**: the player and the wandering villagers
//! - **Wander behaviour**: a timer-driven idle/moving state machine per villager
//! - **Interaction**: finding the villager in reach of the player
//! - **Dialogue**: the single speaker/text pair shown on screen
//! - **AI**: prompt building, the generation backend and non-blocking dispatch
//!
//! Rendering and input polling (macroquad) only read from and write intents to
//! [`GameState`]; no simulation behaviour lives there.
//!
//! ## Generation Service
//!
//! Greetings are requested from an Ollama-compatible `/api/generate` endpoint
//! on a tokio runtime so the frame loop never waits on the network. Any failure
//! degrades to an in-character fallback line.

pub mod ai;
pub mod dialogue;
pub mod game;
pub mod input;
pub mod rendering;

pub use ai::*;
pub use dialogue::*;
pub use game::*;
pub use input::*;
pub use rendering::*;

/// Core error type for the Hamlet engine.
#[derive(thiserror::Error, Debug)]
pub enum HamletError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Static map data could not be turned into a tile grid
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// Runtime configuration was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation backend error surfaced outside the fallback path
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Result type used throughout the Hamlet codebase.
pub type HamletResult<T> = Result<T, HamletError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Reference map width in tiles
    pub const MAP_WIDTH: i32 = 20;

    /// Reference map height in tiles
    pub const MAP_HEIGHT: i32 = 15;

    /// Edge length of one tile in world units
    pub const TILE_SIZE: f32 = 32.0;

    /// Player movement speed in world units per second
    pub const PLAYER_SPEED: f32 = 150.0;

    /// Villager movement speed in world units per second
    pub const NPC_SPEED: f32 = 50.0;

    /// Maximum player-to-villager distance for starting a conversation
    pub const INTERACTION_RADIUS: f32 = 50.0;

    /// Tile the player spawns on
    pub const PLAYER_SPAWN_TILE: (i32, i32) = (5, 7);

    /// Default generation service base URL
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

    /// Default generation model
    pub const DEFAULT_MODEL: &str = "qwen2.5:0.5b";

    /// Default upper bound on one generation request, in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

    /// Frames per second target for the game loop
    pub const TARGET_FPS: u64 = 60;
}
