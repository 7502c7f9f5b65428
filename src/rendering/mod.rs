//! # Rendering Module
//!
//! Macroquad presentation of the village. Everything here only reads from
//! [`crate::GameState`].

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
