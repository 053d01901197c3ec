//! Bramble: a tile-based 2D action platformer
//!
//! The library holds the whole simulation and is independent of any window
//! or GPU. The `bramble` binary wraps it in a macroquad host.

pub mod config;
pub mod content;
pub mod error;
pub mod game;
pub mod input;
pub mod render;

pub use config::GameConfig;
pub use content::Content;
pub use error::GameError;
pub use game::Game;
