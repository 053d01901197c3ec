//! Macroquad host
//!
//! Everything that touches the window, the GPU or the physical keyboard.

pub mod batch;
pub mod keyboard;

pub use batch::MacroquadBatch;
