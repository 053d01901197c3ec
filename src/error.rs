//! Error types
//!
//! Shape and bounds errors are programmer errors in content or gameplay
//! code; they are surfaced at the call site and never silently corrected.
//! Absence (no overlap, no component) is not an error and uses bool/Option.

use thiserror::Error;

/// Misuse of a collider or tilemap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("collider is not a {expected}")]
    WrongShape { expected: &'static str },
    #[error("cell ({x}, {y}) is out of bounds for a {columns}x{rows} grid")]
    CellOutOfBounds { x: i32, y: i32, columns: i32, rows: i32 },
}

/// Failure while loading the content registry.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("image error on {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("parse error on {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("room file name '{0}' is not of the form <x>x<y>")]
    RoomName(String),
    #[error("sprite '{sprite}' references missing texture {path}")]
    MissingTexture { sprite: String, path: String },
}

/// Failure while loading the game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised by the room controller.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("room ({x}, {y}) does not exist")]
    MissingRoom { x: i32, y: i32 },
    #[error("room ({x}, {y}) is {found_w}x{found_h} pixels, expected {expected_w}x{expected_h}")]
    RoomSize {
        x: i32,
        y: i32,
        expected_w: u32,
        expected_h: u32,
        found_w: u32,
        found_h: u32,
    },
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = ShapeError::CellOutOfBounds { x: -1, y: 2, columns: 4, rows: 3 };
        assert_eq!(e.to_string(), "cell (-1, 2) is out of bounds for a 4x3 grid");

        let e = GameError::MissingRoom { x: 1, y: 0 };
        assert_eq!(e.to_string(), "room (1, 0) does not exist");

        let e: GameError = ShapeError::WrongShape { expected: "grid" }.into();
        assert_eq!(e.to_string(), "collider is not a grid");
    }
}
