use serde::{Deserialize, Serialize};

pub mod entities;
pub mod error;
pub mod level;
pub mod loader;
pub mod movement;
mod record;

pub use entities::{Coin, Enemy, TargetZone, Wall};
pub use error::{ErrorKind, LevelError};
pub use level::{Level, LevelSnapshot};
pub use loader::{LoadOutcome, LoaderConfig, load_all_levels, load_level_file, load_levels, scan};
pub use movement::MovementStrategy;

/// Represents a 2D coordinate in level space.
///
/// `y` grows downwards, as on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The box an enemy is allowed to move in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Centre of the box.
    pub fn center(&self) -> Position {
        Position {
            x: (self.x_min + self.x_max) / 2.0,
            y: (self.y_min + self.y_max) / 2.0,
        }
    }

    /// Half extents of the box, `(rx, ry)`.
    pub fn radii(&self) -> (f64, f64) {
        ((self.x_max - self.x_min) / 2.0, (self.y_max - self.y_min) / 2.0)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x_min
            && position.x <= self.x_max
            && position.y >= self.y_min
            && position.y <= self.y_max
    }
}
