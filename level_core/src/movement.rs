use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{entities::Enemy, error::LevelError};

/// The rule an enemy follows each tick.
///
/// Strategies carry no data: everything that changes from one tick to the
/// next (position, direction, angle) lives on the [`Enemy`] being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStrategy {
    /// Bounces between `y_min` and `y_max`.
    Vertical,
    /// Bounces between `x_min` and `x_max`.
    Horizontal,
    /// Bounces on both axes at once.
    Diagonal,
    /// Travels along the ellipse inscribed in the enemy's bounds.
    Circular,
}

impl MovementStrategy {
    pub const ALL: [MovementStrategy; 4] = [
        MovementStrategy::Vertical,
        MovementStrategy::Horizontal,
        MovementStrategy::Diagonal,
        MovementStrategy::Circular,
    ];

    /// Resolves a strategy from its level-file name.
    ///
    /// Names are matched exactly, so `"Vertical"` is rejected.
    pub fn from_name(name: &str) -> Result<Self, LevelError> {
        match name {
            "vertical" => Ok(MovementStrategy::Vertical),
            "horizontal" => Ok(MovementStrategy::Horizontal),
            "diagonal" => Ok(MovementStrategy::Diagonal),
            "circular" => Ok(MovementStrategy::Circular),
            unknown => Err(LevelError::InvalidStrategyName(unknown.to_string())),
        }
    }

    /// The name used for this strategy in level files.
    pub fn name(&self) -> &'static str {
        match self {
            MovementStrategy::Vertical => "vertical",
            MovementStrategy::Horizontal => "horizontal",
            MovementStrategy::Diagonal => "diagonal",
            MovementStrategy::Circular => "circular",
        }
    }

    /// Moves `enemy` forward by one tick.
    pub fn advance(&self, enemy: &mut Enemy) {
        match self {
            MovementStrategy::Vertical => step_vertical(enemy),
            MovementStrategy::Horizontal => step_horizontal(enemy),
            MovementStrategy::Diagonal => {
                step_horizontal(enemy);
                step_vertical(enemy);
            }
            MovementStrategy::Circular => step_circular(enemy),
        }
    }
}

impl FromStr for MovementStrategy {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovementStrategy::from_name(s)
    }
}

impl fmt::Display for MovementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Moves `value` by `step` along `direction`, turning around at either limit.
fn bounce(value: &mut f64, direction: &mut f64, step: f64, min: f64, max: f64) {
    *value += step * *direction;
    if *value >= max {
        *value = max;
        *direction = -1.0;
    } else if *value <= min {
        *value = min;
        *direction = 1.0;
    }
}

fn step_vertical(enemy: &mut Enemy) {
    bounce(
        &mut enemy.position.y,
        &mut enemy.direction_y,
        enemy.speed,
        enemy.bounds.y_min,
        enemy.bounds.y_max,
    );
}

fn step_horizontal(enemy: &mut Enemy) {
    bounce(
        &mut enemy.position.x,
        &mut enemy.direction_x,
        enemy.speed,
        enemy.bounds.x_min,
        enemy.bounds.x_max,
    );
}

fn step_circular(enemy: &mut Enemy) {
    let center = enemy.bounds.center();
    let (rx, ry) = enemy.bounds.radii();
    let radius = rx.max(ry);
    if radius <= 0.0 {
        enemy.position = center;
        return;
    }
    // Arc length per tick is roughly `speed` on the longer axis.
    enemy.angle = (enemy.angle + enemy.speed / radius) % std::f64::consts::TAU;
    enemy.position.x = center.x + rx * enemy.angle.cos();
    enemy.position.y = center.y + ry * enemy.angle.sin();
}
