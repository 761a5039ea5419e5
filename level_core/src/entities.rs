use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Bounds, Position, error::LevelError, movement::MovementStrategy, record::Record};

/// An enemy patrolling its bounds with one movement strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub position: Position,
    pub bounds: Bounds,
    /// Distance covered per tick.
    pub speed: f64,
    pub strategy: MovementStrategy,
    /// `1.0` or `-1.0`; used by horizontal and diagonal motion.
    pub direction_x: f64,
    /// `1.0` or `-1.0`; used by vertical and diagonal motion.
    pub direction_y: f64,
    /// Radians around the bounds centre; used by circular motion.
    pub angle: f64,
}

impl Enemy {
    pub fn new(position: Position, bounds: Bounds, speed: f64, strategy: MovementStrategy) -> Self {
        Enemy {
            position,
            bounds,
            speed,
            strategy,
            direction_x: 1.0,
            direction_y: 1.0,
            angle: starting_angle(position, bounds),
        }
    }

    /// Builds an enemy from a level-file record.
    ///
    /// Reads `x`, `y`, `x_max`, `y_max`, `x_min`, `y_min`, `speed` and
    /// `movementType`. Other keys are ignored.
    pub fn from_record(value: &Value) -> Result<Self, LevelError> {
        let record = Record::new("enemy", value)?;
        let strategy = MovementStrategy::from_name(record.string("movementType")?)?;
        let position = Position::new(record.number("x")?, record.number("y")?);
        let bounds = Bounds {
            x_max: record.number("x_max")?,
            y_max: record.number("y_max")?,
            x_min: record.number("x_min")?,
            y_min: record.number("y_min")?,
        };
        Ok(Enemy::new(position, bounds, record.number("speed")?, strategy))
    }

    /// Advances the enemy by one tick using its strategy.
    pub fn update(&mut self) {
        let strategy = self.strategy;
        strategy.advance(self);
    }
}

/// Angle of `position` on the ellipse inscribed in `bounds`.
fn starting_angle(position: Position, bounds: Bounds) -> f64 {
    let center = bounds.center();
    let (rx, ry) = bounds.radii();
    let nx = if rx > 0.0 { (position.x - center.x) / rx } else { 0.0 };
    let ny = if ry > 0.0 { (position.y - center.y) / ry } else { 0.0 };
    ny.atan2(nx)
}

/// A solid rectangle. Never changes after loading.
///
/// The serde shape is the level-file record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Wall {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Wall {
    pub fn from_record(value: &Value) -> Result<Self, LevelError> {
        let record = Record::new("wall", value)?;
        record.only(&["x", "y", "width", "height"])?;
        Ok(Wall {
            x: record.number("x")?,
            y: record.number("y")?,
            width: record.number("width")?,
            height: record.number("height")?,
        })
    }
}

/// A collectible coin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub x: f64,
    pub y: f64,
    /// Runtime state only; level files never set it.
    pub collected: bool,
}

impl Coin {
    pub fn new(x: f64, y: f64) -> Self {
        Coin {
            x,
            y,
            collected: false,
        }
    }

    pub fn from_record(value: &Value) -> Result<Self, LevelError> {
        let record = Record::new("coin", value)?;
        record.only(&["x", "y"])?;
        Ok(Coin::new(record.number("x")?, record.number("y")?))
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// The rectangle a player must reach to finish the level.
///
/// The serde shape is the level-file record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetZone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TargetZone {
    pub fn from_record(value: &Value) -> Result<Self, LevelError> {
        let record = Record::new("target zone", value)?;
        record.only(&["x", "y", "width", "height"])?;
        Ok(TargetZone {
            x: record.number("x")?,
            y: record.number("y")?,
            width: record.number("width")?,
            height: record.number("height")?,
        })
    }

    /// Whether `position` is inside the zone, edges included.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x <= self.x + self.width
            && position.y >= self.y
            && position.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn enemy_record() -> Value {
        json!({
            "x": 10, "y": 20,
            "x_max": 40, "y_max": 60,
            "x_min": 0, "y_min": 5,
            "speed": 1.5,
            "movementType": "vertical"
        })
    }

    #[test]
    fn enemy_from_record_reads_every_field() {
        let enemy = Enemy::from_record(&enemy_record()).unwrap();
        assert_eq!(enemy.position, Position::new(10.0, 20.0));
        assert_eq!(
            enemy.bounds,
            Bounds {
                x_min: 0.0,
                x_max: 40.0,
                y_min: 5.0,
                y_max: 60.0,
            }
        );
        assert_eq!(enemy.speed, 1.5);
        assert_eq!(enemy.strategy, MovementStrategy::Vertical);
        assert_eq!(enemy.direction_x, 1.0);
        assert_eq!(enemy.direction_y, 1.0);
    }

    #[test]
    fn enemy_ignores_extra_keys() {
        let mut value = enemy_record();
        value["sprite"] = json!("bat.png");
        assert!(Enemy::from_record(&value).is_ok());
    }

    #[test]
    fn enemy_with_unknown_strategy_fails() {
        let mut value = enemy_record();
        value["movementType"] = json!("spiral");
        let err = Enemy::from_record(&value).unwrap_err();
        assert!(matches!(err, LevelError::InvalidStrategyName(ref name) if name == "spiral"));
    }

    #[test]
    fn enemy_missing_speed_fails() {
        let mut value = enemy_record();
        value.as_object_mut().unwrap().remove("speed");
        match Enemy::from_record(&value).unwrap_err() {
            LevelError::MissingField { entity, field } => {
                assert_eq!(entity, "enemy");
                assert_eq!(field, "speed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn enemy_with_numeric_strategy_is_a_type_mismatch() {
        let mut value = enemy_record();
        value["movementType"] = json!(3);
        let err = Enemy::from_record(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn wall_and_zone_reject_unexpected_keys() {
        let wall = json!({ "x": 0, "y": 0, "width": 10, "height": 2, "colour": "grey" });
        assert!(matches!(
            Wall::from_record(&wall).unwrap_err(),
            LevelError::UnexpectedField { entity: "wall", .. }
        ));
        let zone = json!({ "x": 0, "y": 0, "width": 10, "height": 2, "radius": 4 });
        assert!(matches!(
            TargetZone::from_record(&zone).unwrap_err(),
            LevelError::UnexpectedField { entity: "target zone", .. }
        ));
    }

    #[test]
    fn coin_from_record_starts_uncollected() {
        let coin = Coin::from_record(&json!({ "x": 3, "y": 4 })).unwrap();
        assert_eq!(coin.position(), Position::new(3.0, 4.0));
        assert!(!coin.collected);
        assert!(Coin::from_record(&json!({ "x": 3 })).is_err());
    }

    #[test]
    fn wall_and_zone_serde_shape_is_the_file_record() {
        let record = json!({ "x": 0, "y": 560, "width": 800, "height": 40 });
        let wall: Wall = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(wall, Wall::from_record(&record).unwrap());
        assert_eq!(serde_json::to_value(wall).unwrap(), json!({
            "x": 0.0, "y": 560.0, "width": 800.0, "height": 40.0
        }));

        let zone: TargetZone = serde_json::from_value(record.clone()).unwrap();
        assert_eq!(zone, TargetZone::from_record(&record).unwrap());

        let extra = json!({ "x": 0, "y": 0, "width": 1, "height": 1, "colour": "grey" });
        assert!(serde_json::from_value::<Wall>(extra.clone()).is_err());
        assert!(serde_json::from_value::<TargetZone>(extra).is_err());
    }

    #[test]
    fn target_zone_contains_its_edges() {
        let zone = TargetZone::from_record(&json!({ "x": 10, "y": 10, "width": 5, "height": 5 }))
            .unwrap();
        assert!(zone.contains(Position::new(10.0, 10.0)));
        assert!(zone.contains(Position::new(15.0, 15.0)));
        assert!(zone.contains(Position::new(12.5, 11.0)));
        assert!(!zone.contains(Position::new(15.1, 12.0)));
        assert!(!zone.contains(Position::new(9.9, 12.0)));
    }
}
