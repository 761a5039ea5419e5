use serde_json::Value;

use crate::{
    Position,
    entities::{Coin, Enemy, TargetZone, Wall},
    error::LevelError,
    record::Record,
};

/// Copy of a level's entities, taken once the level is fully built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelSnapshot {
    pub enemies: Vec<Enemy>,
    pub walls: Vec<Wall>,
    pub coins: Vec<Coin>,
}

/// One playable stage: spawn point, goal and entities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level {
    pub spawn: Position,
    pub target_zone: TargetZone,
    pub enemies: Vec<Enemy>,
    pub walls: Vec<Wall>,
    pub coins: Vec<Coin>,
    initial_state: Option<LevelSnapshot>,
}

impl Level {
    /// Creates an empty level with the spawn at the origin.
    pub fn new() -> Self {
        Level::default()
    }

    /// Assembles a level from a decoded level file.
    ///
    /// Reads `spawnX`, `spawnY`, `targetZone`, `enemies`, `walls` and `coins`
    /// in that order and stops at the first bad record. The returned level
    /// already holds its initial-state snapshot.
    pub fn from_json(value: &Value) -> Result<Self, LevelError> {
        let record = Record::new("level", value)?;
        let mut level = Level::new();
        level.set_spawn(record.number("spawnX")?, record.number("spawnY")?);
        level.set_target_zone(TargetZone::from_record(record.object("targetZone")?)?);

        for enemy in record.array("enemies")? {
            level.add_enemy(Enemy::from_record(enemy)?);
        }
        for wall in record.array("walls")? {
            level.add_wall(Wall::from_record(wall)?);
        }
        for coin in record.array("coins")? {
            level.add_coin(Coin::from_record(coin)?);
        }

        level.save_initial_state();
        Ok(level)
    }

    pub fn set_spawn(&mut self, x: f64, y: f64) {
        self.spawn = Position { x, y };
    }

    pub fn set_target_zone(&mut self, target_zone: TargetZone) {
        self.target_zone = target_zone;
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn add_coin(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    /// Records the current entities as the state [`Level::reset_to_initial_state`] returns to.
    pub fn save_initial_state(&mut self) {
        self.initial_state = Some(LevelSnapshot {
            enemies: self.enemies.clone(),
            walls: self.walls.clone(),
            coins: self.coins.clone(),
        });
    }

    pub fn has_initial_state(&self) -> bool {
        self.initial_state.is_some()
    }

    pub fn initial_state(&self) -> Option<&LevelSnapshot> {
        self.initial_state.as_ref()
    }

    /// Restores enemies, walls and coins from the saved snapshot.
    ///
    /// Does nothing if no snapshot was saved.
    pub fn reset_to_initial_state(&mut self) {
        if let Some(snapshot) = &self.initial_state {
            self.enemies.clone_from(&snapshot.enemies);
            self.walls.clone_from(&snapshot.walls);
            self.coins.clone_from(&snapshot.coins);
        }
    }

    /// Advances every enemy by one tick.
    pub fn update(&mut self) {
        for enemy in &mut self.enemies {
            enemy.update();
        }
    }

    /// Collects every remaining coin within `radius` of `position`.
    ///
    /// Returns the number of coins taken by this call.
    pub fn collect_coins_near(&mut self, position: Position, radius: f64) -> usize {
        let mut taken = 0;
        for coin in self.coins.iter_mut().filter(|coin| !coin.collected) {
            if coin.position().distance_to(position) <= radius {
                coin.collected = true;
                taken += 1;
            }
        }
        taken
    }

    pub fn remaining_coins(&self) -> usize {
        self.coins.iter().filter(|coin| !coin.collected).count()
    }

    /// True once every coin is collected and `position` is inside the target zone.
    pub fn is_complete(&self, position: Position) -> bool {
        self.remaining_coins() == 0 && self.target_zone.contains(position)
    }
}
