use std::{fs, path::Path};

use level_core::{ErrorKind, LevelError, LoaderConfig, MovementStrategy, Position, load_levels, scan};
use tempfile::TempDir;

const LEVEL_ONE: &str = r#"{
    "spawnX": 40,
    "spawnY": 520,
    "targetZone": { "x": 720, "y": 40, "width": 60, "height": 60 },
    "enemies": [
        { "x": 200, "y": 100, "x_max": 260, "y_max": 400, "x_min": 140, "y_min": 100,
          "speed": 4, "movementType": "vertical" },
        { "x": 500, "y": 300, "x_max": 600, "y_max": 380, "x_min": 400, "y_min": 220,
          "speed": 2.5, "movementType": "circular" }
    ],
    "walls": [ { "x": 0, "y": 560, "width": 800, "height": 40 } ],
    "coins": [ { "x": 120, "y": 500 }, { "x": 320, "y": 300 }, { "x": 640, "y": 120 } ]
}"#;

const LEVEL_SPIRAL: &str = r#"{
    "spawnX": 0,
    "spawnY": 0,
    "targetZone": { "x": 10, "y": 10, "width": 5, "height": 5 },
    "enemies": [
        { "x": 1, "y": 1, "x_max": 2, "y_max": 2, "x_min": 0, "y_min": 0,
          "speed": 1, "movementType": "spiral" }
    ],
    "walls": [],
    "coins": []
}"#;

const LEVEL_EMPTY: &str = r#"{
    "spawnX": 5,
    "spawnY": 6,
    "targetZone": { "x": 0, "y": 0, "width": 1, "height": 1 },
    "enemies": [],
    "walls": [],
    "coins": []
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write level file");
}

#[test]
fn loads_one_level_per_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "level1.json", LEVEL_ONE);
    write(dir.path(), "level2.json", LEVEL_EMPTY);

    let outcome = scan(&LoaderConfig::new(dir.path()));
    assert!(outcome.error.is_none());
    assert_eq!(outcome.levels.len(), 2);

    let level = outcome
        .levels
        .iter()
        .find(|level| level.enemies.len() == 2)
        .expect("level1 loaded");
    assert_eq!(level.spawn, Position::new(40.0, 520.0));
    assert_eq!(level.target_zone.x, 720.0);
    assert_eq!(level.target_zone.width, 60.0);
    assert_eq!(level.walls.len(), 1);
    assert_eq!(level.coins.len(), 3);
    assert_eq!(level.enemies[0].strategy, MovementStrategy::Vertical);
    assert_eq!(level.enemies[1].strategy, MovementStrategy::Circular);
    assert!(level.has_initial_state());

    let empty = outcome
        .levels
        .iter()
        .find(|level| level.enemies.is_empty())
        .expect("level2 loaded");
    assert_eq!(empty.spawn, Position::new(5.0, 6.0));
}

#[test]
fn unknown_strategy_aborts_the_scan() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "level1.json", LEVEL_ONE);
    write(dir.path(), "level2.json", LEVEL_SPIRAL);

    let outcome = scan(&LoaderConfig::new(dir.path()));
    let err = outcome.error.expect("spiral is rejected");
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(err.to_string(), "Unknown movement strategy: spiral");

    // Enumeration order decides whether level1 was reached first.
    match outcome.levels.as_slice() {
        [] => {}
        [level] => {
            assert_eq!(level.enemies.len(), 2);
            assert_eq!(level.walls.len(), 1);
            assert_eq!(level.coins.len(), 3);
        }
        levels => panic!("expected at most one level, got {}", levels.len()),
    }
}

#[test]
fn only_bad_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "level2.json", LEVEL_SPIRAL);

    let config = LoaderConfig::new(dir.path());
    assert!(load_levels(&config).is_empty());
    assert!(scan(&config).error.is_some());
}

#[test]
fn empty_directory_returns_nothing_without_error() {
    let dir = TempDir::new().unwrap();

    let outcome = scan(&LoaderConfig::new(dir.path()));
    assert!(outcome.levels.is_empty());
    assert!(outcome.error.is_none());
}

#[test]
fn missing_directory_reports_the_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-levels");
    let config = LoaderConfig::new(&missing);

    assert!(load_levels(&config).is_empty());

    let outcome = scan(&config);
    assert!(outcome.levels.is_empty());
    match outcome.error {
        Some(err @ LevelError::Io { .. }) => {
            assert_eq!(err.kind(), ErrorKind::Filesystem);
            assert!(err.to_string().contains("no-such-levels"));
        }
        other => panic!("expected an io error, got {other:?}"),
    }
}

#[test]
fn non_json_files_are_ignored() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "level1.json", LEVEL_EMPTY);
    write(dir.path(), "README.txt", "not a level");
    write(dir.path(), "level2.JSON", "{ broken");
    write(dir.path(), "level3.json.bak", LEVEL_SPIRAL);

    let outcome = scan(&LoaderConfig::new(dir.path()));
    assert!(outcome.error.is_none());
    assert_eq!(outcome.levels.len(), 1);
}

#[test]
fn malformed_json_is_a_decode_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.json", "{ \"spawnX\": 1, ");

    let outcome = scan(&LoaderConfig::new(dir.path()));
    assert!(outcome.levels.is_empty());
    let err = outcome.error.expect("broken file is rejected");
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn missing_field_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "level.json",
        &LEVEL_EMPTY.replace("\"spawnY\": 6,", ""),
    );

    let err = scan(&LoaderConfig::new(dir.path()))
        .error
        .expect("missing spawnY is rejected");
    assert!(matches!(
        err,
        LevelError::MissingField { entity: "level", ref field } if field == "spawnY"
    ));
}

#[test]
fn reset_restores_a_loaded_level() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "level1.json", LEVEL_ONE);

    let mut levels = load_levels(&LoaderConfig::new(dir.path()));
    let level = &mut levels[0];
    let enemies = level.enemies.clone();
    let coins = level.coins.clone();

    for _ in 0..120 {
        level.update();
    }
    level.collect_coins_near(Position::new(120.0, 500.0), 5.0);
    assert_ne!(level.enemies, enemies);

    level.reset_to_initial_state();
    assert_eq!(level.enemies, enemies);
    assert_eq!(level.coins, coins);
}

#[test]
fn bundled_levels_load() {
    let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources/levels");
    let outcome = scan(&LoaderConfig::new(directory));
    assert!(outcome.error.is_none(), "{:?}", outcome.error);
    assert_eq!(outcome.levels.len(), 3);
    for level in &outcome.levels {
        assert!(level.has_initial_state());
        assert!(!level.enemies.is_empty());
    }
}
