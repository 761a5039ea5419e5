use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{error::LevelError, level::Level};

/// Directory scanned by [`load_all_levels`], relative to the working directory.
pub const LEVELS_DIRECTORY: &str = "resources/levels/";

/// File name suffix of a level file.
pub const LEVEL_EXTENSION: &str = ".json";

/// Where to look for level files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub directory: PathBuf,
    /// Matched against the end of each file name, case-sensitively.
    pub extension: String,
}

impl LoaderConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        LoaderConfig {
            directory: directory.into(),
            ..LoaderConfig::default()
        }
    }

    fn accepts(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.extension)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            directory: PathBuf::from(LEVELS_DIRECTORY),
            extension: LEVEL_EXTENSION.to_string(),
        }
    }
}

/// Result of scanning a level directory.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Levels assembled before the scan stopped.
    pub levels: Vec<Level>,
    /// The error that stopped the scan, if any.
    pub error: Option<LevelError>,
}

/// Loads every level in [`LEVELS_DIRECTORY`].
pub fn load_all_levels() -> Vec<Level> {
    load_levels(&LoaderConfig::default())
}

/// Loads every level described by `config`.
///
/// The first failure stops the scan. It is logged together with the
/// directory, and the levels loaded before it are returned.
pub fn load_levels(config: &LoaderConfig) -> Vec<Level> {
    let outcome = scan(config);
    if let Some(err) = &outcome.error {
        tracing::error!(
            directory = %config.directory.display(),
            "Error loading levels from directory {}: {}",
            config.directory.display(),
            err
        );
    }
    outcome.levels
}

/// Scans `config.directory` in filesystem order, stopping at the first error.
///
/// Files whose names do not end in `config.extension` are skipped. There is
/// no per-file recovery: a bad file ends the scan, including for any files
/// listed after it.
pub fn scan(config: &LoaderConfig) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    if let Err(err) = scan_into(config, &mut outcome.levels) {
        outcome.error = Some(err);
    }
    outcome
}

fn scan_into(config: &LoaderConfig, levels: &mut Vec<Level>) -> Result<(), LevelError> {
    let directory = &config.directory;
    let io_error = |source| LevelError::Io {
        path: directory.clone(),
        source,
    };

    for entry in fs::read_dir(directory).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let file_name = entry.file_name();
        if !config.accepts(&file_name.to_string_lossy()) {
            continue;
        }
        let level = load_level_file(&entry.path())?;
        tracing::debug!(
            file = %entry.path().display(),
            enemies = level.enemies.len(),
            walls = level.walls.len(),
            coins = level.coins.len(),
            "loaded level"
        );
        levels.push(level);
    }
    Ok(())
}

/// Reads, decodes and assembles a single level file.
pub fn load_level_file(path: &Path) -> Result<Level, LevelError> {
    let file = File::open(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let value: Value = serde_json::from_reader(reader).map_err(|source| LevelError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Level::from_json(&value)
}
