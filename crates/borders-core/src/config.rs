//! Configuration loading and typed config structures for the Borders game mode.
//!
//! The canonical configuration lives in `borders-config.yaml` in the working
//! directory. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and parses the file. Every
//! field has a default, so an empty or partial file is valid.

use std::path::{Path, PathBuf};

use borders_types::Dimension;
use serde::Deserialize;

/// Environment variable that overrides `persistence.snapshot_path`.
pub const SNAPSHOT_PATH_ENV: &str = "BORDERS_SNAPSHOT_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `borders-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BordersConfig {
    /// Starting values for the game rules held in the state store.
    #[serde(default)]
    pub game: GameConfig,

    /// Tick cadence.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Snapshot storage settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Host world settings (dimensions, item registry).
    #[serde(default)]
    pub world: WorldConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BordersConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `BORDERS_SNAPSHOT_PATH` environment variable overrides
    /// `persistence.snapshot_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            let mut config = Self::default();
            config.persistence.apply_env_overrides();
            return Ok(config);
        }
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.persistence.apply_env_overrides();
        Ok(config)
    }
}

/// Starting values for the rule fields of the state store.
///
/// A restored snapshot overrides all of these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Ticks without a discovery before the failsafe expands the border.
    #[serde(default = "default_failsafe_delay_ticks")]
    pub failsafe_delay_ticks: u64,

    /// Blocks added to each side of the border per discovery.
    #[serde(default = "default_discovery_growth_per_side")]
    pub discovery_growth_per_side: i32,

    /// Whether player deaths shrink the border.
    #[serde(default = "default_true")]
    pub death_shrink_enabled: bool,

    /// Blocks removed from each side of the border per death.
    #[serde(default = "default_death_shrink_per_side")]
    pub death_shrink_per_side: i32,

    /// Whether the inactivity failsafe starts enabled.
    #[serde(default = "default_true")]
    pub failsafe_enabled: bool,

    /// Discoveries to record without any effect (backlog seeding).
    #[serde(default)]
    pub ignored_discoveries: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            failsafe_delay_ticks: default_failsafe_delay_ticks(),
            discovery_growth_per_side: default_discovery_growth_per_side(),
            death_shrink_enabled: true,
            death_shrink_per_side: default_death_shrink_per_side(),
            failsafe_enabled: true,
            ignored_discoveries: 0,
        }
    }
}

/// Tick cadence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Ticks per real-time second. Used to convert command arguments given
    /// in seconds and to pace the engine loop.
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: default_ticks_per_second(),
        }
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Path of the JSON snapshot file.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl PersistenceConfig {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(SNAPSHOT_PATH_ENV).filter(|v| !v.is_empty()) {
            self.snapshot_path = PathBuf::from(val);
        }
    }
}

/// Host world configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Dimensions that are loaded and carry a border.
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<Dimension>,

    /// Item identifiers the registry knows about. Empty means every
    /// well-formed identifier resolves.
    #[serde(default)]
    pub known_items: Vec<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
            known_items: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_failsafe_delay_ticks() -> u64 {
    6000
}

const fn default_discovery_growth_per_side() -> i32 {
    1
}

const fn default_death_shrink_per_side() -> i32 {
    5
}

const fn default_ticks_per_second() -> u32 {
    20
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("config").join("borders_state.json")
}

fn default_dimensions() -> Vec<Dimension> {
    Dimension::ALL.to_vec()
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
