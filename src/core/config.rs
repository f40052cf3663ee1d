//! Simulation configuration
//!
//! Configs are plain serde structs. Files are read as RON or JSON depending on
//! their extension; every field has a default so a file only needs to name
//! what it changes.

use std::path::Path;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ai::PursuitConfig;

/// An axis-aligned box placed in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    pub center: Vec3,
    pub half_extents: Vec3,
}

/// Initial layout of the demo scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Agent start position
    pub agent_position: Vec3,
    /// Direction the agent initially faces
    pub agent_facing: Vec3,
    /// Target start position
    pub target_position: Vec3,
    /// Constant target velocity in units per second
    pub target_velocity: Vec3,
    /// Static obstacles
    pub obstacles: Vec<BoxConfig>,
    /// Add a ground plane
    pub ground: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            agent_position: Vec3::new(0.0, 1.0, 0.0),
            agent_facing: Vec3::Z,
            target_position: Vec3::new(0.0, 1.0, 14.0),
            target_velocity: Vec3::ZERO,
            obstacles: vec![BoxConfig {
                center: Vec3::new(0.0, 1.0, 7.0),
                half_extents: Vec3::new(2.0, 1.0, 1.0),
            }],
            ground: true,
        }
    }
}

/// Top-level configuration of a headless simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed steps per second
    pub tick_rate: u32,
    /// Number of steps to run
    pub steps: u32,
    /// Agent tuning
    pub pursuit: PursuitConfig,
    /// Scene layout
    pub scene: SceneConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            steps: 500,
            pursuit: PursuitConfig::default(),
            scene: SceneConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Set the fixed tick rate
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Set the number of steps
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Set the agent tuning
    pub fn with_pursuit(mut self, pursuit: PursuitConfig) -> Self {
        self.pursuit = pursuit;
        self
    }

    /// Set the scene layout
    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    /// Step length in seconds
    #[must_use]
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Check the configuration for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero tick rate, a bad pursuit
    /// config or a degenerate obstacle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".into()));
        }

        self.pursuit.validate()?;

        for (i, obstacle) in self.scene.obstacles.iter().enumerate() {
            if !obstacle.center.is_finite() || obstacle.half_extents.cmple(Vec3::ZERO).any() {
                return Err(ConfigError::Invalid(format!(
                    "obstacle {i} needs a finite center and positive half-extents"
                )));
            }
        }

        Ok(())
    }

    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// See [`load`] and [`SimulationConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse a RON document
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the text is not valid for `T`.
pub fn from_ron_str<T: DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    ron::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Parse a JSON document
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the text is not valid for `T`.
pub fn from_json_str<T: DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    serde_json::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load a config file, picking the format from its extension (`.ron` or `.json`).
///
/// # Errors
///
/// Returns an error if the file cannot be read, the extension is unknown, or
/// the contents fail to parse.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> Result<T, ConfigError> = match extension.as_deref() {
        Some("ron") => from_ron_str,
        Some("json") => from_json_str,
        _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    };

    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    log::info!("Loading config from {}", path.display());
    parse(&text)
}

/// Errors that can occur while loading configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading the file
    IoError(String),
    /// Error parsing the contents
    ParseError(String),
    /// File extension is not a known format
    UnsupportedFormat(String),
    /// Parsed but unusable values
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::ParseError(e) => write!(f, "Parse error: {e}"),
            Self::UnsupportedFormat(path) => write!(f, "Unsupported config format: {path}"),
            Self::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
