//! Configuration system
//!
//! [`EngineConfig`] collects the tunables of the simulation core: which
//! broad-phase strategy to run, how collision masks are combined, and how
//! tick deltas are clamped and scaled. Any [`Config`] type can be loaded
//! from and saved to TOML or RON, chosen by file extension.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Broad-phase strategy used to find candidate box pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BroadPhaseKind {
    /// Test every box against every other box
    BruteForce,
    /// Bucket boxes into a uniform grid and only test boxes sharing a cell
    UniformGrid,
}

/// How two collision groups are combined into an overlap decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskPolicy {
    /// `a.category & b.mask != 0 && b.category & a.mask != 0`
    Mutual,
    /// One-way: an actor hears about another whenever its own mask accepts
    /// the other's category, whatever the other's mask says
    Either,
}

/// Broad-phase settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadPhaseConfig {
    /// Strategy
    pub kind: BroadPhaseKind,
    /// Grid cell edge length in world units (uniform grid only)
    pub cell_size: f32,
}

impl Default for BroadPhaseConfig {
    fn default() -> Self {
        Self {
            kind: BroadPhaseKind::UniformGrid,
            cell_size: 64.0,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Broad-phase settings
    pub broad_phase: BroadPhaseConfig,
    /// Collision mask combination rule
    pub mask_policy: MaskPolicy,
    /// Largest delta a single tick may consume; larger deltas are clamped
    pub max_delta_sec: f32,
    /// Time scale given to newly created worlds
    pub time_scale: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            broad_phase: BroadPhaseConfig::default(),
            mask_policy: MaskPolicy::Mutual,
            max_delta_sec: 0.25,
            time_scale: 1.0,
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Builder pattern: Set the broad-phase strategy
    pub fn with_broad_phase(mut self, kind: BroadPhaseKind, cell_size: f32) -> Self {
        self.broad_phase = BroadPhaseConfig { kind, cell_size };
        self
    }

    /// Builder pattern: Set the mask policy
    pub fn with_mask_policy(mut self, policy: MaskPolicy) -> Self {
        self.mask_policy = policy;
        self
    }

    /// Builder pattern: Set the delta clamp
    pub fn with_max_delta(mut self, max_delta_sec: f32) -> Self {
        self.max_delta_sec = max_delta_sec;
        self
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.broad_phase.cell_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "broad_phase.cell_size must be positive, got {}",
                self.broad_phase.cell_size
            )));
        }
        if !(self.max_delta_sec > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_delta_sec must be positive, got {}",
                self.max_delta_sec
            )));
        }
        if !(self.time_scale >= 0.0) || !self.time_scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "time_scale must be finite and non-negative, got {}",
                self.time_scale
            )));
        }
        Ok(())
    }
}
