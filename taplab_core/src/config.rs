//! Tunable parameters for matching, live feedback, and post-session analytics.
//!
//! Everything has a default matching the trainer's tuned behaviour; a JSON
//! file may override any subset of fields.

use std::fs;
use std::path::Path;

use drill_schema::{Drill, Millis};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::gameplay::HitWindows;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub matcher: MatcherConfig,
    pub recorder: RecorderConfig,
    pub analytics: AnalyticsConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Windows derived from the drill's `od`.
    Od,
    /// Fixed 16/34/50 ms windows regardless of drill.
    Preset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub window_mode: WindowMode,
    /// Overrides the drill's `od` when set.
    pub od_override: Option<f64>,
    /// Fixed release lookahead; when unset it is `travel_cells` grid cells.
    pub lookahead_ms: Option<Millis>,
    pub travel_cells: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            window_mode: WindowMode::Od,
            od_override: None,
            lookahead_ms: None,
            travel_cells: 4,
        }
    }
}

impl MatcherConfig {
    pub fn windows_for(&self, drill: &Drill) -> HitWindows {
        match self.window_mode {
            WindowMode::Od => HitWindows::from_od(self.od_override.unwrap_or(drill.od)),
            WindowMode::Preset => HitWindows::fixed_preset(),
        }
    }

    pub fn lookahead_for(&self, grid_cell_ms: Option<Millis>) -> Millis {
        match (self.lookahead_ms, grid_cell_ms) {
            (Some(fixed), _) => fixed,
            (None, Some(cell)) => cell * self.travel_cells as f64,
            (None, None) => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Capacity of the recent-offsets ring used by live visualizations.
    pub recent_capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recent_capacity: 120,
        }
    }
}

/// Hand-tuned analytics constants. They encode product behaviour, not derived
/// invariants, so each is overridable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub histogram_bin_ms: u32,
    pub segments: usize,
    pub consistency_penalty: f64,
    pub gallop_min_taps: usize,
    pub gallop_min_per_channel: usize,
    pub gallop_bias_divisor_ms: f64,
    pub gallop_interval_threshold_ms: f64,
    pub gallop_confidence_taps: f64,
    pub gallop_bias_weight: f64,
    pub gallop_irregularity_weight: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            histogram_bin_ms: 5,
            segments: 10,
            consistency_penalty: 5.0,
            gallop_min_taps: 30,
            gallop_min_per_channel: 5,
            gallop_bias_divisor_ms: 15.0,
            gallop_interval_threshold_ms: 3.0,
            gallop_confidence_taps: 200.0,
            gallop_bias_weight: 0.6,
            gallop_irregularity_weight: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ends the session this long after it starts, even with notes left.
    pub time_limit_ms: Option<Millis>,
}

impl TrainerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        info!("[Config] Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Like [`load_from_file`](Self::load_from_file) but falls back to the
    /// defaults, logging why.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("[Config] {err}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analytics;
        if a.histogram_bin_ms == 0 {
            return Err(ConfigError::Invalid("analytics.histogram_bin_ms must be > 0".into()));
        }
        if a.segments == 0 {
            return Err(ConfigError::Invalid("analytics.segments must be > 0".into()));
        }
        if !(a.gallop_bias_divisor_ms > 0.0) || !(a.gallop_confidence_taps > 0.0) {
            return Err(ConfigError::Invalid(
                "analytics gallop divisors must be > 0".into(),
            ));
        }
        if self.recorder.recent_capacity == 0 {
            return Err(ConfigError::Invalid("recorder.recent_capacity must be > 0".into()));
        }
        if let Some(lookahead) = self.matcher.lookahead_ms {
            if !(lookahead >= 0.0) {
                return Err(ConfigError::Invalid("matcher.lookahead_ms must be >= 0".into()));
            }
        }
        Ok(())
    }
}
