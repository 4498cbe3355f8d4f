use serde::Deserialize;
use thiserror::Error;

use crate::tracker::{Axis, TrackerSettings};

/// Pulse widths outside this window are beyond what hobby servos accept.
pub const SERVO_PULSE_MIN_US: u16 = 500;
pub const SERVO_PULSE_MAX_US: u16 = 2500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{axis} bounds {low}-{high}us outside 500-2500us")]
    AxisBounds { axis: Axis, low: u16, high: u16 },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerSettings,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Period of the tracker loop when serving.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_tick_ms() -> u64 {
    10
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = SERVO_PULSE_MIN_US..=SERVO_PULSE_MAX_US;
        for axis in Axis::ALL {
            let bounds = self.tracker.bounds(axis);
            if !window.contains(&bounds.low) || !window.contains(&bounds.high) {
                return Err(ConfigError::AxisBounds {
                    axis,
                    low: bounds.low,
                    high: bounds.high,
                });
            }
        }
        Ok(())
    }
}
