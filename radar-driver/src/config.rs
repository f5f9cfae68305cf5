use crate::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_FADE_TIME_SECS, DEFAULT_MAX_DISTANCE, DEFAULT_READ_TIMEOUT_MS,
    DEFAULT_RENDER_INTERVAL_MS, DEFAULT_SNAPSHOT_QUEUE, MAX_SNAPSHOT_QUEUE,
};
use crate::error::{RadarError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Driver settings. Every field has a default, so a TOML file only needs the
/// keys it wants to change.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Seconds after which an unrefreshed detection fades out.
    pub fade_time_secs: f64,
    /// Largest distance the device can report. Readings at this value mean "no detection".
    pub max_distance: f64,
    /// Period of snapshots published while no data arrives.
    pub render_interval_ms: u64,
    /// Upper bound on a single transport read, and so on the latency of a stop request.
    pub read_timeout_ms: u64,
    pub baud_rate: u32,
    /// Snapshots buffered for a slow renderer before the oldest is discarded.
    pub snapshot_queue: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            fade_time_secs: DEFAULT_FADE_TIME_SECS,
            max_distance: DEFAULT_MAX_DISTANCE,
            render_interval_ms: DEFAULT_RENDER_INTERVAL_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            baud_rate: DEFAULT_BAUD_RATE,
            snapshot_queue: DEFAULT_SNAPSHOT_QUEUE,
        }
    }
}

impl DriverConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        DriverConfig::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DriverConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Also rules out NaN, infinity and values too large for a Duration
        if self.fade_time_secs <= 0.
            || Duration::try_from_secs_f64(self.fade_time_secs).is_err()
        {
            return Err(RadarError::InvalidConfig(format!(
                "fade_time_secs must be a positive number of seconds, got {}",
                self.fade_time_secs
            )));
        }
        if !self.max_distance.is_finite() || self.max_distance <= 0. {
            return Err(RadarError::InvalidConfig(format!(
                "max_distance must be positive, got {}",
                self.max_distance
            )));
        }
        if self.render_interval_ms == 0 {
            return Err(RadarError::InvalidConfig(
                "render_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(RadarError::InvalidConfig(
                "read_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.snapshot_queue == 0 || self.snapshot_queue > MAX_SNAPSHOT_QUEUE {
            return Err(RadarError::InvalidConfig(format!(
                "snapshot_queue must be within 1..={}, got {}",
                MAX_SNAPSHOT_QUEUE, self.snapshot_queue
            )));
        }
        Ok(())
    }

    /// Fade time as a `Duration`. Values `validate` rejects saturate instead of panicking.
    pub fn fade_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.fade_time_secs).unwrap_or(Duration::MAX)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
