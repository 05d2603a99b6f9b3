//! Animation configuration.
//!
//! Holds the tunable settings of an animation session
//! (worker count, iteration count, kernel choice, resolution scale) plus the
//! trajectory bounds. Loaded from JSON and validated before a session starts.

use crate::{ConfigError, RenderOptions, TrajectoryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Frames between two FPS reports.
pub const DEFAULT_FPS_REPORT_INTERVAL: u32 = 10;

/// Fallback when the platform cannot report its core count.
const FALLBACK_HARDWARE_CONCURRENCY: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Number of workers the pool converges to while running.
    pub desired_worker_count: usize,
    /// Upper bound on concurrent workers.
    /// Zero: use the hardware concurrency.
    pub max_workers: usize,
    pub render_options: RenderOptions,
    /// Logical surface width before `scale_percent` is applied.
    pub width: u32,
    /// Logical surface height before `scale_percent` is applied.
    pub height: u32,
    /// Resolution multiplier in percent (100 = one pixel per logical pixel).
    pub scale_percent: u32,
    pub trajectory: TrajectoryConfig,
    pub fps_report_interval: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            desired_worker_count: 1,
            max_workers: 0,
            render_options: RenderOptions::default(),
            width: 600,
            height: 400,
            scale_percent: 100,
            trajectory: TrajectoryConfig::default(),
            fps_report_interval: DEFAULT_FPS_REPORT_INTERVAL,
        }
    }
}

impl AnimationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Maximum worker count with the hardware-concurrency default resolved.
    pub fn resolved_max_workers(&self) -> usize {
        if self.max_workers > 0 {
            return self.max_workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(FALLBACK_HARDWARE_CONCURRENCY)
    }

    /// Pixel dimensions of the rendering surface after scaling.
    pub fn surface_size(&self) -> (u32, u32) {
        let ratio = self.scale_percent as f64 / 100.0;
        (
            (self.width as f64 * ratio).ceil() as u32,
            (self.height as f64 * ratio).ceil() as u32,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.scale_percent == 0 {
            return Err(ConfigError::Invalid("scale_percent must be positive".into()));
        }
        if self.render_options.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be positive".into()));
        }
        if self.trajectory.steps == 0 {
            return Err(ConfigError::Invalid("trajectory steps must be positive".into()));
        }
        if self.fps_report_interval == 0 {
            return Err(ConfigError::Invalid(
                "fps_report_interval must be positive".into(),
            ));
        }
        let max = self.resolved_max_workers();
        if self.desired_worker_count > max {
            return Err(ConfigError::Invalid(format!(
                "desired_worker_count {} exceeds max_workers {}",
                self.desired_worker_count, max
            )));
        }
        Ok(())
    }
}
