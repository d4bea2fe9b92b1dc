//! Configuration for Drishti
//!
//! Everything is loaded from one TOML file. Every section and field has a
//! default, so an empty file is a valid configuration.
//!
//! ```toml
//! [tracker]
//! period_ms = 3
//! center_method = "head"
//!
//! [tracker.camera]
//! yaw = 0.0
//! pitch = -10.0
//!
//! [source]
//! seed = 7
//!
//! [logging]
//! level = "debug"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::devices::mock::SyntheticHeadConfig;
use crate::error::{Error, Result};
use crate::mapping::AxisOptions;
use crate::pose::{AXIS_COUNT, Axis};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DrishtiConfig {
    pub tracker: TrackerSettings,
    pub source: SyntheticHeadConfig,
    pub logging: LoggingConfig,
}

/// Camera mounting angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraOffsets {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// How the centered rotation is expressed relative to the baseline `r_b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterMethod {
    /// `r · r_bᵀ`: rotation since centering, in the centered head's axes.
    #[default]
    Head,
    /// `r_bᵀ · r`: rotation since centering, in camera axes.
    Camera,
}

/// Tracking loop settings.
///
/// The tracker holds one immutable snapshot at a time; replacing it with
/// [`crate::Tracker::update_settings`] takes effect on the next cycle.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Centering convention.
    pub center_method: CenterMethod,
    /// Rotate the mapped translation into the mapped head orientation.
    pub time_compensation: bool,
    /// Keep the raw Z translation when compensating.
    pub lock_z: bool,
    /// Treat the first usable sample as the center.
    pub center_at_startup: bool,
    /// Cycle period in milliseconds.
    pub period_ms: u64,
    /// Camera mounting angles.
    pub camera: CameraOffsets,
    /// Output axes in [`Axis`] order.
    pub axes: [AxisOptions; AXIS_COUNT],
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            center_method: CenterMethod::default(),
            time_compensation: false,
            lock_z: false,
            center_at_startup: true,
            period_ms: 3,
            camera: CameraOffsets::default(),
            axes: AxisOptions::identity_layout(),
        }
    }
}

impl TrackerSettings {
    /// Cycle period.
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Options of one output axis.
    pub fn axis(&self, axis: Axis) -> &AxisOptions {
        &self.axes[axis.index()]
    }

    /// Reject settings the loop cannot run with.
    ///
    /// A source index past the last raw axis would be treated as unmapped at
    /// run time; rejecting it here surfaces the typo instead.
    pub fn validate(&self) -> Result<()> {
        if self.period_ms == 0 {
            return Err(Error::InvalidParameter(
                "tracker.period_ms must be at least 1".to_string(),
            ));
        }

        let CameraOffsets { yaw, pitch, roll } = self.camera;
        if ![yaw, pitch, roll].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidParameter(
                "tracker.camera angles must be finite".to_string(),
            ));
        }

        for (axis, options) in Axis::ALL.iter().zip(self.axes.iter()) {
            if let Some(source) = options.source
                && source >= AXIS_COUNT
            {
                return Err(Error::InvalidParameter(format!(
                    "axis {}: source index {} out of range (0..{})",
                    axis.name(),
                    source,
                    AXIS_COUNT
                )));
            }
            if !options.zero.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "axis {}: zero offset must be finite",
                    axis.name()
                )));
            }
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error); `RUST_LOG`
    /// still takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl DrishtiConfig {
    /// Load and validate configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use drishti_track::config::DrishtiConfig;
    ///
    /// let config = DrishtiConfig::from_file("drishti.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DrishtiConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()?;
        self.source.validate()
    }
}
