//! Synthetic head configuration
//!
//! Every parameter has a default; `[source]` may be omitted entirely.
//!
//! | Parameter | Default | Unit |
//! |-----------|---------|------|
//! | rest | (0, 0, 50, 0, 0, 0) | cm / deg |
//! | yaw_amplitude | 30 | deg |
//! | pitch_amplitude | 15 | deg |
//! | roll_amplitude | 8 | deg |
//! | translation_amplitude | 4 | cm |
//! | frequency_hz | 0.2 | Hz |
//! | rotation_noise_stddev | 0.05 | deg |
//! | translation_noise_stddev | 0.02 | cm |
//! | dropout_probability | 0.01 | per axis, per fetch |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Synthetic head motion parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SyntheticHeadConfig {
    /// RNG seed; 0 draws from entropy
    #[serde(default)]
    pub seed: u64,

    /// Pose the motion oscillates around (x, y, z, yaw, pitch, roll)
    #[serde(default = "default_rest")]
    pub rest: [f64; 6],

    #[serde(default = "default_yaw_amplitude")]
    pub yaw_amplitude: f64,

    #[serde(default = "default_pitch_amplitude")]
    pub pitch_amplitude: f64,

    #[serde(default = "default_roll_amplitude")]
    pub roll_amplitude: f64,

    /// Peak translation on x; y and z move at fractions of it
    #[serde(default = "default_translation_amplitude")]
    pub translation_amplitude: f64,

    /// Base motion frequency
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,

    #[serde(default = "default_rotation_noise_stddev")]
    pub rotation_noise_stddev: f64,

    #[serde(default = "default_translation_noise_stddev")]
    pub translation_noise_stddev: f64,

    /// Chance that an axis reports NaN on a given fetch
    #[serde(default = "default_dropout_probability")]
    pub dropout_probability: f64,
}

fn default_rest() -> [f64; 6] {
    [0.0, 0.0, 50.0, 0.0, 0.0, 0.0]
}
fn default_yaw_amplitude() -> f64 {
    30.0
}
fn default_pitch_amplitude() -> f64 {
    15.0
}
fn default_roll_amplitude() -> f64 {
    8.0
}
fn default_translation_amplitude() -> f64 {
    4.0
}
fn default_frequency_hz() -> f64 {
    0.2
}
fn default_rotation_noise_stddev() -> f64 {
    0.05
}
fn default_translation_noise_stddev() -> f64 {
    0.02
}
fn default_dropout_probability() -> f64 {
    0.01
}

impl Default for SyntheticHeadConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            rest: default_rest(),
            yaw_amplitude: default_yaw_amplitude(),
            pitch_amplitude: default_pitch_amplitude(),
            roll_amplitude: default_roll_amplitude(),
            translation_amplitude: default_translation_amplitude(),
            frequency_hz: default_frequency_hz(),
            rotation_noise_stddev: default_rotation_noise_stddev(),
            translation_noise_stddev: default_translation_noise_stddev(),
            dropout_probability: default_dropout_probability(),
        }
    }
}

impl SyntheticHeadConfig {
    /// Noise-free, dropout-free motion; handy for deterministic runs.
    pub fn clean(seed: u64) -> Self {
        Self {
            seed,
            rotation_noise_stddev: 0.0,
            translation_noise_stddev: 0.0,
            dropout_probability: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let magnitudes = [
            ("yaw_amplitude", self.yaw_amplitude),
            ("pitch_amplitude", self.pitch_amplitude),
            ("roll_amplitude", self.roll_amplitude),
            ("translation_amplitude", self.translation_amplitude),
            ("frequency_hz", self.frequency_hz),
            ("rotation_noise_stddev", self.rotation_noise_stddev),
            ("translation_noise_stddev", self.translation_noise_stddev),
        ];
        for (name, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "source.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.dropout_probability) {
            return Err(Error::InvalidParameter(format!(
                "source.dropout_probability must be within [0, 1], got {}",
                self.dropout_probability
            )));
        }
        if !self.rest.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidParameter(
                "source.rest must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
