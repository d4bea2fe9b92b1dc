//! Synthetic head motion
//!
//! Each axis oscillates around the configured rest pose on its own
//! frequency ratio and phase, so the combined motion does not repeat for a
//! long time. Gaussian noise is added on top and any axis may drop out
//! (report NaN) on a given fetch.

use std::f64::consts::TAU;
use std::time::Instant;

use super::config::SyntheticHeadConfig;
use super::noise::NoiseGenerator;
use crate::drivers::SampleSource;
use crate::pose::AXIS_COUNT;

/// Per-axis (frequency ratio, phase) pairs in x, y, z, yaw, pitch, roll order.
const HARMONICS: [(f64, f64); AXIS_COUNT] = [
    (0.7, 0.0),
    (1.3, 1.0),
    (0.9, 2.1),
    (1.0, 0.0),
    (0.6, 0.5),
    (0.4, 1.1),
];

/// Fractions of `translation_amplitude` applied to x, y, z.
const TRANSLATION_SHARE: [f64; 3] = [1.0, 0.5, 0.3];

/// Hardware-free [`SampleSource`].
pub struct SyntheticHead {
    config: SyntheticHeadConfig,
    noise: NoiseGenerator,
    start: Instant,
    fetches: u64,
    dropouts: u64,
}

impl SyntheticHead {
    pub fn new(config: SyntheticHeadConfig) -> Self {
        log::info!(
            "SyntheticHead: {:.2}Hz, amplitudes yaw={:.1} pitch={:.1} roll={:.1} deg, dropout={:.3}",
            config.frequency_hz,
            config.yaw_amplitude,
            config.pitch_amplitude,
            config.roll_amplitude,
            config.dropout_probability
        );
        let noise = NoiseGenerator::new(config.seed);
        Self {
            config,
            noise,
            start: Instant::now(),
            fetches: 0,
            dropouts: 0,
        }
    }

    /// Noise-free pose `t` seconds after start.
    pub fn pose_at(&self, t: f64) -> [f64; AXIS_COUNT] {
        let c = &self.config;
        let amplitudes = [
            c.translation_amplitude * TRANSLATION_SHARE[0],
            c.translation_amplitude * TRANSLATION_SHARE[1],
            c.translation_amplitude * TRANSLATION_SHARE[2],
            c.yaw_amplitude,
            c.pitch_amplitude,
            c.roll_amplitude,
        ];

        std::array::from_fn(|i| {
            let (ratio, phase) = HARMONICS[i];
            c.rest[i] + amplitudes[i] * (TAU * c.frequency_hz * ratio * t + phase).sin()
        })
    }

    /// Pose at `t` with noise and dropouts applied.
    pub fn sample_at(&mut self, t: f64) -> [f64; AXIS_COUNT] {
        let mut sample = self.pose_at(t);
        for (i, value) in sample.iter_mut().enumerate() {
            if self.noise.chance(self.config.dropout_probability) {
                *value = f64::NAN;
                self.dropouts += 1;
                continue;
            }
            let stddev = if i < 3 {
                self.config.translation_noise_stddev
            } else {
                self.config.rotation_noise_stddev
            };
            *value += self.noise.gaussian(stddev);
        }
        sample
    }

    /// Axis readings dropped so far.
    pub fn dropouts(&self) -> u64 {
        self.dropouts
    }

    pub fn fetches(&self) -> u64 {
        self.fetches
    }
}

impl SampleSource for SyntheticHead {
    fn fetch(&mut self) -> [f64; AXIS_COUNT] {
        self.fetches += 1;
        let t = self.start.elapsed().as_secs_f64();
        self.sample_at(t)
    }
}
