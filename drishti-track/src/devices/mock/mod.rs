//! Hardware-free sample source
//!
//! [`SyntheticHead`] plays back smooth, seeded head motion with sensor
//! noise and random per-axis dropouts, so the tracking loop and the daemon
//! can run without a camera.

mod config;
mod head;
mod noise;

pub use config::SyntheticHeadConfig;
pub use head::SyntheticHead;
pub use noise::NoiseGenerator;
