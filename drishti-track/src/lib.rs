//! Drishti - real-time head-tracking pose core
//!
//! Turns raw 6-DoF head samples into a centered, camera-corrected,
//! curve-mapped pose at a fixed cadence and publishes it for readers on
//! other threads.
//!
//! ## Layout
//!
//! - [`tracker`]: producer thread, state machine and control surface
//! - [`pipeline`]: per-cycle computation (centering, mapping, fallback)
//! - [`drivers`]: collaborator traits (sample source, filter, curves, protocol)
//! - [`devices::mock`]: synthetic head source for running without hardware
//! - [`config`]: TOML configuration

pub mod config;
pub mod devices;
pub mod drivers;
pub mod error;
pub mod gate;
pub mod mapping;
pub mod output;
pub mod pipeline;
pub mod pose;
pub mod tracker;
pub mod transform;

// Re-export commonly used types
pub use config::{CameraOffsets, CenterMethod, DrishtiConfig, TrackerSettings};
pub use error::{Error, Result};
pub use mapping::{AxisCurves, AxisOptions, MappingTable};
pub use output::OutputReader;
pub use pipeline::Collaborators;
pub use pose::{Axis, Pose};
pub use tracker::{Tracker, TrackerState};
