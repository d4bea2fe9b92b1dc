//! Collaborator traits
//!
//! The tracking loop talks to the outside world only through these seams:
//! a sample source feeding raw 6-axis readings, an optional smoothing
//! filter, per-axis response curves and an output protocol.

pub mod curve;
pub mod filter;
pub mod protocol;
pub mod source;

pub use curve::{Curve, IdentityCurve};
pub use filter::PoseFilter;
pub use protocol::{LogProtocol, Protocol};
pub use source::SampleSource;
