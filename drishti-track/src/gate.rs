//! Numeric validity gate.
//!
//! All NaN/Inf handling of the tracking pipeline goes through one
//! [`ValidityGate`], at three fixed checkpoints. A rejected value is replaced
//! as a whole by the caller's last known-good value; axes are never patched
//! individually here.

use std::time::{Duration, Instant};

use drishti_math::{Mat, Scalar};

use crate::pose::Pose;

/// Minimum spacing between rejection warnings.
const WARN_INTERVAL: Duration = Duration::from_secs(1);

/// Values the gate can check.
pub trait Finite {
    fn is_finite(&self) -> bool;
}

impl Finite for f64 {
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Finite for Pose {
    fn is_finite(&self) -> bool {
        Pose::is_finite(self)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Finite for Mat<T, R, C> {
    fn is_finite(&self) -> bool {
        Mat::is_finite(self)
    }
}

impl<A: Finite, B: Finite> Finite for (A, B) {
    fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

/// Where in the cycle a value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// Accumulated raw sample, before any transform.
    Ingest,
    /// Centered pose, before filtering and mapping.
    Transform,
    /// Final mapped pose, before it is forwarded.
    Mapping,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 3] = [Checkpoint::Ingest, Checkpoint::Transform, Checkpoint::Mapping];

    const fn slot(self) -> usize {
        match self {
            Checkpoint::Ingest => 0,
            Checkpoint::Transform => 1,
            Checkpoint::Mapping => 2,
        }
    }
}

/// Rejection counter with throttled warnings.
#[derive(Debug, Default)]
pub struct ValidityGate {
    rejected: [u64; 3],
    last_warn: Option<Instant>,
}

impl ValidityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `value` is finite; otherwise counts a rejection at
    /// `checkpoint`.
    pub fn check<V: Finite>(&mut self, checkpoint: Checkpoint, value: &V) -> bool {
        if value.is_finite() {
            return true;
        }
        self.reject(checkpoint);
        false
    }

    /// `value` if finite, `fallback` otherwise.
    pub fn admit<V: Finite>(&mut self, checkpoint: Checkpoint, value: V, fallback: V) -> V {
        if self.check(checkpoint, &value) {
            value
        } else {
            fallback
        }
    }

    /// Rejections seen at `checkpoint`.
    pub fn rejected(&self, checkpoint: Checkpoint) -> u64 {
        self.rejected[checkpoint.slot()]
    }

    /// Rejections over all checkpoints.
    pub fn total_rejected(&self) -> u64 {
        self.rejected.iter().sum()
    }

    fn reject(&mut self, checkpoint: Checkpoint) {
        self.rejected[checkpoint.slot()] += 1;

        let due = self
            .last_warn
            .is_none_or(|last| last.elapsed() >= WARN_INTERVAL);
        if due {
            log::warn!(
                "Gate: non-finite value at {:?}, falling back ({} ingest, {} transform, {} mapping)",
                checkpoint,
                self.rejected[0],
                self.rejected[1],
                self.rejected[2]
            );
            self.last_warn = Some(Instant::now());
        }
    }
}
