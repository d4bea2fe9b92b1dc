//! Response curve trait

use std::sync::atomic::{AtomicBool, Ordering};

/// Per-axis response curve.
///
/// Curves are shared between the tracker thread and whoever configures or
/// displays them, so the trait takes `&self`; implementations keep their
/// mutable bits behind atomics or locks.
pub trait Curve: Send + Sync {
    /// Mark whether this curve is the one currently driving its axis.
    fn set_active(&self, active: bool);

    /// Map an input value to an output value.
    fn evaluate(&self, x: f64) -> f64;
}

/// Pass-through curve.
#[derive(Debug, Default)]
pub struct IdentityCurve {
    active: AtomicBool,
}

impl IdentityCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

impl Curve for IdentityCurve {
    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passes_through() {
        let curve = IdentityCurve::new();
        for x in [-180.0, -0.5, 0.0, 42.0] {
            assert_eq!(curve.evaluate(x), x);
        }
    }

    #[test]
    fn test_activity_flag() {
        let curve = IdentityCurve::new();
        assert!(!curve.is_active());
        curve.set_active(true);
        assert!(curve.is_active());
        curve.set_active(false);
        assert!(!curve.is_active());
    }
}
