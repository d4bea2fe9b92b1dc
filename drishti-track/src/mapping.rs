//! Per-axis output mapping.
//!
//! Each output axis has configuration ([`AxisOptions`], reloadable with the
//! rest of the settings) and a pair of response curves ([`AxisCurves`],
//! fixed for the lifetime of the tracker). The alternate curve handles
//! negative inputs when the axis asks for it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::drivers::{Curve, IdentityCurve};
use crate::pose::AXIS_COUNT;

/// Configuration of one output axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    /// Raw sample index feeding this axis. `None` or out of range leaves
    /// the axis unmapped (always 0).
    pub source: Option<usize>,
    /// Negate the output.
    pub invert: bool,
    /// Offset added to the mapped value, before inversion.
    pub zero: f64,
    /// Use the alternate curve for negative inputs.
    pub alt: bool,
}

impl AxisOptions {
    /// Axis fed by raw index `source`, no offset, no inversion.
    pub fn from_source(source: usize) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    /// Identity layout: output axis `i` reads raw axis `i`.
    pub fn identity_layout() -> [Self; AXIS_COUNT] {
        std::array::from_fn(Self::from_source)
    }

    /// Source index if it addresses a raw axis.
    #[inline]
    pub fn source_index(&self) -> Option<usize> {
        self.source.filter(|&k| k < AXIS_COUNT)
    }

    /// `(value + zero) * (invert ? -1 : 1)`
    #[inline]
    pub fn apply_offset(&self, value: f64) -> f64 {
        let sign = if self.invert { -1.0 } else { 1.0 };
        (value + self.zero) * sign
    }
}

/// Primary and alternate response curves of one axis.
#[derive(Clone)]
pub struct AxisCurves {
    pub primary: Arc<dyn Curve>,
    pub alternate: Arc<dyn Curve>,
}

impl AxisCurves {
    pub fn new(primary: Arc<dyn Curve>, alternate: Arc<dyn Curve>) -> Self {
        Self { primary, alternate }
    }

    /// Pass-through curves.
    pub fn identity() -> Self {
        Self::new(Arc::new(IdentityCurve::new()), Arc::new(IdentityCurve::new()))
    }

    /// Select the curve for `value`, flag it active and the other inactive,
    /// and evaluate it.
    pub fn apply(&self, value: f64, use_alt: bool) -> f64 {
        let alt = use_alt && value < 0.0;
        self.primary.set_active(!alt);
        self.alternate.set_active(alt);
        if alt {
            self.alternate.evaluate(value)
        } else {
            self.primary.evaluate(value)
        }
    }

    pub fn deactivate(&self) {
        self.primary.set_active(false);
        self.alternate.set_active(false);
    }
}

/// The six per-axis curve pairs.
#[derive(Clone)]
pub struct MappingTable {
    axes: [AxisCurves; AXIS_COUNT],
}

impl MappingTable {
    pub fn new(axes: [AxisCurves; AXIS_COUNT]) -> Self {
        Self { axes }
    }

    /// All axes mapped through [`IdentityCurve`].
    pub fn identity() -> Self {
        Self::new(std::array::from_fn(|_| AxisCurves::identity()))
    }

    pub fn axis(&self, index: usize) -> &AxisCurves {
        &self.axes[index]
    }

    /// Map `value` on axis `index` through the curve its options select.
    #[inline]
    pub fn map(&self, index: usize, value: f64, options: &AxisOptions) -> f64 {
        self.axes[index].apply(value, options.alt)
    }

    /// Mark all twelve curves inactive.
    pub fn deactivate_all(&self) {
        for axis in &self.axes {
            axis.deactivate();
        }
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::identity()
    }
}
