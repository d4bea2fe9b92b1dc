//! Six-axis pose record.
//!
//! Indices 0..3 are translation (x, y, z), 3..6 are rotation (yaw, pitch,
//! roll) in degrees. Poses are plain values: the pipeline builds a fresh one
//! every cycle and only copies ever leave the producer thread.

use std::fmt;
use std::ops::{Index, IndexMut};

use drishti_math::{DMat, Vec3};
use serde::{Deserialize, Serialize};

/// Number of pose axes.
pub const AXIS_COUNT: usize = 6;

/// Named pose axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    TX = 0,
    TY = 1,
    TZ = 2,
    Yaw = 3,
    Pitch = 4,
    Roll = 5,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; AXIS_COUNT] = [
        Axis::TX,
        Axis::TY,
        Axis::TZ,
        Axis::Yaw,
        Axis::Pitch,
        Axis::Roll,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Axis at `index`, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Axis::TX => "x",
            Axis::TY => "y",
            Axis::TZ => "z",
            Axis::Yaw => "yaw",
            Axis::Pitch => "pitch",
            Axis::Roll => "roll",
        }
    }

    /// True for the three rotation axes.
    pub const fn is_rotation(self) -> bool {
        matches!(self, Axis::Yaw | Axis::Pitch | Axis::Roll)
    }
}

/// Six-axis pose: translation then rotation (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose([f64; AXIS_COUNT]);

impl Pose {
    #[inline]
    pub const fn new(values: [f64; AXIS_COUNT]) -> Self {
        Self(values)
    }

    /// Neutral pose, all axes 0.
    #[inline]
    pub const fn zero() -> Self {
        Self([0.0; AXIS_COUNT])
    }

    /// Assemble from a translation and a (yaw, pitch, roll) vector in degrees.
    pub fn from_parts(translation: &Vec3, rotation_deg: &Vec3) -> Self {
        Self([
            translation.x(),
            translation.y(),
            translation.z(),
            rotation_deg.x(),
            rotation_deg.y(),
            rotation_deg.z(),
        ])
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::from_xyz(self.0[0], self.0[1], self.0[2])
    }

    /// (yaw, pitch, roll) in degrees.
    pub fn rotation(&self) -> Vec3 {
        Vec3::from_xyz(self.0[3], self.0[4], self.0[5])
    }

    pub fn set_translation(&mut self, t: &Vec3) {
        self.0[0] = t.x();
        self.0[1] = t.y();
        self.0[2] = t.z();
    }

    #[inline]
    pub fn as_array(&self) -> &[f64; AXIS_COUNT] {
        &self.0
    }

    #[inline]
    pub fn to_array(self) -> [f64; AXIS_COUNT] {
        self.0
    }

    /// True when no axis is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }
}

impl From<[f64; AXIS_COUNT]> for Pose {
    fn from(values: [f64; AXIS_COUNT]) -> Self {
        Self(values)
    }
}

impl From<Pose> for DMat<AXIS_COUNT, 1> {
    fn from(pose: Pose) -> Self {
        DMat::from_column(pose.0)
    }
}

impl From<DMat<AXIS_COUNT, 1>> for Pose {
    fn from(v: DMat<AXIS_COUNT, 1>) -> Self {
        Self(std::array::from_fn(|i| v[i]))
    }
}

impl Index<usize> for Pose {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Pose {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl Index<Axis> for Pose {
    type Output = f64;

    #[inline]
    fn index(&self, axis: Axis) -> &f64 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for Pose {
    #[inline]
    fn index_mut(&mut self, axis: Axis) -> &mut f64 {
        &mut self.0[axis.index()]
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={:.2} y={:.2} z={:.2} yaw={:.2} pitch={:.2} roll={:.2}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}
