//! Element trait for fixed-shape matrices.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Numeric element stored in a [`Mat`](crate::Mat).
///
/// Implemented for `f32` and `f64`. Scalar-matrix operators are generated
/// per concrete type so they never overlap with matrix-matrix operators.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// False for NaN and ±Inf.
    fn is_finite(self) -> bool;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const ZERO: Self = 0.0;
                const ONE: Self = 1.0;

                #[inline]
                fn is_finite(self) -> bool {
                    <$t>::is_finite(self)
                }
            }
        )*
    };
}

impl_scalar!(f32, f64);
