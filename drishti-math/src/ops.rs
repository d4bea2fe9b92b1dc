//! Arithmetic operators.
//!
//! Matrix-matrix operators are generic over [`Scalar`]. Matrix-scalar
//! operators are generated per concrete element type.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::mat::Mat;
use crate::scalar::Scalar;

impl<T: Scalar, const R: usize, const C: usize> Add for Mat<T, R, C> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_map(&rhs, |a, b| a + b)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Sub for Mat<T, R, C> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip_map(&rhs, |a, b| a - b)
    }
}

impl<T: Scalar, const R: usize, const C: usize> AddAssign for Mat<T, R, C> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar, const R: usize, const C: usize> SubAssign for Mat<T, R, C> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Scalar, const R: usize, const C: usize> Neg for Mat<T, R, C> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

/// `(h × w) * (w × p) → (h × p)`, plain triple loop.
impl<T: Scalar, const H: usize, const W: usize, const P: usize> Mul<Mat<T, W, P>>
    for Mat<T, H, W>
{
    type Output = Mat<T, H, P>;

    fn mul(self, rhs: Mat<T, W, P>) -> Mat<T, H, P> {
        let mut ret = Mat::zeros();
        for k in 0..H {
            for i in 0..P {
                let mut acc = T::ZERO;
                for j in 0..W {
                    acc += self.data[k][j] * rhs.data[j][i];
                }
                ret.data[k][i] = acc;
            }
        }
        ret
    }
}

macro_rules! impl_scalar_ops {
    ($($t:ty),*) => {
        $(
            impl<const R: usize, const C: usize> Add<$t> for Mat<$t, R, C> {
                type Output = Self;

                #[inline]
                fn add(self, rhs: $t) -> Self {
                    self.map(|v| v + rhs)
                }
            }

            impl<const R: usize, const C: usize> Sub<$t> for Mat<$t, R, C> {
                type Output = Self;

                #[inline]
                fn sub(self, rhs: $t) -> Self {
                    self.map(|v| v - rhs)
                }
            }

            impl<const R: usize, const C: usize> Mul<$t> for Mat<$t, R, C> {
                type Output = Self;

                #[inline]
                fn mul(self, rhs: $t) -> Self {
                    self.map(|v| v * rhs)
                }
            }

            impl<const R: usize, const C: usize> Mul<Mat<$t, R, C>> for $t {
                type Output = Mat<$t, R, C>;

                #[inline]
                fn mul(self, rhs: Mat<$t, R, C>) -> Mat<$t, R, C> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_ops!(f32, f64);
