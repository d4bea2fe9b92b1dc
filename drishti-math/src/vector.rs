//! Vector-shaped helpers: named components, dot and cross products.
//!
//! A vector is any `Mat` with one row or one column. The methods here live
//! on every `Mat` but assert the shape at build time, so calling `z()` on a
//! 2-vector or `dot()` on a 3×3 does not compile.

use crate::mat::Mat;
use crate::scalar::Scalar;

impl<T: Scalar, const R: usize, const C: usize> Mat<T, R, C> {
    /// Component `i` of a vector.
    #[inline]
    pub fn at(&self, i: usize) -> T {
        const { assert!(R == 1 || C == 1, "at() requires a vector shape") };
        self[i]
    }

    /// Number of components of a vector.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        const { assert!(R == 1 || C == 1, "len() requires a vector shape") };
        R * C
    }

    #[inline]
    pub fn x(&self) -> T {
        const { assert!(R == 1 || C == 1, "x() requires a vector shape") };
        self[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        const { assert!((R == 1 || C == 1) && R * C >= 2, "y() requires a vector of length >= 2") };
        self[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        const { assert!((R == 1 || C == 1) && R * C >= 3, "z() requires a vector of length >= 3") };
        self[2]
    }

    #[inline]
    pub fn w(&self) -> T {
        const { assert!((R == 1 || C == 1) && R * C >= 4, "w() requires a vector of length >= 4") };
        self[3]
    }

    #[inline]
    pub fn x_mut(&mut self) -> &mut T {
        const { assert!(R == 1 || C == 1, "x_mut() requires a vector shape") };
        &mut self[0]
    }

    #[inline]
    pub fn y_mut(&mut self) -> &mut T {
        const { assert!((R == 1 || C == 1) && R * C >= 2, "y_mut() requires a vector of length >= 2") };
        &mut self[1]
    }

    #[inline]
    pub fn z_mut(&mut self) -> &mut T {
        const { assert!((R == 1 || C == 1) && R * C >= 3, "z_mut() requires a vector of length >= 3") };
        &mut self[2]
    }

    #[inline]
    pub fn w_mut(&mut self) -> &mut T {
        const { assert!((R == 1 || C == 1) && R * C >= 4, "w_mut() requires a vector of length >= 4") };
        &mut self[3]
    }

    /// Sum of elementwise products.
    ///
    /// Both operands share one type, so a row vector only dots with a row
    /// vector of the same length (and likewise for columns).
    ///
    /// ```
    /// use drishti_math::DMat;
    ///
    /// let a = DMat::new([[1.0], [2.0], [3.0]]);
    /// let b = DMat::new([[4.0], [5.0], [6.0]]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    pub fn dot(&self, other: &Self) -> T {
        const { assert!(R == 1 || C == 1, "dot() requires vector operands") };
        let mut acc = T::ZERO;
        for i in 0..R * C {
            acc += self[i] * other[i];
        }
        acc
    }

    /// 3D cross product. Either operand may be a row or a column 3-vector;
    /// the result takes the orientation of `other`.
    ///
    /// ```
    /// use drishti_math::DMat;
    ///
    /// let x = DMat::new([[1.0, 0.0, 0.0]]);
    /// let y = DMat::new([[0.0], [1.0], [0.0]]);
    /// let z: DMat<3, 1> = x.cross(&y);
    /// assert_eq!(z, DMat::new([[0.0], [0.0], [1.0]]));
    /// ```
    pub fn cross<const R2: usize, const C2: usize>(&self, other: &Mat<T, R2, C2>) -> Mat<T, R2, C2> {
        const { assert!((R == 3 && C == 1) || (R == 1 && C == 3), "cross() requires a 3-vector") };
        const {
            assert!(
                (R2 == 3 && C2 == 1) || (R2 == 1 && C2 == 3),
                "cross() requires a 3-vector operand"
            )
        };
        Mat::from_column_major([
            self.y() * other.z() - other.y() * self.z(),
            other.x() * self.z() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        ])
    }
}

impl<T: Scalar, const N: usize> Mat<T, N, 1> {
    /// Column vector from its components.
    #[inline]
    pub fn from_column(values: [T; N]) -> Self {
        Self::from_column_major(values)
    }
}

impl<T: Scalar, const N: usize> Mat<T, 1, N> {
    /// Row vector from its components.
    #[inline]
    pub fn from_row(values: [T; N]) -> Self {
        Self::new([values])
    }
}

impl<T: Scalar> Mat<T, 3, 1> {
    /// Column 3-vector.
    #[inline]
    pub fn from_xyz(x: T, y: T, z: T) -> Self {
        Self::new([[x], [y], [z]])
    }
}
