//! Fixed-shape matrix type.
//!
//! Shape lives in the type: `Mat<T, R, C>` is `R` rows by `C` columns.
//! Constraints that Rust cannot express as trait bounds (flat buffer length,
//! vector-only accessors) are `const` assertions, so a violation fails the
//! build when the offending call is instantiated. There is no run-time shape
//! error path.

use std::ops::{Index, IndexMut};

use approx::{AbsDiffEq, RelativeEq};

use crate::scalar::Scalar;

/// Dense `R × C` matrix stored row by row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat<T, const R: usize, const C: usize> {
    pub(crate) data: [[T; C]; R],
}

/// Double-precision matrix.
pub type DMat<const R: usize, const C: usize> = Mat<f64, R, C>;

impl<T: Scalar, const R: usize, const C: usize> Mat<T, R, C> {
    /// Build from nested row literals.
    ///
    /// ```
    /// use drishti_math::DMat;
    ///
    /// let m = DMat::new([[1.0, 2.0], [3.0, 4.0]]);
    /// assert_eq!(m[(1, 0)], 3.0);
    /// ```
    #[inline]
    pub fn new(data: [[T; C]; R]) -> Self {
        const { assert!(R > 0 && C > 0, "matrix dimensions must be positive") };
        Self { data }
    }

    /// All-zero matrix.
    #[inline]
    pub fn zeros() -> Self {
        Self::new([[T::ZERO; C]; R])
    }

    /// Build from a flat buffer laid out column after column.
    ///
    /// `N` must equal `R * C`; anything else is rejected at build time.
    ///
    /// ```
    /// use drishti_math::DMat;
    ///
    /// let m: DMat<2, 3> = DMat::from_column_major([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 1)], 3.0);
    /// assert_eq!(m[(1, 2)], 6.0);
    /// ```
    pub fn from_column_major<const N: usize>(buf: [T; N]) -> Self {
        const { assert!(N == R * C, "buffer length must equal rows * cols") };
        let mut ret = Self::zeros();
        for j in 0..R {
            for i in 0..C {
                ret.data[j][i] = buf[i * R + j];
            }
        }
        ret
    }

    /// Build from a flat buffer laid out row after row.
    pub fn from_row_major<const N: usize>(buf: [T; N]) -> Self {
        const { assert!(N == R * C, "buffer length must equal rows * cols") };
        let mut ret = Self::zeros();
        for j in 0..R {
            for i in 0..C {
                ret.data[j][i] = buf[j * C + i];
            }
        }
        ret
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> usize {
        R
    }

    /// Number of columns.
    #[inline]
    pub const fn cols(&self) -> usize {
        C
    }

    /// Element at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row][col]
    }

    /// Overwrite the element at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row][col] = value;
    }

    /// Borrow the rows.
    #[inline]
    pub fn as_rows(&self) -> &[[T; C]; R] {
        &self.data
    }

    /// Copy out row `j` as a row vector.
    pub fn row(&self, j: usize) -> Mat<T, 1, C> {
        Mat::new([self.data[j]])
    }

    /// Copy out column `i` as a column vector.
    pub fn column(&self, i: usize) -> Mat<T, R, 1> {
        let mut ret = Mat::zeros();
        for j in 0..R {
            ret.data[j][0] = self.data[j][i];
        }
        ret
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> Mat<T, C, R> {
        let mut ret = Mat::zeros();
        for j in 0..R {
            for i in 0..C {
                ret.data[i][j] = self.data[j][i];
            }
        }
        ret
    }

    /// Apply `f` to every element.
    pub fn map(&self, mut f: impl FnMut(T) -> T) -> Self {
        let mut ret = *self;
        for v in ret.data.iter_mut().flatten() {
            *v = f(*v);
        }
        ret
    }

    /// Combine two same-shape matrices element by element.
    pub fn zip_map(&self, other: &Self, mut f: impl FnMut(T, T) -> T) -> Self {
        let mut ret = *self;
        for (v, o) in ret.data.iter_mut().flatten().zip(other.data.iter().flatten()) {
            *v = f(*v, *o);
        }
        ret
    }

    /// Iterate elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter().flatten()
    }

    /// True when no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }
}

impl<T: Scalar, const N: usize> Mat<T, N, N> {
    /// Square identity matrix.
    pub fn identity() -> Self {
        let mut ret = Self::zeros();
        for i in 0..N {
            ret.data[i][i] = T::ONE;
        }
        ret
    }
}

impl<T: Scalar, const R: usize, const C: usize> Default for Mat<T, R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Mat<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row][col]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Mat<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[row][col]
    }
}

/// Linear indexing, vectors only.
impl<T, const R: usize, const C: usize> Index<usize> for Mat<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        const { assert!(R == 1 || C == 1, "linear indexing requires a vector shape") };
        if C == 1 { &self.data[i][0] } else { &self.data[0][i] }
    }
}

impl<T, const R: usize, const C: usize> IndexMut<usize> for Mat<T, R, C> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        const { assert!(R == 1 || C == 1, "linear indexing requires a vector shape") };
        if C == 1 {
            &mut self.data[i][0]
        } else {
            &mut self.data[0][i]
        }
    }
}

impl<T, const R: usize, const C: usize> AbsDiffEq for Mat<T, R, C>
where
    T: AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T, const R: usize, const C: usize> RelativeEq for Mat<T, R, C>
where
    T: RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
