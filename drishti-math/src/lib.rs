//! Drishti math - fixed-shape matrix algebra for head tracking
//!
//! A small, dependency-light linear algebra layer sized for 6-DoF pose work:
//!
//! - [`Mat<T, R, C>`]: dense matrix whose shape is part of the type. Shape
//!   mismatches (adding a 3×1 to a 1×3, multiplying 2×3 by 2×3, taking
//!   `z()` of a 2-vector, building a 3×3 from 8 elements) fail to compile.
//! - Vector helpers: named components, [`Mat::dot`], [`Mat::cross`].
//! - [`rotation`]: rotation matrix ⇄ (yaw, pitch, roll) conversions.
//!
//! ```
//! use drishti_math::{Mat3, Vec3, euler_to_rmat, rmat_to_euler};
//!
//! let r: Mat3 = euler_to_rmat(20.0, -5.0, 3.0);
//! let angles: Vec3 = rmat_to_euler(&r);
//! assert!((angles.x().to_degrees() - 20.0).abs() < 1e-9);
//! ```

pub mod mat;
pub mod ops;
pub mod rotation;
pub mod scalar;
pub mod vector;

pub use mat::{DMat, Mat};
pub use rotation::{Mat3, Vec3, euler_to_rmat, euler_vec_to_rmat, rmat_to_euler};
pub use scalar::Scalar;
