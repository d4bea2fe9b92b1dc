//! Frame conversions used by the tracking pipeline.

use drishti_math::{Mat3, Vec3, euler_to_rmat};

use crate::config::{CameraOffsets, CenterMethod};

/// Rotation from the camera mount angles.
///
/// Yaw and pitch are negated: the camera looking down by `p` degrees makes
/// the head appear pitched up by `p`.
pub fn camera_rotation(camera: &CameraOffsets) -> Mat3 {
    euler_to_rmat(-camera.yaw, -camera.pitch, camera.roll)
}

/// Rotate a translation by `rmat` in the tracker's axis convention.
///
/// The rotation matrices treat (forward, left, up) as their (x, y, z) while
/// poses carry (right, down, forward), so the vector is reordered before and
/// after the product. With `lock_z` the output keeps the input's z.
pub fn t_compensate(rmat: &Mat3, xyz: &Vec3, lock_z: bool) -> Vec3 {
    let v = Vec3::from_xyz(xyz.z(), -xyz.x(), -xyz.y());
    let ret = *rmat * v;
    let z = if lock_z { xyz.z() } else { ret.x() };
    Vec3::from_xyz(-ret.y(), -ret.z(), z)
}

/// Rotation of `r` relative to the centering baseline `baseline`.
pub fn relative_rotation(r: &Mat3, baseline: &Mat3, method: CenterMethod) -> Mat3 {
    match method {
        CenterMethod::Head => *r * baseline.transpose(),
        CenterMethod::Camera => baseline.transpose() * *r,
    }
}
