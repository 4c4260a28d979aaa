//! # Math Helpers
//!
//! Thin wrappers over `glam` that never produce NaN for degenerate input.

use config::constants::MAG_THRESHOLD;
use glam::{DQuat, DVec3};

/// Normalizes a vector, returning zero when its length is below
/// [`MAG_THRESHOLD`].
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use prim_mesher::math::normalize_or_zero;
///
/// assert_eq!(normalize_or_zero(DVec3::new(0.0, 3.0, 4.0)), DVec3::new(0.0, 0.6, 0.8));
/// assert_eq!(normalize_or_zero(DVec3::splat(1e-9)), DVec3::ZERO);
/// ```
#[inline]
pub fn normalize_or_zero(v: DVec3) -> DVec3 {
    let mag = v.length();
    if mag > MAG_THRESHOLD {
        v / mag
    } else {
        DVec3::ZERO
    }
}

/// Normalizes a quaternion, falling back to the identity rotation when its
/// magnitude is below [`MAG_THRESHOLD`].
#[inline]
pub fn normalize_quat(q: DQuat) -> DQuat {
    let mag = q.length();
    if mag > MAG_THRESHOLD {
        DQuat::from_xyzw(q.x / mag, q.y / mag, q.z / mag, q.w / mag)
    } else {
        DQuat::IDENTITY
    }
}

/// Builds a unit rotation of `angle` radians about `axis`.
///
/// The axis does not need to be normalized. A zero axis yields the identity.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use prim_mesher::math::quat_from_axis_angle;
///
/// let q = quat_from_axis_angle(DVec3::Z, std::f64::consts::FRAC_PI_2);
/// let v = q * DVec3::X;
/// assert!((v - DVec3::Y).length() < 1e-12);
/// ```
pub fn quat_from_axis_angle(axis: DVec3, angle: f64) -> DQuat {
    let axis = normalize_or_zero(axis);
    if axis == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let half = angle * 0.5;
    let (s, c) = half.sin_cos();
    normalize_quat(DQuat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c))
}

/// Unit normal of the triangle `a, b, c` following the right-hand rule.
///
/// Zero-area triangles return the zero vector.
#[inline]
pub fn triangle_normal(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    normalize_or_zero((b - a).cross(c - a))
}

/// Per-axis factors that carry normals through the scale `factors`.
///
/// This is the diagonal of the cofactor matrix, so a zero factor flattens
/// normals onto that axis instead of dividing by zero.
#[inline]
pub fn normal_scale(factors: DVec3) -> DVec3 {
    DVec3::new(
        factors.y * factors.z,
        factors.x * factors.z,
        factors.x * factors.y,
    )
}
