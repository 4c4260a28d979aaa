//! # Linear Extrusion
//!
//! Sweeps the profile along Z from `-0.5` to `0.5`.
//!
//! Each layer is tapered, twisted about Z and sheared toward
//! `(top_shear_x, top_shear_y)` in proportion to its step. The first layer
//! is flipped to become the bottom cap and the last layer is the top cap.

use std::f64::consts::PI;

use config::constants::{
    PRISM_TAPER_STEP_FACTOR, TAPER_THRESHOLD, TWIST_STEP_FACTOR, TWIST_STEP_THRESHOLD,
};
use glam::{DQuat, DVec3};

use super::{
    taper_scale, LayerPlacement, PrimMesh, Sweep, CIRCLE_SQUARE_HOLLOW_SCALE,
    HOLLOW_DIAGONAL_SCALE, SQUARE_HOLLOW_LIMIT, TRIANGLE_HOLLOW_SCALE,
};
use crate::angles::PolygonKind;
use crate::error::MeshError;
use crate::math::quat_from_axis_angle;

/// Number of linear steps for a sweep.
///
/// Tapered prisms get extra layers per unit of path length and twisted
/// sweeps get extra layers per radian of twist.
///
/// # Example
///
/// ```rust
/// use prim_mesher::prim_mesh::linear_step_count;
///
/// assert_eq!(linear_step_count(4, 0.0, 0.0, 1.0, 0.0), 1);
/// assert_eq!(linear_step_count(3, 0.5, 0.0, 1.0, 0.0), 4);
/// assert_eq!(linear_step_count(4, 0.0, 0.0, 1.0, std::f64::consts::PI), 13);
/// ```
pub fn linear_step_count(sides: u32, taper_x: f64, taper_y: f64, length: f64, twist_total: f64) -> u32 {
    let mut steps: u32 = 1;

    let tapered = taper_x.abs() > TAPER_THRESHOLD || taper_y.abs() > TAPER_THRESHOLD;
    if sides == 3 && tapered {
        steps = ((f64::from(steps) * PRISM_TAPER_STEP_FACTOR * length) as u32).max(1);
    }

    let twist = twist_total.abs();
    if twist > TWIST_STEP_THRESHOLD {
        steps += (twist * TWIST_STEP_FACTOR).ceil() as u32;
    }

    steps
}

/// Hollow size and initial profile rotation for a straight sweep.
fn linear_compensation(sides: u32, hollow_sides: u32, hollow: f64) -> (f64, Option<DQuat>) {
    let square_hollow = hollow_sides == 4;
    match PolygonKind::from_sides(sides) {
        PolygonKind::Triangle if square_hollow => {
            (hollow.min(SQUARE_HOLLOW_LIMIT) * HOLLOW_DIAGONAL_SCALE, None)
        }
        PolygonKind::Triangle => (hollow * TRIANGLE_HOLLOW_SCALE, None),
        PolygonKind::Square => {
            let hollow = if square_hollow {
                hollow
            } else {
                hollow * HOLLOW_DIAGONAL_SCALE
            };
            (hollow, Some(quat_from_axis_angle(DVec3::Z, 1.25 * PI)))
        }
        PolygonKind::Polygon24 if square_hollow => (hollow * CIRCLE_SQUARE_HOLLOW_SCALE, None),
        _ => (hollow, None),
    }
}

impl PrimMesh {
    /// Sweeps the profile along a straight path.
    ///
    /// Replaces the output buffers. Caps are always generated.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidArgument`] for non-finite parameters or an
    /// empty path cut.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prim_mesher::prim_mesh::PrimMesh;
    ///
    /// let mut prism = PrimMesh::new(3, 0.0, 1.0, 0.0, 3);
    /// prism.twist_end = 90;
    /// prism.extrude_linear().unwrap();
    /// assert!(prism.faces.len() > 8);
    /// ```
    pub fn extrude_linear(&mut self) -> Result<(), MeshError> {
        self.validate_path()?;
        self.begin_sweep();

        let length = self.path_cut_end - self.path_cut_begin;
        let twist_begin = f64::from(self.twist_range().0).to_radians();
        let twist_total = self.twist_total();
        let steps = linear_step_count(self.sides, self.taper_x, self.taper_y, length, twist_total);
        let step_size = length / f64::from(steps);

        let (hollow, initial_rotation) =
            linear_compensation(self.sides, self.hollow_sides, self.hollow);
        let profile = self.base_profile(hollow, true, initial_rotation)?;
        let mut sweep = Sweep::new(&profile, true);

        for step in 0..=steps {
            let percent = if step == steps {
                self.path_cut_end
            } else {
                self.path_cut_begin + f64::from(step) * step_size
            };
            let mut layer = profile.clone();

            let x_scale = taper_scale(self.taper_x, percent, 0.0);
            let y_scale = taper_scale(self.taper_y, percent, 0.0);
            if x_scale != 1.0 || y_scale != 1.0 {
                layer.scale(x_scale, y_scale);
            }

            let twist = twist_begin + twist_total * percent;
            if twist != 0.0 {
                layer.add_rot(quat_from_axis_angle(DVec3::Z, twist));
            }

            let shear = f64::from(step) / f64::from(steps);
            layer.add_pos(DVec3::new(
                shear * self.top_shear_x,
                shear * self.top_shear_y,
                -0.5 + percent,
            ));

            let placement = LayerPlacement {
                first: step == 0,
                last: step == steps,
                v: 1.0 - percent,
            };
            self.append_layer(layer, placement, &mut sweep);
        }

        self.finish_sweep(sweep, "linear");
        Ok(())
    }
}
