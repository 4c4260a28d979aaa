//! # Circular Extrusion
//!
//! Sweeps the profile around the X axis. The profile is turned to face the
//! path tangent at every layer, so a full untapered revolution closes on
//! itself.
//!
//! `hole_size_y` sets the path thickness: the ring is placed on a circle of
//! radius `0.5 - hole_size_y / 2` in the YZ plane. `radius` shrinks or grows
//! that circle along the path, `skew` and `top_shear_x` shift layers along X
//! and `top_shear_y` rotates the path start.

use std::f64::consts::{PI, TAU};

use config::constants::{
    CIRCULAR_TWIST_DOUBLING_FIRST, CIRCULAR_TWIST_DOUBLING_SECOND, RADIUS_THRESHOLD,
    SHEAR_COMPENSATION_FACTOR, TAPER_THRESHOLD, TOP_SHEAR_ANGLE_FACTOR,
};
use glam::{DQuat, DVec3};

use super::{
    taper_scale, LayerPlacement, PrimMesh, Sweep, HOLLOW_DIAGONAL_SCALE, SQUARE_HOLLOW_LIMIT,
    TRIANGLE_HOLLOW_SCALE,
};
use crate::angles::PolygonKind;
use crate::error::MeshError;
use crate::math::quat_from_axis_angle;

/// Sweep angles closer than this to a neighbouring layer are merged into it.
const ANGLE_SNAP: f64 = 1e-9;

/// Layers per revolution after accounting for twist.
///
/// Heavily twisted sweeps double their resolution once past 1.5π of twist
/// and again past 3π.
///
/// # Example
///
/// ```rust
/// use prim_mesher::prim_mesh::circular_steps_per_revolution;
///
/// assert_eq!(circular_steps_per_revolution(24, 0.0), 24);
/// assert_eq!(circular_steps_per_revolution(24, 2.0 * std::f64::consts::PI), 48);
/// assert_eq!(circular_steps_per_revolution(24, -4.0 * std::f64::consts::PI), 96);
/// ```
pub fn circular_steps_per_revolution(steps_per_revolution: u32, twist_total: f64) -> u32 {
    let twist = twist_total.abs();
    let mut steps = steps_per_revolution;
    if twist > CIRCULAR_TWIST_DOUBLING_FIRST {
        steps = steps.saturating_mul(2);
    }
    if twist > CIRCULAR_TWIST_DOUBLING_SECOND {
        steps = steps.saturating_mul(2);
    }
    steps
}

/// Hollow size and initial profile rotation for a circular sweep.
fn circular_compensation(sides: u32, hollow_sides: u32, hollow: f64) -> (f64, Option<DQuat>) {
    let square_hollow = hollow_sides == 4;
    let (hollow, angle) = match PolygonKind::from_sides(sides) {
        PolygonKind::Triangle if square_hollow => {
            (hollow.min(SQUARE_HOLLOW_LIMIT) * HOLLOW_DIAGONAL_SCALE, PI)
        }
        PolygonKind::Triangle => (hollow * TRIANGLE_HOLLOW_SCALE, PI),
        PolygonKind::Square if square_hollow => (hollow, 0.25 * PI),
        PolygonKind::Square => (hollow * HOLLOW_DIAGONAL_SCALE, 0.25 * PI),
        _ if square_hollow => (hollow.min(SQUARE_HOLLOW_LIMIT) / SQUARE_HOLLOW_LIMIT, PI),
        _ => (hollow, PI),
    };
    (hollow, Some(quat_from_axis_angle(DVec3::Z, angle)))
}

impl PrimMesh {
    /// Sweeps the profile along a circular path.
    ///
    /// Replaces the output buffers. Caps are only generated when
    /// [`PrimMesh::need_end_faces`] says the path does not close.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidArgument`] for non-finite parameters, an
    /// empty path cut, fewer than one revolution or zero steps per revolution.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prim_mesher::prim_mesh::PrimMesh;
    ///
    /// let mut torus = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    /// torus.extrude_circular().unwrap();
    /// assert!(!torus.need_end_faces());
    /// assert_eq!(torus.coords.len(), 25 * 25);
    /// ```
    pub fn extrude_circular(&mut self) -> Result<(), MeshError> {
        self.validate_path()?;
        if self.revolutions < 1.0 {
            return Err(MeshError::invalid_argument(format!(
                "revolutions must be at least 1: {}",
                self.revolutions
            )));
        }
        if self.steps_per_revolution == 0 {
            return Err(MeshError::invalid_argument(
                "steps_per_revolution not greater than zero",
            ));
        }
        self.begin_sweep();

        let twist_begin = f64::from(self.twist_range().0).to_radians();
        let twist_total = self.twist_total();
        let steps_per_revolution =
            circular_steps_per_revolution(self.steps_per_revolution, twist_total);
        let step_size = TAU / f64::from(steps_per_revolution);

        let y_path_scale = self.hole_size_y * 0.5;
        let path_length = self.path_cut_end - self.path_cut_begin;
        let total_skew = self.skew * 2.0 * path_length;
        let skew_start = self.path_cut_begin * 2.0 * self.skew - self.skew;
        let x_shear_factor = self.top_shear_x * (0.25 + 0.5 * (0.5 - self.hole_size_y));
        let y_shear_compensation = 1.0 + self.top_shear_y.abs() * SHEAR_COMPENSATION_FACTOR;

        let shear_offset = self.top_shear_y * TOP_SHEAR_ANGLE_FACTOR;
        let start_angle = TAU * self.path_cut_begin * self.revolutions - shear_offset;
        let end_angle = TAU * self.path_cut_end * self.revolutions - shear_offset;

        let need_end_faces = self.need_end_faces();
        let (hollow, initial_rotation) =
            circular_compensation(self.sides, self.hollow_sides, self.hollow);
        let profile = self.base_profile(hollow, need_end_faces, initial_rotation)?;
        let mut sweep = Sweep::new(&profile, need_end_faces);

        let mut step = (start_angle / step_size).trunc();
        let mut angle = start_angle;
        let mut first = true;

        loop {
            let last = angle >= end_angle;
            let mut layer = profile.clone();

            let percent_of_path = angle / (TAU * self.revolutions);
            let percent_of_angles = (angle - start_angle) / (end_angle - start_angle);

            let x_scale = (1.0 - self.skew.abs())
                * self.hole_size_x
                * taper_scale(self.taper_x, percent_of_path, TAPER_THRESHOLD);
            let y_scale =
                self.hole_size_y * taper_scale(self.taper_y, percent_of_path, TAPER_THRESHOLD);
            if x_scale != 1.0 || y_scale != 1.0 {
                layer.scale(x_scale, y_scale);
            }

            let radius_scale = if self.radius > RADIUS_THRESHOLD {
                1.0 - self.radius * percent_of_path
            } else if self.radius < -RADIUS_THRESHOLD {
                1.0 + self.radius * (1.0 - percent_of_path)
            } else {
                1.0
            };

            if twist_total != 0.0 || twist_begin != 0.0 {
                let twist = twist_begin + twist_total * percent_of_path;
                layer.add_rot(quat_from_axis_angle(DVec3::Z, twist));
            }
            layer.add_rot(quat_from_axis_angle(DVec3::X, angle + self.top_shear_y));

            let path_radius = (0.5 - y_path_scale) * radius_scale;
            layer.add_pos(DVec3::new(
                0.5 * (skew_start + total_skew * percent_of_angles)
                    + angle.sin() * x_shear_factor,
                y_shear_compensation * angle.cos() * path_radius,
                (angle + self.top_shear_y).sin() * path_radius,
            ));

            let placement = LayerPlacement {
                first,
                last,
                v: 1.0 - percent_of_path,
            };
            self.append_layer(layer, placement, &mut sweep);

            if last {
                break;
            }
            first = false;

            step += 1.0;
            let mut next = step * step_size;
            while next <= angle + ANGLE_SNAP {
                step += 1.0;
                next = step * step_size;
            }
            angle = if next >= end_angle - ANGLE_SNAP {
                end_angle
            } else {
                next
            };
        }

        self.finish_sweep(sweep, "circular");
        Ok(())
    }
}
