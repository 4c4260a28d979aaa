//! # Angle Lists
//!
//! Ordered samples on the unit circle between a start and a stop angle.
//!
//! The 3, 4 and 24 sided polygons occur for nearly every prim (prism, box,
//! cylinder), so they come from constant tables whose values must match the
//! reference tessellation exactly. Every other side count is generated by
//! stepping around the circle.
//!
//! ## Endpoints
//!
//! The first and last samples always sit on the requested angles. Table
//! polygons interpolate the boundary sample against its neighbour; generic
//! polygons intersect the polygon edge with the ray at the cut angle.

use std::f64::consts::TAU;

use crate::error::MeshError;

/// Tolerance used when snapping a cut angle onto a polygon corner.
const CORNER_SNAP: f64 = 1e-9;

/// A sample point on the unit circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleEntry {
    /// Position around the circle as a fraction of a full turn
    pub angle: f64,
    /// X coordinate of the sample
    pub x: f64,
    /// Y coordinate of the sample
    pub y: f64,
}

impl AngleEntry {
    /// Creates a sample.
    pub const fn new(angle: f64, x: f64, y: f64) -> Self {
        Self { angle, x, y }
    }

    /// Linearly interpolates between two samples at the turn fraction `angle`.
    fn interpolate(angle: f64, p1: &AngleEntry, p2: &AngleEntry) -> Self {
        let m = (angle - p1.angle) / (p2.angle - p1.angle);
        Self::new(angle, p1.x + m * (p2.x - p1.x), p1.y + m * (p2.y - p1.y))
    }
}

const ANGLES_3: [AngleEntry; 4] = [
    AngleEntry::new(0.0, 1.0, 0.0),
    AngleEntry::new(0.333_333_333_333_333_33, -0.5, 0.866_025_403_784_438_71),
    AngleEntry::new(0.666_666_666_666_666_67, -0.5, -0.866_025_403_784_438_37),
    AngleEntry::new(1.0, 1.0, 0.0),
];

const ANGLES_4: [AngleEntry; 5] = [
    AngleEntry::new(0.0, 1.0, 0.0),
    AngleEntry::new(0.25, 0.0, 1.0),
    AngleEntry::new(0.5, -1.0, 0.0),
    AngleEntry::new(0.75, 0.0, -1.0),
    AngleEntry::new(1.0, 1.0, 0.0),
];

const ANGLES_24: [AngleEntry; 25] = [
    AngleEntry::new(0.0, 1.0, 0.0),
    AngleEntry::new(0.041_666_666_666_666_664, 0.965_925_826_289_068_31, 0.258_819_045_102_520_74),
    AngleEntry::new(0.083_333_333_333_333_329, 0.866_025_403_784_438_71, 0.5),
    AngleEntry::new(0.125, 0.707_106_781_186_547_57, 0.707_106_781_186_547_46),
    AngleEntry::new(0.166_666_666_666_666_67, 0.5, 0.866_025_403_784_438_6),
    AngleEntry::new(0.208_333_333_333_333_31, 0.258_819_045_102_520_96, 0.965_925_826_289_068_2),
    AngleEntry::new(0.25, 0.0, 1.0),
    AngleEntry::new(0.291_666_666_666_666_63, -0.258_819_045_102_520_63, 0.965_925_826_289_068_31),
    AngleEntry::new(0.333_333_333_333_333_33, -0.5, 0.866_025_403_784_438_71),
    AngleEntry::new(0.375, -0.707_106_781_186_547_46, 0.707_106_781_186_547_57),
    AngleEntry::new(0.416_666_666_666_666_63, -0.866_025_403_784_438_49, 0.5),
    AngleEntry::new(0.458_333_333_333_333_31, -0.965_925_826_289_068_2, 0.258_819_045_102_521_02),
    AngleEntry::new(0.5, -1.0, 0.0),
    AngleEntry::new(0.541_666_666_666_666_63, -0.965_925_826_289_068_42, -0.258_819_045_102_520_35),
    AngleEntry::new(0.583_333_333_333_333_26, -0.866_025_403_784_438_82, -0.5),
    AngleEntry::new(0.624_999_999_999_999_89, -0.707_106_781_186_547_91, -0.707_106_781_186_547_13),
    AngleEntry::new(0.666_666_666_666_666_67, -0.5, -0.866_025_403_784_438_37),
    AngleEntry::new(0.708_333_333_333_333_26, -0.258_819_045_102_521_52, -0.965_925_826_289_068_09),
    AngleEntry::new(0.75, 0.0, -1.0),
    AngleEntry::new(0.791_666_666_666_666_63, 0.258_819_045_102_520_3, -0.965_925_826_289_068_42),
    AngleEntry::new(0.833_333_333_333_333_26, 0.5, -0.866_025_403_784_439_04),
    AngleEntry::new(0.875, 0.707_106_781_186_547_35, -0.707_106_781_186_547_68),
    AngleEntry::new(0.916_666_666_666_666_63, 0.866_025_403_784_438_37, -0.5),
    AngleEntry::new(0.958_333_333_333_333_26, 0.965_925_826_289_068_09, -0.258_819_045_102_521_57),
    AngleEntry::new(1.0, 1.0, 0.0),
];

/// Polygon families with distinct angle generation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonKind {
    /// Three sides, constant table
    Triangle,
    /// Four sides, constant corner-aligned table
    Square,
    /// Twenty-four sides, constant table used for round profiles
    Polygon24,
    /// Any other side count, stepped at `2π / n`
    Generic(u32),
}

impl PolygonKind {
    /// Classifies a side count.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prim_mesher::angles::PolygonKind;
    ///
    /// assert_eq!(PolygonKind::from_sides(4), PolygonKind::Square);
    /// assert_eq!(PolygonKind::from_sides(6), PolygonKind::Generic(6));
    /// ```
    pub fn from_sides(sides: u32) -> Self {
        match sides {
            3 => Self::Triangle,
            4 => Self::Square,
            24 => Self::Polygon24,
            n => Self::Generic(n),
        }
    }

    /// Number of polygon sides.
    pub fn sides(&self) -> u32 {
        match self {
            Self::Triangle => 3,
            Self::Square => 4,
            Self::Polygon24 => 24,
            Self::Generic(n) => *n,
        }
    }

    /// Constant sample table for the kind, closing sample included.
    pub fn table(&self) -> Option<&'static [AngleEntry]> {
        match self {
            Self::Triangle => Some(&ANGLES_3),
            Self::Square => Some(&ANGLES_4),
            Self::Polygon24 => Some(&ANGLES_24),
            Self::Generic(_) => None,
        }
    }
}

/// Generates the samples covering `[start_angle, stop_angle]` (radians),
/// both ends included.
///
/// Returned samples are strictly increasing in `angle`. A full turn yields
/// `sides + 1` samples, the last one repeating the first position.
///
/// # Errors
///
/// Returns [`MeshError::InvalidArgument`] when `sides < 1`, when
/// `stop_angle <= start_angle`, or when either angle is not finite.
///
/// # Example
///
/// ```rust
/// use prim_mesher::angles::make_angles;
///
/// let angles = make_angles(4, 0.0, std::f64::consts::TAU).unwrap();
/// assert_eq!(angles.len(), 5);
/// assert_eq!(angles[1].angle, 0.25);
/// ```
pub fn make_angles(sides: u32, start_angle: f64, stop_angle: f64) -> Result<Vec<AngleEntry>, MeshError> {
    if sides < 1 {
        return Err(MeshError::invalid_argument(
            "number of sides not greater than zero",
        ));
    }
    if !start_angle.is_finite() || !stop_angle.is_finite() {
        return Err(MeshError::invalid_argument(format!(
            "angles must be finite: start={start_angle}, stop={stop_angle}"
        )));
    }
    if stop_angle <= start_angle {
        return Err(MeshError::invalid_argument(format!(
            "stop_angle not greater than start_angle: start={start_angle}, stop={stop_angle}"
        )));
    }

    let kind = PolygonKind::from_sides(sides);
    let start = start_angle / TAU;
    let stop = stop_angle / TAU;

    Ok(match kind.table() {
        Some(table) => table_angles(table, kind.sides(), start, stop),
        None => generic_angles(kind.sides(), start, stop),
    })
}

/// Selects the table entries spanning `[start, stop]` (turn fractions).
fn table_angles(table: &[AngleEntry], sides: u32, start: f64, stop: f64) -> Vec<AngleEntry> {
    let n = sides as f64;
    let last = table.len() - 1;

    let start_index = ((start * n + CORNER_SNAP).floor().max(0.0) as usize).min(last - 1);
    let mut end_index = if stop < 1.0 {
        ((stop * n - CORNER_SNAP).ceil().max(0.0) as usize).min(last)
    } else {
        last
    };
    if end_index <= start_index {
        end_index = start_index + 1;
    }

    let mut angles: Vec<AngleEntry> = table[start_index..=end_index].to_vec();

    if start > 0.0 {
        angles[0] = AngleEntry::interpolate(start, &angles[0], &angles[1]);
    }
    if stop < 1.0 {
        let last_index = angles.len() - 1;
        angles[last_index] =
            AngleEntry::interpolate(stop, &angles[last_index - 1], &angles[last_index]);
    }

    angles
}

/// Steps around a regular `sides`-gon and clips the ends onto the cut rays.
fn generic_angles(sides: u32, start: f64, stop: f64) -> Vec<AngleEntry> {
    let n = sides as f64;

    let start_step = (start * n + CORNER_SNAP).floor().max(0.0) as u32;
    let mut end_step = if stop < 1.0 {
        (stop * n - CORNER_SNAP).ceil().max(0.0) as u32
    } else {
        sides
    };
    end_step = end_step.min(sides.max(start_step + 1));
    if end_step <= start_step {
        end_step = start_step + 1;
    }

    let mut angles: Vec<AngleEntry> = (start_step..=end_step)
        .map(|step| polygon_corner(step, sides))
        .collect();

    if start > angles[0].angle {
        let (p1, p2) = (angles[0], angles[1]);
        angles[0] = clip_to_ray(start, &p1, &p2);
    }

    let last_index = angles.len() - 1;
    if stop < angles[last_index].angle {
        let (p1, p2) = (angles[last_index - 1], angles[last_index]);
        angles[last_index] = clip_to_ray(stop, &p1, &p2);
    }

    angles
}

/// Corner `step` of a regular polygon, exact on the X axis at whole turns.
fn polygon_corner(step: u32, sides: u32) -> AngleEntry {
    let fraction = step as f64 / sides as f64;
    if step % sides == 0 {
        return AngleEntry::new(fraction, 1.0, 0.0);
    }
    let (y, x) = (fraction * TAU).sin_cos();
    AngleEntry::new(fraction, x, y)
}

/// Intersects the polygon edge `p1 → p2` with the ray from the origin at the
/// turn fraction `angle`.
///
/// Parallel lines leave the point on the edge that is closer to the ray.
fn clip_to_ray(angle: f64, p1: &AngleEntry, p2: &AngleEntry) -> AngleEntry {
    let (ray_y, ray_x) = (angle * TAU).sin_cos();
    match line_intersection(p1.x, p1.y, p2.x, p2.y, 0.0, 0.0, ray_x, ray_y) {
        Some((x, y)) => AngleEntry::new(angle, x, y),
        None => {
            let nearest = if (angle - p1.angle).abs() <= (p2.angle - angle).abs() {
                p1
            } else {
                p2
            };
            AngleEntry::new(angle, nearest.x, nearest.y)
        }
    }
}

/// Intersection of the infinite lines through `(x1, y1)-(x2, y2)` and
/// `(x3, y3)-(x4, y4)`.
#[allow(clippy::too_many_arguments)]
fn line_intersection(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x4: f64,
    y4: f64,
) -> Option<(f64, f64)> {
    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    if denom == 0.0 {
        return None;
    }
    let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
    Some((x1 + ua * (x2 - x1), y1 + ua * (y2 - y1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn assert_strictly_increasing(angles: &[AngleEntry]) {
        for pair in angles.windows(2) {
            assert!(
                pair[1].angle > pair[0].angle,
                "angles not increasing: {} then {}",
                pair[0].angle,
                pair[1].angle
            );
        }
    }

    #[test]
    fn test_rejects_zero_sides() {
        let err = make_angles(0, 0.0, TAU).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_rejects_reversed_range() {
        assert!(make_angles(4, 1.0, 1.0).is_err());
        assert!(make_angles(4, 2.0, 1.0).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        assert!(make_angles(24, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_full_turn_table_sizes() {
        assert_eq!(make_angles(3, 0.0, TAU).unwrap().len(), 4);
        assert_eq!(make_angles(4, 0.0, TAU).unwrap().len(), 5);
        assert_eq!(make_angles(24, 0.0, TAU).unwrap().len(), 25);
    }

    #[test]
    fn test_full_turn_generic_closes_on_start() {
        let angles = make_angles(6, 0.0, TAU).unwrap();
        assert_eq!(angles.len(), 7);
        assert_eq!((angles[0].x, angles[0].y), (angles[6].x, angles[6].y));
        assert_eq!(angles[6].angle, 1.0);
        assert_strictly_increasing(&angles);
    }

    #[test]
    fn test_table_endpoints_on_requested_angles() {
        // Cut boundaries between table entries for every table polygon
        let ranges = [(0.1, 0.9), (0.0, 0.5), (0.3, 1.0), (0.26, 0.27), (0.5, 0.75)];
        for sides in [3, 4, 24] {
            for (start, stop) in ranges {
                let angles = make_angles(sides, start * TAU, stop * TAU).unwrap();
                assert_strictly_increasing(&angles);
                let first = angles[0];
                let last = angles[angles.len() - 1];
                assert_abs_diff_eq!(first.angle, start, epsilon = 1e-12);
                assert_abs_diff_eq!(last.angle, stop, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_round_table_endpoints_on_unit_circle() {
        // Interpolated samples stay on the 24-gon chord, within 1% of the circle
        let angles = make_angles(24, 0.3 * TAU, 0.7 * TAU).unwrap();
        for entry in [angles[0], angles[angles.len() - 1]] {
            let radius = (entry.x * entry.x + entry.y * entry.y).sqrt();
            assert!((radius - 1.0).abs() < 0.01, "radius {radius}");
            let direction = entry.y.atan2(entry.x).rem_euclid(TAU) / TAU;
            assert_abs_diff_eq!(direction, entry.angle, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_exact_corner_cut_has_no_duplicate() {
        // Stopping exactly on a corner must not repeat that corner
        let angles = make_angles(4, 0.0, PI).unwrap();
        assert_eq!(angles.len(), 3);
        assert_abs_diff_eq!(angles[2].x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[2].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_half_cut_interpolates_edge() {
        let angles = make_angles(4, 0.125 * TAU, TAU).unwrap();
        assert_eq!(angles.len(), 5);
        assert_abs_diff_eq!(angles[0].x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[0].y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_generic_cut_lands_on_ray() {
        let start = 0.1 * TAU;
        let stop = 0.8 * TAU;
        let angles = make_angles(6, start, stop).unwrap();
        assert_strictly_increasing(&angles);

        let first = angles[0];
        assert_abs_diff_eq!(first.y.atan2(first.x), start, epsilon = 1e-9);

        let last = angles[angles.len() - 1];
        assert_abs_diff_eq!(last.y.atan2(last.x).rem_euclid(TAU), stop, epsilon = 1e-9);
    }

    #[test]
    fn test_generic_cut_stays_on_polygon_edge() {
        // The clipped point lies on the chord between two hexagon corners
        let angles = make_angles(6, 0.05 * TAU, TAU).unwrap();
        let p = angles[0];
        let a = polygon_corner(0, 6);
        let b = polygon_corner(1, 6);
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        assert_abs_diff_eq!(cross, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polygon_kind_tables() {
        assert_eq!(PolygonKind::from_sides(3).table().map(<[_]>::len), Some(4));
        assert_eq!(PolygonKind::from_sides(24).sides(), 24);
        assert!(PolygonKind::from_sides(5).table().is_none());
    }
}
