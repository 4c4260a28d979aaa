//! # Profiles
//!
//! A profile is one 2D cross-section in the XY plane: an outer ring, an
//! optional hollow ring and the cap triangulation between them. Extrusion
//! clones it once per layer.
//!
//! ## Vertex Layout
//!
//! ```text
//! [center]  outer ring (increasing angle)  hollow ring (decreasing angle)
//! ```
//!
//! The center vertex only exists for fan-triangulated profiles. Without a
//! profile cut the rings close by index wrap-around, so no position is stored
//! twice.
//!
//! ## Winding
//!
//! Cap faces are counter-clockwise seen from +Z. Walking the vertices in
//! layout order traverses the cap boundary counter-clockwise as well, which is
//! what [`Profile::boundary_edges`] relies on.

use std::f64::consts::TAU;
use std::io::Write;

use config::constants::{PROFILE_RADIUS, SQUARE_PROFILE_RADIUS};
use glam::{DQuat, DVec3};
use log::trace;

use crate::angles::{make_angles, AngleEntry, PolygonKind};
use crate::error::MeshError;
use crate::face::{Face, UvCoord};
use crate::math::normalize_or_zero;

/// Which part of the cap boundary an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Edge of the outer ring
    Outer,
    /// Edge of the hollow ring
    Hollow,
    /// Radial edge at the profile cut start angle
    CutStart,
    /// Radial edge at the profile cut end angle
    CutEnd,
}

/// An oriented edge of the cap boundary.
///
/// `a → b` follows the counter-clockwise boundary, so sweeping the edge
/// forward along +Z produces an outward facing wall. The angles are turn
/// fractions of `a` and `b`; across the ring seam the seam side reads `1.0`
/// so the pair stays monotonic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingEdge {
    pub a: usize,
    pub b: usize,
    pub kind: EdgeKind,
    pub angle1: f64,
    pub angle2: f64,
}

/// A single cross-section ring (or hollowed double ring).
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Vertex positions
    pub coords: Vec<DVec3>,
    /// Cap triangles, empty when faces were not requested
    pub faces: Vec<Face>,
    /// Per-vertex normals, empty unless requested
    pub vertex_normals: Vec<DVec3>,
    /// Per-vertex texture U around the ring, empty unless normals were requested
    pub us: Vec<f64>,
    /// Planar cap texture coordinates, one per vertex
    pub face_uvs: Vec<UvCoord>,
    /// Normal of the cap faces
    pub face_normal: DVec3,
    /// Outward normal of the wall exposed at the cut start
    pub cut_normal1: DVec3,
    /// Outward normal of the wall exposed at the cut end
    pub cut_normal2: DVec3,
    /// Vertices on the outer ring (center excluded)
    pub num_outer_verts: usize,
    /// Vertices on the hollow ring
    pub num_hollow_verts: usize,
    /// Polygon family of the outer ring
    pub outer_kind: PolygonKind,
    /// Polygon family of the hollow ring
    pub hollow_kind: PolygonKind,
    pub has_center: bool,
    pub has_profile_cut: bool,
    pub has_hollow: bool,
    angles: Vec<f64>,
}

impl Profile {
    /// Builds a profile.
    ///
    /// # Arguments
    ///
    /// * `sides` - Side count of the outer ring
    /// * `profile_start`, `profile_end` - Angular cut as turn fractions
    /// * `hollow` - Hollow ring size relative to the outer ring, 0 for solid
    /// * `hollow_sides` - Side count of the hollow ring
    /// * `create_faces` - Triangulate the cap
    /// * `calc_vertex_normals` - Fill `vertex_normals` and `us`
    ///
    /// # Errors
    ///
    /// Fails with [`MeshError::InvalidArgument`] when a side count is zero or
    /// the cut range is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prim_mesher::profile::Profile;
    ///
    /// let square = Profile::new(4, 0.0, 1.0, 0.0, 4, true, false).unwrap();
    /// assert_eq!(square.coords.len(), 4);
    /// assert_eq!(square.faces.len(), 2);
    /// ```
    pub fn new(
        sides: u32,
        profile_start: f64,
        profile_end: f64,
        hollow: f64,
        hollow_sides: u32,
        create_faces: bool,
        calc_vertex_normals: bool,
    ) -> Result<Self, MeshError> {
        if hollow_sides < 1 {
            return Err(MeshError::invalid_argument(
                "number of hollow sides not greater than zero",
            ));
        }

        let has_profile_cut = profile_start > 0.0 || profile_end < 1.0;
        let has_hollow = hollow > 0.0;
        let start_angle = profile_start * TAU;
        let stop_angle = profile_end * TAU;

        let outer_kind = PolygonKind::from_sides(sides);
        let hollow_kind = PolygonKind::from_sides(hollow_sides);
        let radius = match outer_kind {
            PolygonKind::Square => SQUARE_PROFILE_RADIUS,
            _ => PROFILE_RADIUS,
        };

        let outer = ring_samples(sides, start_angle, stop_angle, has_profile_cut)?;
        let inner = if !has_hollow {
            Vec::new()
        } else if hollow_sides == sides {
            outer.clone()
        } else {
            ring_samples(hollow_sides, start_angle, stop_angle, has_profile_cut)?
        };

        let simple = sides < 5 && !has_hollow && !has_profile_cut;
        let has_center = !has_hollow && !simple;

        let num_outer_verts = outer.len();
        let num_hollow_verts = inner.len();
        let total = num_outer_verts + num_hollow_verts + usize::from(has_center);

        let mut coords = Vec::with_capacity(total);
        let mut normals = Vec::with_capacity(total);
        let mut angles = Vec::with_capacity(total);

        if has_center {
            coords.push(DVec3::ZERO);
            normals.push(DVec3::Z);
            angles.push(0.0);
        }
        for entry in &outer {
            coords.push(DVec3::new(entry.x * radius, entry.y * radius, 0.0));
            normals.push(normalize_or_zero(DVec3::new(entry.x, entry.y, 0.0)));
            angles.push(entry.angle);
        }
        let hollow_radius = radius * hollow;
        for entry in inner.iter().rev() {
            coords.push(DVec3::new(entry.x * hollow_radius, entry.y * hollow_radius, 0.0));
            normals.push(normalize_or_zero(DVec3::new(-entry.x, -entry.y, 0.0)));
            angles.push(entry.angle);
        }

        let faces = if !create_faces {
            Vec::new()
        } else if has_hollow {
            let outer_angles: Vec<f64> = outer.iter().map(|a| a.angle).collect();
            let hollow_angles: Vec<f64> = inner.iter().map(|a| a.angle).collect();
            stitch_hollow(&outer_angles, &hollow_angles, !has_profile_cut)
        } else if has_center {
            fan_faces(num_outer_verts, !has_profile_cut)
        } else {
            (1..num_outer_verts.saturating_sub(1))
                .map(|i| Face::new(0, i, i + 1))
                .collect()
        };

        let (cut_normal1, cut_normal2) = if has_profile_cut {
            let first = normals[usize::from(has_center)];
            let last = normals[usize::from(has_center) + num_outer_verts - 1];
            (
                normalize_or_zero(DVec3::new(first.y, -first.x, 0.0)),
                normalize_or_zero(DVec3::new(-last.y, last.x, 0.0)),
            )
        } else {
            (DVec3::ZERO, DVec3::ZERO)
        };

        let (vertex_normals, us) = if calc_vertex_normals {
            (normals, angles.clone())
        } else {
            (Vec::new(), Vec::new())
        };

        let face_uvs = coords.iter().copied().map(UvCoord::planar).collect();

        trace!(
            "profile: sides={sides} hollow_sides={hollow_sides} outer={num_outer_verts} hollow={num_hollow_verts} faces={}",
            faces.len()
        );

        Ok(Self {
            coords,
            faces,
            vertex_normals,
            us,
            face_uvs,
            face_normal: DVec3::Z,
            cut_normal1,
            cut_normal2,
            num_outer_verts,
            num_hollow_verts,
            outer_kind,
            hollow_kind,
            has_center,
            has_profile_cut,
            has_hollow,
            angles,
        })
    }

    /// Number of vertices in the profile.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.coords.len()
    }

    /// Turn fraction of each vertex around the ring (0 for the center).
    #[inline]
    pub fn vertex_angles(&self) -> &[f64] {
        &self.angles
    }

    /// Copy of the profile without its cap faces.
    pub fn clone_without_faces(&self) -> Self {
        Self {
            faces: Vec::new(),
            ..self.clone()
        }
    }

    /// Reverses the cap winding so the profile faces -Z.
    ///
    /// Negates the face normal and the center normal and mirrors the cap
    /// texture U. Radial vertex normals lie in the ring plane and are kept.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.flip();
        }
        if self.has_center {
            if let Some(center) = self.vertex_normals.first_mut() {
                center.z = -center.z;
            }
        }
        self.face_normal = -self.face_normal;
        for uv in &mut self.face_uvs {
            uv.u = 1.0 - uv.u;
        }
    }

    /// Shifts every face's vertex indices by `offset`.
    pub fn offset_face_vertex_indices(&mut self, offset: usize) {
        for face in &mut self.faces {
            face.offset_vertices(offset);
        }
    }

    /// Shifts every face's normal indices by `offset`.
    pub fn offset_face_normal_indices(&mut self, offset: usize) {
        for face in &mut self.faces {
            face.offset_normals(offset);
        }
    }

    /// Recomputes the planar cap texture coordinates from the current positions.
    pub fn make_face_uvs(&mut self) {
        self.face_uvs = self.coords.iter().copied().map(UvCoord::planar).collect();
    }

    /// Translates every vertex.
    pub fn add_pos(&mut self, offset: DVec3) {
        for coord in &mut self.coords {
            *coord += offset;
        }
    }

    /// Rotates positions and every stored direction.
    pub fn add_rot(&mut self, rotation: DQuat) {
        for coord in &mut self.coords {
            *coord = rotation * *coord;
        }
        for normal in &mut self.vertex_normals {
            *normal = rotation * *normal;
        }
        self.face_normal = rotation * self.face_normal;
        self.cut_normal1 = rotation * self.cut_normal1;
        self.cut_normal2 = rotation * self.cut_normal2;
    }

    /// Scales positions in the profile plane.
    pub fn scale(&mut self, x: f64, y: f64) {
        for coord in &mut self.coords {
            coord.x *= x;
            coord.y *= y;
        }
    }

    /// Oriented edges of the cap boundary in layout order.
    ///
    /// Closed rings give one loop per ring. A profile cut opens the rings
    /// into a single loop that also runs along the two cut walls.
    pub fn boundary_edges(&self) -> Vec<RingEdge> {
        let n_outer = self.num_outer_verts;
        let n_hollow = self.num_hollow_verts;
        let mut edges = Vec::with_capacity(n_outer + n_hollow + 2);

        if self.has_profile_cut {
            if self.has_hollow {
                for i in 0..n_outer - 1 {
                    edges.push(self.edge(EdgeKind::Outer, i, i + 1));
                }
                edges.push(self.edge(EdgeKind::CutEnd, n_outer - 1, n_outer));
                for k in n_outer..n_outer + n_hollow - 1 {
                    edges.push(self.edge(EdgeKind::Hollow, k, k + 1));
                }
                edges.push(self.edge(EdgeKind::CutStart, n_outer + n_hollow - 1, 0));
            } else {
                edges.push(self.edge(EdgeKind::CutStart, 0, 1));
                for i in 1..n_outer {
                    edges.push(self.edge(EdgeKind::Outer, i, i + 1));
                }
                edges.push(self.edge(EdgeKind::CutEnd, n_outer, 0));
            }
            return edges;
        }

        let offset = usize::from(self.has_center);
        for i in 0..n_outer {
            let mut edge = self.edge(EdgeKind::Outer, offset + i, offset + (i + 1) % n_outer);
            if i == n_outer - 1 {
                edge.angle2 = 1.0;
            }
            edges.push(edge);
        }
        for k in 0..n_hollow {
            let mut edge = self.edge(EdgeKind::Hollow, n_outer + k, n_outer + (k + 1) % n_hollow);
            if k == n_hollow - 1 {
                edge.angle1 = 1.0;
            }
            edges.push(edge);
        }
        edges
    }

    fn edge(&self, kind: EdgeKind, a: usize, b: usize) -> RingEdge {
        RingEdge {
            a,
            b,
            kind,
            angle1: self.angles[a],
            angle2: self.angles[b],
        }
    }

    /// Writes one line per cap triangle with its nine coordinates.
    pub fn write_raw<W: Write>(&self, writer: &mut W) -> Result<(), MeshError> {
        write_raw_faces(writer, &self.coords, &self.faces)
    }
}

/// Writes `x y z x y z x y z` per face.
pub(crate) fn write_raw_faces<W: Write>(
    writer: &mut W,
    coords: &[DVec3],
    faces: &[Face],
) -> Result<(), MeshError> {
    for face in faces {
        let [a, b, c] = face.indices().map(|i| coords[i]);
        writeln!(
            writer,
            "{} {} {} {} {} {} {} {} {}",
            a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z
        )?;
    }
    Ok(())
}

/// Samples a ring, dropping the closing sample of an uncut ring.
fn ring_samples(
    sides: u32,
    start_angle: f64,
    stop_angle: f64,
    has_profile_cut: bool,
) -> Result<Vec<AngleEntry>, MeshError> {
    let mut samples = make_angles(sides, start_angle, stop_angle)?;
    if !has_profile_cut && samples.len() > 1 {
        samples.pop();
    }
    Ok(samples)
}

/// Triangle fan around the center vertex at index 0.
fn fan_faces(num_outer: usize, closed: bool) -> Vec<Face> {
    let mut faces: Vec<Face> = (1..num_outer).map(|i| Face::new(0, i, i + 1)).collect();
    if closed && num_outer > 1 {
        faces.push(Face::new(0, num_outer, 1));
    }
    faces
}

/// Stitches the band between the outer ring and the hollow ring.
///
/// Both angle lists are increasing. Each step emits one triangle on the ring
/// whose next edge has the smaller angular midpoint (outer on ties), so every
/// outer vertex fans onto the hollow edges nearest to it in angle. Equal rings
/// produce two triangles per edge. Closed rings walk through the seam back to
/// their first vertex.
fn stitch_hollow(outer: &[f64], hollow: &[f64], closed: bool) -> Vec<Face> {
    let n_outer = outer.len();
    let n_hollow = hollow.len();
    if n_outer == 0 || n_hollow == 0 {
        return Vec::new();
    }

    let (last_outer, last_hollow) = if closed {
        (n_outer, n_hollow)
    } else {
        (n_outer - 1, n_hollow - 1)
    };
    let outer_angle = |i: usize| if i == n_outer { 1.0 } else { outer[i] };
    let hollow_angle = |j: usize| if j == n_hollow { 1.0 } else { hollow[j] };
    let outer_index = |i: usize| i % n_outer;
    let hollow_index = |j: usize| n_outer + n_hollow - 1 - (j % n_hollow);

    let mut faces = Vec::with_capacity(last_outer + last_hollow);
    let (mut i, mut j) = (0, 0);
    while i < last_outer || j < last_hollow {
        let advance_outer = i < last_outer
            && (j == last_hollow
                || outer_angle(i) + outer_angle(i + 1) <= hollow_angle(j) + hollow_angle(j + 1));
        if advance_outer {
            faces.push(Face::new(outer_index(i), outer_index(i + 1), hollow_index(j)));
            i += 1;
        } else {
            faces.push(Face::new(outer_index(i), hollow_index(j + 1), hollow_index(j)));
            j += 1;
        }
    }
    faces
}
