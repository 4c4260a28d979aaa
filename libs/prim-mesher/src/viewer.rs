//! # Viewer Faces
//!
//! Flat-shaded triangles with their own positions, normals and texture
//! coordinates, for renderers that need hard edges.
//!
//! Viewer faces are derived after extrusion from the shared mesh plus a small
//! record of how it was swept, so the extrusion itself has a single code path.
//!
//! ## Face Numbering
//!
//! `prim_face` groups triangles into the texture faces of the primitive:
//!
//! | Number | Surface |
//! |--------|---------|
//! | 0 | Cap at the start of the path |
//! | 1.. | Outer walls, one per polygon side for rings below 5 sides |
//! | next | Hollow walls, numbered the same way |
//! | next two | Profile cut start and end walls |
//! | last | Cap at the end of the path |

use std::ops::Range;

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::angles::PolygonKind;
use crate::face::{Face, UvCoord};
use crate::math::{normal_scale, normalize_or_zero, triangle_normal};
use crate::profile::{EdgeKind, Profile, RingEdge};

/// Rings with fewer sides than this get flat walls.
const FLAT_SIDE_LIMIT: u32 = 5;

/// A self-contained triangle for flat-shaded rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerFace {
    /// Texture face of the primitive this triangle belongs to
    pub prim_face: usize,
    pub v1: DVec3,
    pub v2: DVec3,
    pub v3: DVec3,
    pub n1: DVec3,
    pub n2: DVec3,
    pub n3: DVec3,
    pub uv1: UvCoord,
    pub uv2: UvCoord,
    pub uv3: UvCoord,
}

impl ViewerFace {
    /// Creates an empty face in the given texture face.
    pub fn new(prim_face: usize) -> Self {
        Self {
            prim_face,
            ..Self::default()
        }
    }

    /// Sets all three normals to the flat normal of the triangle.
    pub fn calc_surface_normal(&mut self) {
        let normal = triangle_normal(self.v1, self.v2, self.v3);
        self.n1 = normal;
        self.n2 = normal;
        self.n3 = normal;
    }

    pub fn add_pos(&mut self, offset: DVec3) {
        self.v1 += offset;
        self.v2 += offset;
        self.v3 += offset;
    }

    pub fn add_rot(&mut self, rotation: DQuat) {
        self.v1 = rotation * self.v1;
        self.v2 = rotation * self.v2;
        self.v3 = rotation * self.v3;
        self.n1 = rotation * self.n1;
        self.n2 = rotation * self.n2;
        self.n3 = rotation * self.n3;
    }

    /// Scales positions and keeps normals perpendicular to the scaled surface.
    pub fn scale(&mut self, factors: DVec3) {
        let cofactor = normal_scale(factors);
        self.v1 *= factors;
        self.v2 *= factors;
        self.v3 *= factors;
        self.n1 = normalize_or_zero(self.n1 * cofactor);
        self.n2 = normalize_or_zero(self.n2 * cofactor);
        self.n3 = normalize_or_zero(self.n3 * cofactor);
    }
}

/// Where one swept layer landed in the shared buffers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayerRecord {
    /// Index of the layer's first vertex
    pub base: usize,
    /// Texture V of the layer, 1 at the path start
    pub v: f64,
    pub cut_normal1: DVec3,
    pub cut_normal2: DVec3,
    pub face_normal: DVec3,
}

/// End cap faces emitted for a layer. The start cap is the flipped one.
#[derive(Debug, Clone)]
pub(crate) struct CapRecord {
    pub layer: usize,
    pub faces: Range<usize>,
    pub flipped: bool,
}

/// Everything the viewer pass needs to know about a sweep.
#[derive(Debug, Clone)]
pub(crate) struct SweepRecord {
    /// Oriented profile before per-layer deformation
    pub template: Profile,
    pub layers: Vec<LayerRecord>,
    pub caps: Vec<CapRecord>,
}

impl SweepRecord {
    pub fn new(template: Profile) -> Self {
        Self {
            template,
            layers: Vec::new(),
            caps: Vec::new(),
        }
    }
}

/// Texture face numbers for one profile.
struct FaceNumbering {
    outer_faces: usize,
    hollow_faces: usize,
    cut_faces: usize,
}

impl FaceNumbering {
    fn new(profile: &Profile) -> Self {
        let per_side = |kind: PolygonKind| {
            if kind.sides() < FLAT_SIDE_LIMIT {
                kind.sides() as usize
            } else {
                1
            }
        };
        Self {
            outer_faces: per_side(profile.outer_kind),
            hollow_faces: if profile.has_hollow {
                per_side(profile.hollow_kind)
            } else {
                0
            },
            cut_faces: if profile.has_profile_cut { 2 } else { 0 },
        }
    }

    fn start_cap(&self) -> usize {
        0
    }

    fn end_cap(&self) -> usize {
        1 + self.outer_faces + self.hollow_faces + self.cut_faces
    }

    fn wall(&self, kind: EdgeKind, side: usize) -> usize {
        match kind {
            EdgeKind::Outer => 1 + side,
            EdgeKind::Hollow => 1 + self.outer_faces + side,
            EdgeKind::CutStart => 1 + self.outer_faces + self.hollow_faces,
            EdgeKind::CutEnd => 2 + self.outer_faces + self.hollow_faces,
        }
    }
}

/// Polygon side an edge lies on and the texture U of its endpoints.
fn wall_texture(edge: &RingEdge, profile: &Profile) -> (usize, f64, f64) {
    let (sides, mirrored) = match edge.kind {
        EdgeKind::Outer => (profile.outer_kind.sides(), false),
        EdgeKind::Hollow => (profile.hollow_kind.sides(), true),
        EdgeKind::CutStart | EdgeKind::CutEnd => return (0, 0.0, 1.0),
    };

    let (mut u1, mut u2, mut side) = (edge.angle1, edge.angle2, 0);
    if sides < FLAT_SIDE_LIMIT {
        let n = f64::from(sides);
        let mid = 0.5 * (edge.angle1 + edge.angle2);
        side = ((mid * n).floor().max(0.0) as usize).min(sides as usize - 1);
        u1 = edge.angle1 * n - side as f64;
        u2 = edge.angle2 * n - side as f64;
    }
    if mirrored {
        (side, 1.0 - u1, 1.0 - u2)
    } else {
        (side, u1, u2)
    }
}

fn is_flat(edge: &RingEdge, profile: &Profile) -> bool {
    match edge.kind {
        EdgeKind::Outer => profile.outer_kind.sides() < FLAT_SIDE_LIMIT,
        EdgeKind::Hollow => profile.hollow_kind.sides() < FLAT_SIDE_LIMIT,
        EdgeKind::CutStart | EdgeKind::CutEnd => false,
    }
}

/// Derives the viewer faces of a finished sweep.
///
/// Output order matches the shared face list: start cap, walls layer by
/// layer, end cap.
pub(crate) fn build_viewer_faces(
    coords: &[DVec3],
    normals: &[DVec3],
    faces: &[Face],
    record: &SweepRecord,
) -> Vec<ViewerFace> {
    let profile = &record.template;
    let numbering = FaceNumbering::new(profile);
    let edges = profile.boundary_edges();

    let mut out = Vec::with_capacity(faces.len());

    for cap in record.caps.iter().filter(|c| c.flipped) {
        push_cap(&mut out, coords, faces, record, cap, numbering.start_cap());
    }

    for pair in record.layers.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        for edge in &edges {
            let (side, u_a, u_b) = wall_texture(edge, profile);
            let prim_face = numbering.wall(edge.kind, side);

            let (ca, pa, pb, cb) = (
                cur.base + edge.a,
                prev.base + edge.a,
                prev.base + edge.b,
                cur.base + edge.b,
            );

            let mut first = ViewerFace {
                prim_face,
                v1: coords[ca],
                v2: coords[pa],
                v3: coords[pb],
                uv1: UvCoord::new(u_a, cur.v),
                uv2: UvCoord::new(u_a, prev.v),
                uv3: UvCoord::new(u_b, prev.v),
                ..ViewerFace::default()
            };
            let mut second = ViewerFace {
                prim_face,
                v1: coords[ca],
                v2: coords[pb],
                v3: coords[cb],
                uv1: UvCoord::new(u_a, cur.v),
                uv2: UvCoord::new(u_b, prev.v),
                uv3: UvCoord::new(u_b, cur.v),
                ..ViewerFace::default()
            };

            match edge.kind {
                EdgeKind::CutStart | EdgeKind::CutEnd => {
                    let (prev_n, cur_n) = if edge.kind == EdgeKind::CutStart {
                        (prev.cut_normal1, cur.cut_normal1)
                    } else {
                        (prev.cut_normal2, cur.cut_normal2)
                    };
                    first.n1 = cur_n;
                    first.n2 = prev_n;
                    first.n3 = prev_n;
                    second.n1 = cur_n;
                    second.n2 = prev_n;
                    second.n3 = cur_n;
                }
                _ if is_flat(edge, profile) => {
                    first.calc_surface_normal();
                    second.calc_surface_normal();
                }
                _ => {
                    first.n1 = normals[ca];
                    first.n2 = normals[pa];
                    first.n3 = normals[pb];
                    second.n1 = normals[ca];
                    second.n2 = normals[pb];
                    second.n3 = normals[cb];
                }
            }

            out.push(first);
            out.push(second);
        }
    }

    for cap in record.caps.iter().filter(|c| !c.flipped) {
        push_cap(&mut out, coords, faces, record, cap, numbering.end_cap());
    }

    out
}

fn push_cap(
    out: &mut Vec<ViewerFace>,
    coords: &[DVec3],
    faces: &[Face],
    record: &SweepRecord,
    cap: &CapRecord,
    prim_face: usize,
) {
    let layer = &record.layers[cap.layer];
    let uv = |index: usize| {
        let mut uv = record.template.face_uvs[index - layer.base];
        if cap.flipped {
            uv.u = 1.0 - uv.u;
        }
        uv
    };

    for face in &faces[cap.faces.clone()] {
        out.push(ViewerFace {
            prim_face,
            v1: coords[face.v1],
            v2: coords[face.v2],
            v3: coords[face.v3],
            n1: layer.face_normal,
            n2: layer.face_normal,
            n3: layer.face_normal,
            uv1: uv(face.v1),
            uv2: uv(face.v2),
            uv3: uv(face.v3),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_surface_normal_replaces_all_three() {
        let mut face = ViewerFace {
            v1: DVec3::ZERO,
            v2: DVec3::X,
            v3: DVec3::Y,
            ..ViewerFace::new(3)
        };
        face.calc_surface_normal();
        assert_eq!(face.prim_face, 3);
        assert_eq!([face.n1, face.n2, face.n3], [DVec3::Z; 3]);
    }

    #[test]
    fn test_scale_keeps_normals_perpendicular() {
        let mut face = ViewerFace {
            v1: DVec3::X,
            v2: DVec3::Y,
            v3: DVec3::Z,
            ..ViewerFace::default()
        };
        face.calc_surface_normal();
        face.scale(DVec3::new(2.0, 1.0, 1.0));
        let edge = face.v2 - face.v1;
        assert_abs_diff_eq!(face.n1.dot(edge), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(face.n1.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_numbering_for_hollow_cut_box() {
        let profile = Profile::new(4, 0.1, 0.9, 0.3, 24, true, true).unwrap();
        let numbering = FaceNumbering::new(&profile);
        assert_eq!(numbering.wall(EdgeKind::Outer, 3), 4);
        assert_eq!(numbering.wall(EdgeKind::Hollow, 0), 5);
        assert_eq!(numbering.wall(EdgeKind::CutStart, 0), 6);
        assert_eq!(numbering.wall(EdgeKind::CutEnd, 0), 7);
        assert_eq!(numbering.end_cap(), 8);
    }

    #[test]
    fn test_low_side_walls_span_unit_u() {
        let profile = Profile::new(4, 0.0, 1.0, 0.0, 4, true, true).unwrap();
        for edge in profile.boundary_edges() {
            let (_, u1, u2) = wall_texture(&edge, &profile);
            assert_abs_diff_eq!(u1, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(u2, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_round_walls_follow_angle() {
        let profile = Profile::new(24, 0.0, 1.0, 0.5, 24, true, true).unwrap();
        let edges = profile.boundary_edges();
        let (_, u1, u2) = wall_texture(&edges[0], &profile);
        assert_eq!((u1, u2), (0.0, edges[0].angle2));
        // Hollow walls run the other way around so U is mirrored
        let (_, h1, h2) = wall_texture(&edges[24], &profile);
        assert!(h2 > h1);
    }
}
