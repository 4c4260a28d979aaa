//! # Mesh Data Structure
//!
//! Output mesh handed to physics and renderers: vertices, triangles and the
//! optional normals and viewer faces of a primitive.

use std::collections::HashMap;

use config::constants::{EPSILON, VERTEX_MERGE_EPSILON, WELD_QUANTUM};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::math::{normal_scale, normalize_or_zero};
use crate::prim_mesh::PrimMesh;
use crate::viewer::ViewerFace;

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64 internally. Export to f32 only
/// happens at the renderer boundary.
///
/// # Example
///
/// ```rust
/// use prim_mesher::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Optional vertex normals
    normals: Option<Vec<DVec3>>,
    /// Optional flat normals, one per triangle
    face_normals: Option<Vec<DVec3>>,
    /// Optional flat-shaded faces for hard-edged rendering
    viewer_faces: Option<Vec<ViewerFace>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Returns the vertex normals.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Returns the per-triangle normals.
    pub fn face_normals(&self) -> Option<&[DVec3]> {
        self.face_normals.as_deref()
    }

    /// Returns the flat-shaded viewer faces.
    pub fn viewer_faces(&self) -> Option<&[ViewerFace]> {
        self.viewer_faces.as_deref()
    }

    /// Flat normal of one triangle from its winding.
    pub fn triangle_normal(&self, index: usize) -> DVec3 {
        let [a, b, c] = self.triangles[index].map(|i| self.vertices[i as usize]);
        normalize_or_zero((b - a).cross(c - a))
    }

    /// Computes smooth vertex normals by accumulating face normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normalize_or_zero(*normal);
        }

        self.normals = Some(normals);
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Scales the mesh per axis.
    ///
    /// Normals stay perpendicular to the scaled surface and viewer faces are
    /// scaled along with the vertices.
    pub fn scale(&mut self, factors: DVec3) {
        for v in &mut self.vertices {
            *v *= factors;
        }

        let cofactor = normal_scale(factors);
        for normals in [&mut self.normals, &mut self.face_normals].into_iter().flatten() {
            for n in normals {
                *n = normalize_or_zero(*n * cofactor);
            }
        }

        if let Some(viewer_faces) = &mut self.viewer_faces {
            for face in viewer_faces {
                face.scale(factors);
            }
        }
    }

    /// Merges another mesh into this one.
    ///
    /// Optional attributes survive only when both meshes carry them.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for tri in &other.triangles {
            self.triangles
                .push([tri[0] + offset, tri[1] + offset, tri[2] + offset]);
        }

        merge_optional(&mut self.normals, &other.normals);
        merge_optional(&mut self.face_normals, &other.face_normals);
        merge_optional(&mut self.viewer_faces, &other.viewer_faces);
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No degenerate triangles (zero area)
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        for tri in &self.triangles {
            if tri[0] >= vertex_count || tri[1] >= vertex_count || tri[2] >= vertex_count {
                return false;
            }

            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }

            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            let area = (v1 - v0).cross(v2 - v0).length();
            if area < VERTEX_MERGE_EPSILON {
                return false;
            }
        }

        true
    }

    /// Returns true if the surface is watertight and consistently wound.
    ///
    /// Vertices are welded on a [`WELD_QUANTUM`] grid first, since sweeps keep
    /// separate vertices per layer and a closed circular path ends on its
    /// first layer. Every directed edge must then be matched by its reverse.
    /// Triangles that collapse under welding are ignored.
    pub fn is_closed(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }

        let mut welded: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let ids: Vec<usize> = self
            .vertices
            .iter()
            .map(|v| {
                let key = (
                    (v.x / WELD_QUANTUM).round() as i64,
                    (v.y / WELD_QUANTUM).round() as i64,
                    (v.z / WELD_QUANTUM).round() as i64,
                );
                let next = welded.len();
                *welded.entry(key).or_insert(next)
            })
            .collect();

        let mut balance: HashMap<(usize, usize), i64> = HashMap::new();
        for tri in &self.triangles {
            let [a, b, c] = tri.map(|i| ids[i as usize]);
            if a == b || b == c || a == c {
                continue;
            }
            for (p, q) in [(a, b), (b, c), (c, a)] {
                if p < q {
                    *balance.entry((p, q)).or_insert(0) += 1;
                } else {
                    *balance.entry((q, p)).or_insert(0) -= 1;
                }
            }
        }

        !balance.is_empty() && balance.values().all(|&count| count == 0)
    }

    /// Signed enclosed volume, positive for outward facing triangles.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
                a.dot(b.cross(c))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Distances along `direction` at which the ray from `origin` crosses the
    /// surface, sorted ascending.
    ///
    /// Uses the Möller–Trumbore test; hits behind the origin are ignored.
    pub fn ray_intersections(&self, origin: DVec3, direction: DVec3) -> Vec<f64> {
        let mut hits: Vec<f64> = self
            .triangles
            .iter()
            .filter_map(|tri| {
                let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
                ray_triangle(origin, direction, a, b, c)
            })
            .collect();
        hits.sort_by(f64::total_cmp);
        hits
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            result.push(v.x as f32);
            result.push(v.y as f32);
            result.push(v.z as f32);
        }
        result
    }

    /// Exports triangle indices as u32 array for GPU.
    ///
    /// Returns flattened [i0, i1, i2, i0, i1, i2, ...] array.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Exports normals as f32 array for GPU.
    pub fn normals_f32(&self) -> Option<Vec<f32>> {
        self.normals.as_ref().map(|normals| {
            let mut result = Vec::with_capacity(normals.len() * 3);
            for n in normals {
                result.push(n.x as f32);
                result.push(n.y as f32);
                result.push(n.z as f32);
            }
            result
        })
    }
}

impl From<PrimMesh> for Mesh {
    /// Converts the shared buffers of an extruded primitive.
    ///
    /// Vertex normals are kept when they were computed; flat normals from
    /// [`PrimMesh::calc_normals`] become per-triangle normals.
    fn from(prim: PrimMesh) -> Self {
        let vertex_count = prim.coords.len();
        let triangles = prim
            .faces
            .iter()
            .map(|f| [f.v1 as u32, f.v2 as u32, f.v3 as u32])
            .collect();

        let normals = (prim.calc_vertex_normals && prim.normals.len() >= vertex_count)
            .then(|| prim.normals[..vertex_count].to_vec());
        let face_normals = prim
            .normals_processed()
            .then(|| prim.faces.iter().map(|f| prim.normals[f.n1]).collect());

        Self {
            vertices: prim.coords,
            triangles,
            normals,
            face_normals,
            viewer_faces: prim.viewer_faces,
        }
    }
}

fn merge_optional<T: Clone>(target: &mut Option<Vec<T>>, other: &Option<Vec<T>>) {
    match (target.as_mut(), other) {
        (Some(values), Some(more)) => values.extend_from_slice(more),
        _ => *target = None,
    }
}

/// Möller–Trumbore ray/triangle intersection, returning the ray parameter.
fn ray_triangle(origin: DVec3, direction: DVec3, a: DVec3, b: DVec3, c: DVec3) -> Option<f64> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}
