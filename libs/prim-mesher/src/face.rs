//! # Faces and Texture Coordinates
//!
//! Index triples into the flat vertex and normal arrays owned by a
//! [`Profile`](crate::profile::Profile) or [`PrimMesh`](crate::prim_mesh::PrimMesh).

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::math::triangle_normal;

/// Texture coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UvCoord {
    pub u: f64,
    pub v: f64,
}

impl UvCoord {
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// Planar projection of a profile point, centered on `(0.5, 0.5)`.
    #[inline]
    pub fn planar(point: DVec3) -> Self {
        Self::new(0.5 + point.x, 0.5 - point.y)
    }
}

/// A triangle referencing vertices and normals by index.
///
/// `v*` index the owner's coordinate array and `n*` its normal array. When
/// normals are computed per vertex both triples are identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub v1: usize,
    pub v2: usize,
    pub v3: usize,
    pub n1: usize,
    pub n2: usize,
    pub n3: usize,
}

impl Face {
    /// Creates a face whose normal indices mirror its vertex indices.
    pub const fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self {
            v1,
            v2,
            v3,
            n1: v1,
            n2: v2,
            n3: v3,
        }
    }

    /// Reverses the winding order.
    #[inline]
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.v1, &mut self.v3);
        std::mem::swap(&mut self.n1, &mut self.n3);
    }

    /// Shifts the vertex indices by `offset`.
    #[inline]
    pub fn offset_vertices(&mut self, offset: usize) {
        self.v1 += offset;
        self.v2 += offset;
        self.v3 += offset;
    }

    /// Shifts the normal indices by `offset`.
    #[inline]
    pub fn offset_normals(&mut self, offset: usize) {
        self.n1 += offset;
        self.n2 += offset;
        self.n3 += offset;
    }

    /// Vertex indices as a triangle.
    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Flat unit normal of the face computed from `coords`.
    ///
    /// Degenerate faces yield the zero vector.
    pub fn surface_normal(&self, coords: &[DVec3]) -> DVec3 {
        triangle_normal(coords[self.v1], coords[self.v2], coords[self.v3])
    }
}
