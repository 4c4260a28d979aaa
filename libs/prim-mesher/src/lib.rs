//! # Prim Mesher
//!
//! Procedural meshes for parametric primitives.
//! Sweeps a 2D cross-section along a straight or circular path and returns
//! a triangle mesh.
//!
//! ## Architecture
//!
//! ```text
//! ShapeDescriptor → PrimMesh (Profile per layer) → Mesh
//! ```
//!
//! ## Building Blocks
//!
//! - **Angles**: unit circle samples with exact cut endpoints
//! - **Profile**: outer ring, optional hollow ring, cap triangulation
//! - **PrimMesh**: linear and circular extrusion with taper, twist, shear,
//!   skew, radius and revolutions
//! - **Viewer faces**: flat-shaded triangles derived after extrusion
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::MesherConfig;
//! use prim_mesher::{create_mesh, ShapeDescriptor};
//!
//! let mesh = create_mesh(&ShapeDescriptor::default(), &MesherConfig::default()).unwrap();
//! assert_eq!(mesh.vertex_count(), 8);
//! assert_eq!(mesh.triangle_count(), 12);
//! ```

pub mod angles;
pub mod error;
pub mod face;
pub mod math;
pub mod mesh;
pub mod prim_mesh;
pub mod profile;
pub mod shape;
pub mod viewer;

pub use error::MeshError;
pub use mesh::Mesh;
pub use prim_mesh::PrimMesh;
pub use profile::Profile;
pub use shape::{create_mesh, create_meshes, PackedShape, ShapeDescriptor};
pub use viewer::ViewerFace;
