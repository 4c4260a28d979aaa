//! # Primitive Meshes
//!
//! Sweeps a [`Profile`] along a path to build the shared vertex/face buffers
//! of a primitive.
//!
//! ## Modes
//!
//! - [`PrimMesh::extrude_linear`]: straight path along Z (boxes, prisms,
//!   cylinders)
//! - [`PrimMesh::extrude_circular`]: circular or helical path about X (tori,
//!   tubes, rings, spheres)
//!
//! Both modes place one profile layer per step, stitch consecutive layers
//! with two triangles per boundary edge and cap the ends. The unit primitive
//! spans `[-0.5, 0.5]` on every axis; callers scale it to its final size.
//!
//! ## Example
//!
//! ```rust
//! use prim_mesher::prim_mesh::PrimMesh;
//!
//! let mut cube = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
//! cube.extrude_linear().unwrap();
//! assert_eq!(cube.coords.len(), 8);
//! assert_eq!(cube.faces.len(), 12);
//! ```

mod circular;
mod linear;

pub use circular::circular_steps_per_revolution;
pub use linear::linear_step_count;

use std::fmt;
use std::io::Write;

use config::constants::{
    DEFAULT_HOLE_SIZE_X, DEFAULT_HOLE_SIZE_Y, DEFAULT_STEPS_PER_REVOLUTION, HOLLOW_THRESHOLD,
    MAX_TWIST_DEGREES, MIN_PROFILE_SPAN, MIN_SIDES,
};
use glam::{DQuat, DVec3};
use log::{debug, trace};

use crate::error::MeshError;
use crate::face::Face;
use crate::math::{normal_scale, normalize_or_zero};
use crate::mesh::Mesh;
use crate::profile::{write_raw_faces, Profile, RingEdge};
use crate::viewer::{build_viewer_faces, CapRecord, LayerRecord, SweepRecord, ViewerFace};

/// Hollow scale applied when a square hollow sits in a non-square profile
/// (or the reverse) so the hollow's corners stay inside the outer ring.
const HOLLOW_DIAGONAL_SCALE: f64 = 0.707;

/// Largest hollow that still fits a square hole inside a triangle or circle.
const SQUARE_HOLLOW_LIMIT: f64 = 0.7;

/// Hollow scale of a triangle's round hollow.
const TRIANGLE_HOLLOW_SCALE: f64 = 0.5;

/// Hollow scale of a square hole in a 24-sided profile.
const CIRCLE_SQUARE_HOLLOW_SCALE: f64 = 1.414;

/// A primitive under construction and its output buffers.
///
/// Profile parameters are clamped once by [`PrimMesh::new`]. Path parameters
/// are public and read by the next extrusion.
#[derive(Debug, Clone)]
pub struct PrimMesh {
    /// Vertex positions
    pub coords: Vec<DVec3>,
    /// Vertex normals, then flat face normals once [`PrimMesh::calc_normals`] ran
    pub normals: Vec<DVec3>,
    /// Triangles indexing `coords` and `normals`
    pub faces: Vec<Face>,
    /// Flat-shaded faces, present after an extrusion in viewer mode
    pub viewer_faces: Option<Vec<ViewerFace>>,

    sides: u32,
    profile_start: f64,
    profile_end: f64,
    hollow: f64,
    hollow_sides: u32,
    has_profile_cut: bool,
    has_hollow: bool,

    /// Twist at the path start, degrees, clamped to ±180 when swept
    pub twist_begin: i32,
    /// Twist at the path end, degrees, clamped to ±180 when swept
    pub twist_end: i32,
    pub top_shear_x: f64,
    pub top_shear_y: f64,
    /// Path cut start as a fraction of the path
    pub path_cut_begin: f64,
    /// Path cut end as a fraction of the path
    pub path_cut_end: f64,
    pub skew: f64,
    /// Path scale in X for circular sweeps
    pub hole_size_x: f64,
    /// Path thickness in Y for circular sweeps
    pub hole_size_y: f64,
    pub taper_x: f64,
    pub taper_y: f64,
    /// Radial taper of a circular path
    pub radius: f64,
    pub revolutions: f64,
    /// Layers per full turn of a circular sweep
    pub steps_per_revolution: u32,

    /// Derive flat-shaded viewer faces; implies `calc_vertex_normals`
    pub viewer_mode: bool,
    /// Keep per-vertex normals in `normals`
    pub calc_vertex_normals: bool,

    normals_processed: bool,
}

impl PrimMesh {
    /// Creates a primitive with clamped profile parameters and default path
    /// parameters.
    ///
    /// Side counts below 3 are raised to 3, the profile cut keeps a minimum
    /// span and `hollow` is clamped to `[0, 1]`.
    pub fn new(sides: u32, profile_start: f64, profile_end: f64, hollow: f64, hollow_sides: u32) -> Self {
        let sides = clamp_sides("sides", sides);
        let hollow_sides = clamp_sides("hollow_sides", hollow_sides);

        let mut profile_start = profile_start.max(0.0);
        let mut profile_end = profile_end.min(1.0);
        if profile_end < MIN_PROFILE_SPAN {
            trace!("profile_end {profile_end} raised to {MIN_PROFILE_SPAN}");
            profile_end = MIN_PROFILE_SPAN;
        }
        if profile_start >= profile_end {
            trace!("profile_start {profile_start} lowered below profile_end {profile_end}");
            profile_start = profile_end - MIN_PROFILE_SPAN;
        }
        let hollow = hollow.clamp(0.0, 1.0);

        Self {
            coords: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            viewer_faces: None,
            sides,
            profile_start,
            profile_end,
            hollow,
            hollow_sides,
            has_profile_cut: profile_start > 0.0 || profile_end < 1.0,
            has_hollow: hollow > HOLLOW_THRESHOLD,
            twist_begin: 0,
            twist_end: 0,
            top_shear_x: 0.0,
            top_shear_y: 0.0,
            path_cut_begin: 0.0,
            path_cut_end: 1.0,
            skew: 0.0,
            hole_size_x: DEFAULT_HOLE_SIZE_X,
            hole_size_y: DEFAULT_HOLE_SIZE_Y,
            taper_x: 0.0,
            taper_y: 0.0,
            radius: 0.0,
            revolutions: 1.0,
            steps_per_revolution: DEFAULT_STEPS_PER_REVOLUTION,
            viewer_mode: false,
            calc_vertex_normals: false,
            normals_processed: false,
        }
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn hollow_sides(&self) -> u32 {
        self.hollow_sides
    }

    pub fn profile_start(&self) -> f64 {
        self.profile_start
    }

    pub fn profile_end(&self) -> f64 {
        self.profile_end
    }

    pub fn hollow(&self) -> f64 {
        self.hollow
    }

    pub fn has_profile_cut(&self) -> bool {
        self.has_profile_cut
    }

    pub fn has_hollow(&self) -> bool {
        self.has_hollow
    }

    /// Twist at both ends in degrees, clamped to ±[`MAX_TWIST_DEGREES`].
    pub fn twist_range(&self) -> (i32, i32) {
        let clamp = |degrees: i32| degrees.clamp(-MAX_TWIST_DEGREES, MAX_TWIST_DEGREES);
        (clamp(self.twist_begin), clamp(self.twist_end))
    }

    /// Total twist of the sweep in radians.
    pub fn twist_total(&self) -> f64 {
        let (begin, end) = self.twist_range();
        (f64::from(end) - f64::from(begin)).to_radians()
    }

    /// Number of triangles in the shared buffers.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Flat unit normal of one face.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::FaceIndexOutOfRange`] for an unknown face.
    pub fn surface_normal(&self, face_index: usize) -> Result<DVec3, MeshError> {
        let face = self
            .faces
            .get(face_index)
            .ok_or(MeshError::FaceIndexOutOfRange {
                index: face_index,
                count: self.faces.len(),
            })?;
        Ok(face.surface_normal(&self.coords))
    }

    /// Appends one flat normal per face and points every face at it.
    ///
    /// Vertex normals are kept in front of the face normals when
    /// `calc_vertex_normals` is set. Repeated calls do nothing until the next
    /// extrusion.
    pub fn calc_normals(&mut self) {
        if self.normals_processed {
            return;
        }
        self.normals_processed = true;

        if !self.calc_vertex_normals {
            self.normals.clear();
        }
        self.normals.reserve(self.faces.len());

        for face in &mut self.faces {
            let index = self.normals.len();
            self.normals.push(face.surface_normal(&self.coords));
            face.n1 = index;
            face.n2 = index;
            face.n3 = index;
        }
    }

    /// Whether [`PrimMesh::calc_normals`] ran since the last extrusion.
    pub fn normals_processed(&self) -> bool {
        self.normals_processed
    }

    /// Translates the mesh and its viewer faces.
    pub fn add_pos(&mut self, offset: DVec3) {
        for coord in &mut self.coords {
            *coord += offset;
        }
        if let Some(viewer_faces) = &mut self.viewer_faces {
            for face in viewer_faces {
                face.add_pos(offset);
            }
        }
    }

    /// Rotates positions, normals and viewer faces.
    pub fn add_rot(&mut self, rotation: DQuat) {
        for coord in &mut self.coords {
            *coord = rotation * *coord;
        }
        for normal in &mut self.normals {
            *normal = rotation * *normal;
        }
        if let Some(viewer_faces) = &mut self.viewer_faces {
            for face in viewer_faces {
                face.add_rot(rotation);
            }
        }
    }

    /// Scales positions per axis, keeping normals perpendicular to the surface.
    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        let factors = DVec3::new(x, y, z);
        let cofactor = normal_scale(factors);
        for coord in &mut self.coords {
            *coord *= factors;
        }
        for normal in &mut self.normals {
            *normal = normalize_or_zero(*normal * cofactor);
        }
        if let Some(viewer_faces) = &mut self.viewer_faces {
            for face in viewer_faces {
                face.scale(factors);
            }
        }
    }

    /// Writes one line per face with its nine coordinates.
    pub fn write_raw<W: Write>(&self, writer: &mut W) -> Result<(), MeshError> {
        write_raw_faces(writer, &self.coords, &self.faces)
    }

    /// Hands the buffers over as an output [`Mesh`].
    pub fn into_mesh(self) -> Mesh {
        Mesh::from(self)
    }

    /// Whether a circular sweep needs caps.
    ///
    /// A full, untapered, untwisted, unskewed loop closes on itself.
    /// `revolutions` is not consulted, so an uncut coil of more than one
    /// turn gets no caps and is left open at both ends.
    pub fn need_end_faces(&self) -> bool {
        self.path_cut_begin != 0.0
            || self.path_cut_end != 1.0
            || self.taper_x != 0.0
            || self.taper_y != 0.0
            || self.skew != 0.0
            || self.twist_total() != 0.0
            || self.radius != 0.0
    }

    /// Rejects parameters no sweep can honour.
    fn validate_path(&self) -> Result<(), MeshError> {
        let values = [
            ("profile_start", self.profile_start),
            ("profile_end", self.profile_end),
            ("hollow", self.hollow),
            ("top_shear_x", self.top_shear_x),
            ("top_shear_y", self.top_shear_y),
            ("path_cut_begin", self.path_cut_begin),
            ("path_cut_end", self.path_cut_end),
            ("skew", self.skew),
            ("hole_size_x", self.hole_size_x),
            ("hole_size_y", self.hole_size_y),
            ("taper_x", self.taper_x),
            ("taper_y", self.taper_y),
            ("radius", self.radius),
            ("revolutions", self.revolutions),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MeshError::invalid_argument(format!(
                "{name} is not finite: {value}"
            )));
        }
        if self.path_cut_end <= self.path_cut_begin {
            return Err(MeshError::invalid_argument(format!(
                "path_cut_end not greater than path_cut_begin: begin={}, end={}",
                self.path_cut_begin, self.path_cut_end
            )));
        }
        Ok(())
    }

    /// Clears the output buffers before a new sweep.
    fn begin_sweep(&mut self) {
        if self.viewer_mode {
            self.calc_vertex_normals = true;
        }
        self.coords.clear();
        self.normals.clear();
        self.faces.clear();
        self.viewer_faces = None;
        self.normals_processed = false;
    }

    /// Profile fed to every layer, hollow already compensated.
    fn base_profile(
        &self,
        hollow: f64,
        create_faces: bool,
        initial_rotation: Option<DQuat>,
    ) -> Result<Profile, MeshError> {
        let hollow = if self.has_hollow { hollow } else { 0.0 };
        let mut profile = Profile::new(
            self.sides,
            self.profile_start,
            self.profile_end,
            hollow,
            self.hollow_sides,
            create_faces,
            self.calc_vertex_normals,
        )?;
        if let Some(rotation) = initial_rotation {
            profile.add_rot(rotation);
            profile.make_face_uvs();
        }
        Ok(profile)
    }

    /// Appends a placed layer, its walls back to the previous layer and any
    /// cap it owns.
    fn append_layer(&mut self, mut layer: Profile, placement: LayerPlacement, sweep: &mut Sweep) {
        if placement.first {
            layer.flip_normals();
        }

        let base = self.coords.len();
        layer.offset_face_vertex_indices(base);
        layer.offset_face_normal_indices(base);
        self.coords.extend_from_slice(&layer.coords);
        if self.calc_vertex_normals {
            self.normals.extend_from_slice(&layer.vertex_normals);
        }

        let layer_index = sweep.record.layers.len();
        let emit_cap = sweep.need_end_faces && (placement.first || placement.last);

        if emit_cap && placement.first {
            self.push_cap(&layer, layer_index, true, sweep);
        }

        if let Some(prev) = sweep.record.layers.last() {
            let prev_base = prev.base;
            for edge in &sweep.edges {
                let (ca, pa, pb, cb) = (base + edge.a, prev_base + edge.a, prev_base + edge.b, base + edge.b);
                self.faces.push(Face::new(ca, pa, pb));
                self.faces.push(Face::new(ca, pb, cb));
            }
        }

        sweep.record.layers.push(LayerRecord {
            base,
            v: placement.v,
            cut_normal1: layer.cut_normal1,
            cut_normal2: layer.cut_normal2,
            face_normal: layer.face_normal,
        });

        if emit_cap && placement.last && !placement.first {
            self.push_cap(&layer, layer_index, false, sweep);
        }
    }

    fn push_cap(&mut self, layer: &Profile, layer_index: usize, flipped: bool, sweep: &mut Sweep) {
        let start = self.faces.len();
        self.faces.extend_from_slice(&layer.faces);
        sweep.record.caps.push(CapRecord {
            layer: layer_index,
            faces: start..self.faces.len(),
            flipped,
        });
    }

    /// Derives viewer faces and logs the result.
    fn finish_sweep(&mut self, sweep: Sweep, mode: &str) {
        if self.viewer_mode {
            self.viewer_faces = Some(build_viewer_faces(
                &self.coords,
                &self.normals,
                &self.faces,
                &sweep.record,
            ));
        }
        debug!(
            "{mode} extrusion: {} layers, {} vertices, {} faces, {} viewer faces",
            sweep.record.layers.len(),
            self.coords.len(),
            self.faces.len(),
            self.viewer_faces.as_ref().map_or(0, Vec::len)
        );
    }
}

/// Bookkeeping shared by the layers of one sweep.
struct Sweep {
    edges: Vec<RingEdge>,
    need_end_faces: bool,
    record: SweepRecord,
}

impl Sweep {
    fn new(profile: &Profile, need_end_faces: bool) -> Self {
        Self {
            edges: profile.boundary_edges(),
            need_end_faces,
            record: SweepRecord::new(profile.clone_without_faces()),
        }
    }
}

/// Position of a layer within its sweep.
#[derive(Debug, Clone, Copy)]
struct LayerPlacement {
    first: bool,
    last: bool,
    /// Texture V of the layer
    v: f64,
}

/// Scale factor of a tapered layer at `percent` along the path.
///
/// Positive taper shrinks toward the end, negative taper toward the start.
fn taper_scale(taper: f64, percent: f64, threshold: f64) -> f64 {
    if taper > threshold {
        1.0 - percent * taper
    } else if taper < -threshold {
        1.0 + (1.0 - percent) * taper
    } else {
        1.0
    }
}

fn clamp_sides(name: &str, sides: u32) -> u32 {
    if sides < MIN_SIDES {
        trace!("{name} {sides} raised to {MIN_SIDES}");
        MIN_SIDES
    } else {
        sides
    }
}

impl fmt::Display for PrimMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sides: {}", self.sides)?;
        writeln!(f, "hollow_sides: {}", self.hollow_sides)?;
        writeln!(f, "profile_start: {}", self.profile_start)?;
        writeln!(f, "profile_end: {}", self.profile_end)?;
        writeln!(f, "hollow: {}", self.hollow)?;
        writeln!(f, "twist_begin: {}", self.twist_begin)?;
        writeln!(f, "twist_end: {}", self.twist_end)?;
        writeln!(f, "top_shear_x: {}", self.top_shear_x)?;
        writeln!(f, "top_shear_y: {}", self.top_shear_y)?;
        writeln!(f, "path_cut_begin: {}", self.path_cut_begin)?;
        writeln!(f, "path_cut_end: {}", self.path_cut_end)?;
        writeln!(f, "hole_size_x: {}", self.hole_size_x)?;
        writeln!(f, "hole_size_y: {}", self.hole_size_y)?;
        writeln!(f, "taper_x: {}", self.taper_x)?;
        writeln!(f, "taper_y: {}", self.taper_y)?;
        writeln!(f, "radius: {}", self.radius)?;
        writeln!(f, "revolutions: {}", self.revolutions)?;
        writeln!(f, "skew: {}", self.skew)?;
        writeln!(f, "steps_per_revolution: {}", self.steps_per_revolution)?;
        writeln!(f, "viewer_mode: {}", self.viewer_mode)?;
        write!(f, "calc_vertex_normals: {}", self.calc_vertex_normals)
    }
}

#[cfg(test)]
mod tests;
