//! # Shape Descriptors
//!
//! The input side of the mesher: a normalized [`ShapeDescriptor`], its packed
//! integer form [`PackedShape`], and [`create_mesh`] which turns either into a
//! [`Mesh`].
//!
//! ## Example
//!
//! ```rust
//! use config::constants::MesherConfig;
//! use prim_mesher::shape::{create_mesh, PathCurve, ProfileShape, ShapeDescriptor};
//!
//! let torus = ShapeDescriptor {
//!     profile_shape: ProfileShape::Circle,
//!     path_curve: PathCurve::Circular,
//!     ..ShapeDescriptor::default()
//! };
//! let mesh = create_mesh(&torus, &MesherConfig::default()).unwrap();
//! assert!(mesh.is_closed());
//! ```

use config::constants::{
    MesherConfig, CUT_QUANTUM, DEFAULT_HOLE_SIZE_X, DEFAULT_HOLE_SIZE_Y, REVOLUTION_QUANTUM,
    SCALE_QUANTUM,
};
use glam::DVec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::prim_mesh::PrimMesh;

/// Cross-section of a primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileShape {
    Circle,
    #[default]
    Square,
    EquilateralTriangle,
    /// Circle limited to its upper half; swept circularly it gives a sphere
    HalfCircle,
}

impl ProfileShape {
    /// Side count of the outer ring.
    pub fn sides(self) -> u32 {
        match self {
            Self::Circle | Self::HalfCircle => 24,
            Self::Square => 4,
            Self::EquilateralTriangle => 3,
        }
    }
}

/// Shape of the hole cut by `hollow`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HollowShape {
    /// Same shape as the profile
    #[default]
    Same,
    Circle,
    Square,
    Triangle,
}

impl HollowShape {
    /// Side count of the hollow ring for a given profile.
    pub fn sides(self, profile: ProfileShape) -> u32 {
        match self {
            Self::Same => profile.sides(),
            Self::Circle => 24,
            Self::Square => 4,
            Self::Triangle => 3,
        }
    }
}

/// Path the profile is swept along.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCurve {
    #[default]
    Straight,
    Circular,
}

/// Normalized description of one primitive.
///
/// Missing fields deserialize to the unit cube's values.
///
/// # Example
///
/// ```rust
/// use prim_mesher::shape::{PathCurve, ShapeDescriptor};
///
/// let cube = ShapeDescriptor::default();
/// assert_eq!(cube.path_curve, PathCurve::Straight);
/// assert_eq!(cube.profile_end, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDescriptor {
    pub profile_shape: ProfileShape,
    pub hollow_shape: HollowShape,
    pub path_curve: PathCurve,
    /// Profile cut start, fraction of a turn
    pub profile_begin: f64,
    /// Profile cut end, fraction of a turn
    pub profile_end: f64,
    /// Hole size relative to the profile, 0 for solid
    pub hollow: f64,
    /// Path cut start, fraction of the path
    pub path_begin: f64,
    /// Path cut end, fraction of the path
    pub path_end: f64,
    /// Degrees
    pub twist_begin: i32,
    /// Degrees
    pub twist_end: i32,
    pub top_shear_x: f64,
    pub top_shear_y: f64,
    pub taper_x: f64,
    pub taper_y: f64,
    pub skew: f64,
    pub hole_size_x: f64,
    pub hole_size_y: f64,
    pub radius: f64,
    pub revolutions: f64,
    /// Overrides the configured layers per revolution
    pub steps_per_revolution: Option<u32>,
    /// Final size of the unit primitive
    pub size: DVec3,
}

impl Default for ShapeDescriptor {
    fn default() -> Self {
        Self {
            profile_shape: ProfileShape::Square,
            hollow_shape: HollowShape::Same,
            path_curve: PathCurve::Straight,
            profile_begin: 0.0,
            profile_end: 1.0,
            hollow: 0.0,
            path_begin: 0.0,
            path_end: 1.0,
            twist_begin: 0,
            twist_end: 0,
            top_shear_x: 0.0,
            top_shear_y: 0.0,
            taper_x: 0.0,
            taper_y: 0.0,
            skew: 0.0,
            hole_size_x: DEFAULT_HOLE_SIZE_X,
            hole_size_y: DEFAULT_HOLE_SIZE_Y,
            radius: 0.0,
            revolutions: 1.0,
            steps_per_revolution: None,
            size: DVec3::ONE,
        }
    }
}

impl ShapeDescriptor {
    /// Profile cut actually meshed. Half circles only use the upper half of
    /// the ring.
    pub fn profile_range(&self) -> (f64, f64) {
        match self.profile_shape {
            ProfileShape::HalfCircle => (
                0.5 * self.profile_begin + 0.5,
                0.5 * self.profile_end + 0.5,
            ),
            _ => (self.profile_begin, self.profile_end),
        }
    }

    /// Primitive with this descriptor's profile and path parameters.
    pub fn to_prim_mesh(&self, config: &MesherConfig) -> PrimMesh {
        let (profile_start, profile_end) = self.profile_range();
        let mut prim = PrimMesh::new(
            self.profile_shape.sides(),
            profile_start,
            profile_end,
            self.hollow,
            self.hollow_shape.sides(self.profile_shape),
        );

        prim.twist_begin = self.twist_begin;
        prim.twist_end = self.twist_end;
        prim.top_shear_x = self.top_shear_x;
        prim.top_shear_y = self.top_shear_y;
        prim.path_cut_begin = self.path_begin;
        prim.path_cut_end = self.path_end;
        prim.taper_x = self.taper_x;
        prim.taper_y = self.taper_y;
        prim.skew = self.skew;
        prim.hole_size_x = self.hole_size_x;
        prim.hole_size_y = self.hole_size_y;
        prim.radius = self.radius;
        prim.revolutions = self.revolutions;
        prim.steps_per_revolution = self
            .steps_per_revolution
            .unwrap_or(config.steps_per_revolution);
        prim.viewer_mode = config.viewer_mode;
        prim.calc_vertex_normals = config.vertex_normals;
        prim
    }
}

/// Integer-at-rest form of a primitive as stored with scene objects.
///
/// Cuts and hollow count in 1/50000 steps, with the end cuts stored as their
/// complement. Single byte fields are percentages; `i8` fields are signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackedShape {
    /// Low nibble: profile shape, high nibble: hollow shape
    pub profile_curve: u8,
    pub path_curve: u8,
    pub profile_begin: u16,
    pub profile_end: u16,
    pub profile_hollow: u16,
    pub path_begin: u16,
    pub path_end: u16,
    /// `100` is unscaled
    pub path_scale_x: u8,
    pub path_scale_y: u8,
    pub path_shear_x: i8,
    pub path_shear_y: i8,
    /// Percent of half a turn
    pub path_twist_begin: i8,
    /// Percent of half a turn
    pub path_twist: i8,
    pub path_taper_x: i8,
    pub path_taper_y: i8,
    pub path_skew: i8,
    pub path_radius_offset: i8,
    pub path_revolutions: u8,
    pub size: [f32; 3],
}

/// `path_curve` value of a straight sweep.
pub const PATH_CURVE_STRAIGHT: u8 = 0x10;
/// `path_curve` value of a circular sweep.
pub const PATH_CURVE_CIRCLE: u8 = 0x20;
/// `path_curve` value of the second circular sweep variant.
pub const PATH_CURVE_CIRCLE2: u8 = 0x30;

impl PackedShape {
    fn profile_shape(&self) -> ProfileShape {
        match self.profile_curve & 0x0f {
            0 => ProfileShape::Circle,
            2..=4 => ProfileShape::EquilateralTriangle,
            5 => ProfileShape::HalfCircle,
            _ => ProfileShape::Square,
        }
    }

    fn hollow_shape(&self) -> HollowShape {
        match self.profile_curve & 0xf0 {
            0x10 => HollowShape::Circle,
            0x20 => HollowShape::Square,
            0x30 => HollowShape::Triangle,
            _ => HollowShape::Same,
        }
    }

    fn path_curve(&self) -> PathCurve {
        match self.path_curve {
            PATH_CURVE_CIRCLE | PATH_CURVE_CIRCLE2 => PathCurve::Circular,
            _ => PathCurve::Straight,
        }
    }
}

fn cut(value: u16) -> f64 {
    f64::from(value) * CUT_QUANTUM
}

fn path_scale(value: u8) -> f64 {
    (200.0 - f64::from(value)) * SCALE_QUANTUM
}

fn percent(value: i8) -> f64 {
    f64::from(value) * SCALE_QUANTUM
}

fn twist_degrees(value: i8) -> i32 {
    i32::from(value) * 180 / 100
}

impl From<PackedShape> for ShapeDescriptor {
    /// Straight paths read `path_scale` as the top size and turn it into
    /// taper. Circular paths read it as the hole size and take taper from the
    /// dedicated taper bytes.
    fn from(packed: PackedShape) -> Self {
        let path_curve = packed.path_curve();
        let scale_x = path_scale(packed.path_scale_x);
        let scale_y = path_scale(packed.path_scale_y);

        let (taper_x, taper_y, hole_size_x, hole_size_y) = match path_curve {
            PathCurve::Straight => (
                1.0 - scale_x,
                1.0 - scale_y,
                DEFAULT_HOLE_SIZE_X,
                DEFAULT_HOLE_SIZE_Y,
            ),
            PathCurve::Circular => (
                percent(packed.path_taper_x),
                percent(packed.path_taper_y),
                scale_x,
                scale_y,
            ),
        };

        Self {
            profile_shape: packed.profile_shape(),
            hollow_shape: packed.hollow_shape(),
            path_curve,
            profile_begin: cut(packed.profile_begin),
            profile_end: 1.0 - cut(packed.profile_end),
            hollow: cut(packed.profile_hollow),
            path_begin: cut(packed.path_begin),
            path_end: 1.0 - cut(packed.path_end),
            twist_begin: twist_degrees(packed.path_twist_begin),
            twist_end: twist_degrees(packed.path_twist),
            top_shear_x: percent(packed.path_shear_x),
            top_shear_y: percent(packed.path_shear_y),
            taper_x,
            taper_y,
            skew: percent(packed.path_skew),
            hole_size_x,
            hole_size_y,
            radius: percent(packed.path_radius_offset),
            revolutions: 1.0 + f64::from(packed.path_revolutions) * REVOLUTION_QUANTUM,
            steps_per_revolution: None,
            size: DVec3::from_array(packed.size.map(f64::from)),
        }
    }
}

/// Meshes one primitive at its final size.
///
/// # Errors
///
/// Returns [`MeshError::Config`] for invalid settings and
/// [`MeshError::InvalidArgument`] for shapes no sweep can honour.
pub fn create_mesh(shape: &ShapeDescriptor, config: &MesherConfig) -> Result<Mesh, MeshError> {
    config.validate()?;
    if !shape.size.is_finite() {
        return Err(MeshError::invalid_argument(format!(
            "size is not finite: {}",
            shape.size
        )));
    }

    let mut prim = shape.to_prim_mesh(config);
    match shape.path_curve {
        PathCurve::Straight => prim.extrude_linear()?,
        PathCurve::Circular => prim.extrude_circular()?,
    }
    if config.face_normals {
        prim.calc_normals();
    }
    if shape.size != DVec3::ONE {
        prim.scale(shape.size.x, shape.size.y, shape.size.z);
    }

    debug!(
        "meshed {:?} {:?} path: {} vertices, {} triangles",
        shape.profile_shape,
        shape.path_curve,
        prim.coords.len(),
        prim.face_count()
    );
    Ok(Mesh::from(prim))
}

/// Meshes a batch of primitives, one result per shape in input order.
#[cfg(not(feature = "parallel"))]
pub fn create_meshes(
    shapes: &[ShapeDescriptor],
    config: &MesherConfig,
) -> Vec<Result<Mesh, MeshError>> {
    shapes.iter().map(|shape| create_mesh(shape, config)).collect()
}

/// Meshes a batch of primitives, one result per shape in input order.
#[cfg(feature = "parallel")]
pub fn create_meshes(
    shapes: &[ShapeDescriptor],
    config: &MesherConfig,
) -> Vec<Result<Mesh, MeshError>> {
    use rayon::prelude::*;

    shapes
        .par_iter()
        .map(|shape| create_mesh(shape, config))
        .collect()
}
