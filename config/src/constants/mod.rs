//! Centralized configuration values shared by the primitive mesher.
//!
//! Each public item documents its purpose and, where useful, a minimal
//! usage example so that the geometry crate can stay declarative and avoid
//! scattering literals.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// assert!((1.0_f64 - (1.0 + 1e-11)).abs() < EPSILON);
/// ```
pub const EPSILON: f64 = 1e-10;

/// Magnitude below which a vector or quaternion is considered degenerate.
///
/// Normalizing anything shorter than this yields the zero vector (for
/// directions) or the identity rotation (for quaternions) instead of NaN.
///
/// # Example
///
/// ```rust
/// use config::constants::MAG_THRESHOLD;
///
/// let tiny: f64 = 1e-9;
/// assert!(tiny < MAG_THRESHOLD);
/// ```
pub const MAG_THRESHOLD: f64 = 1e-7;

/// Minimum triangle area accepted by mesh validation.
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Grid size used when welding coincident vertices for topology queries.
///
/// Layers of a sweep are stored with their own vertices, so positions that
/// coincide (ring seams, closed circular paths) are merged on this grid
/// before edge counting.
pub const WELD_QUANTUM: f64 = 1e-6;

// =============================================================================
// PROFILE CONSTANTS
// =============================================================================

/// Minimum number of sides for a profile or hollow ring.
///
/// Smaller requests are silently raised to this value.
pub const MIN_SIDES: u32 = 3;

/// Minimum angular span of a profile cut, as a fraction of a full turn.
///
/// # Example
///
/// ```rust
/// use config::constants::MIN_PROFILE_SPAN;
///
/// let profile_end: f64 = 0.0;
/// assert_eq!(profile_end.max(MIN_PROFILE_SPAN), 0.02);
/// ```
pub const MIN_PROFILE_SPAN: f64 = 0.02;

/// Hollow amounts at or below this value are treated as solid.
pub const HOLLOW_THRESHOLD: f64 = 0.001;

/// Distance of the outer ring's vertices from the profile center.
pub const PROFILE_RADIUS: f64 = 0.5;

/// Distance of a square profile's corners from the center.
///
/// The square's angle table is corner-aligned, so its corners sit at
/// `1/√2` to give a unit-width square once rotated onto the axes.
pub const SQUARE_PROFILE_RADIUS: f64 = FRAC_1_SQRT_2;

// =============================================================================
// EXTRUSION CONSTANTS
// =============================================================================

/// Default number of layers per full turn of a circular sweep.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_STEPS_PER_REVOLUTION;
///
/// let step_angle = 360.0 / DEFAULT_STEPS_PER_REVOLUTION as f64;
/// assert_eq!(step_angle, 15.0);
/// ```
pub const DEFAULT_STEPS_PER_REVOLUTION: u32 = 24;

/// Smallest accepted `steps_per_revolution`.
pub const MIN_STEPS_PER_REVOLUTION: u32 = 3;

/// Extra linear layers added per radian of total twist.
///
/// # Example
///
/// ```rust
/// use config::constants::TWIST_STEP_FACTOR;
///
/// let twist = std::f64::consts::PI;
/// let extra = (twist * TWIST_STEP_FACTOR).ceil() as u32;
/// assert_eq!(extra, 12);
/// ```
pub const TWIST_STEP_FACTOR: f64 = 3.66;

/// Total twist (radians) above which extra layers are generated.
pub const TWIST_STEP_THRESHOLD: f64 = 0.01;

/// Layer multiplier for tapered triangular prisms, per unit path length.
pub const PRISM_TAPER_STEP_FACTOR: f64 = 4.5;

/// Taper magnitudes at or below this value are ignored.
pub const TAPER_THRESHOLD: f64 = 0.01;

/// Radius offsets at or below this magnitude are ignored.
pub const RADIUS_THRESHOLD: f64 = 0.001;

/// Circular twist (radians) above which the layer count doubles.
pub const CIRCULAR_TWIST_DOUBLING_FIRST: f64 = 1.5 * PI;

/// Circular twist (radians) above which the layer count doubles again.
pub const CIRCULAR_TWIST_DOUBLING_SECOND: f64 = 3.0 * PI;

/// Largest twist magnitude (degrees) honoured at either end of a sweep.
pub const MAX_TWIST_DEGREES: i32 = 180;

/// Fraction of the Y top shear subtracted from the circular sweep angles.
pub const TOP_SHEAR_ANGLE_FACTOR: f64 = 0.9;

/// Growth of the circular path radius per unit of Y top shear.
pub const SHEAR_COMPENSATION_FACTOR: f64 = 0.25;

/// Default path scale in X (`hole_size_x`).
pub const DEFAULT_HOLE_SIZE_X: f64 = 1.0;

/// Default path scale in Y (`hole_size_y`).
pub const DEFAULT_HOLE_SIZE_Y: f64 = 0.25;

// =============================================================================
// PACKED SHAPE ENCODING
// =============================================================================

/// Unit of the packed profile/path cut and hollow values (1/50000).
///
/// # Example
///
/// ```rust
/// use config::constants::CUT_QUANTUM;
///
/// assert_eq!(50_000.0 * CUT_QUANTUM, 1.0);
/// ```
pub const CUT_QUANTUM: f64 = 2e-5;

/// Unit of packed scale, shear, taper, skew and radius values.
pub const SCALE_QUANTUM: f64 = 0.01;

/// Unit of the packed revolution count above one.
pub const REVOLUTION_QUANTUM: f64 = 0.015;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

// =============================================================================
// MESHER SETTINGS
// =============================================================================

/// Immutable snapshot of the mesher settings shared by every request.
///
/// # Examples
/// ```
/// use config::constants::MesherConfig;
/// let config = MesherConfig::default();
/// assert_eq!(config.steps_per_revolution, 24);
/// assert!(!config.viewer_mode);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MesherConfig {
    /// Layers per full turn of a circular sweep when the shape does not
    /// specify its own.
    pub steps_per_revolution: u32,
    /// Emit flat-shaded viewer faces in addition to the shared mesh.
    pub viewer_mode: bool,
    /// Compute smooth per-vertex normals.
    pub vertex_normals: bool,
    /// Compute one flat normal per triangle.
    pub face_normals: bool,
}

impl MesherConfig {
    /// Builds a configuration, rejecting step counts too small to form a
    /// closed polygonal path.
    ///
    /// # Examples
    /// ```
    /// use config::constants::MesherConfig;
    /// let cfg = MesherConfig::new(36).expect("valid config");
    /// assert_eq!(cfg.steps_per_revolution, 36);
    /// assert!(MesherConfig::new(2).is_err());
    /// ```
    pub fn new(steps_per_revolution: u32) -> Result<Self, ConfigError> {
        if steps_per_revolution < MIN_STEPS_PER_REVOLUTION {
            return Err(ConfigError::InvalidStepsPerRevolution(steps_per_revolution));
        }
        Ok(Self {
            steps_per_revolution,
            ..Self::default()
        })
    }

    /// Returns a copy with viewer mode switched on or off.
    pub fn with_viewer_mode(mut self, viewer_mode: bool) -> Self {
        self.viewer_mode = viewer_mode;
        self
    }

    /// Returns a copy with per-vertex normals switched on or off.
    pub fn with_vertex_normals(mut self, vertex_normals: bool) -> Self {
        self.vertex_normals = vertex_normals;
        self
    }

    /// Returns a copy with per-face normals switched on or off.
    pub fn with_face_normals(mut self, face_normals: bool) -> Self {
        self.face_normals = face_normals;
        self
    }

    /// Re-checks a configuration that may have been assembled field by field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(self.steps_per_revolution).map(|_| ())
    }
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: DEFAULT_STEPS_PER_REVOLUTION,
            viewer_mode: false,
            vertex_normals: false,
            face_normals: false,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Raised when fewer than three layers per revolution are requested.
    InvalidStepsPerRevolution(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidStepsPerRevolution(value) => {
                write!(
                    f,
                    "steps_per_revolution must be >= {MIN_STEPS_PER_REVOLUTION}: {value}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
