//! # Config Crate
//!
//! Centralized configuration constants for the primitive mesher.
//! All magic numbers and tunable parameters of the profile and extrusion
//! algorithms are defined here so the geometry code stays declarative.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{MAG_THRESHOLD, DEFAULT_STEPS_PER_REVOLUTION};
//!
//! // Vectors shorter than MAG_THRESHOLD are treated as degenerate
//! let length: f64 = 1e-9;
//! assert!(length < MAG_THRESHOLD);
//!
//! // Circular sweeps use 24 layers per turn unless overridden
//! assert_eq!(DEFAULT_STEPS_PER_REVOLUTION, 24);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Dependencies**: Plain values and one validated settings snapshot
//! - **Viewer Compatible**: Defaults reproduce the reference prim tessellation

pub mod constants;

#[cfg(test)]
mod tests;
