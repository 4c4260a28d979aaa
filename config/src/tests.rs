//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_mag_threshold_matches_reference() {
    assert_eq!(MAG_THRESHOLD, 1e-7);
}

#[test]
fn test_weld_quantum_larger_than_merge_epsilon() {
    assert!(
        WELD_QUANTUM >= VERTEX_MERGE_EPSILON,
        "WELD_QUANTUM should be >= VERTEX_MERGE_EPSILON"
    );
}

// =============================================================================
// PROFILE TESTS
// =============================================================================

#[test]
fn test_min_sides_forms_polygon() {
    assert_eq!(MIN_SIDES, 3);
}

#[test]
fn test_square_radius_puts_corners_on_unit_square() {
    // Corner at 45 degrees lands on (0.5, 0.5)
    let corner = SQUARE_PROFILE_RADIUS * std::f64::consts::FRAC_PI_4.cos();
    assert!(approx_equal(corner, 0.5));
}

#[test]
fn test_min_profile_span_is_small() {
    assert!(MIN_PROFILE_SPAN > 0.0 && MIN_PROFILE_SPAN < 0.1);
}

// =============================================================================
// EXTRUSION TESTS
// =============================================================================

#[test]
fn test_default_steps_per_revolution() {
    assert_eq!(DEFAULT_STEPS_PER_REVOLUTION, 24);
    assert!(DEFAULT_STEPS_PER_REVOLUTION >= MIN_STEPS_PER_REVOLUTION);
}

#[test]
fn test_twist_doubling_thresholds_ordered() {
    assert!(CIRCULAR_TWIST_DOUBLING_FIRST < CIRCULAR_TWIST_DOUBLING_SECOND);
}

#[test]
fn test_default_hole_size() {
    assert_eq!(DEFAULT_HOLE_SIZE_X, 1.0);
    assert_eq!(DEFAULT_HOLE_SIZE_Y, 0.25);
}

// =============================================================================
// PACKED ENCODING TESTS
// =============================================================================

#[test]
fn test_cut_quantum_spans_unit_range() {
    assert!(approx_equal(50_000.0 * CUT_QUANTUM, 1.0));
}

#[test]
fn test_revolution_quantum_reaches_four_turns() {
    // Byte value 200 encodes four revolutions
    assert!(approx_equal(1.0 + 200.0 * REVOLUTION_QUANTUM, 4.0));
}

// =============================================================================
// APPROX_EQUAL TESTS
// =============================================================================

#[test]
fn test_approx_equal_within_epsilon() {
    let small_diff = EPSILON / 2.0;
    assert!(approx_equal(1.0, 1.0 + small_diff));
    assert!(approx_equal(1.0, 1.0 - small_diff));
}

#[test]
fn test_approx_equal_outside_epsilon() {
    let large_diff = EPSILON * 2.0;
    assert!(!approx_equal(1.0, 1.0 + large_diff));
}

#[test]
fn test_approx_zero() {
    assert!(approx_zero(0.0));
    assert!(approx_zero(EPSILON / 2.0));
    assert!(!approx_zero(EPSILON * 2.0));
}
