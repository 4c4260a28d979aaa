use super::*;
use approx::assert_abs_diff_eq;

fn cube() -> PrimMesh {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.extrude_linear().unwrap();
    prim
}

fn assert_axis_aligned(normal: DVec3) {
    let largest = normal.abs().max_element();
    assert_abs_diff_eq!(largest, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(normal.length(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_cube_counts_and_bounds() {
    let prim = cube();
    assert_eq!(prim.coords.len(), 8);
    assert_eq!(prim.face_count(), 12);

    let mesh = Mesh::from(prim);
    let (min, max) = mesh.bounding_box();
    for axis in 0..3 {
        assert_abs_diff_eq!(min[axis], -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(max[axis], 0.5, epsilon = 1e-9);
    }
}

#[test]
fn test_cube_faces_point_along_axes() {
    let prim = cube();
    for i in 0..prim.face_count() {
        assert_axis_aligned(prim.surface_normal(i).unwrap());
    }
}

#[test]
fn test_cube_is_closed_unit_volume() {
    let mesh = cube().into_mesh();
    assert!(mesh.validate());
    assert!(mesh.is_closed());
    assert_abs_diff_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_surface_normal_out_of_range() {
    let prim = cube();
    let err = prim.surface_normal(12).unwrap_err();
    assert!(matches!(
        err,
        MeshError::FaceIndexOutOfRange {
            index: 12,
            count: 12
        }
    ));
}

#[test]
fn test_extrusion_replaces_buffers() {
    let mut prim = cube();
    prim.extrude_linear().unwrap();
    assert_eq!(prim.coords.len(), 8);
    assert_eq!(prim.face_count(), 12);
}

#[test]
fn test_twist_adds_layers() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.twist_end = 180;
    prim.extrude_linear().unwrap();
    // 13 steps, 14 layers of 4 vertices
    assert_eq!(prim.coords.len(), 56);
    assert_eq!(prim.face_count(), 13 * 4 * 2 + 4);

    // The top layer is turned half way round
    let top = &prim.coords[52..];
    let bottom = &prim.coords[..4];
    for (t, b) in top.iter().zip(bottom) {
        assert_abs_diff_eq!(t.x, -b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(t.y, -b.y, epsilon = 1e-9);
    }
    assert!(Mesh::from(prim).is_closed());
}

#[test]
fn test_shear_moves_top_layer() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.top_shear_x = 0.25;
    prim.extrude_linear().unwrap();
    let bottom_center: DVec3 = prim.coords[..4].iter().sum::<DVec3>() / 4.0;
    let top_center: DVec3 = prim.coords[4..].iter().sum::<DVec3>() / 4.0;
    assert_abs_diff_eq!(top_center.x - bottom_center.x, 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(top_center.z, 0.5, epsilon = 1e-9);
}

#[test]
fn test_path_cut_shortens_prism() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.path_cut_begin = 0.25;
    prim.path_cut_end = 0.75;
    prim.extrude_linear().unwrap();
    let mesh = Mesh::from(prim);
    let (min, max) = mesh.bounding_box();
    assert_abs_diff_eq!(min.z, -0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(max.z, 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(mesh.signed_volume(), 0.5, epsilon = 1e-9);
}

#[test]
fn test_hollow_tapered_box() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.3, 4);
    prim.taper_x = 0.5;
    prim.extrude_linear().unwrap();
    let mesh = Mesh::from(prim);

    assert!(mesh.is_closed());
    // Cross-section area 1 - 0.3² shrinks linearly in X to half
    assert_abs_diff_eq!(mesh.signed_volume(), 0.91 * 0.75, epsilon = 1e-9);

    // Across the hole: outer wall, hollow wall, hollow wall, outer wall
    let hits = mesh.ray_intersections(DVec3::new(-2.0, 0.013, 0.037), DVec3::X);
    assert_eq!(hits.len(), 4);
    let scale = 1.0 - 0.5 * 0.537;
    assert_abs_diff_eq!(hits[0], 2.0 - 0.5 * scale, epsilon = 1e-9);
    assert_abs_diff_eq!(hits[1], 2.0 - 0.15 * scale, epsilon = 1e-9);

    // Straight down the hole nothing is hit
    assert!(mesh
        .ray_intersections(DVec3::new(0.01, 0.02, -2.0), DVec3::Z)
        .is_empty());
    // Through the band: bottom cap, then the slanted wall
    assert_eq!(
        mesh.ray_intersections(DVec3::new(0.3, 0.013, -2.0), DVec3::Z)
            .len(),
        2
    );
}

#[test]
fn test_hollow_cut_cylinder_is_closed() {
    let mut prim = PrimMesh::new(24, 0.125, 0.875, 0.5, 24);
    prim.extrude_linear().unwrap();
    let mesh = Mesh::from(prim);
    assert!(mesh.is_closed());
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn test_mixed_hollow_prism_is_closed() {
    let mut prim = PrimMesh::new(3, 0.0, 1.0, 0.6, 24);
    prim.taper_y = -0.4;
    prim.extrude_linear().unwrap();
    let mesh = Mesh::from(prim);
    assert!(mesh.is_closed());
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn test_torus_closes_on_itself() {
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.extrude_circular().unwrap();
    assert!(!prim.need_end_faces());

    let ring = 25;
    let layers = prim.coords.len() / ring;
    assert_eq!(layers, 25);
    let first = &prim.coords[..ring];
    let last = &prim.coords[(layers - 1) * ring..];
    for (a, b) in first.iter().zip(last) {
        assert_abs_diff_eq!(a.distance(*b), 0.0, epsilon = 1e-9);
    }

    // Walls only, no caps
    assert_eq!(prim.face_count(), 24 * 24 * 2);
    let mesh = Mesh::from(prim);
    assert!(mesh.is_closed());
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn test_half_torus_gets_caps() {
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.path_cut_end = 0.5;
    prim.extrude_circular().unwrap();
    assert!(prim.need_end_faces());
    assert_eq!(prim.face_count(), 12 * 24 * 2 + 2 * 24);
    let mesh = Mesh::from(prim);
    assert!(mesh.is_closed());
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn test_tapered_ring_gets_caps() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.25, 4);
    prim.taper_x = 0.3;
    prim.radius = 0.2;
    prim.extrude_circular().unwrap();
    assert!(prim.need_end_faces());
    assert!(Mesh::from(prim).is_closed());
}

#[test]
fn test_circular_twist_doubles_layers() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.twist_begin = -180;
    prim.twist_end = 180;
    prim.extrude_circular().unwrap();
    // 48 steps, 49 layers of 4 vertices
    assert_eq!(prim.coords.len(), 49 * 4);
}

#[test]
fn test_twist_clamped_to_half_turn() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.twist_begin = -500;
    prim.twist_end = 360;
    assert_eq!(prim.twist_range(), (-180, 180));
    assert_abs_diff_eq!(prim.twist_total(), 2.0 * std::f64::consts::PI, epsilon = 1e-12);

    prim.twist_begin = 180;
    assert!(!prim.need_end_faces());
    prim.extrude_circular().unwrap();
    assert_eq!(prim.coords.len(), 25 * 4);
}

#[test]
fn test_zero_thickness_torus_closes_on_itself() {
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.hole_size_y = 0.0;
    prim.revolutions = 1.0;
    prim.extrude_circular().unwrap();
    assert!(!prim.need_end_faces());

    let ring = 25;
    let layers = prim.coords.len() / ring;
    assert_eq!(prim.coords.len(), 25 * ring);
    let first = &prim.coords[..ring];
    let last = &prim.coords[(layers - 1) * ring..];
    for (a, b) in first.iter().zip(last) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-9);
    }

    assert_eq!(prim.face_count(), 24 * 24 * 2);
    assert!(Mesh::from(prim).is_closed());
}

#[test]
fn test_sheared_torus_starts_without_extra_layer() {
    // A small Y shear pulls the start angle just below zero
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.top_shear_y = 0.05;
    prim.extrude_circular().unwrap();
    assert!(!prim.need_end_faces());
    assert_eq!(prim.coords.len(), 25 * 25);
}

#[test]
fn test_coil_left_open() {
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.revolutions = 2.5;
    prim.extrude_circular().unwrap();
    assert!(!prim.need_end_faces());
    let mesh = Mesh::from(prim);
    assert!(!mesh.is_closed());
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn test_circular_validation() {
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.revolutions = 0.5;
    assert!(prim.extrude_circular().unwrap_err().is_invalid_argument());

    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.steps_per_revolution = 0;
    assert!(prim.extrude_circular().unwrap_err().is_invalid_argument());
}

#[test]
fn test_path_validation() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.path_cut_begin = 0.5;
    prim.path_cut_end = 0.5;
    assert!(prim.extrude_linear().unwrap_err().is_invalid_argument());

    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.taper_x = f64::NAN;
    let err = prim.extrude_linear().unwrap_err();
    assert!(err.to_string().contains("taper_x"));
}

#[test]
fn test_new_clamps_profile() {
    let prim = PrimMesh::new(1, 0.0, 0.0, 2.0, 0);
    assert_eq!(prim.sides(), 3);
    assert_eq!(prim.hollow_sides(), 3);
    assert_eq!(prim.profile_end(), 0.02);
    assert_eq!(prim.profile_start(), 0.0);
    assert_eq!(prim.hollow(), 1.0);
    assert!(prim.has_profile_cut());
    assert!(prim.has_hollow());

    let prim = PrimMesh::new(4, 0.5, 0.3, 0.0005, 4);
    assert_abs_diff_eq!(prim.profile_start(), 0.28, epsilon = 1e-12);
    assert!(!prim.has_hollow());
}

#[test]
fn test_calc_normals_idempotent() {
    let mut prim = cube();
    assert!(!prim.normals_processed());
    prim.calc_normals();
    prim.calc_normals();
    assert!(prim.normals_processed());
    assert_eq!(prim.normals.len(), prim.face_count());
    for face in &prim.faces {
        assert_eq!(face.n1, face.n2);
        assert_axis_aligned(prim.normals[face.n1]);
    }
}

#[test]
fn test_calc_normals_keeps_vertex_normals() {
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    prim.calc_vertex_normals = true;
    prim.extrude_linear().unwrap();
    let vertices = prim.coords.len();
    assert_eq!(prim.normals.len(), vertices);
    prim.calc_normals();
    assert_eq!(prim.normals.len(), vertices + prim.face_count());

    let mesh = Mesh::from(prim);
    assert_eq!(mesh.normals().unwrap().len(), vertices);
    assert_eq!(mesh.face_normals().unwrap().len(), mesh.triangle_count());
}

#[test]
fn test_scale_round_trip() {
    let original = cube();
    let mut prim = original.clone();
    prim.scale(2.0, 3.0, 4.0);
    assert_abs_diff_eq!(prim.coords[0].z, -2.0, epsilon = 1e-12);
    prim.scale(0.5, 1.0 / 3.0, 0.25);
    for (a, b) in prim.coords.iter().zip(&original.coords) {
        assert_abs_diff_eq!(a.distance(*b), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_transforms_move_viewer_faces() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.viewer_mode = true;
    prim.extrude_linear().unwrap();
    prim.add_pos(DVec3::new(1.0, 0.0, 0.0));
    prim.add_rot(DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2));
    let faces = prim.viewer_faces.as_ref().unwrap();
    for face in faces {
        assert!(face.v1.y > 0.0 && face.v2.y > 0.0 && face.v3.y > 0.0);
    }
    assert!(prim.coords.iter().all(|c| c.y > 0.0));
}

#[test]
fn test_viewer_mode_cube() {
    let mut prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    prim.viewer_mode = true;
    prim.extrude_linear().unwrap();
    assert!(prim.calc_vertex_normals);
    assert_eq!(prim.normals.len(), prim.coords.len());

    let faces = prim.viewer_faces.as_ref().unwrap();
    assert_eq!(faces.len(), prim.face_count());
    assert!(faces[..2].iter().all(|f| f.prim_face == 0));
    assert!(faces[faces.len() - 2..].iter().all(|f| f.prim_face == 5));
    for face in &faces[2..faces.len() - 2] {
        assert!((1..=4).contains(&face.prim_face));
        assert_axis_aligned(face.n1);
        assert_abs_diff_eq!(face.n1.z, 0.0, epsilon = 1e-9);
    }
    // Each side wall is its own texture face
    let mut walls: Vec<usize> = faces[2..10].iter().map(|f| f.prim_face).collect();
    walls.dedup();
    assert_eq!(walls, vec![1, 2, 3, 4]);

    assert_abs_diff_eq!(faces[0].n1.z, -1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(faces[11].n1.z, 1.0, epsilon = 1e-9);
}

#[test]
fn test_viewer_mode_hollow_cut_cylinder() {
    let mut prim = PrimMesh::new(24, 0.25, 1.0, 0.4, 24);
    prim.viewer_mode = true;
    prim.extrude_linear().unwrap();
    let faces = prim.viewer_faces.as_ref().unwrap();
    assert_eq!(faces.len(), prim.face_count());
    // start cap, outer, hollow, two cut walls, end cap
    let highest = faces.iter().map(|f| f.prim_face).max().unwrap();
    assert_eq!(highest, 5);
    for face in faces {
        assert_abs_diff_eq!(face.n1.length(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_viewer_faces_absent_by_default() {
    assert!(cube().viewer_faces.is_none());
}

#[test]
fn test_write_raw_one_line_per_face() {
    let prim = cube();
    let mut out = Vec::new();
    prim.write_raw(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 12);
    for line in text.lines() {
        let values: Vec<f64> = line
            .split_whitespace()
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 9);
    }
}

#[test]
fn test_display_lists_parameters() {
    let prim = PrimMesh::new(4, 0.0, 1.0, 0.0, 4);
    let text = prim.to_string();
    assert!(text.starts_with("sides: 4\n"));
    assert!(text.contains("steps_per_revolution: 24"));
    assert!(text.ends_with("calc_vertex_normals: false"));
}

#[test]
fn test_need_end_faces() {
    let mut prim = PrimMesh::new(24, 0.0, 1.0, 0.0, 24);
    assert!(!prim.need_end_faces());
    prim.twist_begin = 10;
    assert!(prim.need_end_faces());
    prim.twist_end = 10;
    assert!(!prim.need_end_faces());
    prim.skew = 0.1;
    assert!(prim.need_end_faces());
}

#[test]
fn test_taper_scale() {
    assert_eq!(taper_scale(0.5, 1.0, 0.0), 0.5);
    assert_eq!(taper_scale(-0.5, 0.0, 0.0), 0.5);
    assert_eq!(taper_scale(0.005, 1.0, 0.01), 1.0);
}
