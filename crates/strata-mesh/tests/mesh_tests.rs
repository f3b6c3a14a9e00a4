//! Integration tests for strata-mesh.

use strata_math::Vec3;
use strata_mesh::generators::{quad_grid, single_triangle, uv_sphere};
use strata_mesh::TriangleMesh;
use strata_types::FaceId;

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_counts() {
    let mesh = quad_grid(4, 3, 2.0, 1.0);
    assert_eq!(mesh.vertex_count(), 5 * 4);
    assert_eq!(mesh.face_count(), 4 * 3 * 2);
    assert!(mesh.validate().is_ok());
}

#[test]
fn uv_sphere_is_valid() {
    let mesh = uv_sphere(0.5, 8, 16);
    assert!(mesh.validate().is_ok());
    for i in 0..mesh.vertex_count() {
        assert!((mesh.position(i).length() - 0.5).abs() < 1e-5);
    }
}

#[test]
fn single_triangle_geometry() {
    let mesh = single_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
    assert_eq!(mesh.face_count(), 1);
    let n = mesh.face_normal(FaceId(0)).unwrap();
    assert!((n - Vec3::Z).length() < 1e-6);
    let c = mesh.face_centroid(FaceId(0)).unwrap();
    assert!((c - Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).length() < 1e-6);
}

// ─── Topology Generation Tests ────────────────────────────────

#[test]
fn moving_vertices_keeps_generation() {
    let mut mesh = quad_grid(2, 2, 1.0, 1.0);
    let generation = mesh.topology_generation();
    mesh.translate(Vec3::new(0.0, 1.0, 0.0));
    mesh.set_position(0, Vec3::splat(3.0));
    assert_eq!(mesh.topology_generation(), generation);
}

#[test]
fn face_mutation_bumps_generation() {
    let mut mesh = quad_grid(2, 2, 1.0, 1.0);
    let before = mesh.topology_generation();

    mesh.remove_face(FaceId(0)).unwrap();
    assert_eq!(mesh.face_count(), 7);
    assert!(mesh.topology_generation() > before);

    let after_remove = mesh.topology_generation();
    mesh.push_face([0, 1, 3]).unwrap();
    assert!(mesh.topology_generation() > after_remove);
}

#[test]
fn remove_face_swaps_last_into_place() {
    let mut mesh = quad_grid(1, 1, 1.0, 1.0);
    let last = mesh.triangle(FaceId(1));
    mesh.remove_face(FaceId(0)).unwrap();
    assert_eq!(mesh.triangle(FaceId(0)), last);
}

#[test]
fn out_of_range_face_rejected() {
    let mut mesh = single_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
    assert!(mesh.face(FaceId(1)).is_none());
    assert!(mesh.remove_face(FaceId(5)).is_err());
    assert!(mesh.push_face([0, 1, 9]).is_err());
}

// ─── Validation Tests ─────────────────────────────────────────

#[test]
fn from_interleaved_rejects_degenerate_face() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    assert!(TriangleMesh::from_interleaved(&positions, &[0, 1, 2]).is_ok());
    assert!(TriangleMesh::from_interleaved(&positions, &[0, 1, 1]).is_err());
    assert!(TriangleMesh::from_interleaved(&positions[..8], &[0, 1, 2]).is_err());
}

#[test]
fn mesh_serialization() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.face_count(), 8);
    assert_eq!(recovered.indices(), mesh.indices());
}
