//! Integration tests for strata-math.

use strata_math::{GridMatrix, GridVector, Mat2, Mat3, Vec2, Vec3};

// ─── GridVector Tests ─────────────────────────────────────────

#[test]
fn dimensions() {
    assert_eq!(<Vec2 as GridVector>::DIM, 2);
    assert_eq!(<Vec3 as GridVector>::DIM, 3);
}

#[test]
fn from_fn_fills_components() {
    let v = <Vec3 as GridVector>::from_fn(|axis| axis as f32 + 1.0);
    assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn outer_product_columns() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(0.0, 1.0, 2.0);
    let m = GridVector::outer(a, b);
    // (a ⊗ b) * e_j = a * b_j
    assert_eq!(m * Vec3::X, a * 0.0);
    assert_eq!(m * Vec3::Y, a);
    assert_eq!(m * Vec3::Z, a * 2.0);
}

#[test]
fn outer_product_trace_is_dot() {
    let a = Vec2::new(3.0, -1.0);
    let b = Vec2::new(2.0, 5.0);
    let m = GridVector::outer(a, b);
    assert!((GridMatrix::trace(&m) - GridVector::dot(a, b)).abs() < 1e-6);
}

#[test]
fn clamp_to_box() {
    let v = Vec3::new(-1.0, 0.5, 4.0);
    let clamped = v.clamp_to(Vec3::ZERO, Vec3::splat(2.0));
    assert_eq!(clamped, Vec3::new(0.0, 0.5, 2.0));
}

#[test]
fn vec2_embeds_in_3d() {
    let v = Vec2::new(1.5, -2.0);
    assert_eq!(v.to_vec3(), Vec3::new(1.5, -2.0, 0.0));
    assert_eq!(<Vec2 as GridVector>::from_vec3(Vec3::new(1.5, -2.0, 9.0)), v);
}

// ─── GridMatrix Tests ─────────────────────────────────────────

#[test]
fn identity_determinant() {
    assert_eq!(<Mat3 as GridMatrix<Vec3>>::IDENTITY.det(), 1.0);
    assert_eq!(<Mat2 as GridMatrix<Vec2>>::IDENTITY.det(), 1.0);
}

#[test]
fn trace_of_scaled_identity() {
    let m = <Mat3 as GridMatrix<Vec3>>::IDENTITY * 2.0;
    assert!((GridMatrix::<Vec3>::trace(&m) - 6.0).abs() < 1e-6);
}

// ─── Column Access Tests ──────────────────────────────────────

#[test]
fn columns_round_trip() {
    let m = Mat3::from_cols(
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(4.0, 5.0, 6.0),
        Vec3::new(7.0, 8.0, 9.0),
    );
    assert_eq!(GridMatrix::<Vec3>::column(&m, 1), Vec3::new(4.0, 5.0, 6.0));
    let rebuilt = <Mat3 as GridMatrix<Vec3>>::from_columns(|i| GridMatrix::<Vec3>::column(&m, i));
    assert_eq!(rebuilt, m);

    let m2 = <Mat2 as GridMatrix<Vec2>>::from_columns(|i| Vec2::splat(i as f32));
    assert_eq!(m2.col(1), Vec2::ONE);
}

#[test]
fn finiteness() {
    assert!(GridVector::is_finite(Vec2::new(1.0, -3.0)));
    assert!(!GridVector::is_finite(Vec3::new(0.0, f32::NAN, 0.0)));
    let m = <Mat2 as GridMatrix<Vec2>>::IDENTITY * f32::INFINITY;
    assert!(!GridMatrix::<Vec2>::is_finite(&m));
}
