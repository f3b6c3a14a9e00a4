//! Integration tests for strata-kernel.

use strata_kernel::{
    CubicBSpline, KernelKind, KernelShape, LinearSpline, QuadraticBSpline, TensorProductKernel,
    WeightFunction, WeightFunctionFactory,
};
use strata_math::{Vec2, Vec3};

fn factory3() -> WeightFunctionFactory<Vec3> {
    WeightFunctionFactory::with_defaults()
}

fn kernel3(kind: KernelKind, cell_width: f32) -> Box<dyn WeightFunction<Vec3>> {
    factory3()
        .create(kind, kind.support_cells() * cell_width)
        .unwrap()
}

/// Sums weights over every lattice node within reach of `particle`.
fn lattice_sum(kernel: &dyn WeightFunction<Vec3>, particle: Vec3, h: f32) -> (f32, Vec3) {
    let mut total = 0.0;
    let mut grad = Vec3::ZERO;
    for i in -6..=6 {
        for j in -6..=6 {
            for k in -6..=6 {
                let node = Vec3::new(i as f32, j as f32, k as f32) * h;
                let (w, g) = kernel.weight_and_gradient(particle - node);
                total += w;
                grad += g;
            }
        }
    }
    (total, grad)
}

// ─── Support Tests ────────────────────────────────────────────

#[test]
fn zero_outside_support() {
    for &kind in KernelKind::all() {
        let kernel = kernel3(kind, 0.1);
        let r = kernel.support_radius();
        let outside = [
            Vec3::new(r, 0.0, 0.0),
            Vec3::new(0.0, -r * 1.01, 0.0),
            Vec3::new(0.0, 0.0, 5.0 * r),
            Vec3::new(-2.0 * r, 2.0 * r, 0.3 * r),
        ];
        for &offset in &outside {
            assert!(!kernel.in_support(offset));
            assert_eq!(kernel.weight(offset), 0.0, "{kind} weight at {offset:?}");
            assert_eq!(kernel.gradient(offset), Vec3::ZERO, "{kind} gradient at {offset:?}");
        }
    }
}

#[test]
fn weights_non_negative() {
    for &kind in KernelKind::all() {
        let kernel = kernel3(kind, 1.0);
        for step in 0..40 {
            let t = -2.5 + step as f32 * 0.125;
            let offset = Vec3::new(t, 0.5 * t, -0.25 * t);
            assert!(kernel.weight(offset) >= 0.0);
        }
    }
}

#[test]
fn peak_at_origin() {
    let kernel = kernel3(KernelKind::QuadraticBSpline, 1.0);
    let w0 = kernel.weight(Vec3::ZERO);
    assert!((w0 - 0.75f32.powi(3)).abs() < 1e-6);
    assert!(kernel.weight(Vec3::new(0.3, 0.0, 0.0)) < w0);
}

// ─── Partition of Unity Tests ─────────────────────────────────

#[test]
fn partition_of_unity_3d() {
    let h = 0.1;
    let particles = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.013, 0.047, 0.091),
        Vec3::new(0.05, 0.05, 0.05),
        Vec3::new(0.0999, 0.0001, 0.033),
    ];
    for &kind in KernelKind::all() {
        let kernel = kernel3(kind, h);
        for &p in &particles {
            let (sum, grad) = lattice_sum(kernel.as_ref(), p, h);
            assert!((sum - 1.0).abs() < 1e-4, "{kind}: sum {sum} at {p:?}");
            // The gradient of a constant is zero.
            if kind != KernelKind::Linear {
                assert!(grad.length() < 1e-2, "{kind}: grad {grad:?} at {p:?}");
            }
        }
    }
}

#[test]
fn partition_of_unity_2d() {
    let h = 0.5;
    let kernel = TensorProductKernel::<CubicBSpline>::for_cell_width(h);
    let particle = Vec2::new(0.37, 1.21);
    let mut total = 0.0;
    for i in -8..=8 {
        for j in -8..=8 {
            let node = Vec2::new(i as f32, j as f32) * h;
            total += WeightFunction::<Vec2>::weight(&kernel, particle - node);
        }
    }
    assert!((total - 1.0).abs() < 1e-5);
}

// ─── Gradient Tests ───────────────────────────────────────────

#[test]
fn gradient_matches_finite_difference() {
    let eps = 1e-3;
    let offsets = [
        Vec3::new(0.21, -0.33, 0.12),
        Vec3::new(0.71, 0.15, -0.42),
        Vec3::new(-1.23, 0.37, 0.08),
    ];
    for &kind in &[KernelKind::QuadraticBSpline, KernelKind::CubicBSpline] {
        let kernel = kernel3(kind, 1.0);
        for &x in &offsets {
            let analytic = kernel.gradient(x);
            for (axis, e) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().enumerate() {
                let fd = (kernel.weight(x + e * eps) - kernel.weight(x - e * eps)) / (2.0 * eps);
                assert!(
                    (fd - analytic[axis]).abs() < 5e-3,
                    "{kind} axis {axis}: fd={fd}, analytic={}",
                    analytic[axis]
                );
            }
        }
    }
}

#[test]
fn gradient_scales_with_cell_width() {
    let coarse = kernel3(KernelKind::CubicBSpline, 2.0);
    let fine = kernel3(KernelKind::CubicBSpline, 1.0);
    let x = Vec3::new(0.4, 0.1, -0.3);
    // w_2h(2x) == w_h(x) and ∇w_2h(2x) == ∇w_h(x) / 2
    assert!((coarse.weight(x * 2.0) - fine.weight(x)).abs() < 1e-6);
    assert!((coarse.gradient(x * 2.0) * 2.0 - fine.gradient(x)).length() < 1e-5);
}

// ─── Factory Tests ────────────────────────────────────────────

#[test]
fn factory_builds_requested_kind() {
    let factory = factory3();
    for &kind in KernelKind::all() {
        let kernel = factory.create(kind, 0.3).unwrap();
        assert_eq!(kernel.kind(), kind);
        assert!((kernel.support_radius() - 0.3).abs() < 1e-7);
    }
    assert_eq!(factory.kinds().len(), 3);
}

#[test]
fn factory_by_shape() {
    let factory = factory3();
    let kernel = factory.create_shape::<LinearSpline>(1.0).unwrap();
    assert_eq!(kernel.kind(), LinearSpline::KIND);
    let kernel = factory.create_shape::<QuadraticBSpline>(1.5).unwrap();
    assert_eq!(kernel.kind(), KernelKind::QuadraticBSpline);
}

#[test]
fn unregistered_kind_fails() {
    let mut factory = WeightFunctionFactory::<Vec3>::empty();
    assert!(factory.create(KernelKind::CubicBSpline, 1.0).is_err());

    factory.register_shape::<CubicBSpline>();
    assert!(factory.contains(KernelKind::CubicBSpline));
    assert!(!factory.contains(KernelKind::Linear));
    assert!(factory.create(KernelKind::Linear, 1.0).is_err());
    assert!(factory.create(KernelKind::CubicBSpline, 1.0).is_ok());
}

#[test]
fn invalid_radius_fails() {
    let factory = factory3();
    assert!(factory.create(KernelKind::Linear, 0.0).is_err());
    assert!(factory.create(KernelKind::Linear, -1.0).is_err());
    assert!(factory.create(KernelKind::Linear, f32::NAN).is_err());
}

#[test]
fn repeated_creation_is_deterministic() {
    let factory = factory3();
    let a = factory.create(KernelKind::QuadraticBSpline, 0.15).unwrap();
    let b = factory.create(KernelKind::QuadraticBSpline, 0.15).unwrap();
    let x = Vec3::new(0.03, -0.07, 0.11);
    assert_eq!(a.weight(x), b.weight(x));
    assert_eq!(a.gradient(x), b.gradient(x));
}

// ─── KernelKind Tests ─────────────────────────────────────────

#[test]
fn kind_names_round_trip() {
    for &kind in KernelKind::all() {
        assert_eq!(KernelKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(KernelKind::from_name("quadratic"), Some(KernelKind::QuadraticBSpline));
    assert_eq!(KernelKind::from_name("gaussian"), None);
}

#[test]
fn kind_serialization() {
    let json = serde_json::to_string(&KernelKind::CubicBSpline).unwrap();
    assert_eq!(json, "\"cubic_b_spline\"");
    let recovered: KernelKind = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, KernelKind::CubicBSpline);
}
