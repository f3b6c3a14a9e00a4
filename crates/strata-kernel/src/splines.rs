//! 1-D spline shapes.
//!
//! All shapes are even functions of the normalized offset `x` and sum to one
//! over the integer lattice (partition of unity).

use strata_types::Scalar;

use crate::kind::{KernelKind, KernelShape, CUBIC_SUPPORT, LINEAR_SUPPORT, QUADRATIC_SUPPORT};

/// Tent function `1 - |x|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSpline;

/// Quadratic B-spline.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticBSpline;

/// Cubic B-spline.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicBSpline;

impl KernelShape for LinearSpline {
    const KIND: KernelKind = KernelKind::Linear;
    const SUPPORT: Scalar = LINEAR_SUPPORT;

    #[inline]
    fn value(x: Scalar) -> Scalar {
        let ax = x.abs();
        if ax < 1.0 {
            1.0 - ax
        } else {
            0.0
        }
    }

    #[inline]
    fn derivative(x: Scalar) -> Scalar {
        // One-sided at x = 0; the kink carries no mass.
        if x.abs() < 1.0 {
            -x.signum()
        } else {
            0.0
        }
    }
}

impl KernelShape for QuadraticBSpline {
    const KIND: KernelKind = KernelKind::QuadraticBSpline;
    const SUPPORT: Scalar = QUADRATIC_SUPPORT;

    #[inline]
    fn value(x: Scalar) -> Scalar {
        let ax = x.abs();
        if ax < 0.5 {
            0.75 - ax * ax
        } else if ax < 1.5 {
            let t = 1.5 - ax;
            0.5 * t * t
        } else {
            0.0
        }
    }

    #[inline]
    fn derivative(x: Scalar) -> Scalar {
        let ax = x.abs();
        if ax < 0.5 {
            -2.0 * x
        } else if ax < 1.5 {
            -(1.5 - ax) * x.signum()
        } else {
            0.0
        }
    }
}

impl KernelShape for CubicBSpline {
    const KIND: KernelKind = KernelKind::CubicBSpline;
    const SUPPORT: Scalar = CUBIC_SUPPORT;

    #[inline]
    fn value(x: Scalar) -> Scalar {
        let ax = x.abs();
        if ax < 1.0 {
            0.5 * ax * ax * ax - ax * ax + 2.0 / 3.0
        } else if ax < 2.0 {
            let t = 2.0 - ax;
            t * t * t / 6.0
        } else {
            0.0
        }
    }

    #[inline]
    fn derivative(x: Scalar) -> Scalar {
        let ax = x.abs();
        if ax < 1.0 {
            1.5 * x * ax - 2.0 * x
        } else if ax < 2.0 {
            let t = 2.0 - ax;
            -0.5 * t * t * x.signum()
        } else {
            0.0
        }
    }
}
