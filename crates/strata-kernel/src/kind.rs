//! Kernel kinds and the 1-D shape trait.

use serde::{Deserialize, Serialize};
use strata_types::Scalar;

/// Which interpolation kernel to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Piecewise-linear tent, support of 1 cell.
    Linear,
    /// Quadratic B-spline, support of 1.5 cells.
    QuadraticBSpline,
    /// Cubic B-spline, support of 2 cells.
    CubicBSpline,
}

impl KernelKind {
    /// Returns all kernel kinds.
    pub fn all() -> &'static [KernelKind] {
        &[
            KernelKind::Linear,
            KernelKind::QuadraticBSpline,
            KernelKind::CubicBSpline,
        ]
    }

    /// Returns the configuration tag for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            KernelKind::Linear => "linear",
            KernelKind::QuadraticBSpline => "quadratic_b_spline",
            KernelKind::CubicBSpline => "cubic_b_spline",
        }
    }

    /// Parses a configuration tag. Short aliases (`quadratic`, `cubic`)
    /// are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "linear" => Some(KernelKind::Linear),
            "quadratic" | "quadratic_b_spline" => Some(KernelKind::QuadraticBSpline),
            "cubic" | "cubic_b_spline" => Some(KernelKind::CubicBSpline),
            _ => None,
        }
    }

    /// Support half-width in cell units.
    pub fn support_cells(&self) -> Scalar {
        match self {
            KernelKind::Linear => LINEAR_SUPPORT,
            KernelKind::QuadraticBSpline => QUADRATIC_SUPPORT,
            KernelKind::CubicBSpline => CUBIC_SUPPORT,
        }
    }

    /// Stable numeric code, used in restart file headers.
    pub fn code(&self) -> u8 {
        match self {
            KernelKind::Linear => 1,
            KernelKind::QuadraticBSpline => 2,
            KernelKind::CubicBSpline => 3,
        }
    }

    /// Inverse of [`KernelKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.code() == code)
    }
}

impl std::fmt::Display for KernelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) const LINEAR_SUPPORT: Scalar = 1.0;
pub(crate) const QUADRATIC_SUPPORT: Scalar = 1.5;
pub(crate) const CUBIC_SUPPORT: Scalar = 2.0;

/// A 1-D kernel shape over normalized offset (offset / cell width).
///
/// `value` must be non-negative, vanish for `|x| >= SUPPORT`, and
/// `derivative` must be its analytic derivative.
pub trait KernelShape: Send + Sync + 'static {
    const KIND: KernelKind;

    /// Support half-width in cell units.
    const SUPPORT: Scalar;

    fn value(x: Scalar) -> Scalar;

    fn derivative(x: Scalar) -> Scalar;
}
