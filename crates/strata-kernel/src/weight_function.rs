//! Weight function trait: the kernel abstraction consumed by the driver.

use strata_math::GridVector;
use strata_types::Scalar;

use crate::kind::KernelKind;

/// Interpolation kernel over a `V`-dimensional offset.
///
/// `offset` is the particle position minus the grid node position. Both
/// operations are pure. The support region is the axis-aligned box of
/// half-width [`WeightFunction::support_radius`]; outside it the weight and
/// the gradient are exactly zero.
pub trait WeightFunction<V: GridVector>: Send + Sync {
    /// Kernel kind, used for restart compatibility checks.
    fn kind(&self) -> KernelKind;

    /// Half-width of the support box (world units).
    fn support_radius(&self) -> Scalar;

    /// Interpolation weight, `>= 0`.
    fn weight(&self, offset: V) -> Scalar;

    /// Analytic gradient of [`WeightFunction::weight`] with respect to `offset`.
    fn gradient(&self, offset: V) -> V;

    /// Weight and gradient together. Implementations may override this to
    /// share the 1-D evaluations.
    fn weight_and_gradient(&self, offset: V) -> (Scalar, V) {
        (self.weight(offset), self.gradient(offset))
    }

    /// Returns true if `offset` lies strictly inside the support box.
    fn in_support(&self, offset: V) -> bool {
        let r = self.support_radius();
        (0..V::DIM).all(|axis| offset[axis].abs() < r)
    }
}
