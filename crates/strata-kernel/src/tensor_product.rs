//! Tensor-product kernels built from a 1-D [`KernelShape`].

use std::marker::PhantomData;

use strata_math::GridVector;
use strata_types::Scalar;

use crate::kind::{KernelKind, KernelShape};
use crate::weight_function::WeightFunction;

/// `w(x) = Π_a N(x_a / h)` with `h = support_radius / N::SUPPORT`.
#[derive(Debug, Clone, Copy)]
pub struct TensorProductKernel<S: KernelShape> {
    support_radius: Scalar,
    inv_scale: Scalar,
    _shape: PhantomData<S>,
}

impl<S: KernelShape> TensorProductKernel<S> {
    /// Creates a kernel whose support box has half-width `support_radius`.
    ///
    /// The caller guarantees `support_radius` is finite and positive; the
    /// factory checks this before construction.
    pub fn new(support_radius: Scalar) -> Self {
        Self {
            support_radius,
            inv_scale: S::SUPPORT / support_radius,
            _shape: PhantomData,
        }
    }

    /// Creates a kernel scaled to a grid with the given cell width.
    pub fn for_cell_width(cell_width: Scalar) -> Self {
        Self::new(S::SUPPORT * cell_width)
    }

    /// Grid spacing this kernel is scaled to.
    pub fn cell_width(&self) -> Scalar {
        1.0 / self.inv_scale
    }
}

impl<S: KernelShape, V: GridVector> WeightFunction<V> for TensorProductKernel<S> {
    fn kind(&self) -> KernelKind {
        S::KIND
    }

    fn support_radius(&self) -> Scalar {
        self.support_radius
    }

    fn weight(&self, offset: V) -> Scalar {
        if !self.in_support(offset) {
            return 0.0;
        }
        let mut w = 1.0;
        for axis in 0..V::DIM {
            w *= S::value(offset[axis] * self.inv_scale);
        }
        w
    }

    fn gradient(&self, offset: V) -> V {
        self.weight_and_gradient(offset).1
    }

    fn weight_and_gradient(&self, offset: V) -> (Scalar, V) {
        // Exact zero on and beyond the support boundary, independent of
        // rounding in the normalized offset.
        if !self.in_support(offset) {
            return (0.0, V::ZERO);
        }

        let mut values = [0.0; 3];
        let mut derivatives = [0.0; 3];
        for axis in 0..V::DIM {
            let x = offset[axis] * self.inv_scale;
            values[axis] = S::value(x);
            derivatives[axis] = S::derivative(x) * self.inv_scale;
        }

        let weight: Scalar = values[..V::DIM].iter().product();
        let gradient = V::from_fn(|axis| {
            let mut g = derivatives[axis];
            for (other, value) in values[..V::DIM].iter().enumerate() {
                if other != axis {
                    g *= value;
                }
            }
            g
        });
        (weight, gradient)
    }
}
