//! Weight function factory.
//!
//! The factory holds a kind-to-constructor table filled in ahead of time.
//! Creating a kernel is a lookup plus an allocation; it never mutates the
//! table.

use std::collections::HashMap;

use strata_math::GridVector;
use strata_types::{Scalar, StrataError, StrataResult};

use crate::kind::{KernelKind, KernelShape};
use crate::splines::{CubicBSpline, LinearSpline, QuadraticBSpline};
use crate::tensor_product::TensorProductKernel;
use crate::weight_function::WeightFunction;

/// Builds a boxed kernel with the given support radius.
pub type WeightFunctionConstructor<V> = fn(Scalar) -> Box<dyn WeightFunction<V>>;

/// Table of kernel constructors keyed by [`KernelKind`].
pub struct WeightFunctionFactory<V: GridVector> {
    constructors: HashMap<KernelKind, WeightFunctionConstructor<V>>,
}

impl<V: GridVector> WeightFunctionFactory<V> {
    /// Creates a factory with every built-in kernel registered.
    pub fn with_defaults() -> Self {
        let mut factory = Self::empty();
        factory.register_shape::<LinearSpline>();
        factory.register_shape::<QuadraticBSpline>();
        factory.register_shape::<CubicBSpline>();
        factory
    }

    /// Creates a factory with no kernels registered.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers a constructor. Overwrites if the kind already exists.
    pub fn register(&mut self, kind: KernelKind, constructor: WeightFunctionConstructor<V>) {
        self.constructors.insert(kind, constructor);
    }

    /// Registers the tensor-product kernel for shape `S`.
    pub fn register_shape<S: KernelShape>(&mut self) {
        self.register(S::KIND, construct_tensor_product::<S, V>);
    }

    /// Returns true if `kind` has a constructor.
    pub fn contains(&self, kind: KernelKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Returns all registered kinds.
    pub fn kinds(&self) -> Vec<KernelKind> {
        self.constructors.keys().copied().collect()
    }

    /// Builds a new kernel of `kind` with the given support radius.
    pub fn create(
        &self,
        kind: KernelKind,
        support_radius: Scalar,
    ) -> StrataResult<Box<dyn WeightFunction<V>>> {
        if !support_radius.is_finite() || support_radius <= 0.0 {
            return Err(StrataError::Configuration(format!(
                "Kernel support radius must be positive and finite, got {}",
                support_radius
            )));
        }
        let constructor = self.constructors.get(&kind).ok_or_else(|| {
            StrataError::Configuration(format!("Kernel kind '{}' is not registered", kind))
        })?;
        tracing::debug!(kernel = %kind, support_radius, "weight function created");
        Ok(constructor(support_radius))
    }

    /// Builds a kernel for shape `S` through the registered constructor.
    pub fn create_shape<S: KernelShape>(
        &self,
        support_radius: Scalar,
    ) -> StrataResult<Box<dyn WeightFunction<V>>> {
        self.create(S::KIND, support_radius)
    }
}

fn construct_tensor_product<S: KernelShape, V: GridVector>(
    support_radius: Scalar,
) -> Box<dyn WeightFunction<V>> {
    Box::new(TensorProductKernel::<S>::new(support_radius))
}

impl<V: GridVector> Default for WeightFunctionFactory<V> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
