//! # strata-kernel
//!
//! Interpolation kernels used to exchange quantities between particles and
//! grid nodes.
//!
//! ## Design
//!
//! A [`WeightFunction`] maps a particle-to-node offset to a weight and its
//! gradient. All built-in kernels are tensor products of a 1-D spline
//! ([`KernelShape`]) scaled so that their support spans the caller-supplied
//! support radius.
//!
//! The [`WeightFunctionFactory`] maps each [`KernelKind`] to a constructor.
//! Kernels are selected once, at configuration time; asking the factory for
//! a kind it has no constructor for is an error, never a fallback.

pub mod factory;
pub mod kind;
pub mod splines;
pub mod tensor_product;
pub mod weight_function;

pub use factory::WeightFunctionFactory;
pub use kind::{KernelKind, KernelShape};
pub use splines::{CubicBSpline, LinearSpline, QuadraticBSpline};
pub use tensor_product::TensorProductKernel;
pub use weight_function::WeightFunction;
