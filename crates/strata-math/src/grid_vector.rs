//! Dimension abstraction for grid-based simulation.
//!
//! `GridVector` is implemented for `Vec2` and `Vec3`; each carries its
//! square matrix type through `GridVector::Matrix`. The spatial dimension
//! is an associated constant, so it is fixed at compile time for every
//! driver, kernel, and grid instance.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::{Mat2, Mat3, Vec2, Vec3};
use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_types::Scalar;

/// A spatial vector of fixed dimension.
pub trait GridVector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<Scalar, Output = Self>
    + Div<Scalar, Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign<Scalar>
    + Index<usize, Output = Scalar>
    + IndexMut<usize>
    + Serialize
    + DeserializeOwned
{
    /// Number of spatial dimensions.
    const DIM: usize;

    /// The zero vector.
    const ZERO: Self;

    /// Square matrix of the same dimension.
    type Matrix: GridMatrix<Self>;

    /// Vector with every component set to `value`.
    fn splat(value: Scalar) -> Self;

    /// Builds a vector component by component.
    fn from_fn(f: impl FnMut(usize) -> Scalar) -> Self;

    fn dot(self, rhs: Self) -> Scalar;

    fn length(self) -> Scalar;

    /// Outer product `self ⊗ rhs` (`self * rhsᵀ`).
    fn outer(self, rhs: Self) -> Self::Matrix;

    /// Component-wise clamp.
    fn clamp_to(self, min: Self, max: Self) -> Self;

    /// Embeds the vector in 3-D, padding missing components with zero.
    fn to_vec3(self) -> Vec3;

    /// Projects a 3-D vector onto this dimension, dropping extra components.
    fn from_vec3(v: Vec3) -> Self;

    /// Returns true if every component is finite.
    fn is_finite(self) -> bool;
}

/// A square matrix paired with a [`GridVector`].
pub trait GridMatrix<V>:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Mul<V, Output = V>
    + Mul<Scalar, Output = Self>
    + AddAssign
    + Serialize
    + DeserializeOwned
{
    const IDENTITY: Self;
    const ZERO: Self;

    fn det(&self) -> Scalar;

    fn transposed(&self) -> Self;

    fn trace(&self) -> Scalar;

    /// Column `index` (`0..V::DIM`).
    fn column(&self, index: usize) -> V;

    /// Builds a matrix column by column.
    fn from_columns(f: impl FnMut(usize) -> V) -> Self;

    fn is_finite(&self) -> bool;
}

impl GridVector for Vec2 {
    const DIM: usize = 2;
    const ZERO: Self = Vec2::ZERO;
    type Matrix = Mat2;

    #[inline]
    fn splat(value: Scalar) -> Self {
        Vec2::splat(value)
    }

    #[inline]
    fn from_fn(mut f: impl FnMut(usize) -> Scalar) -> Self {
        Vec2::new(f(0), f(1))
    }

    #[inline]
    fn dot(self, rhs: Self) -> Scalar {
        Vec2::dot(self, rhs)
    }

    #[inline]
    fn length(self) -> Scalar {
        Vec2::length(self)
    }

    #[inline]
    fn outer(self, rhs: Self) -> Mat2 {
        Mat2::from_cols(self * rhs.x, self * rhs.y)
    }

    #[inline]
    fn clamp_to(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    #[inline]
    fn to_vec3(self) -> Vec3 {
        self.extend(0.0)
    }

    #[inline]
    fn from_vec3(v: Vec3) -> Self {
        v.truncate()
    }

    #[inline]
    fn is_finite(self) -> bool {
        Vec2::is_finite(self)
    }
}

impl GridVector for Vec3 {
    const DIM: usize = 3;
    const ZERO: Self = Vec3::ZERO;
    type Matrix = Mat3;

    #[inline]
    fn splat(value: Scalar) -> Self {
        Vec3::splat(value)
    }

    #[inline]
    fn from_fn(mut f: impl FnMut(usize) -> Scalar) -> Self {
        Vec3::new(f(0), f(1), f(2))
    }

    #[inline]
    fn dot(self, rhs: Self) -> Scalar {
        Vec3::dot(self, rhs)
    }

    #[inline]
    fn length(self) -> Scalar {
        Vec3::length(self)
    }

    #[inline]
    fn outer(self, rhs: Self) -> Mat3 {
        Mat3::from_cols(self * rhs.x, self * rhs.y, self * rhs.z)
    }

    #[inline]
    fn clamp_to(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    #[inline]
    fn to_vec3(self) -> Vec3 {
        self
    }

    #[inline]
    fn from_vec3(v: Vec3) -> Self {
        v
    }

    #[inline]
    fn is_finite(self) -> bool {
        Vec3::is_finite(self)
    }
}

impl GridMatrix<Vec2> for Mat2 {
    const IDENTITY: Self = Mat2::IDENTITY;
    const ZERO: Self = Mat2::ZERO;

    #[inline]
    fn det(&self) -> Scalar {
        self.determinant()
    }

    #[inline]
    fn transposed(&self) -> Self {
        self.transpose()
    }

    #[inline]
    fn trace(&self) -> Scalar {
        self.x_axis.x + self.y_axis.y
    }

    #[inline]
    fn column(&self, index: usize) -> Vec2 {
        self.col(index)
    }

    #[inline]
    fn from_columns(mut f: impl FnMut(usize) -> Vec2) -> Self {
        Mat2::from_cols(f(0), f(1))
    }

    #[inline]
    fn is_finite(&self) -> bool {
        Mat2::is_finite(self)
    }
}

impl GridMatrix<Vec3> for Mat3 {
    const IDENTITY: Self = Mat3::IDENTITY;
    const ZERO: Self = Mat3::ZERO;

    #[inline]
    fn det(&self) -> Scalar {
        self.determinant()
    }

    #[inline]
    fn transposed(&self) -> Self {
        self.transpose()
    }

    #[inline]
    fn trace(&self) -> Scalar {
        self.x_axis.x + self.y_axis.y + self.z_axis.z
    }

    #[inline]
    fn column(&self, index: usize) -> Vec3 {
        self.col(index)
    }

    #[inline]
    fn from_columns(mut f: impl FnMut(usize) -> Vec3) -> Self {
        Mat3::from_cols(f(0), f(1), f(2))
    }

    #[inline]
    fn is_finite(&self) -> bool {
        Mat3::is_finite(self)
    }
}
