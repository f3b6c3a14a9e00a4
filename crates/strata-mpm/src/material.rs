//! Constitutive models.
//!
//! Stresses are returned as Kirchhoff stress `τ = J σ`, which is what the
//! particle-to-grid force transfer consumes with reference volumes.

use strata_io::{MaterialModel, MaterialSetup};
use strata_math::{GridMatrix, GridVector};
use strata_types::Scalar;

/// Smallest volume ratio used when evaluating stress.
const MIN_VOLUME_RATIO: Scalar = 0.01;

/// Exponent of the weakly compressible fluid equation of state.
const FLUID_GAMMA: i32 = 7;

/// Material law with derived Lamé parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constitutive {
    pub model: MaterialModel,
    pub density: Scalar,
    /// Shear modulus.
    pub mu: Scalar,
    /// First Lamé parameter.
    pub lambda: Scalar,
    /// Bulk modulus.
    pub bulk: Scalar,
}

impl Constitutive {
    pub fn from_setup(setup: &MaterialSetup) -> Self {
        let e = setup.youngs_modulus;
        let nu = setup.poisson_ratio;
        Self {
            model: setup.model,
            density: setup.density,
            mu: e / (2.0 * (1.0 + nu)),
            lambda: e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu)),
            bulk: e / (3.0 * (1.0 - 2.0 * nu)),
        }
    }

    /// Kirchhoff stress for deformation gradient `f`.
    pub fn kirchhoff_stress<V: GridVector>(&self, f: &V::Matrix) -> V::Matrix {
        let j = f.det().max(MIN_VOLUME_RATIO);
        match self.model {
            MaterialModel::NeoHookean => {
                // τ = μ (F Fᵀ − I) + λ ln(J) I
                let b = *f * f.transposed();
                (b - V::Matrix::IDENTITY) * self.mu
                    + V::Matrix::IDENTITY * (self.lambda * j.ln())
            }
            MaterialModel::Fluid => {
                let pressure =
                    self.bulk / FLUID_GAMMA as Scalar * (j.powi(-FLUID_GAMMA) - 1.0);
                V::Matrix::IDENTITY * (-pressure * j)
            }
        }
    }

    /// Removes shear from a fluid's deformation gradient, keeping its volume
    /// ratio. Solids are returned unchanged.
    pub fn project<V: GridVector>(&self, f: V::Matrix) -> V::Matrix {
        match self.model {
            MaterialModel::NeoHookean => f,
            MaterialModel::Fluid => {
                let j = f.det().max(MIN_VOLUME_RATIO);
                let s = j.powf(1.0 / V::DIM as Scalar);
                V::Matrix::IDENTITY * s
            }
        }
    }

    /// Dilatational wave speed, used by the CFL time step bound.
    pub fn wave_speed(&self) -> Scalar {
        match self.model {
            MaterialModel::NeoHookean => ((self.lambda + 2.0 * self.mu) / self.density).sqrt(),
            MaterialModel::Fluid => (self.bulk / self.density).sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_math::{Mat3, Vec3};

    fn solid() -> Constitutive {
        Constitutive::from_setup(&MaterialSetup::default())
    }

    #[test]
    fn rest_state_is_stress_free() {
        let tau = solid().kirchhoff_stress::<Vec3>(&Mat3::IDENTITY);
        assert!(tau.abs_diff_eq(Mat3::ZERO, 1e-6));

        let fluid = Constitutive {
            model: MaterialModel::Fluid,
            ..solid()
        };
        let tau = fluid.kirchhoff_stress::<Vec3>(&Mat3::IDENTITY);
        assert!(tau.abs_diff_eq(Mat3::ZERO, 1e-6));
    }

    #[test]
    fn compression_pushes_back() {
        let f = Mat3::from_diagonal(Vec3::splat(0.9));
        let tau = solid().kirchhoff_stress::<Vec3>(&f);
        assert!(tau.trace() < 0.0);
    }

    #[test]
    fn fluid_projection_keeps_volume() {
        let fluid = Constitutive {
            model: MaterialModel::Fluid,
            ..solid()
        };
        let f = Mat3::from_cols(
            Vec3::new(1.1, 0.2, 0.0),
            Vec3::new(0.0, 0.9, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let p = fluid.project::<Vec3>(f);
        assert!((p.determinant() - f.determinant()).abs() < 1e-5);
        assert_eq!(p.x_axis.y, 0.0);
    }
}
