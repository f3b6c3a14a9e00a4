//! Particle/grid transfers for one explicit step.
//!
//! A step is P2G → grid update → G2P. P2G scatters into shared nodes and
//! runs sequentially; G2P gathers per particle and runs on the rayon pool.
//! G2P writes nothing until every particle's new state is known to be
//! finite, so a failed step leaves the particles as they were.

use rayon::prelude::*;
use strata_kernel::WeightFunction;
use strata_math::{GridMatrix, GridVector};
use strata_types::constants::MASS_EPSILON;
use strata_types::{Scalar, StrataError, StrataResult};

use crate::contact::ContactImpulse;
use crate::grid::Grid;
use crate::material::Constitutive;
use crate::particles::ParticleSet;

/// Per-step parameters.
#[derive(Debug, Clone, Copy)]
pub struct StepParams<V: GridVector> {
    pub dt: Scalar,
    pub gravity: V,
    /// PIC/FLIP blend.
    pub flip_ratio: Scalar,
    /// Stability bound `dt` was checked against, reported on failure.
    pub dt_bound: Scalar,
}

/// Scatters mass, momentum and internal force to the grid.
pub fn particle_to_grid<V: GridVector>(
    particles: &ParticleSet<V>,
    grid: &mut Grid<V>,
    kernel: &dyn WeightFunction<V>,
    material: &Constitutive,
) {
    grid.clear();
    let radius = kernel.support_radius();
    for p in 0..particles.len() {
        let x = particles.positions[p];
        let v = particles.velocities[p];
        let m = particles.masses[p];
        let stress = material.kirchhoff_stress::<V>(&particles.deformation[p]);
        let vol = particles.volumes[p];

        let nodes: Vec<(usize, V)> = grid.stencil(x, radius).collect();
        for (i, xi) in nodes {
            let (w, grad) = kernel.weight_and_gradient(x - xi);
            if w == 0.0 && grad == V::ZERO {
                continue;
            }
            grid.mass[i] += w * m;
            grid.momentum[i] += v * (w * m);
            grid.force[i] -= stress * grad * vol;
        }
    }
}

/// Turns momentum into velocity, applies forces, contact impulses and the
/// slip walls.
pub fn update_grid<V: GridVector>(
    grid: &mut Grid<V>,
    kernel: &dyn WeightFunction<V>,
    impulses: &[ContactImpulse<V>],
    params: &StepParams<V>,
) {
    let dt = params.dt;
    for i in 0..grid.node_count() {
        let m = grid.mass[i];
        if m > MASS_EPSILON {
            let v = grid.momentum[i] / m;
            grid.velocity_old[i] = v;
            grid.velocity[i] = v + (grid.force[i] / m + params.gravity) * dt;
        } else {
            grid.velocity_old[i] = V::ZERO;
            grid.velocity[i] = V::ZERO;
        }
    }

    let radius = kernel.support_radius();
    for c in impulses {
        let nodes: Vec<(usize, V)> = grid.stencil(c.position, radius).collect();
        for (i, xi) in nodes {
            let m = grid.mass[i];
            if m <= MASS_EPSILON {
                continue;
            }
            let w = kernel.weight(c.position - xi);
            grid.velocity[i] += c.impulse * (w / m);
        }
    }

    // Slip walls: drop the outward normal component near each face.
    let res = grid.resolution();
    for i in 0..grid.node_count() {
        let coord = grid.node_coord(i);
        if !grid.is_boundary_node(coord) {
            continue;
        }
        let v = &mut grid.velocity[i];
        for axis in 0..V::DIM {
            let near_min = coord[axis] < crate::grid::BOUNDARY_LAYER;
            let near_max = coord[axis] + crate::grid::BOUNDARY_LAYER > res[axis] as usize;
            if (near_min && v[axis] < 0.0) || (near_max && v[axis] > 0.0) {
                v[axis] = 0.0;
            }
        }
    }
}

/// Gathers grid velocities back to the particles and advances them.
pub fn grid_to_particle<V: GridVector>(
    particles: &mut ParticleSet<V>,
    grid: &Grid<V>,
    kernel: &dyn WeightFunction<V>,
    material: &Constitutive,
    params: &StepParams<V>,
) -> StrataResult<()> {
    let dt = params.dt;
    let radius = kernel.support_radius();
    let h = grid.cell_width();
    let lo = grid.domain_min() + V::splat(h);
    let hi = grid.domain_max() - V::splat(h);

    let updated: Vec<(V, V, V::Matrix)> = (0..particles.len())
        .into_par_iter()
        .map(|p| {
            let x = particles.positions[p];
            let mut v_pic = V::ZERO;
            let mut dv = V::ZERO;
            let mut grad_v = V::Matrix::ZERO;
            for (i, xi) in grid.stencil(x, radius) {
                let (w, grad) = kernel.weight_and_gradient(x - xi);
                v_pic += grid.velocity[i] * w;
                dv += (grid.velocity[i] - grid.velocity_old[i]) * w;
                grad_v += grid.velocity[i].outer(grad);
            }
            let v_flip = particles.velocities[p] + dv;
            let v = v_flip * params.flip_ratio + v_pic * (1.0 - params.flip_ratio);
            let f = (V::Matrix::IDENTITY + grad_v * dt) * particles.deformation[p];
            let f = material.project::<V>(f);
            let x = (x + v_pic * dt).clamp_to(lo, hi);
            (x, v, f)
        })
        .collect();

    if let Some(p) = updated
        .iter()
        .position(|(x, v, f)| !(x.is_finite() && v.is_finite() && f.is_finite()))
    {
        tracing::warn!(particle = p, dt, "Non-finite particle state, step rejected");
        return Err(StrataError::NumericalInstability {
            requested: dt,
            bound: params.dt_bound,
        });
    }

    for (p, (x, v, f)) in updated.into_iter().enumerate() {
        particles.positions[p] = x;
        particles.velocities[p] = v;
        particles.deformation[p] = f;
    }
    Ok(())
}
