//! Particle buffers.
//!
//! Structure-of-Arrays storage for the material points. All arrays have
//! length [`ParticleSet::len`].

use strata_math::{GridMatrix, GridVector};
use strata_types::{ParticleId, Scalar};

/// Material point state.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet<V: GridVector> {
    pub positions: Vec<V>,
    pub velocities: Vec<V>,
    /// Deformation gradients.
    pub deformation: Vec<V::Matrix>,
    pub masses: Vec<Scalar>,
    /// Reference (undeformed) volumes.
    pub volumes: Vec<Scalar>,
}

impl<V: GridVector> Default for ParticleSet<V> {
    fn default() -> Self {
        Self {
            positions: Vec::new(),
            velocities: Vec::new(),
            deformation: Vec::new(),
            masses: Vec::new(),
            volumes: Vec::new(),
        }
    }
}

impl<V: GridVector> ParticleSet<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            deformation: Vec::with_capacity(capacity),
            masses: Vec::with_capacity(capacity),
            volumes: Vec::with_capacity(capacity),
        }
    }

    /// Adds an undeformed particle.
    pub fn push(&mut self, position: V, velocity: V, mass: Scalar, volume: Scalar) -> ParticleId {
        self.positions.push(position);
        self.velocities.push(velocity);
        self.deformation.push(V::Matrix::IDENTITY);
        self.masses.push(mass);
        self.volumes.push(volume);
        ParticleId((self.positions.len() - 1) as u32)
    }

    /// Seeds `count` particles on a regular lattice inside `[min, max]`.
    ///
    /// The lattice has `k` points per axis, `k` the smallest integer with
    /// `k^DIM >= count`, each at the center of its lattice cell; the first
    /// `count` points in x-fastest order are kept. The box volume is split
    /// evenly, so every particle carries `density * volume / count`.
    pub fn seed_box(min: V, max: V, count: usize, density: Scalar, velocity: V) -> Self {
        let mut set = Self::with_capacity(count);
        if count == 0 {
            return set;
        }
        let mut k = 1usize;
        while k.pow(V::DIM as u32) < count {
            k += 1;
        }
        let extent = max - min;
        let spacing = extent / k as Scalar;
        let box_volume: Scalar = (0..V::DIM).map(|a| extent[a]).product();
        let volume = box_volume / count as Scalar;
        let mass = density * volume;

        for n in 0..count {
            let mut rem = n;
            let position = V::from_fn(|axis| {
                let i = rem % k;
                rem /= k;
                min[axis] + (i as Scalar + 0.5) * spacing[axis]
            });
            set.push(position, velocity, mass, volume);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.masses.iter().map(|&m| m as f64).sum()
    }

    /// Total linear momentum, embedded in 3-D.
    pub fn momentum(&self) -> [f64; 3] {
        let mut p = [0.0f64; 3];
        for (v, &m) in self.velocities.iter().zip(&self.masses) {
            let v = v.to_vec3();
            p[0] += (m * v.x) as f64;
            p[1] += (m * v.y) as f64;
            p[2] += (m * v.z) as f64;
        }
        p
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.velocities
            .iter()
            .zip(&self.masses)
            .map(|(v, &m)| 0.5 * m as f64 * v.dot(*v) as f64)
            .sum()
    }

    /// Largest particle speed.
    pub fn max_speed(&self) -> Scalar {
        self.velocities
            .iter()
            .map(|v| v.length())
            .fold(0.0, Scalar::max)
    }
}
