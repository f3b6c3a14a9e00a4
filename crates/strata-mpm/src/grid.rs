//! Dense background grid.
//!
//! A regular lattice of `resolution + 1` nodes per axis starting at
//! `origin`, spaced `cell_width` apart. Node data is scratch: it is rebuilt
//! from the particles every step.

use strata_math::GridVector;
use strata_types::constants::MASS_EPSILON;
use strata_types::{Scalar, StrataError, StrataResult};

/// Nodes at most this many cells from a face are wall nodes.
pub const BOUNDARY_LAYER: usize = 2;

/// Per-node state of the background grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<V: GridVector> {
    /// Cells per axis; unused axes hold 0.
    resolution: [usize; 3],
    cell_width: Scalar,
    origin: V,
    pub mass: Vec<Scalar>,
    pub momentum: Vec<V>,
    pub force: Vec<V>,
    /// Velocity after the grid update.
    pub velocity: Vec<V>,
    /// Velocity before the grid update (for FLIP).
    pub velocity_old: Vec<V>,
}

impl<V: GridVector> Grid<V> {
    /// Creates a zeroed grid. Only the first `V::DIM` resolution entries
    /// are used.
    pub fn new(resolution: [u32; 3], cell_width: Scalar, origin: V) -> StrataResult<Self> {
        if !(cell_width > 0.0 && cell_width.is_finite()) {
            return Err(StrataError::Configuration(format!(
                "Grid cell width must be positive, got {}",
                cell_width
            )));
        }
        let mut res = [0usize; 3];
        for axis in 0..V::DIM {
            if resolution[axis] == 0 {
                return Err(StrataError::Configuration(format!(
                    "Grid resolution along axis {} must be positive",
                    axis
                )));
            }
            res[axis] = resolution[axis] as usize;
        }
        let nodes: usize = (0..V::DIM).map(|a| res[a] + 1).product();
        Ok(Self {
            resolution: res,
            cell_width,
            origin,
            mass: vec![0.0; nodes],
            momentum: vec![V::ZERO; nodes],
            force: vec![V::ZERO; nodes],
            velocity: vec![V::ZERO; nodes],
            velocity_old: vec![V::ZERO; nodes],
        })
    }

    pub fn cell_width(&self) -> Scalar {
        self.cell_width
    }

    pub fn origin(&self) -> V {
        self.origin
    }

    /// Cells per axis, as configured.
    pub fn resolution(&self) -> [u32; 3] {
        self.resolution.map(|n| n as u32)
    }

    pub fn node_count(&self) -> usize {
        self.mass.len()
    }

    /// Lower corner of the domain.
    pub fn domain_min(&self) -> V {
        self.origin
    }

    /// Upper corner of the domain.
    pub fn domain_max(&self) -> V {
        self.origin + V::from_fn(|a| self.resolution[a] as Scalar * self.cell_width)
    }

    /// Flat index of node `coord`.
    #[inline]
    pub fn node_index(&self, coord: [usize; 3]) -> usize {
        let nx = self.resolution[0] + 1;
        let ny = self.resolution[1] + 1;
        coord[0] + nx * (coord[1] + ny * coord[2])
    }

    /// Lattice coordinate of flat index `index`.
    #[inline]
    pub fn node_coord(&self, index: usize) -> [usize; 3] {
        let nx = self.resolution[0] + 1;
        let ny = self.resolution[1] + 1;
        [index % nx, (index / nx) % ny, index / (nx * ny)]
    }

    #[inline]
    pub fn node_position(&self, coord: [usize; 3]) -> V {
        self.origin + V::from_fn(|a| coord[a] as Scalar * self.cell_width)
    }

    /// Returns true if node `coord` lies in the wall layer of any face.
    pub fn is_boundary_node(&self, coord: [usize; 3]) -> bool {
        (0..V::DIM).any(|a| {
            coord[a] < BOUNDARY_LAYER || coord[a] + BOUNDARY_LAYER > self.resolution[a]
        })
    }

    /// Zeroes all node data.
    pub fn clear(&mut self) {
        self.mass.fill(0.0);
        self.momentum.fill(V::ZERO);
        self.force.fill(V::ZERO);
        self.velocity.fill(V::ZERO);
        self.velocity_old.fill(V::ZERO);
    }

    /// Nodes whose offset from `x` lies strictly inside the box of
    /// half-width `radius`, clamped to the grid.
    pub fn stencil(&self, x: V, radius: Scalar) -> Stencil<'_, V> {
        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        let mut empty = false;
        for a in 0..V::DIM {
            let rel = (x[a] - self.origin[a]) / self.cell_width;
            let r = radius / self.cell_width;
            let first = (rel - r).floor() as i64 + 1;
            let last = (rel + r).ceil() as i64 - 1;
            let first = first.max(0);
            let last = last.min(self.resolution[a] as i64);
            if first > last {
                empty = true;
            }
            lo[a] = first.max(0) as usize;
            hi[a] = last.max(0) as usize;
        }
        Stencil {
            grid: self,
            lo,
            hi,
            cursor: lo,
            done: empty,
        }
    }

    /// Total mass on the grid.
    pub fn total_mass(&self) -> f64 {
        self.mass.iter().map(|&m| m as f64).sum()
    }

    /// Number of nodes carrying mass.
    pub fn active_node_count(&self) -> usize {
        self.mass.iter().filter(|&&m| m > MASS_EPSILON).count()
    }
}

/// Iterator over `(flat index, node position)` for the nodes near a point.
pub struct Stencil<'a, V: GridVector> {
    grid: &'a Grid<V>,
    lo: [usize; 3],
    hi: [usize; 3],
    cursor: [usize; 3],
    done: bool,
}

impl<'a, V: GridVector> Iterator for Stencil<'a, V> {
    type Item = (usize, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let coord = self.cursor;
        let item = (self.grid.node_index(coord), self.grid.node_position(coord));

        // Advance x-fastest; unused axes have lo == hi == 0.
        let mut axis = 0;
        loop {
            if axis == 3 {
                self.done = true;
                break;
            }
            if self.cursor[axis] < self.hi[axis] {
                self.cursor[axis] += 1;
                break;
            }
            self.cursor[axis] = self.lo[axis];
            axis += 1;
        }
        Some(item)
    }
}
