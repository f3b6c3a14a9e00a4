//! Spatial hash broad phase over face bounding boxes.
//!
//! Partitions space into a uniform grid and bins each face into every cell
//! its bounding box touches. The cell size defaults to the largest face
//! extent, so a face touches at most two cells per axis.

use std::collections::HashMap;

use crate::aabb::Aabb;

/// Uniform-grid hash of face bounds.
pub struct FaceSpatialHash {
    /// Inverse cell size (cached for performance).
    inv_cell_size: f32,
    /// Hash map from cell key to list of face indices.
    grid: HashMap<(i32, i32, i32), Vec<u32>>,
    /// Number of faces inserted.
    face_count: u32,
}

impl FaceSpatialHash {
    /// Create an empty hash with the given cell size.
    pub fn new(cell_size: f32) -> Self {
        let cell_size = cell_size.max(1e-6);
        Self {
            inv_cell_size: 1.0 / cell_size,
            grid: HashMap::new(),
            face_count: 0,
        }
    }

    /// Builds a hash over `bounds`, face `i` having bounds `bounds[i]`.
    pub fn build(bounds: &[Aabb]) -> Self {
        let cell_size = bounds
            .iter()
            .map(|b| b.extents().max_element())
            .fold(0.0f32, f32::max);
        let mut hash = Self::new(cell_size);
        for (i, b) in bounds.iter().enumerate() {
            hash.insert(i as u32, b);
        }
        hash
    }

    /// Hash a coordinate to a cell index.
    #[inline]
    fn cell(&self, x: f32) -> i32 {
        (x * self.inv_cell_size).floor() as i32
    }

    fn cell_range(&self, bounds: &Aabb) -> ((i32, i32, i32), (i32, i32, i32)) {
        (
            (
                self.cell(bounds.min.x),
                self.cell(bounds.min.y),
                self.cell(bounds.min.z),
            ),
            (
                self.cell(bounds.max.x),
                self.cell(bounds.max.y),
                self.cell(bounds.max.z),
            ),
        )
    }

    /// Inserts `face` into every cell covered by `bounds`.
    pub fn insert(&mut self, face: u32, bounds: &Aabb) {
        if bounds.is_empty() {
            return;
        }
        let (lo, hi) = self.cell_range(bounds);
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                for cz in lo.2..=hi.2 {
                    self.grid.entry((cx, cy, cz)).or_default().push(face);
                }
            }
        }
        self.face_count += 1;
    }

    /// Collects the faces sharing at least one cell with `bounds`.
    ///
    /// `out` is cleared first and returned sorted without duplicates.
    pub fn query(&self, bounds: &Aabb, out: &mut Vec<u32>) {
        out.clear();
        if bounds.is_empty() {
            return;
        }
        let (lo, hi) = self.cell_range(bounds);
        for cx in lo.0..=hi.0 {
            for cy in lo.1..=hi.1 {
                for cz in lo.2..=hi.2 {
                    if let Some(faces) = self.grid.get(&(cx, cy, cz)) {
                        out.extend_from_slice(faces);
                    }
                }
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    /// Number of faces inserted.
    pub fn len(&self) -> usize {
        self.face_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.face_count == 0
    }
}
