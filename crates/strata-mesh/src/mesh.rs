//! Core triangle mesh type with SoA (Structure of Arrays) layout.
//!
//! Faces are addressed by [`FaceId`]. Any operation that changes the face
//! list bumps [`TriangleMesh::topology_generation`], so holders of face
//! indices can tell whether those indices still name the same faces.
//! Moving vertices does not change the generation.

use serde::{Deserialize, Serialize};
use strata_math::Vec3;
use strata_types::{FaceId, StrataError, StrataResult};

/// A triangle mesh stored in Structure-of-Arrays layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    // --- Vertex data (SoA) ---
    /// X coordinates of all vertices.
    pub pos_x: Vec<f32>,
    /// Y coordinates of all vertices.
    pub pos_y: Vec<f32>,
    /// Z coordinates of all vertices.
    pub pos_z: Vec<f32>,

    // --- Face data ---
    /// Triangle indices: each face is [v0, v1, v2].
    /// Stored flat: `[f0v0, f0v1, f0v2, f1v0, f1v1, f1v2, ...]`
    indices: Vec<u32>,

    /// Incremented on every face-list mutation.
    topology_generation: u64,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the flat face index buffer.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Current topology generation.
    #[inline]
    pub fn topology_generation(&self) -> u64 {
        self.topology_generation
    }

    /// Returns true if `face` names an existing face.
    #[inline]
    pub fn contains_face(&self, face: FaceId) -> bool {
        face.index() < self.face_count()
    }

    /// Returns the position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Sets the position of vertex `i`.
    #[inline]
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.pos_x[i] = p.x;
        self.pos_y[i] = p.y;
        self.pos_z[i] = p.z;
    }

    /// Returns the three vertex indices of `face`.
    ///
    /// Panics if `face` is out of range; use [`TriangleMesh::face`] for a
    /// checked lookup.
    #[inline]
    pub fn triangle(&self, face: FaceId) -> [u32; 3] {
        let base = face.index() * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Checked face lookup returning the three corner positions.
    pub fn face(&self, face: FaceId) -> Option<[Vec3; 3]> {
        if !self.contains_face(face) {
            return None;
        }
        let [a, b, c] = self.triangle(face);
        Some([
            self.position(a as usize),
            self.position(b as usize),
            self.position(c as usize),
        ])
    }

    /// Centroid of `face`.
    pub fn face_centroid(&self, face: FaceId) -> Option<Vec3> {
        self.face(face).map(|[a, b, c]| (a + b + c) / 3.0)
    }

    /// Unit normal of `face` (zero for degenerate faces).
    pub fn face_normal(&self, face: FaceId) -> Option<Vec3> {
        self.face(face)
            .map(|[a, b, c]| (b - a).cross(c - a).normalize_or_zero())
    }

    /// Translates every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for i in 0..self.vertex_count() {
            self.pos_x[i] += offset.x;
            self.pos_y[i] += offset.y;
            self.pos_z[i] += offset.z;
        }
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, face_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(face_capacity * 3),
            topology_generation: 0,
        }
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, p: Vec3) -> u32 {
        self.pos_x.push(p.x);
        self.pos_y.push(p.y);
        self.pos_z.push(p.z);
        (self.pos_x.len() - 1) as u32
    }

    /// Appends a face and returns its id.
    pub fn push_face(&mut self, tri: [u32; 3]) -> StrataResult<FaceId> {
        let n = self.vertex_count();
        if tri.iter().any(|&v| v as usize >= n) {
            return Err(StrataError::InvalidMesh(format!(
                "Face {:?} references a vertex outside 0..{}",
                tri, n
            )));
        }
        Ok(self.push_face_unchecked(tri))
    }

    pub(crate) fn push_face_unchecked(&mut self, tri: [u32; 3]) -> FaceId {
        self.indices.extend_from_slice(&tri);
        self.topology_generation += 1;
        FaceId((self.face_count() - 1) as u32)
    }

    /// Removes `face`. The last face takes its index.
    pub fn remove_face(&mut self, face: FaceId) -> StrataResult<()> {
        if !self.contains_face(face) {
            return Err(StrataError::InvalidMesh(format!(
                "Face {} is out of range (face count: {})",
                face.0,
                self.face_count()
            )));
        }
        let last = self.face_count() - 1;
        let base = face.index() * 3;
        let last_base = last * 3;
        for k in 0..3 {
            self.indices[base + k] = self.indices[last_base + k];
        }
        self.indices.truncate(last_base);
        self.topology_generation += 1;
        Ok(())
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - Face indices are within bounds
    /// - No degenerate faces (repeated vertex indices)
    pub fn validate(&self) -> StrataResult<()> {
        let n = self.pos_x.len();

        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(StrataError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(StrataError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(StrataError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        for f in 0..self.face_count() {
            let [a, b, c] = self.triangle(FaceId(f as u32));
            if a == b || b == c || a == c {
                return Err(StrataError::InvalidMesh(format!(
                    "Face {} has repeated vertex indices: [{}, {}, {}]",
                    f, a, b, c
                )));
            }
        }

        Ok(())
    }

    /// Constructs a mesh from interleaved position data
    /// `[x0, y0, z0, x1, y1, z1, ...]`.
    pub fn from_interleaved(positions: &[f32], indices: &[u32]) -> StrataResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(StrataError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);

        for i in 0..n {
            mesh.pos_x.push(positions[i * 3]);
            mesh.pos_y.push(positions[i * 3 + 1]);
            mesh.pos_z.push(positions[i * 3 + 2]);
        }
        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }
}
