//! Mesh-to-mesh collision detection: broad → narrow.
//!
//! For every pair of distinct mesh-based objects whose bounds overlap, the
//! right-hand mesh's faces are binned into a [`FaceSpatialHash`] and each
//! left-hand face queries it. Candidates surviving the bounds test are
//! confirmed with [`triangles_intersect`]. Object pairs are processed in
//! parallel; the resulting set is ordered by `(lhs object, rhs object,
//! lhs face, rhs face)` regardless of thread scheduling.
//!
//! Self-collision (a mesh against itself) is not detected here.

use rayon::prelude::*;
use strata_math::Vec3;
use strata_mesh::TriangleMesh;
use strata_types::{FaceId, ObjectId, StrataError, StrataResult};

use crate::aabb::Aabb;
use crate::collision_pair::{CollisionPair, CollisionPairMeshToMesh};
use crate::pair_set::CollisionPairSet;
use crate::registry::CollidableRegistry;
use crate::spatial_hash::FaceSpatialHash;
use crate::triangle::triangles_intersect;

/// Detects intersecting face pairs between mesh-based objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshMeshDetector {
    /// Extra padding applied to every face bound during broad phase,
    /// on top of each object's own thickness.
    pub thickness: f32,
}

impl MeshMeshDetector {
    pub fn new(thickness: f32) -> Self {
        Self { thickness }
    }

    /// Runs detection over every pair of mesh-based objects in `registry`.
    pub fn detect(&self, registry: &CollidableRegistry) -> StrataResult<CollisionPairSet> {
        let bodies: Vec<(ObjectId, Aabb)> = registry
            .objects()
            .filter_map(|(id, object)| {
                let mesh_object = object.as_mesh()?;
                let mesh = registry.mesh(mesh_object.mesh())?;
                let margin = self.thickness + mesh_object.thickness;
                Some((id, mesh_bounds(mesh).inflated(margin)))
            })
            .collect();

        let mut candidates = Vec::new();
        for (i, (lhs, lhs_bounds)) in bodies.iter().enumerate() {
            for (rhs, rhs_bounds) in &bodies[i + 1..] {
                if lhs_bounds.intersects(rhs_bounds) {
                    candidates.push((*lhs, *rhs));
                }
            }
        }

        let per_pair = candidates
            .par_iter()
            .map(|&(lhs, rhs)| self.detect_between(registry, lhs, rhs))
            .collect::<StrataResult<Vec<Vec<CollisionPair>>>>()?;

        let mut set = CollisionPairSet::for_registry(registry);
        set.extend(per_pair.into_iter().flatten());

        tracing::debug!(
            objects = bodies.len(),
            object_pairs = candidates.len(),
            face_pairs = set.len(),
            "Mesh-mesh detection complete"
        );
        Ok(set)
    }

    /// Detects intersecting faces between two specific objects.
    ///
    /// Both objects must be mesh-based and distinct.
    pub fn detect_between(
        &self,
        registry: &CollidableRegistry,
        lhs: ObjectId,
        rhs: ObjectId,
    ) -> StrataResult<Vec<CollisionPair>> {
        if lhs == rhs {
            return Err(StrataError::CollisionData(format!(
                "Object {} cannot be tested against itself",
                lhs.0
            )));
        }
        let (lhs_mesh, lhs_margin) = self.mesh_side(registry, lhs)?;
        let (rhs_mesh, rhs_margin) = self.mesh_side(registry, rhs)?;

        let rhs_bounds = face_bounds(rhs_mesh, rhs_margin);
        let hash = FaceSpatialHash::build(&rhs_bounds);

        let mut pairs = Vec::new();
        let mut found = Vec::new();
        for lf in 0..lhs_mesh.face_count() {
            let lhs_face = FaceId(lf as u32);
            let Some(lhs_tri) = lhs_mesh.face(lhs_face) else {
                continue;
            };
            let lhs_box = Aabb::from_points(&lhs_tri).inflated(lhs_margin);
            hash.query(&lhs_box, &mut found);

            for &rf in &found {
                if !lhs_box.intersects(&rhs_bounds[rf as usize]) {
                    continue;
                }
                let rhs_face = FaceId(rf);
                let Some(rhs_tri) = rhs_mesh.face(rhs_face) else {
                    continue;
                };
                if triangles_intersect(&lhs_tri, &rhs_tri) {
                    let pair =
                        CollisionPairMeshToMesh::new(registry, lhs, rhs, lhs_face, rhs_face)?;
                    pairs.push(CollisionPair::from(pair));
                }
            }
        }
        Ok(pairs)
    }

    fn mesh_side<'r>(
        &self,
        registry: &'r CollidableRegistry,
        id: ObjectId,
    ) -> StrataResult<(&'r TriangleMesh, f32)> {
        let object = registry
            .object(id)
            .and_then(|o| o.as_mesh())
            .ok_or_else(|| {
                StrataError::CollisionData(format!("Object {} is not a mesh-based object", id.0))
            })?;
        let mesh = registry.mesh(object.mesh()).ok_or_else(|| {
            StrataError::CollisionData(format!("Mesh handle {} is out of range", object.mesh().0))
        })?;
        Ok((mesh, self.thickness + object.thickness))
    }
}

fn mesh_bounds(mesh: &TriangleMesh) -> Aabb {
    (0..mesh.vertex_count()).fold(Aabb::EMPTY, |acc, i| acc.grown(mesh.position(i)))
}

fn face_bounds(mesh: &TriangleMesh, margin: f32) -> Vec<Aabb> {
    (0..mesh.face_count())
        .map(|f| {
            mesh.face(FaceId(f as u32))
                .map(|tri: [Vec3; 3]| Aabb::from_points(&tri).inflated(margin))
                .unwrap_or(Aabb::EMPTY)
        })
        .collect()
}
