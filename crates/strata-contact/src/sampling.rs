//! Contact sampling.
//!
//! Turns collision pairs into contact points: one point per pair, at the
//! midpoint of the two face centroids, with a normal pointing from the
//! left-hand surface towards the right-hand one.

use serde::{Deserialize, Serialize};
use strata_math::Vec3;
use strata_types::{ObjectId, StrataResult};

use crate::collision_pair::CollisionPair;
use crate::pair_set::CollisionPairSet;
use crate::registry::CollidableRegistry;

/// A sampled contact between two objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub object_lhs: ObjectId,
    pub object_rhs: ObjectId,
    /// World-space contact location.
    pub position: Vec3,
    /// Unit normal, lhs → rhs. Zero when the faces are degenerate or
    /// their normals cancel.
    pub normal: Vec3,
}

/// Samples one contact point per pair.
///
/// Fails with [`CollisionData`](strata_types::StrataError::CollisionData)
/// if the set is stale with respect to `registry`.
pub fn sample_contacts(
    pairs: &CollisionPairSet,
    registry: &CollidableRegistry,
) -> StrataResult<Vec<ContactPoint>> {
    pairs.validate(registry)?;
    pairs.iter().map(|pair| sample_pair(pair, registry)).collect()
}

fn sample_pair(pair: &CollisionPair, registry: &CollidableRegistry) -> StrataResult<ContactPoint> {
    match pair {
        CollisionPair::MeshToMesh(m) => {
            let lhs = m.face_lhs(registry)?;
            let rhs = m.face_rhs(registry)?;
            let centroid = |t: &[Vec3; 3]| (t[0] + t[1] + t[2]) / 3.0;
            let normal = |t: &[Vec3; 3]| (t[1] - t[0]).cross(t[2] - t[0]).normalize_or_zero();
            Ok(ContactPoint {
                object_lhs: m.object_lhs_idx(),
                object_rhs: m.object_rhs_idx(),
                position: 0.5 * (centroid(&lhs) + centroid(&rhs)),
                normal: (normal(&lhs) - normal(&rhs)).normalize_or_zero(),
            })
        }
    }
}
