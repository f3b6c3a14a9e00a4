//! Collision pairs.
//!
//! `CollisionPair` identifies colliding elements (faces) on two collidable
//! objects. It is different from a [`ContactPoint`](crate::sampling::ContactPoint),
//! which carries a position and normal; contact points are sampled from
//! pairs, and that mapping is not a bijection.
//!
//! Pair kinds form a closed set. Every kind answers the shared accessors
//! on [`CollisionPair`]; kind-specific data is reached by matching.

use serde::{Deserialize, Serialize};
use strata_math::Vec3;
use strata_types::{FaceId, ObjectId, StrataError, StrataResult};

use crate::collidable::{CollidableObject, MeshBasedCollidableObject, ObjectType};
use crate::registry::{CollidableRegistry, MeshHandle};

/// Which kind of elements a pair connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    MeshToMesh,
}

/// Handle to one face of one mesh, stamped with the registry's topology
/// generation for that mesh at the time the handle was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRef {
    pub mesh: MeshHandle,
    pub face: FaceId,
    pub topology_generation: u64,
}

impl FaceRef {
    /// Resolves the face to its corner positions.
    ///
    /// Fails with [`StrataError::CollisionData`] if the mesh is gone, the
    /// face is out of range, or the mesh topology changed since the handle
    /// was taken.
    pub fn resolve(&self, registry: &CollidableRegistry) -> StrataResult<[Vec3; 3]> {
        let mesh = registry.mesh(self.mesh).ok_or_else(|| {
            StrataError::CollisionData(format!("Mesh handle {} is out of range", self.mesh.0))
        })?;
        let current = registry.mesh_generation(self.mesh).unwrap_or(u64::MAX);
        if current != self.topology_generation {
            return Err(StrataError::CollisionData(format!(
                "Face {} of mesh {} was taken at topology generation {}, mesh is now at {}",
                self.face.0, self.mesh.0, self.topology_generation, current
            )));
        }
        mesh.face(self.face).ok_or_else(|| {
            StrataError::CollisionData(format!(
                "Face {} is out of range (face count: {})",
                self.face.0,
                mesh.face_count()
            ))
        })
    }
}

/// Face pair of a mesh-to-mesh collision.
///
/// All fields are fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionPairMeshToMesh {
    object_lhs_index: ObjectId,
    object_rhs_index: ObjectId,
    object_lhs: MeshBasedCollidableObject,
    object_rhs: MeshBasedCollidableObject,
    face_lhs_index: FaceId,
    face_rhs_index: FaceId,
    face_lhs: FaceRef,
    face_rhs: FaceRef,
}

impl CollisionPairMeshToMesh {
    /// Builds a pair from two object indices and two face indices already
    /// known to be in contact. No geometric test is performed.
    ///
    /// Fails with [`StrataError::CollisionData`] if either object is not a
    /// registered mesh-based object or either face is out of range.
    pub fn new(
        registry: &CollidableRegistry,
        object_lhs_index: ObjectId,
        object_rhs_index: ObjectId,
        face_lhs_index: FaceId,
        face_rhs_index: FaceId,
    ) -> StrataResult<Self> {
        let (object_lhs, face_lhs) = resolve_side(registry, object_lhs_index, face_lhs_index)?;
        let (object_rhs, face_rhs) = resolve_side(registry, object_rhs_index, face_rhs_index)?;
        Ok(Self {
            object_lhs_index,
            object_rhs_index,
            object_lhs,
            object_rhs,
            face_lhs_index,
            face_rhs_index,
            face_lhs,
            face_rhs,
        })
    }

    #[inline]
    pub fn object_lhs_idx(&self) -> ObjectId {
        self.object_lhs_index
    }

    #[inline]
    pub fn object_rhs_idx(&self) -> ObjectId {
        self.object_rhs_index
    }

    #[inline]
    pub fn face_lhs_idx(&self) -> FaceId {
        self.face_lhs_index
    }

    #[inline]
    pub fn face_rhs_idx(&self) -> FaceId {
        self.face_rhs_index
    }

    /// Mesh-based object on the left, as captured at construction.
    #[inline]
    pub fn mesh_object_lhs(&self) -> &MeshBasedCollidableObject {
        &self.object_lhs
    }

    #[inline]
    pub fn mesh_object_rhs(&self) -> &MeshBasedCollidableObject {
        &self.object_rhs
    }

    #[inline]
    pub fn face_lhs_ref(&self) -> FaceRef {
        self.face_lhs
    }

    #[inline]
    pub fn face_rhs_ref(&self) -> FaceRef {
        self.face_rhs
    }

    /// Corner positions of the left face.
    pub fn face_lhs(&self, registry: &CollidableRegistry) -> StrataResult<[Vec3; 3]> {
        self.face_lhs.resolve(registry)
    }

    /// Corner positions of the right face.
    pub fn face_rhs(&self, registry: &CollidableRegistry) -> StrataResult<[Vec3; 3]> {
        self.face_rhs.resolve(registry)
    }
}

fn resolve_side(
    registry: &CollidableRegistry,
    object: ObjectId,
    face: FaceId,
) -> StrataResult<(MeshBasedCollidableObject, FaceRef)> {
    let entry = registry.object(object).ok_or_else(|| {
        StrataError::CollisionData(format!(
            "Object {} is out of range (object count: {})",
            object.0,
            registry.len()
        ))
    })?;
    let mesh_object = *entry.as_mesh().ok_or_else(|| {
        StrataError::CollisionData(format!("Object {} is not mesh-based", object.0))
    })?;
    let mesh = registry.mesh(mesh_object.mesh()).ok_or_else(|| {
        StrataError::CollisionData(format!(
            "Object {} refers to missing mesh {}",
            object.0,
            mesh_object.mesh().0
        ))
    })?;
    if !mesh.contains_face(face) {
        return Err(StrataError::CollisionData(format!(
            "Face {} of object {} is out of range (face count: {})",
            face.0,
            object.0,
            mesh.face_count()
        )));
    }
    Ok((
        mesh_object,
        FaceRef {
            mesh: mesh_object.mesh(),
            face,
            topology_generation: registry
                .mesh_generation(mesh_object.mesh())
                .unwrap_or_default(),
        },
    ))
}

/// A pair of colliding elements on two collidable objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionPair {
    MeshToMesh(CollisionPairMeshToMesh),
}

impl CollisionPair {
    pub fn kind(&self) -> PairKind {
        match self {
            CollisionPair::MeshToMesh(_) => PairKind::MeshToMesh,
        }
    }

    pub fn object_type_lhs(&self) -> ObjectType {
        match self {
            CollisionPair::MeshToMesh(_) => ObjectType::MeshBased,
        }
    }

    pub fn object_type_rhs(&self) -> ObjectType {
        match self {
            CollisionPair::MeshToMesh(_) => ObjectType::MeshBased,
        }
    }

    pub fn object_lhs_idx(&self) -> ObjectId {
        match self {
            CollisionPair::MeshToMesh(p) => p.object_lhs_idx(),
        }
    }

    pub fn object_rhs_idx(&self) -> ObjectId {
        match self {
            CollisionPair::MeshToMesh(p) => p.object_rhs_idx(),
        }
    }

    pub fn face_lhs_idx(&self) -> FaceId {
        match self {
            CollisionPair::MeshToMesh(p) => p.face_lhs_idx(),
        }
    }

    pub fn face_rhs_idx(&self) -> FaceId {
        match self {
            CollisionPair::MeshToMesh(p) => p.face_rhs_idx(),
        }
    }

    /// Left object, looked up in `registry`.
    pub fn object_lhs<'r>(&self, registry: &'r CollidableRegistry) -> StrataResult<&'r CollidableObject> {
        lookup(registry, self.object_lhs_idx())
    }

    pub fn object_rhs<'r>(&self, registry: &'r CollidableRegistry) -> StrataResult<&'r CollidableObject> {
        lookup(registry, self.object_rhs_idx())
    }

    /// Left object, mutably. Only object attributes can change through this
    /// reference; it does not change which object the pair names.
    pub fn object_lhs_mut<'r>(
        &self,
        registry: &'r mut CollidableRegistry,
    ) -> StrataResult<&'r mut CollidableObject> {
        lookup_mut(registry, self.object_lhs_idx())
    }

    pub fn object_rhs_mut<'r>(
        &self,
        registry: &'r mut CollidableRegistry,
    ) -> StrataResult<&'r mut CollidableObject> {
        lookup_mut(registry, self.object_rhs_idx())
    }

    /// Mesh-to-mesh view, if this is one.
    pub fn as_mesh_to_mesh(&self) -> Option<&CollisionPairMeshToMesh> {
        match self {
            CollisionPair::MeshToMesh(p) => Some(p),
        }
    }

    /// Checks that every index in the pair still resolves in `registry`.
    pub fn validate(&self, registry: &CollidableRegistry) -> StrataResult<()> {
        match self {
            CollisionPair::MeshToMesh(p) => {
                lookup(registry, p.object_lhs_idx())?;
                lookup(registry, p.object_rhs_idx())?;
                p.face_lhs(registry)?;
                p.face_rhs(registry)?;
                Ok(())
            }
        }
    }
}

impl From<CollisionPairMeshToMesh> for CollisionPair {
    fn from(pair: CollisionPairMeshToMesh) -> Self {
        CollisionPair::MeshToMesh(pair)
    }
}

fn lookup(registry: &CollidableRegistry, id: ObjectId) -> StrataResult<&CollidableObject> {
    registry.object(id).ok_or_else(|| {
        StrataError::CollisionData(format!(
            "Object {} is out of range (object count: {})",
            id.0,
            registry.len()
        ))
    })
}

fn lookup_mut(registry: &mut CollidableRegistry, id: ObjectId) -> StrataResult<&mut CollidableObject> {
    let count = registry.len();
    registry.object_mut(id).ok_or_else(|| {
        StrataError::CollisionData(format!(
            "Object {} is out of range (object count: {})",
            id.0, count
        ))
    })
}
