//! Collidable objects.
//!
//! A collidable object is anything the detection stage can query. It carries
//! an [`ObjectType`] tag; mesh-based objects refer to a mesh in the
//! registry's mesh arena through a [`MeshHandle`] and never own it.

use serde::{Deserialize, Serialize};
use strata_math::Vec3;

use crate::registry::MeshHandle;

/// Kind of geometry behind a collidable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// Triangle surface mesh.
    MeshBased,
    /// Signed-distance surface (plane, sphere).
    ImplicitSurface,
}

/// Collidable object backed by a surface mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshBasedCollidableObject {
    mesh: MeshHandle,
    /// Padding added to face bounds during broad phase (meters).
    pub thickness: f32,
}

impl MeshBasedCollidableObject {
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            thickness: 0.0,
        }
    }

    /// Handle of the referenced mesh.
    #[inline]
    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }
}

/// Analytic surface described by a signed distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ImplicitShape {
    /// Half-space boundary through `point` with outward `normal`.
    Plane { point: Vec3, normal: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl ImplicitShape {
    /// Signed distance from `p` to the surface (negative inside).
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        match *self {
            ImplicitShape::Plane { point, normal } => (p - point).dot(normal.normalize_or_zero()),
            ImplicitShape::Sphere { center, radius } => (p - center).length() - radius,
        }
    }
}

/// An entry in the collidable object registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollidableObject {
    Mesh(MeshBasedCollidableObject),
    Implicit(ImplicitShape),
}

impl CollidableObject {
    /// Type tag of this object.
    pub fn object_type(&self) -> ObjectType {
        match self {
            CollidableObject::Mesh(_) => ObjectType::MeshBased,
            CollidableObject::Implicit(_) => ObjectType::ImplicitSurface,
        }
    }

    /// Mesh-based view of this object, if it is one.
    pub fn as_mesh(&self) -> Option<&MeshBasedCollidableObject> {
        match self {
            CollidableObject::Mesh(m) => Some(m),
            CollidableObject::Implicit(_) => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshBasedCollidableObject> {
        match self {
            CollidableObject::Mesh(m) => Some(m),
            CollidableObject::Implicit(_) => None,
        }
    }
}
