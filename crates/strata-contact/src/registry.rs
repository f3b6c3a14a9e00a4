//! Collidable object registry.
//!
//! Two arenas: meshes and objects. Objects refer to meshes by
//! [`MeshHandle`]; pairs refer to objects by [`ObjectId`] and to faces by
//! [`FaceId`]. Nothing holds a borrow across steps.
//!
//! [`CollidableRegistry::generation`] changes whenever anything a collision
//! pair could name changes: objects added, faces added to or removed from
//! any mesh, or a mesh replaced wholesale. The counters are owned by the
//! registry, so they never move backwards even when a stored mesh is
//! swapped for a fresh one.
//!
//! Vertex motion goes through [`CollidableRegistry::translate_mesh`] and
//! [`CollidableRegistry::set_vertex_position`], which leave the generation
//! alone. Any [`CollidableRegistry::mesh_mut`] borrow is treated as a
//! topology change.

use serde::{Deserialize, Serialize};
use strata_math::Vec3;
use strata_mesh::TriangleMesh;
use strata_types::{ObjectId, StrataError, StrataResult};

use crate::collidable::{CollidableObject, ImplicitShape, MeshBasedCollidableObject};

/// Index into the registry's mesh arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

impl MeshHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena storage for collidable objects and their meshes.
#[derive(Debug, Clone, Default)]
pub struct CollidableRegistry {
    meshes: Vec<TriangleMesh>,
    objects: Vec<CollidableObject>,
    /// Topology generation of each mesh, stamped from `topology_epoch`.
    mesh_generations: Vec<u64>,
    structure_generation: u64,
    topology_epoch: u64,
}

impl CollidableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a mesh and returns its handle.
    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> StrataResult<MeshHandle> {
        mesh.validate()?;
        self.meshes.push(mesh);
        self.mesh_generations.push(self.topology_epoch);
        self.structure_generation += 1;
        Ok(MeshHandle((self.meshes.len() - 1) as u32))
    }

    /// Registers a mesh-based object referring to `mesh`.
    pub fn add_mesh_object(&mut self, mesh: MeshHandle) -> StrataResult<ObjectId> {
        if mesh.index() >= self.meshes.len() {
            return Err(StrataError::CollisionData(format!(
                "Mesh handle {} is out of range (mesh count: {})",
                mesh.0,
                self.meshes.len()
            )));
        }
        Ok(self.push_object(CollidableObject::Mesh(MeshBasedCollidableObject::new(mesh))))
    }

    /// Stores `mesh` and registers an object for it in one call.
    pub fn add_mesh_body(&mut self, mesh: TriangleMesh) -> StrataResult<ObjectId> {
        let handle = self.add_mesh(mesh)?;
        self.add_mesh_object(handle)
    }

    /// Registers an implicit-surface object.
    pub fn add_implicit_object(&mut self, shape: ImplicitShape) -> ObjectId {
        self.push_object(CollidableObject::Implicit(shape))
    }

    fn push_object(&mut self, object: CollidableObject) -> ObjectId {
        self.objects.push(object);
        self.structure_generation += 1;
        ObjectId((self.objects.len() - 1) as u32)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of stored meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn object(&self, id: ObjectId) -> Option<&CollidableObject> {
        self.objects.get(id.index())
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut CollidableObject> {
        self.objects.get_mut(id.index())
    }

    /// Iterates `(id, object)` in registration order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &CollidableObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&TriangleMesh> {
        self.meshes.get(handle.index())
    }

    /// Mutable access to a stored mesh.
    ///
    /// The borrow may edit faces or replace the mesh outright, so it
    /// advances [`CollidableRegistry::generation`] and restamps the mesh.
    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut TriangleMesh> {
        let stamp = self.mesh_generations.get_mut(handle.index())?;
        self.topology_epoch += 1;
        *stamp = self.topology_epoch;
        self.meshes.get_mut(handle.index())
    }

    /// Moves every vertex of a stored mesh by `offset`.
    pub fn translate_mesh(&mut self, handle: MeshHandle, offset: Vec3) -> StrataResult<()> {
        self.mesh_for_motion(handle)?.translate(offset);
        Ok(())
    }

    /// Moves one vertex of a stored mesh.
    pub fn set_vertex_position(
        &mut self,
        handle: MeshHandle,
        vertex: usize,
        position: Vec3,
    ) -> StrataResult<()> {
        let mesh = self.mesh_for_motion(handle)?;
        if vertex >= mesh.vertex_count() {
            return Err(StrataError::CollisionData(format!(
                "Vertex {} is out of range (vertex count: {})",
                vertex,
                mesh.vertex_count()
            )));
        }
        mesh.set_position(vertex, position);
        Ok(())
    }

    fn mesh_for_motion(&mut self, handle: MeshHandle) -> StrataResult<&mut TriangleMesh> {
        self.meshes.get_mut(handle.index()).ok_or_else(|| {
            StrataError::CollisionData(format!("Mesh handle {} is out of range", handle.0))
        })
    }

    /// Topology generation of one mesh, as stamped by the registry.
    pub fn mesh_generation(&self, handle: MeshHandle) -> Option<u64> {
        self.mesh_generations.get(handle.index()).copied()
    }

    /// Mesh referred to by a mesh-based object.
    pub fn mesh_of(&self, id: ObjectId) -> Option<&TriangleMesh> {
        self.object(id)
            .and_then(CollidableObject::as_mesh)
            .and_then(|m| self.mesh(m.mesh()))
    }

    /// Monotonic counter over every change a collision pair could observe.
    pub fn generation(&self) -> u64 {
        self.structure_generation + self.topology_epoch
    }
}
