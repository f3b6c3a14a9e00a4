//! # strata-contact
//!
//! Collision data between deformable bodies.
//!
//! The collision stage is split into three parts:
//! 1. **Registry**: collidable objects and the meshes they refer to, stored
//!    in index-addressed arenas ([`CollidableRegistry`])
//! 2. **Detection**: broad phase (uniform spatial hash over face bounds) and
//!    narrow phase (triangle/triangle separating-axis test) producing
//!    [`CollisionPair`]s
//! 3. **Sampling**: turning pairs into [`ContactPoint`]s for downstream
//!    contact resolution
//!
//! A [`CollisionPair`] is a record, not a detector: it names two colliding
//! faces on two objects. Pairs are produced and consumed within one step;
//! [`CollisionPairSet`] carries the registry generation it was produced
//! against and refuses to be consumed after the geometry changed.

pub mod aabb;
pub mod collidable;
pub mod collision_pair;
pub mod detection;
pub mod pair_set;
pub mod registry;
pub mod sampling;
pub mod spatial_hash;
pub mod triangle;

pub use aabb::Aabb;
pub use collidable::{CollidableObject, ImplicitShape, MeshBasedCollidableObject, ObjectType};
pub use collision_pair::{CollisionPair, CollisionPairMeshToMesh, FaceRef, PairKind};
pub use detection::MeshMeshDetector;
pub use pair_set::CollisionPairSet;
pub use registry::{CollidableRegistry, MeshHandle};
pub use sampling::{sample_contacts, ContactPoint};
