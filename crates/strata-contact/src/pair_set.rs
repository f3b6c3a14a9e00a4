//! Collision pair sets.
//!
//! A set is produced against one registry generation and may only be
//! consumed while the registry is still at that generation.

use strata_types::{StrataError, StrataResult};

use crate::collision_pair::CollisionPair;
use crate::registry::CollidableRegistry;

/// Pairs produced by one detection pass.
#[derive(Debug, Clone, Default)]
pub struct CollisionPairSet {
    pairs: Vec<CollisionPair>,
    generation: u64,
}

impl CollisionPairSet {
    /// Creates an empty set bound to the registry's current generation.
    pub fn for_registry(registry: &CollidableRegistry) -> Self {
        Self {
            pairs: Vec::new(),
            generation: registry.generation(),
        }
    }

    /// Adds a pair. Pairs are never modified once added.
    pub fn push(&mut self, pair: impl Into<CollisionPair>) {
        self.pairs.push(pair.into());
    }

    pub fn extend(&mut self, pairs: impl IntoIterator<Item = CollisionPair>) {
        self.pairs.extend(pairs);
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CollisionPair> {
        self.pairs.iter()
    }

    pub fn pairs(&self) -> &[CollisionPair] {
        &self.pairs
    }

    /// Registry generation this set was produced against.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if the registry has not changed since detection.
    pub fn is_current(&self, registry: &CollidableRegistry) -> bool {
        self.generation == registry.generation()
    }

    /// Checks the set can be consumed against `registry`.
    ///
    /// Fails with [`StrataError::CollisionData`] if the registry changed
    /// since detection or any pair names an object or face that no longer
    /// resolves.
    pub fn validate(&self, registry: &CollidableRegistry) -> StrataResult<()> {
        if !self.is_current(registry) {
            return Err(StrataError::CollisionData(format!(
                "Collision pairs were generated at registry generation {}, registry is now at {}",
                self.generation,
                registry.generation()
            )));
        }
        self.pairs.iter().try_for_each(|pair| pair.validate(registry))
    }
}

impl<'a> IntoIterator for &'a CollisionPairSet {
    type Item = &'a CollisionPair;
    type IntoIter = std::slice::Iter<'a, CollisionPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
