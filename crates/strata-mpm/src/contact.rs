//! Contact impulses applied to the background grid.

use strata_contact::ContactPoint;
use strata_math::GridVector;
use strata_types::Scalar;

/// A point impulse, spread onto nearby nodes with the interpolation kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactImpulse<V: GridVector> {
    pub position: V,
    /// Impulse (N·s).
    pub impulse: V,
}

impl<V: GridVector> ContactImpulse<V> {
    pub fn new(position: V, impulse: V) -> Self {
        Self { position, impulse }
    }
}

/// One impulse of the given magnitude per sampled contact, along the
/// contact normal. Contacts with a zero normal produce a zero impulse.
pub fn impulses_from_contacts<V: GridVector>(
    contacts: &[ContactPoint],
    magnitude: Scalar,
) -> Vec<ContactImpulse<V>> {
    contacts
        .iter()
        .map(|c| ContactImpulse {
            position: V::from_vec3(c.position),
            impulse: V::from_vec3(c.normal * magnitude),
        })
        .collect()
}
