//! # Component Storage
//!
//! Dense, pre-allocated storage: one slot per entity index, so slot `i`
//! of every storage belongs to entity index `i`. No hashing, no sparse
//! sets, no allocation after construction.

use super::component::Component;

/// Fixed-capacity dense storage for one component type.
///
/// Slots are indexed by entity index. Whether slot `i` holds live data
/// is recorded in the entity's component mask, not here; the storage
/// itself is just a slab.
pub struct ComponentStorage<C: Component> {
    /// Pre-allocated component slab.
    data: Box<[C]>,
}

impl<C: Component> ComponentStorage<C> {
    /// Creates storage with one default-initialized slot per entity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![C::default(); capacity].into_boxed_slice(),
        }
    }

    /// Returns the slot count (equals the world capacity).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the storage has no slots.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets the component at an entity index, or `None` out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.data.get(index)
    }

    /// Gets the component mutably, or `None` out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.data.get_mut(index)
    }

    /// Writes a component value into a slot.
    ///
    /// Out-of-range writes are ignored; the world validates indices
    /// before they get here.
    #[inline]
    pub fn set(&mut self, index: usize, value: C) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = value;
        }
    }

    /// Resets a slot to the default value.
    #[inline]
    pub fn reset(&mut self, index: usize) {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = C::default();
        }
    }

    /// Full slab view for hot-path iteration.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Mutable slab view for hot-path iteration.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }
}
