//! # Entity Management
//!
//! Entities are lightweight values consisting of:
//! - An integer id, unique while the entity is alive
//! - A [`ComponentMask`] recording which component kinds are attached
//!
//! Ids are handed out by the [`EntityRegistry`] from a FIFO pool and
//! recycled when an entity is removed.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use super::mask::ComponentMask;

/// Unique identifier for an entity.
///
/// `EntityId::INVALID` (-1) signals "no id": it is what an exhausted pool
/// hands out and what a removed entity is reset to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(i32);

impl EntityId {
    /// Null/invalid entity ID.
    pub const INVALID: Self = Self(-1);

    /// Creates an entity ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Checks if this entity ID is the invalid sentinel.
    #[inline]
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 < 0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity handle: id plus component mask.
///
/// Entities are plain values and are copied freely. The mask stays in sync
/// with the component registry only when components are attached and removed
/// through [`ComponentRegistry`](super::ComponentRegistry).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Entity {
    /// The unique identifier for this entity.
    pub id: EntityId,
    /// Bitmask of attached components.
    pub component_mask: ComponentMask,
}

impl Entity {
    /// An entity with no id and no components.
    pub const INVALID: Self = Self {
        id: EntityId::INVALID,
        component_mask: ComponentMask::EMPTY,
    };

    /// Creates an entity with an empty mask.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            component_mask: ComponentMask::EMPTY,
        }
    }

    /// Returns `true` unless this is the invalid sentinel.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !self.id.is_invalid()
    }

    /// Checks if this entity has the component with the given bit.
    #[inline]
    #[must_use]
    pub const fn has_component(&self, component_id: u8) -> bool {
        self.component_mask.test(component_id)
    }

    /// Resets the entity to the invalid sentinel.
    #[inline]
    pub fn invalidate(&mut self) {
        *self = Self::INVALID;
    }
}

/// Issues entity ids from a FIFO pool and recycles them.
pub struct EntityRegistry {
    /// Ids ready to be handed out, oldest first.
    free_ids: VecDeque<i32>,
    /// Ids currently handed out.
    alive: HashSet<i32>,
    /// Number of ids ever generated.
    capacity: u32,
}

impl EntityRegistry {
    /// Creates a registry with ids `0..capacity` available.
    ///
    /// Like [`expand`](Self::expand), the capacity is truncated to
    /// `i32::MAX` so that every id stays representable.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        let capacity = clamp_growth(0, capacity);
        let mut registry = Self {
            free_ids: VecDeque::with_capacity(capacity as usize),
            alive: HashSet::with_capacity(capacity as usize),
            capacity: 0,
        };
        registry.expand(capacity);
        registry
    }

    /// Total number of ids generated so far.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of ids waiting in the pool.
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.free_ids.len()
    }

    /// Number of ids currently handed out.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Checks if `id` is currently handed out.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.contains(&id.raw())
    }

    /// Pops the next free id.
    ///
    /// # Returns
    ///
    /// A fresh entity with an empty mask, or [`Entity::INVALID`] if the pool
    /// is exhausted. Callers must check [`Entity::is_valid`].
    pub fn create_entity(&mut self) -> Entity {
        let Some(raw) = self.free_ids.pop_front() else {
            return Entity::INVALID;
        };
        self.alive.insert(raw);
        Entity::new(EntityId::new(raw))
    }

    /// Returns the entity's id to the pool and resets the caller's copy.
    ///
    /// The entity is always reset to [`Entity::INVALID`], so the same copy
    /// cannot be used again by accident.
    ///
    /// Ids carry no generation, so only the liveness of the raw id is
    /// checked. Other copies of the entity must not be removed once its id
    /// has been handed out again: they would release the new owner's id.
    ///
    /// # Returns
    ///
    /// `true` if the id was alive and has been recycled.
    pub fn remove_entity(&mut self, entity: &mut Entity) -> bool {
        let raw = entity.id.raw();
        entity.invalidate();
        if !self.alive.remove(&raw) {
            return false;
        }
        self.free_ids.push_back(raw);
        true
    }

    /// Appends `amount` new sequential ids to the pool.
    ///
    /// The expansion is truncated so that ids stay within `i32`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn expand(&mut self, amount: u32) {
        let amount = clamp_growth(self.capacity, amount);
        let first = self.capacity;
        self.capacity += amount;
        self.free_ids.reserve(amount as usize);
        // first + amount <= i32::MAX, so every id fits
        self.free_ids
            .extend((first..self.capacity).map(|raw| raw as i32));
        tracing::debug!("entity pool expanded by {} to {}", amount, self.capacity);
    }
}

/// Largest growth from `current` ids that keeps every id within `i32`.
#[allow(clippy::cast_sign_loss)]
const fn clamp_growth(current: u32, amount: u32) -> u32 {
    let room = (i32::MAX as u32).saturating_sub(current);
    if amount < room {
        amount
    } else {
        room
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sequential_ids() {
        let mut registry = EntityRegistry::new(3);
        let ids: Vec<i32> = (0..3).map(|_| registry.create_entity().id.raw()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(registry.alive_count(), 3);
        assert_eq!(registry.available(), 0);
    }

    #[test]
    fn test_exhaustion_returns_sentinel() {
        let mut registry = EntityRegistry::new(1);
        assert!(registry.create_entity().is_valid());

        let exhausted = registry.create_entity();
        assert_eq!(exhausted.id, EntityId::INVALID);
        assert_eq!(exhausted.id.raw(), -1);
        assert!(exhausted.component_mask.is_empty());
    }

    #[test]
    fn test_remove_resets_and_recycles_fifo() {
        let mut registry = EntityRegistry::new(2);
        let mut e0 = registry.create_entity();
        let _e1 = registry.create_entity();
        e0.component_mask.set(4);

        assert!(registry.remove_entity(&mut e0));
        assert_eq!(e0, Entity::INVALID);
        assert!(!registry.is_alive(EntityId::new(0)));

        let reused = registry.create_entity();
        assert_eq!(reused.id.raw(), 0);
        assert!(reused.component_mask.is_empty());
    }

    #[test]
    fn test_double_remove_does_not_duplicate_pool() {
        let mut registry = EntityRegistry::new(1);
        let mut e = registry.create_entity();
        let mut stale_copy = e;

        assert!(registry.remove_entity(&mut e));
        assert!(!registry.remove_entity(&mut stale_copy));
        let mut invalid = Entity::INVALID;
        assert!(!registry.remove_entity(&mut invalid));
        assert_eq!(registry.available(), 1);
    }

    #[test]
    fn test_expand() {
        let mut registry = EntityRegistry::new(1);
        let _ = registry.create_entity();
        assert!(!registry.create_entity().is_valid());

        registry.expand(2);
        assert_eq!(registry.capacity(), 3);
        assert_eq!(registry.create_entity().id.raw(), 1);
        assert_eq!(registry.create_entity().id.raw(), 2);
        assert!(!registry.create_entity().is_valid());
    }

    #[test]
    fn test_recycled_ids_queue_behind_fresh_ones() {
        let mut registry = EntityRegistry::new(3);
        let mut e0 = registry.create_entity();
        registry.remove_entity(&mut e0);

        assert_eq!(registry.create_entity().id.raw(), 1);
        assert_eq!(registry.create_entity().id.raw(), 2);
        assert_eq!(registry.create_entity().id.raw(), 0);
    }

    #[test]
    fn test_growth_clamped_to_id_range() {
        let max = i32::MAX as u32;
        assert_eq!(clamp_growth(0, 16), 16);
        assert_eq!(clamp_growth(0, u32::MAX), max);
        assert_eq!(clamp_growth(max - 4, 10), 4);
        assert_eq!(clamp_growth(max, 1), 0);
    }
}
