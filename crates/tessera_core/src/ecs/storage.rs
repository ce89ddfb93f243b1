//! # Dense Component Storage
//!
//! One value per live id, packed into a contiguous array.
//!
//! The storage keeps two translation tables next to the dense array:
//! - `id_to_index`: entity id → position in the array
//! - `index_to_id`: position → entity id
//!
//! ```text
//! objects:      [ A  | B  | C  ]
//! index_to_id:  [ 7  | 2  | 9  ]
//! id_to_index:  { 7: 0, 2: 1, 9: 2 }
//!
//! remove(7):    C is moved into slot 0, 9 is re-pointed to 0
//!
//! objects:      [ C  | B  ]
//! index_to_id:  [ 9  | 2  ]
//! id_to_index:  { 9: 0, 2: 1 }
//! ```
//!
//! Insert, remove and lookup are O(1). Iteration walks the dense array.
//! Removal reorders elements, so positions are never stable.

use std::collections::HashMap;

use super::entity::EntityId;
use crate::error::{EcsError, EcsResult};

/// Dense, swap-remove storage keyed by entity id.
///
/// # Type Parameters
///
/// * `T` - The value type to store
///
/// # Example
///
/// ```rust
/// use tessera_core::{DenseStore, EntityId};
///
/// let mut store = DenseStore::new();
/// store.insert(EntityId::new(4), "four").unwrap();
/// store.insert(EntityId::new(9), "nine").unwrap();
///
/// store.remove(EntityId::new(4));
/// assert_eq!(store.get(EntityId::new(9)), Some(&"nine"));
/// assert_eq!(store.as_slice(), &["nine"]);
/// ```
#[derive(Clone, Debug)]
pub struct DenseStore<T> {
    /// The dense array of values.
    objects: Vec<T>,
    /// Entity id → position in `objects`.
    id_to_index: HashMap<EntityId, usize>,
    /// Position in `objects` → entity id.
    index_to_id: Vec<EntityId>,
}

impl<T> DenseStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            id_to_index: HashMap::new(),
            index_to_id: Vec::new(),
        }
    }

    /// Creates an empty store with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
            id_to_index: HashMap::with_capacity(capacity),
            index_to_id: Vec::with_capacity(capacity),
        }
    }

    /// Reserves room for `additional` more values.
    pub fn reserve(&mut self, additional: usize) {
        self.objects.reserve(additional);
        self.id_to_index.reserve(additional);
        self.index_to_id.reserve(additional);
    }

    /// Returns the number of stored values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Checks if a value is stored for `id`.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    /// Appends a value for `id`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if `id` is the invalid sentinel
    /// - [`EcsError::DuplicateId`] if `id` is already present; the stored
    ///   value is left untouched
    ///
    /// # Returns
    ///
    /// Mutable reference to the stored value.
    pub fn insert(&mut self, id: EntityId, value: T) -> EcsResult<&mut T> {
        if id.is_invalid() {
            return Err(EcsError::InvalidEntity);
        }
        if self.id_to_index.contains_key(&id) {
            return Err(EcsError::DuplicateId(id));
        }

        let index = self.objects.len();
        self.objects.push(value);
        self.id_to_index.insert(id, index);
        self.index_to_id.push(id);

        Ok(&mut self.objects[index])
    }

    /// Removes the value for `id` by swapping the last value into its slot.
    ///
    /// Removing an absent id is a no-op.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if `id` was not present.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = self.id_to_index.remove(&id)?;
        let last = self.objects.len() - 1;

        let value = self.objects.swap_remove(index);
        self.index_to_id.swap_remove(index);

        // The former last element now lives at `index`
        if index != last {
            let moved = self.index_to_id[index];
            self.id_to_index.insert(moved, index);
        }

        Some(value)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.id_to_index.clear();
        self.index_to_id.clear();
    }

    /// Gets the value for `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        let index = *self.id_to_index.get(&id)?;
        self.objects.get(index)
    }

    /// Gets the value for `id` mutably.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let index = *self.id_to_index.get(&id)?;
        self.objects.get_mut(index)
    }

    /// Gets the value for `id` without an `Option` wrapper.
    ///
    /// Use only when presence is already known, e.g. from an entity mask.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present.
    #[inline]
    #[must_use]
    pub fn get_fast(&self, id: EntityId) -> &T {
        &self.objects[self.id_to_index[&id]]
    }

    /// Mutable variant of [`get_fast`](Self::get_fast).
    ///
    /// # Panics
    ///
    /// Panics if `id` is not present.
    #[inline]
    pub fn get_fast_mut(&mut self, id: EntityId) -> &mut T {
        let index = self.id_to_index[&id];
        &mut self.objects[index]
    }

    /// Position of `id` in the dense array.
    ///
    /// Positions change on removal; do not keep them across mutations.
    #[inline]
    #[must_use]
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    /// Id stored at a dense position.
    #[inline]
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<EntityId> {
        self.index_to_id.get(index).copied()
    }

    /// Ids in dense order.
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.index_to_id
    }

    /// Returns a slice of all values in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.objects
    }

    /// Returns a mutable slice of all values.
    ///
    /// Useful for batch processing.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.objects
    }

    /// Iterates over all values with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.index_to_id.iter().copied().zip(self.objects.iter())
    }

    /// Iterates mutably over all values with their ids.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.index_to_id.iter().copied().zip(self.objects.iter_mut())
    }
}

impl<T: bytemuck::Pod> DenseStore<T> {
    /// Raw byte view of the dense array.
    ///
    /// Handy for bulk copies (GPU upload, snapshots) of plain-old-data
    /// components.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.objects)
    }
}

impl<T> Default for DenseStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
