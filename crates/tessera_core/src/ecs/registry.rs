//! # Component Registry
//!
//! One [`DenseStore`] per declared component kind, looked up by `TypeId`.
//!
//! Every attach/detach goes through the registry so that the entity's
//! [`ComponentMask`] and the stores never disagree: bit `C::ID` is set on the
//! entity exactly when the store for `C` holds a value for its id.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::component::Component;
use super::entity::{Entity, EntityId};
use super::mask::ComponentMask;
use super::storage::DenseStore;
use crate::error::{EcsError, EcsResult};

/// Type-erased view of a `DenseStore<C>`, used for teardown.
trait ErasedStore: Send + Sync {
    fn remove_id(&mut self, id: EntityId) -> bool;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for DenseStore<C> {
    fn remove_id(&mut self, id: EntityId) -> bool {
        self.remove(id).is_some()
    }

    fn clear(&mut self) {
        DenseStore::clear(self);
    }

    fn len(&self) -> usize {
        DenseStore::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Which kind owns a mask bit.
#[derive(Clone, Copy)]
struct KindSlot {
    type_id: TypeId,
    name: &'static str,
}

/// Typed access to every component store.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Component, ComponentRegistry, EntityRegistry};
///
/// #[derive(Debug, PartialEq)]
/// struct Health(u32);
/// impl Component for Health {
///     const ID: u8 = 0;
/// }
///
/// let mut entities = EntityRegistry::new(8);
/// let mut components = ComponentRegistry::new();
/// components.declare::<Health>().unwrap();
///
/// let mut player = entities.create_entity();
/// components.register(&mut player, Health(100)).unwrap();
/// assert!(player.has_component(Health::ID));
/// assert_eq!(components.get::<Health>(&player), Some(&Health(100)));
/// ```
pub struct ComponentRegistry {
    /// Stores keyed by component type.
    stores: HashMap<TypeId, Box<dyn ErasedStore>>,
    /// Mask bit → owning kind.
    kinds: Vec<Option<KindSlot>>,
    /// Bits owned by declared kinds.
    declared: ComponentMask,
}

impl ComponentRegistry {
    /// Creates a registry with no declared kinds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stores: HashMap::new(),
            kinds: vec![None; ComponentMask::CAPACITY],
            declared: ComponentMask::EMPTY,
        }
    }

    /// Declares component kind `C`, creating its store.
    ///
    /// Declaring the same kind twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`EcsError::ComponentIdOutOfRange`] if `C::ID` does not fit in a mask
    /// - [`EcsError::ComponentIdConflict`] if another kind owns `C::ID`
    pub fn declare<C: Component>(&mut self) -> EcsResult<()> {
        let bit = usize::from(C::ID);
        if bit >= ComponentMask::CAPACITY {
            return Err(EcsError::ComponentIdOutOfRange {
                kind: C::kind_name(),
                id: C::ID,
            });
        }

        match self.kinds[bit] {
            Some(slot) if slot.type_id == TypeId::of::<C>() => return Ok(()),
            Some(slot) => {
                return Err(EcsError::ComponentIdConflict {
                    id: C::ID,
                    existing: slot.name,
                    incoming: C::kind_name(),
                })
            }
            None => {}
        }

        self.kinds[bit] = Some(KindSlot {
            type_id: TypeId::of::<C>(),
            name: C::kind_name(),
        });
        self.stores
            .insert(TypeId::of::<C>(), Box::new(DenseStore::<C>::new()));
        self.declared.set(C::ID);
        tracing::debug!("declared component {} on bit {}", C::kind_name(), C::ID);
        Ok(())
    }

    /// Checks if `C` has been declared.
    #[must_use]
    pub fn is_declared<C: Component>(&self) -> bool {
        self.stores.contains_key(&TypeId::of::<C>())
    }

    /// Bits owned by declared kinds.
    #[inline]
    #[must_use]
    pub const fn declared_mask(&self) -> ComponentMask {
        self.declared
    }

    /// Name of the kind declared on `bit`.
    #[must_use]
    pub fn kind_name(&self, bit: u8) -> Option<&'static str> {
        self.kinds.get(usize::from(bit))?.map(|slot| slot.name)
    }

    /// Attaches a `C` to `entity` and sets its mask bit.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity has no id
    /// - [`EcsError::DuplicateComponent`] if the entity already has a `C`;
    ///   the existing value is kept
    /// - [`EcsError::UndeclaredComponent`] if `C` was never declared
    ///
    /// # Returns
    ///
    /// Mutable reference to the stored component.
    pub fn register<C: Component>(&mut self, entity: &mut Entity, value: C) -> EcsResult<&mut C> {
        if !entity.is_valid() {
            return Err(EcsError::InvalidEntity);
        }
        if entity.has_component(C::ID) {
            return Err(EcsError::DuplicateComponent {
                entity: entity.id,
                kind: C::kind_name(),
            });
        }

        let store = self
            .store_mut::<C>()
            .ok_or(EcsError::UndeclaredComponent(C::kind_name()))?;
        let stored = store.insert(entity.id, value)?;
        entity.component_mask.set(C::ID);
        Ok(stored)
    }

    /// Detaches the entity's `C` and clears its mask bit.
    ///
    /// Nothing happens if the entity has no `C`.
    ///
    /// # Returns
    ///
    /// The removed component.
    pub fn remove<C: Component>(&mut self, entity: &mut Entity) -> Option<C> {
        if !entity.has_component(C::ID) {
            return None;
        }
        entity.component_mask.clear(C::ID);
        self.store_mut::<C>()?.remove(entity.id)
    }

    /// Gets the entity's `C`, or `None` if its mask bit is unset.
    #[must_use]
    pub fn get<C: Component>(&self, entity: &Entity) -> Option<&C> {
        if !entity.has_component(C::ID) {
            return None;
        }
        self.store::<C>()?.get(entity.id)
    }

    /// Gets the entity's `C` mutably, or `None` if its mask bit is unset.
    pub fn get_mut<C: Component>(&mut self, entity: &Entity) -> Option<&mut C> {
        if !entity.has_component(C::ID) {
            return None;
        }
        self.store_mut::<C>()?.get_mut(entity.id)
    }

    /// Gets the entity's `C` without checking its mask.
    ///
    /// Meant for hot loops where the caller already knows the entity has a
    /// `C`, e.g. a system iterating entities bound through a checked bind.
    ///
    /// # Panics
    ///
    /// Panics if `C` is undeclared or no `C` is stored for the entity.
    #[must_use]
    pub fn get_fast<C: Component>(&self, entity: &Entity) -> &C {
        match self.store::<C>() {
            Some(store) => store.get_fast(entity.id),
            None => panic!("component kind {} has not been declared", C::kind_name()),
        }
    }

    /// Mutable variant of [`get_fast`](Self::get_fast).
    ///
    /// # Panics
    ///
    /// Panics if `C` is undeclared or no `C` is stored for the entity.
    pub fn get_fast_mut<C: Component>(&mut self, entity: &Entity) -> &mut C {
        match self.store_mut::<C>() {
            Some(store) => store.get_fast_mut(entity.id),
            None => panic!("component kind {} has not been declared", C::kind_name()),
        }
    }

    /// The whole store for `C`, for bulk iteration.
    #[must_use]
    pub fn store<C: Component>(&self) -> Option<&DenseStore<C>> {
        self.stores
            .get(&TypeId::of::<C>())?
            .as_any()
            .downcast_ref::<DenseStore<C>>()
    }

    /// Mutable access to the whole store for `C`.
    ///
    /// Values may be edited freely; adding or removing entries here bypasses
    /// the entity masks.
    pub fn store_mut<C: Component>(&mut self) -> Option<&mut DenseStore<C>> {
        self.stores
            .get_mut(&TypeId::of::<C>())?
            .as_any_mut()
            .downcast_mut::<DenseStore<C>>()
    }

    /// Number of stored `C` components (0 if undeclared).
    #[must_use]
    pub fn len_of<C: Component>(&self) -> usize {
        self.stores
            .get(&TypeId::of::<C>())
            .map_or(0, |store| store.len())
    }

    /// Removes every component stored for the entity's id and resets its mask.
    ///
    /// Every declared store is checked, not only the bits set on `entity`,
    /// so a stale copy still releases everything held for the id.
    ///
    /// # Returns
    ///
    /// Number of components removed.
    pub fn remove_all(&mut self, entity: &mut Entity) -> usize {
        let mut removed = 0;
        if entity.is_valid() {
            for store in self.stores.values_mut() {
                if store.remove_id(entity.id) {
                    removed += 1;
                }
            }
        }
        entity.component_mask.reset();
        removed
    }

    /// Empties every store.
    ///
    /// Entity masks are not touched: every mask handed out before the clear
    /// is stale afterwards and must be reset by the caller (for example with
    /// [`ComponentMask::reset`]) before the entity is registered again.
    pub fn clear(&mut self) {
        for store in self.stores.values_mut() {
            store.clear();
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
