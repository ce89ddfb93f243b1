//! # Systems
//!
//! A system owns a fixed required [`ComponentMask`] and a dynamic set of
//! bound entities. Once per tick it walks its bound set and reads/writes
//! components through the [`ComponentRegistry`].
//!
//! Concrete systems embed a [`SystemBase`] and implement [`System`]:
//!
//! ```rust
//! use tessera_core::{Component, ComponentMask, ComponentRegistry, System, SystemBase};
//!
//! #[derive(Clone, Copy)]
//! struct Health(i32);
//! impl Component for Health {
//!     const ID: u8 = 0;
//! }
//!
//! struct Regeneration {
//!     base: SystemBase,
//! }
//!
//! impl Regeneration {
//!     fn new() -> Self {
//!         Self { base: SystemBase::new(ComponentMask::from_ids(&[Health::ID])) }
//!     }
//! }
//!
//! impl System for Regeneration {
//!     fn base(&self) -> &SystemBase {
//!         &self.base
//!     }
//!
//!     fn base_mut(&mut self) -> &mut SystemBase {
//!         &mut self.base
//!     }
//!
//!     fn update(&mut self, components: &mut ComponentRegistry) {
//!         for entity in self.base.entities() {
//!             components.get_fast_mut::<Health>(entity).0 += 1;
//!         }
//!     }
//! }
//! ```

use std::any::Any;

use super::entity::{Entity, EntityId};
use super::mask::ComponentMask;
use super::registry::ComponentRegistry;
use super::storage::DenseStore;
use crate::error::{EcsError, EcsResult};

/// Required mask plus the set of bound entities.
#[derive(Clone, Debug, Default)]
pub struct SystemBase {
    /// Components every bound entity must carry.
    required: ComponentMask,
    /// Copies of the bound entities, keyed by id.
    bound: DenseStore<Entity>,
}

impl SystemBase {
    /// Creates a base that requires every bit in `required`.
    #[must_use]
    pub fn new(required: ComponentMask) -> Self {
        Self {
            required,
            bound: DenseStore::new(),
        }
    }

    /// Components every bound entity must carry.
    #[inline]
    #[must_use]
    pub const fn required_mask(&self) -> ComponentMask {
        self.required
    }

    /// Checks if `entity` carries every required component.
    #[inline]
    #[must_use]
    pub const fn accepts(&self, entity: &Entity) -> bool {
        entity.component_mask.contains_all(self.required)
    }

    /// Binds `entity` after checking it carries every required component.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity has no id
    /// - [`EcsError::MaskMismatch`] if a required component is missing
    /// - [`EcsError::AlreadyBound`] if the entity is already bound
    pub fn bind(&mut self, entity: &Entity) -> EcsResult<()> {
        if !entity.is_valid() {
            return Err(EcsError::InvalidEntity);
        }
        let missing = entity.component_mask.missing(self.required);
        if !missing.is_empty() {
            tracing::warn!(
                "refusing to bind entity {}: missing components {}",
                entity.id,
                missing
            );
            return Err(EcsError::MaskMismatch {
                entity: entity.id,
                missing,
            });
        }
        self.bind_fast(entity)
    }

    /// Binds `entity` without checking its mask.
    ///
    /// The caller guarantees the entity carries every required component;
    /// systems typically read bound entities through
    /// [`ComponentRegistry::get_fast`], which panics otherwise.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity has no id
    /// - [`EcsError::AlreadyBound`] if the entity is already bound
    pub fn bind_fast(&mut self, entity: &Entity) -> EcsResult<()> {
        match self.bound.insert(entity.id, *entity) {
            Ok(_) => Ok(()),
            Err(EcsError::DuplicateId(id)) => Err(EcsError::AlreadyBound(id)),
            Err(err) => Err(err),
        }
    }

    /// Unbinds `entity`. No-op if it is not bound.
    ///
    /// # Returns
    ///
    /// `true` if the entity was bound.
    pub fn unbind(&mut self, entity: &Entity) -> bool {
        self.bound.remove(entity.id).is_some()
    }

    /// Unbinds every entity.
    pub fn remove_entities(&mut self) {
        self.bound.clear();
    }

    /// Bound entities in dense order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.bound.as_slice()
    }

    /// Checks if `id` is bound.
    #[inline]
    #[must_use]
    pub fn is_bound(&self, id: EntityId) -> bool {
        self.bound.contains(id)
    }

    /// Number of bound entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Returns `true` if nothing is bound.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// Downcasting support for boxed systems.
pub trait AsAny: Any {
    /// Upcasts to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Upcasts to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of per-tick logic over a set of bound entities.
///
/// Implementors provide access to their [`SystemBase`] and the tick logic;
/// binding is provided.
pub trait System: AsAny + Send + Sync {
    /// Shared access to the embedded base.
    fn base(&self) -> &SystemBase;

    /// Mutable access to the embedded base.
    fn base_mut(&mut self) -> &mut SystemBase;

    /// Runs one tick over the bound entities.
    fn update(&mut self, components: &mut ComponentRegistry);

    /// Name used in tick reports and logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Components every bound entity must carry.
    fn required_mask(&self) -> ComponentMask {
        self.base().required_mask()
    }

    /// See [`SystemBase::bind`].
    ///
    /// # Errors
    ///
    /// Same as [`SystemBase::bind`].
    fn bind(&mut self, entity: &Entity) -> EcsResult<()> {
        self.base_mut().bind(entity)
    }

    /// See [`SystemBase::bind_fast`].
    ///
    /// # Errors
    ///
    /// Same as [`SystemBase::bind_fast`].
    fn bind_fast(&mut self, entity: &Entity) -> EcsResult<()> {
        self.base_mut().bind_fast(entity)
    }

    /// See [`SystemBase::unbind`].
    fn unbind(&mut self, entity: &Entity) -> bool {
        self.base_mut().unbind(entity)
    }

    /// See [`SystemBase::remove_entities`].
    fn remove_entities(&mut self) {
        self.base_mut().remove_entities();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(raw: i32, bits: &[u8]) -> Entity {
        Entity {
            id: EntityId::new(raw),
            component_mask: ComponentMask::from_ids(bits),
        }
    }

    #[test]
    fn test_bind_requires_superset() {
        let mut base = SystemBase::new(ComponentMask::from_ids(&[1, 2]));

        assert!(base.bind(&entity(0, &[0, 1, 2])).is_ok());
        assert_eq!(
            base.bind(&entity(1, &[1])),
            Err(EcsError::MaskMismatch {
                entity: EntityId::new(1),
                missing: ComponentMask::from_ids(&[2]),
            })
        );

        assert_eq!(base.len(), 1);
        assert!(base.is_bound(EntityId::new(0)));
        assert!(!base.is_bound(EntityId::new(1)));
    }

    #[test]
    fn test_empty_requirement_accepts_everything() {
        let mut base = SystemBase::default();
        assert!(base.bind(&entity(3, &[])).is_ok());
        assert_eq!(base.bind(&Entity::INVALID), Err(EcsError::InvalidEntity));
    }

    #[test]
    fn test_duplicate_bind_rejected() {
        let mut base = SystemBase::new(ComponentMask::from_ids(&[0]));
        let e = entity(4, &[0]);

        base.bind(&e).unwrap();
        assert_eq!(base.bind(&e), Err(EcsError::AlreadyBound(e.id)));
        assert_eq!(base.bind_fast(&e), Err(EcsError::AlreadyBound(e.id)));
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_bind_fast_skips_mask_check() {
        let mut base = SystemBase::new(ComponentMask::from_ids(&[5]));
        assert!(base.bind_fast(&entity(0, &[])).is_ok());
        assert!(base.is_bound(EntityId::new(0)));
    }

    #[test]
    fn test_unbind_and_remove_entities() {
        let mut base = SystemBase::default();
        let a = entity(0, &[]);
        let b = entity(1, &[]);
        base.bind(&a).unwrap();
        base.bind(&b).unwrap();

        assert!(base.unbind(&a));
        assert!(!base.unbind(&a));
        assert_eq!(base.entities(), &[b]);

        base.remove_entities();
        assert!(base.is_empty());
    }

    struct Counter {
        base: SystemBase,
        ticks: u32,
    }

    impl System for Counter {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }

        fn update(&mut self, _components: &mut ComponentRegistry) {
            self.ticks += 1;
        }
    }

    #[test]
    fn test_trait_delegates_to_base() {
        let mut counter = Counter {
            base: SystemBase::new(ComponentMask::from_ids(&[0])),
            ticks: 0,
        };

        assert!(counter.bind(&entity(0, &[])).is_err());
        assert!(System::bind(&mut counter, &entity(0, &[0])).is_ok());
        assert_eq!(counter.required_mask(), ComponentMask::from_ids(&[0]));
        assert!(counter.name().ends_with("Counter"));

        counter.update(&mut ComponentRegistry::new());
        assert_eq!(counter.ticks, 1);

        let boxed: Box<dyn System> = Box::new(counter);
        let system: &dyn System = &*boxed;
        assert!(system.as_any().downcast_ref::<Counter>().is_some());
    }
}
