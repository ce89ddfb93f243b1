//! # ECS Facade
//!
//! [`Ecs`] owns the entity pool, the component registry and the systems, and
//! coordinates full-entity teardown.

use std::time::{Duration, Instant};

use super::component::Component;
use super::entity::{Entity, EntityRegistry};
use super::registry::ComponentRegistry;
use super::system::System;
use crate::config::EcsConfig;
use crate::error::{EcsError, EcsResult};

/// Timing for one system within a tick.
#[derive(Clone, Debug)]
pub struct SystemRunReport {
    /// The system's name.
    pub name: &'static str,
    /// Entities bound when the system ran.
    pub entities: usize,
    /// Wall time spent in `update`.
    pub duration: Duration,
}

/// Outcome of one [`Ecs::update`] call.
#[derive(Clone, Debug)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// One entry per system, in update order.
    pub systems: Vec<SystemRunReport>,
}

impl TickReport {
    /// Sum of all system durations.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.systems.iter().map(|report| report.duration).sum()
    }
}

/// The ECS - container for entities, components and systems.
///
/// Systems run in the order they were added.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Component, Ecs};
///
/// struct Marker;
/// impl Component for Marker {
///     const ID: u8 = 0;
/// }
///
/// let mut ecs = Ecs::new(2);
/// ecs.declare::<Marker>().unwrap();
///
/// let mut e = ecs.create_entity();
/// ecs.components_mut().register(&mut e, Marker).unwrap();
///
/// ecs.obliterate_entity(&mut e);
/// assert!(!e.is_valid());
/// assert_eq!(ecs.components().len_of::<Marker>(), 0);
/// ```
pub struct Ecs {
    /// Entity id pool.
    entities: EntityRegistry,
    /// Component stores.
    components: ComponentRegistry,
    /// Systems in update order.
    systems: Vec<Box<dyn System>>,
    /// Ids added when the pool runs dry.
    grow_by: u32,
    /// Completed ticks.
    tick: u64,
}

impl Ecs {
    /// Creates an ECS with `max_entities` ids and a fixed-size pool.
    ///
    /// The pool is truncated to `i32::MAX` ids.
    #[must_use]
    pub fn new(max_entities: u32) -> Self {
        Self {
            entities: EntityRegistry::new(max_entities),
            components: ComponentRegistry::new(),
            systems: Vec::new(),
            grow_by: 0,
            tick: 0,
        }
    }

    /// Creates an ECS from settings.
    ///
    /// Out-of-range capacities are truncated as in [`Ecs::new`];
    /// [`EcsConfig::validate`] reports them instead.
    #[must_use]
    pub fn from_config(config: &EcsConfig) -> Self {
        let mut ecs = Self::new(config.max_entities);
        ecs.grow_by = config.grow_by;
        ecs
    }

    /// The entity pool.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// The entity pool, mutably.
    #[inline]
    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    /// The component registry.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// The component registry, mutably.
    #[inline]
    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// Declares component kind `C`.
    ///
    /// # Errors
    ///
    /// See [`ComponentRegistry::declare`].
    pub fn declare<C: Component>(&mut self) -> EcsResult<()> {
        self.components.declare::<C>()
    }

    /// Creates an entity, growing the pool first if configured to.
    ///
    /// # Returns
    ///
    /// The new entity, or [`Entity::INVALID`] if no id is available.
    pub fn create_entity(&mut self) -> Entity {
        let mut entity = self.entities.create_entity();
        if !entity.is_valid() && self.grow_by > 0 {
            self.entities.expand(self.grow_by);
            entity = self.entities.create_entity();
        }
        if entity.is_valid() {
            tracing::debug!("created entity {}", entity.id);
        }
        entity
    }

    /// Attaches a component to `entity`.
    ///
    /// # Errors
    ///
    /// See [`ComponentRegistry::register`].
    pub fn register<C: Component>(&mut self, entity: &mut Entity, value: C) -> EcsResult<&mut C> {
        self.components.register(entity, value)
    }

    /// Appends a system to the update order.
    pub fn add_system<S: System>(&mut self, system: S) {
        tracing::debug!("added system {}", system.name());
        self.systems.push(Box::new(system));
    }

    /// Builder-style [`add_system`](Self::add_system).
    #[must_use]
    pub fn with_system<S: System>(mut self, system: S) -> Self {
        self.add_system(system);
        self
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// The first system of type `S`.
    #[must_use]
    pub fn system<S: System>(&self) -> Option<&S> {
        self.systems.iter().find_map(|boxed| {
            let system: &dyn System = &**boxed;
            system.as_any().downcast_ref::<S>()
        })
    }

    /// The first system of type `S`, mutably.
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems.iter_mut().find_map(|boxed| {
            let system: &mut dyn System = &mut **boxed;
            system.as_any_mut().downcast_mut::<S>()
        })
    }

    fn require_system<S: System>(&mut self) -> EcsResult<&mut S> {
        self.system_mut::<S>()
            .ok_or(EcsError::SystemNotFound(std::any::type_name::<S>()))
    }

    /// Binds `entity` to system `S` after checking its mask.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemNotFound`], or see [`SystemBase::bind`](super::SystemBase::bind).
    pub fn bind<S: System>(&mut self, entity: &Entity) -> EcsResult<()> {
        self.require_system::<S>()?.bind(entity)
    }

    /// Binds `entity` to system `S` without checking its mask.
    ///
    /// # Errors
    ///
    /// [`EcsError::SystemNotFound`], or see
    /// [`SystemBase::bind_fast`](super::SystemBase::bind_fast).
    pub fn bind_fast<S: System>(&mut self, entity: &Entity) -> EcsResult<()> {
        self.require_system::<S>()?.bind_fast(entity)
    }

    /// Unbinds `entity` from system `S`.
    ///
    /// # Returns
    ///
    /// `true` if the system exists and the entity was bound to it.
    pub fn unbind<S: System>(&mut self, entity: &Entity) -> bool {
        self.system_mut::<S>()
            .is_some_and(|system| system.unbind(entity))
    }

    /// Binds `entity` to every system whose required mask it satisfies.
    ///
    /// Systems already holding the entity are skipped.
    ///
    /// # Returns
    ///
    /// Number of systems the entity was newly bound to.
    pub fn bind_matching(&mut self, entity: &Entity) -> usize {
        if !entity.is_valid() {
            return 0;
        }
        let mut bound = 0;
        for system in &mut self.systems {
            let base = system.base_mut();
            if base.accepts(entity) && !base.is_bound(entity.id) && base.bind(entity).is_ok() {
                bound += 1;
            }
        }
        bound
    }

    /// Removes the entity and everything linked to it.
    ///
    /// Every component is removed, the entity is unbound from every system,
    /// and its id returns to the pool. The caller's copy is reset to
    /// [`Entity::INVALID`].
    ///
    /// Teardown is keyed by id, so a copy with an outdated mask still
    /// releases every component. Ids carry no generation: once the id has
    /// been handed out again, obliterating an older copy tears down the new
    /// owner instead.
    pub fn obliterate_entity(&mut self, entity: &mut Entity) {
        let id = entity.id;
        let components = self.components.remove_all(entity);
        let mut systems = 0;
        for system in &mut self.systems {
            if system.unbind(entity) {
                systems += 1;
            }
        }
        self.entities.remove_entity(entity);
        tracing::debug!(
            "obliterated entity {} ({} components, {} systems)",
            id,
            components,
            systems
        );
    }

    /// Runs every system once, in insertion order.
    pub fn update(&mut self) -> TickReport {
        self.tick += 1;
        let mut systems = Vec::with_capacity(self.systems.len());

        for system in &mut self.systems {
            let entities = system.base().len();
            let start = Instant::now();
            system.update(&mut self.components);
            let duration = start.elapsed();
            tracing::trace!(
                "tick {}: {} over {} entities in {:?}",
                self.tick,
                system.name(),
                entities,
                duration
            );
            systems.push(SystemRunReport {
                name: system.name(),
                entities,
                duration,
            });
        }

        TickReport {
            tick: self.tick,
            systems,
        }
    }

    /// Number of completed ticks.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ComponentMask, SystemBase};

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Position {
        x: f32,
    }
    impl Component for Position {
        const ID: u8 = 0;
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Velocity {
        x: f32,
    }
    impl Component for Velocity {
        const ID: u8 = 1;
    }

    struct Movement {
        base: SystemBase,
    }

    impl Movement {
        fn new() -> Self {
            Self {
                base: SystemBase::new(ComponentMask::from_ids(&[Position::ID, Velocity::ID])),
            }
        }
    }

    impl System for Movement {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }

        fn update(&mut self, components: &mut ComponentRegistry) {
            for entity in self.base.entities() {
                let vel = *components.get_fast::<Velocity>(entity);
                components.get_fast_mut::<Position>(entity).x += vel.x;
            }
        }
    }

    struct Census {
        base: SystemBase,
    }

    impl System for Census {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }

        fn update(&mut self, _components: &mut ComponentRegistry) {}
    }

    fn world() -> Ecs {
        let mut ecs = Ecs::new(8)
            .with_system(Movement::new())
            .with_system(Census {
                base: SystemBase::new(ComponentMask::from_ids(&[Position::ID])),
            });
        ecs.declare::<Position>().unwrap();
        ecs.declare::<Velocity>().unwrap();
        ecs
    }

    #[test]
    fn test_world_creation() {
        let ecs = world();
        assert_eq!(ecs.entities().capacity(), 8);
        assert_eq!(ecs.system_count(), 2);
        assert_eq!(ecs.tick_count(), 0);
        assert!(ecs.system::<Movement>().is_some());
    }

    #[test]
    fn test_update_moves_bound_entities() {
        let mut ecs = world();
        let mut e = ecs.create_entity();
        ecs.register(&mut e, Position { x: 0.0 }).unwrap();
        ecs.register(&mut e, Velocity { x: 2.0 }).unwrap();
        ecs.bind::<Movement>(&e).unwrap();

        let report = ecs.update();
        ecs.update();

        assert_eq!(report.tick, 1);
        assert_eq!(report.systems.len(), 2);
        assert_eq!(report.systems[0].entities, 1);
        assert!(report.systems[0].name.ends_with("Movement"));
        assert_eq!(ecs.components().get::<Position>(&e), Some(&Position { x: 4.0 }));
        assert_eq!(ecs.tick_count(), 2);
    }

    #[test]
    fn test_bind_errors() {
        let mut ecs = Ecs::new(2);
        let e = ecs.create_entity();
        assert!(matches!(
            ecs.bind::<Movement>(&e),
            Err(EcsError::SystemNotFound(_))
        ));
        assert!(!ecs.unbind::<Movement>(&e));

        let mut ecs = world();
        let e = ecs.create_entity();
        assert!(matches!(
            ecs.bind::<Movement>(&e),
            Err(EcsError::MaskMismatch { .. })
        ));
        assert!(ecs.bind_fast::<Movement>(&e).is_ok());
        assert!(ecs.unbind::<Movement>(&e));
    }

    #[test]
    fn test_bind_matching() {
        let mut ecs = world();
        let mut e = ecs.create_entity();
        ecs.register(&mut e, Position { x: 0.0 }).unwrap();

        assert_eq!(ecs.bind_matching(&e), 1);
        assert!(ecs.system::<Census>().unwrap().base().is_bound(e.id));

        ecs.register(&mut e, Velocity { x: 1.0 }).unwrap();
        assert_eq!(ecs.bind_matching(&e), 1);
        assert_eq!(ecs.bind_matching(&e), 0);
        assert_eq!(ecs.bind_matching(&Entity::INVALID), 0);
    }

    #[test]
    fn test_obliterate_releases_everything() {
        let mut ecs = world();
        let mut e = ecs.create_entity();
        let id = e.id;
        ecs.register(&mut e, Position { x: 1.0 }).unwrap();
        ecs.register(&mut e, Velocity { x: 1.0 }).unwrap();
        ecs.bind_matching(&e);

        ecs.obliterate_entity(&mut e);

        assert_eq!(e, Entity::INVALID);
        assert!(!ecs.entities().is_alive(id));
        assert_eq!(ecs.components().len_of::<Position>(), 0);
        assert_eq!(ecs.components().len_of::<Velocity>(), 0);
        assert!(ecs.system::<Movement>().unwrap().base().is_empty());
        assert!(ecs.system::<Census>().unwrap().base().is_empty());

        // Bound sets are empty, so a tick cannot touch the removed components
        let report = ecs.update();
        assert!(report.systems.iter().all(|s| s.entities == 0));
    }

    #[test]
    fn test_grow_on_exhaustion() {
        let mut fixed = Ecs::new(1);
        assert!(fixed.create_entity().is_valid());
        assert!(!fixed.create_entity().is_valid());

        let mut growing = Ecs::from_config(&EcsConfig {
            max_entities: 1,
            grow_by: 4,
        });
        assert!(growing.create_entity().is_valid());
        assert_eq!(growing.create_entity().id.raw(), 1);
        assert_eq!(growing.entities().capacity(), 5);
    }
}
