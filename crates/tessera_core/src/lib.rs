//! # Tessera Core
//!
//! A minimal Entity Component System (ECS) scaffold:
//! - Entity ids drawn from a fixed-capacity FIFO pool
//! - One dense, swap-remove store per component kind
//! - Bitmask bookkeeping that always mirrors the stores
//! - Systems that bind the entities they care about
//!
//! ## Architecture Rules
//!
//! 1. **Masks never lie** - a set bit means the matching store holds data
//! 2. **Dense storage** - components of one kind are contiguous, no holes
//! 3. **Uniform teardown** - removing an entity never enumerates kinds by hand
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{Component, Ecs, Entity};
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! struct A(u32);
//! impl Component for A {
//!     const ID: u8 = 0;
//! }
//!
//! let mut ecs = Ecs::new(2);
//! ecs.declare::<A>().unwrap();
//!
//! let mut e0 = ecs.create_entity();
//! let e1 = ecs.create_entity();
//! assert_eq!((e0.id.raw(), e1.id.raw()), (0, 1));
//! assert_eq!(ecs.create_entity(), Entity::INVALID);
//!
//! ecs.register(&mut e0, A(7)).unwrap();
//! ecs.obliterate_entity(&mut e0);
//! assert_eq!(ecs.components().len_of::<A>(), 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod sync;

pub use config::EcsConfig;
pub use ecs::{
    AsAny, Component, ComponentMask, ComponentRegistry, DenseStore, Ecs, Entity, EntityId,
    EntityRegistry, System, SystemBase, SystemRunReport, TickReport,
};
pub use error::{ConfigError, EcsError, EcsResult};
pub use sync::SharedEcs;
