//! # Entity Component System
//!
//! A small ECS built from dense, index-addressed storage.
//!
//! ## Design
//!
//! - Entity ids are plain integers recycled through a FIFO pool
//! - Each component kind lives in its own [`DenseStore`], packed for iteration
//! - An entity's [`ComponentMask`] always matches the stores holding its data
//! - Systems bind entities whose mask covers their requirement

mod component;
mod entity;
mod mask;
mod registry;
mod storage;
mod system;
mod world;

pub use component::Component;
pub use entity::{Entity, EntityId, EntityRegistry};
pub use mask::ComponentMask;
pub use registry::ComponentRegistry;
pub use storage::DenseStore;
pub use system::{AsAny, System, SystemBase};
pub use world::{Ecs, SystemRunReport, TickReport};
