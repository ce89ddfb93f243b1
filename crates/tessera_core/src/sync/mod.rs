//! # Shared ECS Access
//!
//! [`SharedEcs`] wraps an [`Ecs`] in a reader/writer lock so several threads
//! can inspect it while one ticks it.
//!
//! ```text
//! Logic thread:   write() -> create / register / update
//! Other threads:  read()  -> query components, inspect systems
//! ```

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ecs::{Ecs, TickReport};

/// Cloneable handle to an [`Ecs`] behind a [`RwLock`].
#[derive(Clone)]
pub struct SharedEcs {
    inner: Arc<RwLock<Ecs>>,
}

impl SharedEcs {
    /// Wraps `ecs` for shared access.
    #[must_use]
    pub fn new(ecs: Ecs) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ecs)),
        }
    }

    /// Shared access. Blocks while a writer holds the lock.
    pub fn read(&self) -> RwLockReadGuard<'_, Ecs> {
        self.inner.read()
    }

    /// Exclusive access. Blocks until all readers are gone.
    pub fn write(&self) -> RwLockWriteGuard<'_, Ecs> {
        self.inner.write()
    }

    /// Runs one tick under the write lock.
    pub fn tick(&self) -> TickReport {
        self.inner.write().update()
    }

    /// Number of handles sharing this ECS.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}
