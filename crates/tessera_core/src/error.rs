//! # ECS Error Types
//!
//! All recoverable failures reported by the ECS. Fast-path accessors
//! (`get_fast`, `bind_fast`) do not report through these types; they panic.

use thiserror::Error;

use crate::ecs::{ComponentMask, EntityId};

/// Errors that can occur while mutating the ECS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity carries the invalid sentinel id.
    #[error("entity has no valid id")]
    InvalidEntity,

    /// A dense store already holds a value for this id.
    #[error("id {0} is already present in the store")]
    DuplicateId(EntityId),

    /// The entity already has a component of this kind.
    #[error("entity {entity} already has a {kind} component")]
    DuplicateComponent {
        /// The entity that was targeted.
        entity: EntityId,
        /// Type name of the component kind.
        kind: &'static str,
    },

    /// The component kind was never declared on the registry.
    #[error("component kind {0} has not been declared")]
    UndeclaredComponent(&'static str),

    /// The component's bit does not fit in a [`ComponentMask`].
    #[error("component kind {kind} uses bit {id}, mask holds {} bits", ComponentMask::CAPACITY)]
    ComponentIdOutOfRange {
        /// Type name of the component kind.
        kind: &'static str,
        /// The offending bit.
        id: u8,
    },

    /// Two component kinds claim the same bit.
    #[error("bit {id} is owned by {existing}, cannot assign it to {incoming}")]
    ComponentIdConflict {
        /// The contested bit.
        id: u8,
        /// Kind already declared on that bit.
        existing: &'static str,
        /// Kind that attempted to declare it.
        incoming: &'static str,
    },

    /// The entity lacks components a system requires.
    #[error("entity {entity} is missing required components {missing}")]
    MaskMismatch {
        /// The rejected entity.
        entity: EntityId,
        /// Required bits the entity does not have.
        missing: ComponentMask,
    },

    /// The entity is already bound to the system.
    #[error("entity {0} is already bound")]
    AlreadyBound(EntityId),

    /// No system of the requested type is registered.
    #[error("system {0} is not registered")]
    SystemNotFound(&'static str),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// Errors raised while loading an [`EcsConfig`](crate::EcsConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be written back out.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The values parsed but are out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EcsError::DuplicateComponent {
            entity: EntityId::new(3),
            kind: "Health",
        };
        assert_eq!(err.to_string(), "entity 3 already has a Health component");

        let err = EcsError::ComponentIdOutOfRange { kind: "Big", id: 70 };
        assert_eq!(
            err.to_string(),
            "component kind Big uses bit 70, mask holds 64 bits"
        );
    }
}
