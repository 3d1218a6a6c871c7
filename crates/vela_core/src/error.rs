//! Error types for the simulation substrate.

use thiserror::Error;

use crate::ecs::entity::EntityId;

/// Errors produced by world and storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The world has no entity slots left.
    #[error("entity capacity exhausted: {capacity} slots in use")]
    CapacityExhausted {
        /// The fixed capacity the world was created with
        capacity: usize,
    },

    /// The entity id does not refer to a live entity.
    #[error("entity {id:?} is unknown, destroyed, or out of range")]
    UnknownEntity {
        /// The offending id
        id: EntityId,
    },

    /// A component was requested that the entity does not carry.
    #[error("entity {id:?} has no '{component}' component")]
    MissingComponent {
        /// The entity queried
        id: EntityId,
        /// Human-readable component name
        component: &'static str,
    },
}

/// Result alias for substrate operations.
pub type CoreResult<T> = Result<T, CoreError>;
