//! # VELA Core
//!
//! The simulation substrate: ECS primitives and the system scheduler.
//!
//! ## Design constraints
//!
//! - All storage is pre-allocated; nothing here allocates after setup.
//! - Entity ids are never reused within a world's lifetime.
//! - The scheduler is generic over its context so this crate stays free
//!   of gameplay types.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod ecs;
pub mod error;
pub mod schedule;

pub use ecs::component::Component;
pub use ecs::entity::{Entity, EntityId};
pub use ecs::storage::ComponentStorage;
pub use error::{CoreError, CoreResult};
pub use schedule::{Scheduler, SystemStats};
