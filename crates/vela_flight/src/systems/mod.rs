//! Per-tick systems, listed in schedule order.
//!
//! Control writes thruster commands, thrusters fill the physics
//! accumulators, physics integrates and clears them.

pub mod control;
pub mod physics;
pub mod thrusters;

pub use control::{control_update, BehaviorRegistry, PilotCommand};
pub use physics::physics_update;
pub use thrusters::thruster_update;
