//! Component types stored in the flight world.

pub mod control;
pub mod physics;
pub mod thruster;
pub mod transform;
