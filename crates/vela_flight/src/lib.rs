//! # VELA Flight
//!
//! The flight-mechanics half of the simulation: the concrete [`World`]
//! with its component storages, the unified flight-control component
//! and its per-mode control system, the thruster force model, and the
//! Newton-Euler 6DOF integrator.
//!
//! Data flows one way per tick:
//!
//! ```text
//! processed input -> UnifiedFlightControl -> ThrusterSystem
//!                 -> Physics accumulators -> integrated Transform
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod components;
pub mod error;
pub mod pd;
pub mod systems;
pub mod world;

pub use components::control::{
    Authority, AutonomousBehavior, CommandPair, FlightMode, FlightPath, InputShaping,
    UnifiedFlightControl, Waypoint, WaypointKind,
};
pub use components::physics::{Environment, Physics};
pub use components::thruster::{ShipPreset, ThrusterSystem};
pub use components::transform::Transform;
pub use error::{FlightError, FlightResult};
pub use pd::{PdController, PdController3};
pub use world::World;
