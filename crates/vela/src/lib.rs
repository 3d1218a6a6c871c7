//! # VELA
//!
//! Top-level simulation assembly. Owns the scheduled tick
//! (input 120 Hz, control/thrusters/physics 60 Hz), loads TOML tuning
//! files into runtime types, and exposes the [`Simulation`] facade the
//! host drives once per frame.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod simulation;

pub use config::{ConfigError, SimConfig};
pub use simulation::{SimContext, Simulation};
