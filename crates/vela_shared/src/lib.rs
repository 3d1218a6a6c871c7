//! # VELA Shared
//!
//! Common types used across the simulation crates.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `vela_core` or any other workspace crate
//! - anything that allocates in its hot-path methods
//!
//! Math types are `#[repr(C)]` and `Pod` so they can be memcpy'd into
//! component storage and snapshot buffers.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod math;

pub use config::{FlightPathConfig, InputBindingsConfig, ShipTuningConfig, WaypointConfig};
pub use math::{Mat2, Quaternion, Vec2, Vec3, Vec6};
