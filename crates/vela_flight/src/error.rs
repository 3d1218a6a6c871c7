//! Error types for flight components.

use thiserror::Error;

/// Errors produced by flight-control mutators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlightError {
    /// A flight path has reached its fixed waypoint capacity.
    #[error("flight path full: at most {capacity} waypoints")]
    PathFull {
        /// Fixed waypoint capacity of a path
        capacity: usize,
    },

    /// A path with zero waypoints cannot be started.
    #[error("cannot start scripted flight on an empty path")]
    EmptyPath,
}

/// Result alias for flight-control operations.
pub type FlightResult<T> = Result<T, FlightError>;
