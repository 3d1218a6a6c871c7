//! Config-file value objects.
//!
//! Plain serde structs mirroring the TOML schema. Loaded once at startup
//! and converted into runtime types by the top-level crate; nothing here
//! is touched per-tick.

use serde::{Deserialize, Serialize};

/// Ship tuning parameters as they appear in a `[ship]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipTuningConfig {
    /// Mass in kilograms
    pub mass: f32,
    /// Linear drag retention per step, `[0, 1]`
    pub drag_linear: f32,
    /// Angular drag retention per step, `[0, 1]`
    pub drag_angular: f32,
    /// Principal moments of inertia (kg·m²)
    pub moment_of_inertia: [f32; 3],
    /// Maximum thruster force per axis (N)
    pub max_linear_force: [f32; 3],
    /// Maximum thruster torque per axis (N·m)
    pub max_angular_torque: [f32; 3],
    /// First-order thruster response time (s); zero means instantaneous
    pub response_time: f32,
    /// Thruster efficiency in vacuum, `[0, 1]`
    pub vacuum_efficiency: f32,
    /// Thruster efficiency in atmosphere, `[0, 1]`
    pub atmosphere_efficiency: f32,
}

impl Default for ShipTuningConfig {
    fn default() -> Self {
        Self {
            mass: 100.0,
            drag_linear: 1.0,
            drag_angular: 1.0,
            moment_of_inertia: [1.0, 1.0, 1.0],
            max_linear_force: [500.0, 500.0, 1000.0],
            max_angular_torque: [100.0, 100.0, 100.0],
            response_time: 0.1,
            vacuum_efficiency: 1.0,
            atmosphere_efficiency: 1.0,
        }
    }
}

/// A single waypoint in a `[[path.waypoints]]` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    /// World-space position
    pub position: [f32; 3],
    /// Waypoint kind: `"position"`, `"pass_through"`, `"hover"`, `"loop_start"`
    pub kind: String,
    /// Desired speed when reaching the waypoint (m/s)
    pub target_speed: f32,
    /// Hover duration in seconds (hover waypoints only)
    pub hover_duration: f32,
    /// Distance tolerance to consider the waypoint reached (m)
    pub tolerance: f32,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            kind: "position".to_string(),
            target_speed: 10.0,
            hover_duration: 0.0,
            tolerance: 2.0,
        }
    }
}

/// Flight path as it appears in a `[path]` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightPathConfig {
    /// Ordered waypoint list; at most 16 are used
    pub waypoints: Vec<WaypointConfig>,
    /// Whether the path loops back to its start
    pub looped: bool,
    /// Default flight speed (m/s)
    pub default_speed: f32,
    /// Maximum acceleration while following (m/s²)
    pub max_acceleration: f32,
    /// Maximum turn rate while following (rad/s)
    pub max_turn_rate: f32,
}

/// Action name feeding each pilot channel, `[input.bindings]` table.
///
/// Names must match the input crate's action vocabulary
/// (`"stick_x"`, `"thrust_forward"`, ...); the defaults wire every
/// channel to its same-named action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionMapConfig {
    /// Raw stick horizontal axis
    pub stick_x: String,
    /// Raw stick vertical axis
    pub stick_y: String,
    /// Roll channel
    pub roll: String,
    /// Lateral strafe channel
    pub strafe_x: String,
    /// Vertical strafe channel
    pub strafe_y: String,
    /// Forward half of the throttle
    pub thrust_forward: String,
    /// Reverse half of the throttle
    pub thrust_back: String,
    /// Boost channel
    pub boost: String,
    /// Brake channel
    pub brake: String,
}

impl Default for ActionMapConfig {
    fn default() -> Self {
        Self {
            stick_x: "stick_x".to_string(),
            stick_y: "stick_y".to_string(),
            roll: "roll_right".to_string(),
            strafe_x: "strafe_right".to_string(),
            strafe_y: "strafe_up".to_string(),
            thrust_forward: "thrust_forward".to_string(),
            thrust_back: "thrust_back".to_string(),
            boost: "boost".to_string(),
            brake: "brake".to_string(),
        }
    }
}

/// Manual-control input bindings and shaping, `[input]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindingsConfig {
    /// Action routed to each pilot channel
    pub bindings: ActionMapConfig,
    /// Linear axis sensitivity multiplier
    pub linear_sensitivity: f32,
    /// Angular axis sensitivity multiplier
    pub angular_sensitivity: f32,
    /// Fixed dead zone applied after the adaptive pipeline
    pub dead_zone: f32,
    /// Square the response curve (sign-preserving)
    pub use_quadratic_curve: bool,
    /// Invert the pitch axis
    pub invert_pitch: bool,
    /// Invert the yaw axis
    pub invert_yaw: bool,
}

impl Default for InputBindingsConfig {
    fn default() -> Self {
        Self {
            bindings: ActionMapConfig::default(),
            linear_sensitivity: 1.0,
            angular_sensitivity: 1.0,
            dead_zone: 0.1,
            use_quadratic_curve: false,
            invert_pitch: false,
            invert_yaw: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_tuning_defaults_fill_missing_fields() {
        let cfg: ShipTuningConfig = toml::from_str("mass = 50.0").unwrap();
        assert_eq!(cfg.mass, 50.0);
        assert_eq!(cfg.response_time, 0.1);
        assert_eq!(cfg.vacuum_efficiency, 1.0);
    }

    #[test]
    fn test_partial_bindings_table_keeps_defaults() {
        let cfg: InputBindingsConfig =
            toml::from_str("[bindings]\nthrust_forward = \"strafe_up\"").unwrap();
        assert_eq!(cfg.bindings.thrust_forward, "strafe_up");
        assert_eq!(cfg.bindings.stick_x, "stick_x");
        assert_eq!(cfg.bindings.brake, "brake");
    }

    #[test]
    fn test_path_round_trips_through_toml() {
        let path = FlightPathConfig {
            waypoints: vec![WaypointConfig::default()],
            looped: true,
            default_speed: 12.0,
            max_acceleration: 8.0,
            max_turn_rate: 1.5,
        };
        let text = toml::to_string(&path).unwrap();
        let back: FlightPathConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, path);
    }
}
