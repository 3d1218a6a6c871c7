//! TOML configuration loading.
//!
//! The shared crate defines the serde value objects; this module reads
//! them off disk and converts them into runtime flight types. Loading
//! happens once at startup, never per-tick.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vela_flight::{FlightPath, InputShaping, Physics, ThrusterSystem, Waypoint, WaypointKind};
use vela_input::{Action, ActionBindings};
use vela_shared::config::{
    ActionMapConfig, FlightPathConfig, InputBindingsConfig, ShipTuningConfig, WaypointConfig,
};
use vela_shared::math::Vec3;

/// Errors raised while loading or converting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A waypoint kind string is not one of the known names.
    #[error("unknown waypoint kind '{0}'")]
    UnknownWaypointKind(String),

    /// A binding names an action that does not exist.
    #[error("unknown action '{name}' bound to {channel}")]
    UnknownAction {
        /// The unrecognized action name from the file.
        name: String,
        /// The pilot channel it was bound to.
        channel: &'static str,
    },

    /// More waypoints than a flight path can hold.
    #[error("path has {got} waypoints, limit is {limit}")]
    TooManyWaypoints {
        /// Waypoints present in the file.
        got: usize,
        /// Fixed path capacity.
        limit: usize,
    },
}

/// Root simulation config file: `[ship]`, `[path]`, `[input]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Player ship tuning.
    pub ship: ShipTuningConfig,
    /// Scripted demo path.
    pub path: FlightPathConfig,
    /// Manual input shaping.
    pub input: InputBindingsConfig,
}

impl SimConfig {
    /// Parse a config document from TOML text.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for schema or syntax problems.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config document from a file.
    ///
    /// # Errors
    /// [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }
}

/// Write ship tuning into a physics body and thruster bank.
pub fn apply_ship_tuning(
    tuning: &ShipTuningConfig,
    physics: &mut Physics,
    thrusters: &mut ThrusterSystem,
) {
    physics.mass = tuning.mass;
    physics.drag_linear = tuning.drag_linear;
    physics.drag_angular = tuning.drag_angular;
    physics.moment_of_inertia = Vec3::from_array(tuning.moment_of_inertia);
    thrusters.max_linear_force = Vec3::from_array(tuning.max_linear_force);
    thrusters.max_angular_torque = Vec3::from_array(tuning.max_angular_torque);
    thrusters.response_time = tuning.response_time;
    thrusters.vacuum_efficiency = tuning.vacuum_efficiency;
    thrusters.atmosphere_efficiency = tuning.atmosphere_efficiency;
}

/// Convert a path config into a runtime flight path.
///
/// # Errors
/// [`ConfigError::TooManyWaypoints`] past the fixed capacity, and
/// [`ConfigError::UnknownWaypointKind`] for unrecognized kind strings.
pub fn flight_path_from_config(config: &FlightPathConfig) -> Result<FlightPath, ConfigError> {
    let mut path = FlightPath::new();
    path.looping = config.looped;
    if config.default_speed > 0.0 {
        path.default_speed = config.default_speed;
    }
    if config.max_acceleration > 0.0 {
        path.max_acceleration = config.max_acceleration;
    }
    if config.max_turn_rate > 0.0 {
        path.max_turn_rate = config.max_turn_rate;
    }
    for waypoint in &config.waypoints {
        path.push(waypoint_from_config(waypoint)?).map_err(|_| {
            ConfigError::TooManyWaypoints {
                got: config.waypoints.len(),
                limit: vela_flight::components::control::MAX_WAYPOINTS,
            }
        })?;
    }
    Ok(path)
}

fn waypoint_from_config(config: &WaypointConfig) -> Result<Waypoint, ConfigError> {
    let kind = match config.kind.as_str() {
        "position" => WaypointKind::Position,
        "pass_through" => WaypointKind::PassThrough,
        "hover" => WaypointKind::Hover,
        "loop_start" => WaypointKind::LoopStart,
        other => return Err(ConfigError::UnknownWaypointKind(other.to_string())),
    };
    Ok(Waypoint {
        position: Vec3::from_array(config.position),
        kind,
        target_speed: config.target_speed,
        hover_duration: config.hover_duration,
        tolerance: config.tolerance,
    })
}

/// Convert the binding name table into runtime action routing.
///
/// # Errors
/// [`ConfigError::UnknownAction`] when a channel names an action outside
/// the fixed vocabulary.
pub fn action_bindings_from_config(
    config: &ActionMapConfig,
) -> Result<ActionBindings, ConfigError> {
    let resolve = |name: &str, channel: &'static str| {
        Action::from_name(name).ok_or_else(|| ConfigError::UnknownAction {
            name: name.to_string(),
            channel,
        })
    };
    Ok(ActionBindings {
        stick_x: resolve(&config.stick_x, "stick_x")?,
        stick_y: resolve(&config.stick_y, "stick_y")?,
        roll: resolve(&config.roll, "roll")?,
        strafe_x: resolve(&config.strafe_x, "strafe_x")?,
        strafe_y: resolve(&config.strafe_y, "strafe_y")?,
        thrust_forward: resolve(&config.thrust_forward, "thrust_forward")?,
        thrust_back: resolve(&config.thrust_back, "thrust_back")?,
        boost: resolve(&config.boost, "boost")?,
        brake: resolve(&config.brake, "brake")?,
    })
}

/// Convert input bindings into runtime shaping parameters.
#[must_use]
pub fn input_shaping_from_config(config: &InputBindingsConfig) -> InputShaping {
    InputShaping {
        linear_sensitivity: config.linear_sensitivity,
        angular_sensitivity: config.angular_sensitivity,
        dead_zone: config.dead_zone,
        quadratic_curve: config.use_quadratic_curve,
        invert_pitch: config.invert_pitch,
        invert_yaw: config.invert_yaw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [ship]
        mass = 120.0
        drag_linear = 0.92
        max_linear_force = [7000.0, 5000.0, 10000.0]

        [path]
        looped = true
        default_speed = 25.0

        [[path.waypoints]]
        position = [50.0, 10.0, 0.0]
        kind = "pass_through"
        target_speed = 25.0
        tolerance = 5.0

        [[path.waypoints]]
        position = [0.0, 10.0, 50.0]
        kind = "hover"
        hover_duration = 2.0

        [input]
        invert_pitch = true
        dead_zone = 0.15

        [input.bindings]
        thrust_forward = "strafe_up"
        strafe_y = "thrust_forward"
    "#;

    #[test]
    fn sample_document_parses_and_converts() {
        let config = SimConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.ship.mass, 120.0);

        let mut physics = Physics::default();
        let mut thrusters = ThrusterSystem::default();
        apply_ship_tuning(&config.ship, &mut physics, &mut thrusters);
        assert_eq!(physics.drag_linear, 0.92);
        assert_eq!(thrusters.max_linear_force.z, 10000.0);

        let path = flight_path_from_config(&config.path).unwrap();
        assert_eq!(path.len(), 2);
        assert!(path.looping);
        assert_eq!(path.get(1).unwrap().kind, WaypointKind::Hover);
        assert_eq!(path.get(1).unwrap().hover_duration, 2.0);

        let shaping = input_shaping_from_config(&config.input);
        assert!(shaping.invert_pitch);
        assert_eq!(shaping.dead_zone, 0.15);

        // Two channels swapped, the rest on their default actions.
        let bindings = action_bindings_from_config(&config.input.bindings).unwrap();
        assert_eq!(bindings.thrust_forward, Action::StrafeUp);
        assert_eq!(bindings.strafe_y, Action::ThrustForward);
        assert_eq!(bindings.stick_x, Action::StickX);
    }

    #[test]
    fn unknown_binding_action_is_rejected() {
        let bindings = ActionMapConfig {
            boost: "afterburner".to_string(),
            ..ActionMapConfig::default()
        };
        assert!(matches!(
            action_bindings_from_config(&bindings),
            Err(ConfigError::UnknownAction { channel: "boost", .. })
        ));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = SimConfig::parse("").unwrap();
        assert_eq!(config.ship.mass, 100.0);
        assert!(config.path.waypoints.is_empty());
    }

    #[test]
    fn unknown_waypoint_kind_is_rejected() {
        let bad = WaypointConfig {
            kind: "teleport".to_string(),
            ..WaypointConfig::default()
        };
        let config = FlightPathConfig {
            waypoints: vec![bad],
            ..FlightPathConfig::default()
        };
        assert!(matches!(
            flight_path_from_config(&config),
            Err(ConfigError::UnknownWaypointKind(_))
        ));
    }

    #[test]
    fn waypoint_overflow_is_rejected() {
        let config = FlightPathConfig {
            waypoints: vec![WaypointConfig::default(); 17],
            ..FlightPathConfig::default()
        };
        assert!(matches!(
            flight_path_from_config(&config),
            Err(ConfigError::TooManyWaypoints { got: 17, limit: 16 })
        ));
    }
}
