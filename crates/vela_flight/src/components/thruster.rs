//! Thruster bank component and ship presets.

use vela_core::Component;
use vela_shared::math::Vec3;

use super::physics::{Environment, Physics};

/// Six-axis thruster bank.
///
/// Commands are normalized per axis in `[-1, 1]`; the thruster system
/// multiplies them by the maximum force/torque ratings and the current
/// efficiency. A first-order response filter with time constant
/// `response_time` models spool-up; zero disables the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrusterSystem {
    /// Maximum body-frame force per axis, N. `x` strafe, `y` lift, `z` thrust.
    pub max_linear_force: Vec3,
    /// Maximum body-frame torque per axis, N*m. Pitch, yaw, roll.
    pub max_angular_torque: Vec3,
    /// First-order response time constant, seconds. Zero is instantaneous.
    pub response_time: f32,
    /// Output multiplier in vacuum.
    pub vacuum_efficiency: f32,
    /// Output multiplier in atmosphere.
    pub atmosphere_efficiency: f32,
    /// Disabled banks produce no force and hold zeroed commands.
    pub enabled: bool,
    /// Counter-thrust against drift on axes with no commanded thrust.
    pub auto_deceleration: bool,
    /// Commanded linear output, per axis in `[-1, 1]`.
    pub linear_command: Vec3,
    /// Commanded angular output, per axis in `[-1, 1]`.
    pub angular_command: Vec3,
    /// Filtered linear output actually applied this frame.
    pub applied_linear: Vec3,
    /// Filtered angular output actually applied this frame.
    pub applied_angular: Vec3,
}

impl Default for ThrusterSystem {
    fn default() -> Self {
        Self {
            max_linear_force: Vec3::splat(100.0),
            max_angular_torque: Vec3::splat(50.0),
            response_time: 0.1,
            vacuum_efficiency: 1.0,
            atmosphere_efficiency: 0.7,
            enabled: true,
            auto_deceleration: true,
            linear_command: Vec3::ZERO,
            angular_command: Vec3::ZERO,
            applied_linear: Vec3::ZERO,
            applied_angular: Vec3::ZERO,
        }
    }
}

impl Component for ThrusterSystem {
    const ID: u8 = 2;
    const NAME: &'static str = "thrusters";
}

impl ThrusterSystem {
    /// Set the linear command, clamping each axis into `[-1, 1]`.
    pub fn set_linear_command(&mut self, command: Vec3) {
        self.linear_command = command.clamp_component(-1.0, 1.0);
    }

    /// Set the angular command, clamping each axis into `[-1, 1]`.
    pub fn set_angular_command(&mut self, command: Vec3) {
        self.angular_command = command.clamp_component(-1.0, 1.0);
    }

    /// Enable or disable the bank. Disabling zeroes all commands and the
    /// filter state so re-enabling starts from rest.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.linear_command = Vec3::ZERO;
            self.angular_command = Vec3::ZERO;
            self.applied_linear = Vec3::ZERO;
            self.applied_angular = Vec3::ZERO;
        }
    }

    /// Output multiplier for the given medium.
    pub fn efficiency(&self, environment: Environment) -> f32 {
        match environment {
            Environment::Space => self.vacuum_efficiency,
            Environment::Atmosphere => self.atmosphere_efficiency,
        }
    }
}

/// Factory tunings for the stock ship classes.
///
/// Drag values are per-step velocity retention factors; a retention of
/// 0.92 sheds 8% of velocity each physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipPreset {
    /// Light, agile, balanced all-round handling.
    Fighter,
    /// Heavy forward thrust, slides through corners.
    Racer,
    /// Massive and sluggish, weak thrusters for its bulk.
    Freighter,
    /// Tiny and twitchy with near-instant thruster response.
    RcRocket,
}

impl ShipPreset {
    /// Write this preset's tuning into a physics body and thruster bank.
    pub fn apply(self, physics: &mut Physics, thrusters: &mut ThrusterSystem) {
        match self {
            ShipPreset::Fighter => {
                physics.mass = 50.0;
                physics.moment_of_inertia = Vec3::new(0.3, 0.3, 0.3);
                physics.drag_linear = 0.99;
                physics.drag_angular = 0.95;
                thrusters.max_linear_force = Vec3::new(500.0, 500.0, 1000.0);
                thrusters.max_angular_torque = Vec3::new(100.0, 100.0, 100.0);
                thrusters.response_time = 0.1;
            }
            ShipPreset::Racer => {
                physics.mass = 120.0;
                physics.moment_of_inertia = Vec3::new(0.8, 0.6, 0.8);
                physics.drag_linear = 0.92;
                physics.drag_angular = 0.75;
                thrusters.max_linear_force = Vec3::new(7000.0, 5000.0, 10000.0);
                thrusters.max_angular_torque = Vec3::new(80.0, 90.0, 60.0);
                thrusters.response_time = 0.1;
            }
            ShipPreset::Freighter => {
                physics.mass = 500.0;
                physics.moment_of_inertia = Vec3::new(2.0, 2.0, 2.0);
                physics.drag_linear = 0.98;
                physics.drag_angular = 0.90;
                thrusters.max_linear_force = Vec3::new(200.0, 200.0, 800.0);
                thrusters.max_angular_torque = Vec3::new(50.0, 50.0, 30.0);
                thrusters.response_time = 0.3;
                thrusters.vacuum_efficiency = 0.8;
            }
            ShipPreset::RcRocket => {
                physics.mass = 8.0;
                physics.moment_of_inertia = Vec3::new(0.2, 0.15, 0.2);
                physics.drag_linear = 0.995;
                physics.drag_angular = 0.98;
                thrusters.max_linear_force = Vec3::new(400.0, 400.0, 600.0);
                thrusters.max_angular_torque = Vec3::new(80.0, 100.0, 60.0);
                thrusters.response_time = 0.02;
            }
        }
        physics.has_6dof = true;
        physics.kinematic = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_clamped() {
        let mut t = ThrusterSystem::default();
        t.set_linear_command(Vec3::new(2.0, -3.0, 0.5));
        assert_eq!(t.linear_command, Vec3::new(1.0, -1.0, 0.5));
        t.set_angular_command(Vec3::new(-1.5, 0.0, 1.0));
        assert_eq!(t.angular_command, Vec3::new(-1.0, 0.0, 1.0));
    }

    #[test]
    fn disabling_clears_command_and_filter_state() {
        let mut t = ThrusterSystem::default();
        t.set_linear_command(Vec3::new(1.0, 0.0, 1.0));
        t.applied_linear = Vec3::new(0.4, 0.0, 0.4);
        t.set_enabled(false);
        assert!(!t.enabled);
        assert_eq!(t.linear_command, Vec3::ZERO);
        assert_eq!(t.applied_linear, Vec3::ZERO);
    }

    #[test]
    fn efficiency_tracks_environment() {
        let t = ThrusterSystem {
            vacuum_efficiency: 0.8,
            atmosphere_efficiency: 0.6,
            ..ThrusterSystem::default()
        };
        assert_eq!(t.efficiency(Environment::Space), 0.8);
        assert_eq!(t.efficiency(Environment::Atmosphere), 0.6);
    }

    #[test]
    fn presets_scale_sensibly() {
        let mut p = Physics::default();
        let mut t = ThrusterSystem::default();
        ShipPreset::Freighter.apply(&mut p, &mut t);
        assert_eq!(p.mass, 500.0);
        assert_eq!(t.response_time, 0.3);
        assert_eq!(t.vacuum_efficiency, 0.8);

        ShipPreset::Racer.apply(&mut p, &mut t);
        assert_eq!(t.max_linear_force.z, 10000.0);
        assert!(p.drag_angular < p.drag_linear);
    }
}
