//! Rigid-body state and force accumulation.

use vela_core::Component;
use vela_shared::math::Vec3;

/// Medium the body currently moves through.
///
/// Thruster efficiency and (in future) aerodynamic surfaces key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Vacuum. Thrusters run at their vacuum efficiency.
    #[default]
    Space,
    /// Dense medium. Thrusters run at their atmospheric efficiency.
    Atmosphere,
}

/// Newton-Euler rigid-body component.
///
/// Forces and torques accumulate over a frame and are consumed by the
/// integrator, which clears both accumulators afterwards. Drag fields are
/// per-step velocity *retention* factors in `(0, 1]`: 1.0 preserves
/// velocity exactly, 0.5 halves it each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    /// Linear velocity in world space, m/s.
    pub velocity: Vec3,
    /// Angular velocity in body space, rad/s.
    pub angular_velocity: Vec3,
    /// Linear acceleration applied by the last integration step, m/s^2.
    /// Derived from the force accumulator; zero for kinematic bodies.
    pub acceleration: Vec3,
    /// Mass in kg. Non-positive values make the body behave kinematically.
    pub mass: f32,
    /// Principal moments of inertia, kg*m^2. Non-positive axes fall back to 1.0.
    pub moment_of_inertia: Vec3,
    /// Pending world-space force, cleared every integration step.
    pub force_accumulator: Vec3,
    /// Pending body-space torque, cleared every integration step.
    pub torque_accumulator: Vec3,
    /// Linear velocity retention per step, `(0, 1]`.
    pub drag_linear: f32,
    /// Angular velocity retention per step, `(0, 1]`.
    pub drag_angular: f32,
    /// Whether rotational dynamics are simulated for this body.
    pub has_6dof: bool,
    /// Kinematic bodies keep their velocity but ignore forces entirely.
    pub kinematic: bool,
    /// Medium the body is in.
    pub environment: Environment,
    /// Bad-mass warning already emitted for this body.
    pub warned_mass: bool,
    /// Bad-inertia warning already emitted for this body.
    pub warned_inertia: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            mass: 1.0,
            moment_of_inertia: Vec3::splat(1.0),
            force_accumulator: Vec3::ZERO,
            torque_accumulator: Vec3::ZERO,
            drag_linear: 1.0,
            drag_angular: 1.0,
            has_6dof: true,
            kinematic: false,
            environment: Environment::Space,
            warned_mass: false,
            warned_inertia: false,
        }
    }
}

impl Component for Physics {
    const ID: u8 = 1;
    const NAME: &'static str = "physics";
}

impl Physics {
    /// Dynamic body with the given mass and uniform inertia.
    pub fn with_mass(mass: f32) -> Self {
        Self {
            mass,
            ..Self::default()
        }
    }

    /// Accumulate a world-space force for the next integration step.
    pub fn add_force(&mut self, force: Vec3) {
        self.force_accumulator += force;
    }

    /// Accumulate a body-space torque for the next integration step.
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque_accumulator += torque;
    }

    /// Drop all pending forces and torques.
    pub fn clear_accumulators(&mut self) {
        self.force_accumulator = Vec3::ZERO;
        self.torque_accumulator = Vec3::ZERO;
    }

    /// Drag retention factors clamped into `(0, 1]`.
    ///
    /// Out-of-range values are coerced silently; zero and negatives clamp
    /// to a small positive floor rather than freezing the body outright.
    pub fn clamped_drag(&self) -> (f32, f32) {
        (
            self.drag_linear.clamp(f32::EPSILON, 1.0),
            self.drag_angular.clamp(f32::EPSILON, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulators_sum_and_clear() {
        let mut p = Physics::default();
        p.add_force(Vec3::new(1.0, 0.0, 0.0));
        p.add_force(Vec3::new(2.0, 0.0, 0.0));
        p.add_torque(Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(p.force_accumulator.x, 3.0);
        assert_eq!(p.torque_accumulator.y, 0.5);
        p.clear_accumulators();
        assert_eq!(p.force_accumulator, Vec3::ZERO);
        assert_eq!(p.torque_accumulator, Vec3::ZERO);
    }

    #[test]
    fn drag_is_coerced_into_unit_interval() {
        let p = Physics {
            drag_linear: 1.5,
            drag_angular: -0.2,
            ..Physics::default()
        };
        let (lin, ang) = p.clamped_drag();
        assert_eq!(lin, 1.0);
        assert!(ang > 0.0 && ang < 1e-6);
    }
}
