//! Thrust synthesis: normalized commands into forces and torques.

use vela_core::Component;
use vela_shared::math::Vec3;

use crate::components::physics::Physics;
use crate::components::thruster::ThrusterSystem;
use crate::components::transform::Transform;
use crate::world::World;

/// Fraction of max thrust used for automatic counter-thrust.
const DECEL_STRENGTH: f32 = 0.05;
/// Speed below which auto-deceleration does not engage, m/s.
const DECEL_VELOCITY_THRESHOLD: f32 = 2.0;
/// Commanded thrust below this magnitude counts as idle for auto-decel.
const DECEL_COMMAND_THRESHOLD: f32 = 0.1;
/// Speed at which the auto-decel factor saturates, m/s.
const DECEL_FULL_SPEED: f32 = 50.0;

/// Convert each entity's thruster commands into accumulated forces.
///
/// Applies the first-order response filter, scales by the medium's
/// efficiency, rotates the linear force into world space, and feeds the
/// physics accumulators. Torque stays in body frame and requires 6DOF.
pub fn thruster_update(world: &mut World, dt: f32) {
    let mask = Transform::mask() | Physics::mask() | ThrusterSystem::mask();
    for index in 0..world.allocated() {
        let Some(id) = world.matching_id(index, mask) else {
            continue;
        };
        let Some(mut thrusters) = world.get::<ThrusterSystem>(id).copied() else {
            continue;
        };
        let Some(mut physics) = world.get::<Physics>(id).copied() else {
            continue;
        };
        let Some(transform) = world.get::<Transform>(id).copied() else {
            continue;
        };

        if !thrusters.enabled {
            continue;
        }

        // First-order response toward the command; zero time constant
        // applies the command instantaneously.
        let blend = if thrusters.response_time > 0.0 {
            (dt / thrusters.response_time).min(1.0)
        } else {
            1.0
        };
        thrusters.applied_linear +=
            (thrusters.linear_command - thrusters.applied_linear) * blend;
        thrusters.applied_angular +=
            (thrusters.angular_command - thrusters.applied_angular) * blend;

        let efficiency = thrusters.efficiency(physics.environment);
        let mut body_force = thrusters
            .applied_linear
            .mul_component(thrusters.max_linear_force)
            * efficiency;

        if thrusters.auto_deceleration {
            body_force += auto_decel_force(&thrusters, physics.velocity);
        }

        if body_force != Vec3::ZERO {
            physics.add_force(transform.rotation.rotate(body_force));
        }

        if physics.has_6dof {
            let torque = thrusters
                .applied_angular
                .mul_component(thrusters.max_angular_torque)
                * efficiency;
            if torque != Vec3::ZERO {
                physics.add_torque(torque);
            }
        }

        let _ = world.set_component(id, thrusters);
        let _ = world.set_component(id, physics);
    }
}

/// Counter-thrust on axes that are drifting with no commanded thrust.
fn auto_decel_force(thrusters: &ThrusterSystem, velocity: Vec3) -> Vec3 {
    let mut force = Vec3::ZERO;
    let axes = [
        (thrusters.linear_command.x, velocity.x, thrusters.max_linear_force.x),
        (thrusters.linear_command.y, velocity.y, thrusters.max_linear_force.y),
        (thrusters.linear_command.z, velocity.z, thrusters.max_linear_force.z),
    ];
    let out = [&mut force.x, &mut force.y, &mut force.z];
    for ((command, speed, max_force), slot) in axes.into_iter().zip(out) {
        if command.abs() < DECEL_COMMAND_THRESHOLD && speed.abs() > DECEL_VELOCITY_THRESHOLD {
            let factor = (speed.abs() / DECEL_FULL_SPEED).min(1.0);
            *slot -= speed * max_force * DECEL_STRENGTH * factor;
        }
    }
    force
}
