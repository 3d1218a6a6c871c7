//! Newton-Euler 6DOF integrator.

use vela_core::{Component, EntityId};
use vela_shared::math::Vec3;

use crate::components::physics::Physics;
use crate::components::transform::Transform;
use crate::world::World;

/// Integrate every entity carrying a transform and a physics body.
///
/// Per body, in order: linear acceleration from the force accumulator,
/// multiplicative linear drag, position update, angular acceleration from
/// the torque accumulator (6DOF bodies only), multiplicative angular
/// drag, quaternion integration with renormalization, then both
/// accumulators are cleared. Kinematic bodies only clear accumulators.
pub fn physics_update(world: &mut World, dt: f32) {
    let mask = Transform::mask() | Physics::mask();
    for index in 0..world.allocated() {
        let Some(id) = world.matching_id(index, mask) else {
            continue;
        };
        let Some(mut physics) = world.get::<Physics>(id).copied() else {
            continue;
        };
        let Some(mut transform) = world.get::<Transform>(id).copied() else {
            continue;
        };
        integrate(id, &mut transform, &mut physics, dt);
        let _ = world.set_component(id, physics);
        let _ = world.set_component(id, transform);
    }
}

fn integrate(id: EntityId, transform: &mut Transform, physics: &mut Physics, dt: f32) {
    let mut kinematic = physics.kinematic;
    if !kinematic && physics.mass <= 0.0 {
        if !physics.warned_mass {
            tracing::warn!(?id, mass = physics.mass, "non-positive mass, treating body as kinematic");
            physics.warned_mass = true;
        }
        kinematic = true;
    }
    if kinematic {
        physics.acceleration = Vec3::ZERO;
        physics.clear_accumulators();
        return;
    }

    let (drag_linear, drag_angular) = physics.clamped_drag();

    let acceleration = physics.force_accumulator * (1.0 / physics.mass);
    physics.acceleration = acceleration;
    physics.velocity += acceleration * dt;
    physics.velocity = physics.velocity * drag_linear;
    transform.position += physics.velocity * dt;
    transform.dirty = true;

    if physics.has_6dof {
        let inertia = safe_inertia(id, physics);
        let angular_acceleration = Vec3::new(
            physics.torque_accumulator.x / inertia.x,
            physics.torque_accumulator.y / inertia.y,
            physics.torque_accumulator.z / inertia.z,
        );
        physics.angular_velocity += angular_acceleration * dt;
        physics.angular_velocity = physics.angular_velocity * drag_angular;
        transform.rotation = transform.rotation.integrate(physics.angular_velocity, dt);
    }

    physics.clear_accumulators();
}

/// Moment of inertia with non-positive axes replaced by 1.0.
fn safe_inertia(id: EntityId, physics: &mut Physics) -> Vec3 {
    let moi = physics.moment_of_inertia;
    if moi.x > 0.0 && moi.y > 0.0 && moi.z > 0.0 {
        return moi;
    }
    if !physics.warned_inertia {
        tracing::warn!(?id, ?moi, "non-positive moment of inertia, substituting 1.0");
        physics.warned_inertia = true;
    }
    Vec3::new(
        if moi.x > 0.0 { moi.x } else { 1.0 },
        if moi.y > 0.0 { moi.y } else { 1.0 },
        if moi.z > 0.0 { moi.z } else { 1.0 },
    )
}
