//! Per-mode flight control: turns pilot input, assist targets, scripted
//! paths and autonomous behaviors into thruster commands.

use vela_core::{Component, EntityId};
use vela_shared::math::{Vec3, Vec6};

use crate::components::control::{
    Authority, AutonomousBehavior, CommandPair, FlightMode, UnifiedFlightControl, WaypointKind,
};
use crate::components::physics::Physics;
use crate::components::thruster::ThrusterSystem;
use crate::components::transform::Transform;
use crate::world::World;

/// Rate-damping gain per unit of stability assist.
const ASSIST_DAMPING_GAIN: f32 = 0.5;
/// Roll damping gain outside a banking turn.
const ROLL_DAMPING_GAIN: f32 = 0.4;
/// Roll damping gain while banking; near zero so the bank can develop.
const ROLL_DAMPING_BANKING: f32 = 0.05;
/// Yaw command magnitude that counts as a banking turn.
const BANKING_THRESHOLD: f32 = 0.1;
/// Assist torque contribution ceiling per axis.
const MAX_ASSIST_TORQUE: f32 = 0.3;
/// Velocity fraction shed per frame by the inertia dampener at full strength.
const BRAKE_STRENGTH: f32 = 0.02;
/// Axis magnitude below which input counts as idle.
const IDLE_THRESHOLD: f32 = 0.01;

/// Proportional gain steering the nose onto a waypoint.
const PATH_TURN_KP: f32 = 3.0;
/// Angular-rate damping while steering onto a waypoint.
const PATH_TURN_KD: f32 = 0.5;
/// Forward-speed proportional gain during path following.
const PATH_SPEED_KP: f32 = 0.5;
/// Forward alignment (cosine) required before applying thrust.
const PATH_ALIGNMENT_THRESHOLD: f32 = 0.8;
/// Distance at which approach slowdown begins, meters.
const PATH_SLOWDOWN_RADIUS: f32 = 20.0;
/// Approach speed floor inside the slowdown radius, m/s.
const PATH_MIN_APPROACH_SPEED: f32 = 2.0;
/// Lateral/vertical correction is applied beyond this distance, meters.
const PATH_LATERAL_RADIUS: f32 = 5.0;

/// Pilot input for one tick: six shaped axes plus boost and brake.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PilotCommand {
    /// Processed control axes from the input pipeline.
    pub axes: Vec6,
    /// Boost intensity in `[0, 1]`.
    pub boost: f32,
    /// Brake intensity in `[0, 1]`.
    pub brake: f32,
}

/// Owner of the boxed autonomous behaviors.
///
/// Behaviors cannot live inside the `Copy` control component, so the
/// simulation keeps them here, keyed by entity.
#[derive(Default)]
pub struct BehaviorRegistry {
    entries: Vec<(EntityId, Box<dyn AutonomousBehavior>)>,
}

impl BehaviorRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a behavior to an entity, replacing any existing one.
    pub fn register(&mut self, id: EntityId, behavior: Box<dyn AutonomousBehavior>) {
        if let Some(slot) = self.entries.iter_mut().find(|(e, _)| *e == id) {
            slot.1 = behavior;
        } else {
            self.entries.push((id, behavior));
        }
    }

    /// Detach and return an entity's behavior.
    pub fn remove(&mut self, id: EntityId) -> Option<Box<dyn AutonomousBehavior>> {
        let index = self.entries.iter().position(|(e, _)| *e == id)?;
        Some(self.entries.swap_remove(index).1)
    }

    /// The behavior driving `id`, if any.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn AutonomousBehavior> {
        self.entries
            .iter_mut()
            .find(|(e, _)| *e == id)
            .map(|(_, b)| &mut **b as &mut dyn AutonomousBehavior)
    }

    /// Number of registered behaviors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no behaviors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run flight control for every entity carrying the control component.
///
/// `player` names the entity receiving pilot input; pass
/// [`EntityId::NULL`] for a pilotless world. Produced commands are
/// written straight into each entity's [`ThrusterSystem`].
pub fn control_update(
    world: &mut World,
    player: EntityId,
    pilot: &PilotCommand,
    behaviors: &mut BehaviorRegistry,
    dt: f32,
) {
    let mask = UnifiedFlightControl::mask() | ThrusterSystem::mask();
    for index in 0..world.allocated() {
        let Some(id) = world.matching_id(index, mask) else {
            continue;
        };
        let Some(mut control) = world.get::<UnifiedFlightControl>(id).copied() else {
            continue;
        };
        if !control.enabled {
            continue;
        }
        let transform = world.get::<Transform>(id).copied().unwrap_or_default();
        let physics = world.get::<Physics>(id).copied().unwrap_or_default();
        let auto_brake = world
            .get::<ThrusterSystem>(id)
            .is_some_and(|t| t.auto_deceleration);

        let is_player = id == player;
        if is_player {
            control.request_authority(Authority::Player, player);
        }
        control.update_count += 1;

        let commands = match control.mode {
            FlightMode::Manual | FlightMode::Formation => {
                if is_player {
                    apply_pilot_input(&mut control, pilot);
                }
                Some(manual_commands(&control, &transform, &physics, auto_brake))
            }
            FlightMode::Assisted => {
                if is_player {
                    apply_pilot_input(&mut control, pilot);
                }
                Some(assisted_commands(&mut control, &transform, &physics))
            }
            FlightMode::Scripted => {
                let pilot_active = is_player
                    && control.authority_level == Authority::Player
                    && pilot.axes.length() > BANKING_THRESHOLD;
                control.scripted.manual_override = pilot_active;
                if pilot_active {
                    apply_pilot_input(&mut control, pilot);
                    Some(manual_commands(&control, &transform, &physics, auto_brake))
                } else {
                    scripted_commands(&mut control, &transform, &physics, dt)
                }
            }
            FlightMode::Autonomous => behaviors.get_mut(id).map(|behavior| {
                let pair = behavior.update(dt, &transform, &physics);
                CommandPair {
                    linear: pair.linear.clamp_component(-1.0, 1.0),
                    angular: pair.angular.clamp_component(-1.0, 1.0),
                }
            }),
        };

        if let Some(pair) = commands {
            if let Some(thrusters) = world.get_mut::<ThrusterSystem>(id) {
                thrusters.set_linear_command(pair.linear);
                thrusters.set_angular_command(pair.angular);
            }
        }
        let _ = world.set_component(id, control);
    }
}

/// Shape the six pilot axes into the control state.
fn apply_pilot_input(control: &mut UnifiedFlightControl, pilot: &PilotCommand) {
    let shaping = control.input_config;
    let axes = pilot.axes;
    control.state.angular_input = Vec3::new(
        shaping.shape(axes.pitch, shaping.angular_sensitivity, shaping.invert_pitch),
        shaping.shape(axes.yaw, shaping.angular_sensitivity, shaping.invert_yaw),
        shaping.shape(axes.roll, shaping.angular_sensitivity, false),
    );
    control.state.linear_input = Vec3::new(
        shaping.shape(axes.strafe_x, shaping.linear_sensitivity, false),
        shaping.shape(axes.strafe_y, shaping.linear_sensitivity, false),
        shaping.shape(axes.throttle, shaping.linear_sensitivity, false),
    );
    control.state.boost_input = pilot.boost.clamp(0.0, 1.0);
    control.state.brake_input = pilot.brake.clamp(0.0, 1.0);
}

/// Manual flying with optional stability assist and inertia dampening.
fn manual_commands(
    control: &UnifiedFlightControl,
    transform: &Transform,
    physics: &Physics,
    auto_brake: bool,
) -> CommandPair {
    let mut linear = control.linear_command();
    let mut angular = control.angular_command();

    if control.flight_assist_enabled && control.stability_assist > 0.0 {
        let no_input = linear.x.abs() < IDLE_THRESHOLD
            && linear.y.abs() < IDLE_THRESHOLD
            && linear.z.abs() < IDLE_THRESHOLD
            && angular.x.abs() < IDLE_THRESHOLD
            && angular.y.abs() < IDLE_THRESHOLD
            && angular.z.abs() < IDLE_THRESHOLD;
        let banking = angular.y.abs() > BANKING_THRESHOLD;

        let assist = control.stability_assist;
        let omega = physics.angular_velocity;
        let mut damping = Vec3::new(
            -omega.x * assist * ASSIST_DAMPING_GAIN,
            -omega.y * assist * ASSIST_DAMPING_GAIN,
            -omega.z
                * assist
                * if banking {
                    ROLL_DAMPING_BANKING
                } else {
                    ROLL_DAMPING_GAIN
                },
        );

        // Level the ship while coasting; during a bank only the pitch
        // gets a gentler correction so the roll can develop.
        let forward = transform.forward();
        let pitch_error = forward
            .y
            .atan2((forward.x * forward.x + forward.z * forward.z).sqrt());
        if no_input && !banking {
            let up = transform.up();
            damping.x -= pitch_error * 0.5;
            damping.z -= up.x.atan2(up.y) * 0.5;
        } else if banking {
            damping.x -= pitch_error * 0.3;
        }

        if no_input && auto_brake && control.inertia_dampening > 0.0 {
            linear = physics.velocity * (-BRAKE_STRENGTH * control.inertia_dampening);
        }

        damping = damping.clamp_component(-MAX_ASSIST_TORQUE, MAX_ASSIST_TORQUE);
        angular += damping;
    }

    // Held brake counter-thrusts against the current velocity on top of
    // whatever the stick commands, assist or not.
    if control.state.brake_input > 0.0 {
        let brake = physics.velocity * (-BRAKE_STRENGTH * control.state.brake_input);
        linear = (linear + brake).clamp_component(-1.0, 1.0);
    }

    CommandPair { linear, angular }
}

/// Assisted flying: PD acceleration toward the target, expressed as
/// body-frame thrust commands.
fn assisted_commands(
    control: &mut UnifiedFlightControl,
    transform: &Transform,
    physics: &Physics,
) -> CommandPair {
    // A zero or negative limit would turn the normalization below into
    // NaN commands; floor it instead.
    let max_accel = control.state.max_linear_acceleration.max(f32::EPSILON);
    let acceleration = control
        .assist_pd
        .update(
            transform.position,
            physics.velocity,
            control.state.target_position,
            control.state.target_velocity,
        )
        .clamp_length(max_accel);

    let body = transform.rotation.conjugate().rotate(acceleration);
    let linear = (body * (1.0 / max_accel)).clamp_component(-1.0, 1.0);

    // Rates are damped toward zero so the assist flies smoothly.
    let angular = (physics.angular_velocity
        * -(control.stability_assist.max(0.3) * ASSIST_DAMPING_GAIN))
        .clamp_component(-1.0, 1.0);

    CommandPair { linear, angular }
}

/// Waypoint following: turn onto the target, thrust when aligned,
/// slow down on approach.
fn scripted_commands(
    control: &mut UnifiedFlightControl,
    transform: &Transform,
    physics: &Physics,
    dt: f32,
) -> Option<CommandPair> {
    if !control.scripted.active {
        return None;
    }
    control.scripted.state_timer += dt;
    control.scripted.current_speed = physics.velocity.length();

    if control.scripted.current_waypoint >= control.path.len() {
        if control.path.looping {
            control.scripted.current_waypoint = control.path.loop_start();
        } else {
            control.stop_script();
            return Some(CommandPair::default());
        }
    }

    let waypoint = *control.path.get(control.scripted.current_waypoint)?;
    let to_target = waypoint.position - transform.position;
    let distance = to_target.length();

    if distance < waypoint.tolerance {
        match waypoint.kind {
            WaypointKind::Hover => {
                if control.scripted.hover_start_time == 0.0 {
                    control.scripted.hover_start_time = control.scripted.state_timer;
                } else if control.scripted.state_timer - control.scripted.hover_start_time
                    >= waypoint.hover_duration
                {
                    control.scripted.hover_start_time = 0.0;
                    control.scripted.current_waypoint += 1;
                }
                // Hold station: brake against drift and spin.
                let body_velocity = transform.rotation.conjugate().rotate(physics.velocity);
                return Some(CommandPair {
                    linear: (body_velocity * -0.5).clamp_component(-1.0, 1.0),
                    angular: (physics.angular_velocity * -0.5).clamp_component(-1.0, 1.0),
                });
            }
            _ => {
                control.scripted.current_waypoint += 1;
                // Keep last tick's commands through the switchover.
                return None;
            }
        }
    }

    let direction = if distance > 1e-3 {
        to_target * (1.0 / distance)
    } else {
        Vec3::Z
    };
    let forward = transform.forward();
    let right = transform.right();
    let up = transform.up();

    let alignment = forward.dot(direction);
    let turn_error = forward.cross(direction);
    let yaw_error = turn_error.dot(up);
    let pitch_error = -turn_error.dot(right);

    let mut angular = Vec3::new(
        pitch_error * PATH_TURN_KP - physics.angular_velocity.x * PATH_TURN_KD,
        yaw_error * PATH_TURN_KP - physics.angular_velocity.y * PATH_TURN_KD,
        0.0,
    )
    .clamp_component(-1.0, 1.0);
    angular.z = 0.0;

    let mut linear = Vec3::ZERO;
    let forward_speed = physics.velocity.dot(forward);

    if alignment > PATH_ALIGNMENT_THRESHOLD {
        let mut desired_speed = if waypoint.target_speed > 0.0 {
            waypoint.target_speed
        } else {
            control.path.default_speed
        };
        if distance < PATH_SLOWDOWN_RADIUS {
            desired_speed =
                (desired_speed * distance / PATH_SLOWDOWN_RADIUS).max(PATH_MIN_APPROACH_SPEED);
        }
        linear.z = ((desired_speed - forward_speed) * PATH_SPEED_KP).clamp(-1.0, 1.0);

        if distance > PATH_LATERAL_RADIUS {
            linear.x = (direction.dot(right) * 0.2).clamp(-0.3, 0.3);
            linear.y = (direction.dot(up) * 0.2).clamp(-0.3, 0.3);
        }
    } else if forward_speed > 5.0 {
        // Still turning; bleed off speed.
        linear.z = -0.2;
    }

    Some(CommandPair { linear, angular })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::control::{FlightPath, Waypoint};
    use crate::components::thruster::ShipPreset;

    fn spawn_ship(world: &mut World) -> EntityId {
        let id = world.create_entity().unwrap();
        world.add_component::<Transform>(id).unwrap();
        let mut physics = Physics::default();
        let mut thrusters = ThrusterSystem::default();
        ShipPreset::Fighter.apply(&mut physics, &mut thrusters);
        world.set_component(id, physics).unwrap();
        world.set_component(id, thrusters).unwrap();
        world.add_component::<UnifiedFlightControl>(id).unwrap();
        id
    }

    fn idle_pilot() -> PilotCommand {
        PilotCommand::default()
    }

    #[test]
    fn stability_assist_counters_pitch_rate() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        world.get_mut::<Physics>(id).unwrap().angular_velocity = Vec3::new(1.0, 0.0, 0.0);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.stability_assist = 1.0;
            c.flight_assist_enabled = true;
        }

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, id, &idle_pilot(), &mut behaviors, 1.0 / 60.0);

        let cmd = world.get::<ThrusterSystem>(id).unwrap().angular_command;
        // Damping opposes the spin and stays inside the assist clamp.
        assert!(cmd.x < 0.0);
        assert!((cmd.x + MAX_ASSIST_TORQUE).abs() < 1e-5);
        assert!(cmd.x.abs() <= 1.0);
    }

    #[test]
    fn pilot_axes_reach_the_thrusters() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.flight_assist_enabled = false;
        }
        let pilot = PilotCommand {
            axes: Vec6 {
                pitch: 0.5,
                throttle: 0.8,
                ..Vec6::ZERO
            },
            ..PilotCommand::default()
        };

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, id, &pilot, &mut behaviors, 1.0 / 60.0);

        let thrusters = world.get::<ThrusterSystem>(id).unwrap();
        assert!((thrusters.angular_command.x - 0.5).abs() < 1e-5);
        assert!((thrusters.linear_command.z - 0.8).abs() < 1e-5);
    }

    #[test]
    fn boost_amplifies_throttle() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        world
            .get_mut::<UnifiedFlightControl>(id)
            .unwrap()
            .flight_assist_enabled = false;
        let pilot = PilotCommand {
            axes: Vec6 {
                throttle: 0.4,
                ..Vec6::ZERO
            },
            boost: 1.0,
            brake: 0.0,
        };

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, id, &pilot, &mut behaviors, 1.0 / 60.0);

        // 0.4 * 3x boost, clamped into the command range by the setter.
        let z = world.get::<ThrusterSystem>(id).unwrap().linear_command.z;
        assert!((z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn held_brake_opposes_velocity() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        world.get_mut::<Physics>(id).unwrap().velocity = Vec3::new(0.0, 0.0, 40.0);
        world
            .get_mut::<UnifiedFlightControl>(id)
            .unwrap()
            .flight_assist_enabled = false;
        let pilot = PilotCommand {
            brake: 1.0,
            ..PilotCommand::default()
        };

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, id, &pilot, &mut behaviors, 1.0 / 60.0);

        // 40 m/s forward, full brake: -40 * 0.02 = -0.8 reverse command.
        let z = world.get::<ThrusterSystem>(id).unwrap().linear_command.z;
        assert!((z + 0.8).abs() < 1e-5);
    }

    #[test]
    fn single_waypoint_within_tolerance_ends_script() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        world.get_mut::<Transform>(id).unwrap().position = Vec3::new(9.5, 0.0, 0.0);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.request_authority(Authority::Script, id);
            c.set_mode(FlightMode::Scripted);
            let mut path = FlightPath::new();
            path.push(Waypoint {
                position: Vec3::new(10.0, 0.0, 0.0),
                tolerance: 1.0,
                ..Waypoint::default()
            })
            .unwrap();
            c.load_path(path);
            c.start_script().unwrap();
        }

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);
        let c = world.get::<UnifiedFlightControl>(id).unwrap();
        assert_eq!(c.scripted.current_waypoint, 1);

        // Next tick runs off the end of the non-looping path.
        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);
        let c = world.get::<UnifiedFlightControl>(id).unwrap();
        assert!(!c.script_active());
    }

    #[test]
    fn looping_path_wraps_to_start() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        world.get_mut::<Transform>(id).unwrap().position = Vec3::new(10.0, 0.0, 0.0);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.request_authority(Authority::Script, id);
            c.set_mode(FlightMode::Scripted);
            let mut path = FlightPath::new();
            path.looping = true;
            path.push(Waypoint {
                position: Vec3::new(10.0, 0.0, 0.0),
                tolerance: 1.0,
                ..Waypoint::default()
            })
            .unwrap();
            path.push(Waypoint {
                position: Vec3::new(500.0, 0.0, 0.0),
                tolerance: 1.0,
                ..Waypoint::default()
            })
            .unwrap();
            c.load_path(path);
            c.start_script().unwrap();
        }

        let mut behaviors = BehaviorRegistry::new();
        // Reach waypoint 0, fly toward 1, then force the index past the
        // end to exercise the wrap.
        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);
        world
            .get_mut::<UnifiedFlightControl>(id)
            .unwrap()
            .scripted
            .current_waypoint = 2;
        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);

        let c = world.get::<UnifiedFlightControl>(id).unwrap();
        assert!(c.script_active());
        assert_eq!(c.scripted.current_waypoint, 1);
    }

    #[test]
    fn scripted_ship_turns_before_thrusting() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        // Waypoint directly behind the ship.
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.request_authority(Authority::Script, id);
            c.set_mode(FlightMode::Scripted);
            c.load_path(FlightPath::straight_line(Vec3::new(0.0, 0.0, -100.0), 20.0));
            c.start_script().unwrap();
        }

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);

        let thrusters = world.get::<ThrusterSystem>(id).unwrap();
        // Misaligned and slow: no forward thrust while the turn develops.
        assert_eq!(thrusters.linear_command.z, 0.0);
    }

    #[test]
    fn player_input_overrides_running_script() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.request_authority(Authority::Script, id);
            c.set_mode(FlightMode::Scripted);
            c.load_path(FlightPath::straight_line(Vec3::new(100.0, 0.0, 0.0), 20.0));
            c.start_script().unwrap();
            c.flight_assist_enabled = false;
        }
        let pilot = PilotCommand {
            axes: Vec6 {
                throttle: 1.0,
                ..Vec6::ZERO
            },
            ..PilotCommand::default()
        };

        let mut behaviors = BehaviorRegistry::new();
        // The player entity gets Player authority inside the tick, which
        // pre-empts the script while input is held.
        control_update(&mut world, id, &pilot, &mut behaviors, 1.0 / 60.0);

        let c = world.get::<UnifiedFlightControl>(id).unwrap();
        assert!(c.scripted.manual_override);
        assert!(c.script_active());
        let z = world.get::<ThrusterSystem>(id).unwrap().linear_command.z;
        assert!((z - 1.0).abs() < 1e-5);

        // Releasing the stick resumes the script.
        control_update(&mut world, id, &idle_pilot(), &mut behaviors, 1.0 / 60.0);
        assert!(
            !world
                .get::<UnifiedFlightControl>(id)
                .unwrap()
                .scripted
                .manual_override
        );
    }

    struct OrbitBehavior {
        ticks: u32,
    }

    impl AutonomousBehavior for OrbitBehavior {
        fn update(&mut self, _dt: f32, _t: &Transform, _p: &Physics) -> CommandPair {
            self.ticks += 1;
            CommandPair {
                linear: Vec3::new(0.0, 0.0, 2.0), // out of range on purpose
                angular: Vec3::new(0.0, 0.3, 0.0),
            }
        }
        fn name(&self) -> &'static str {
            "orbit"
        }
    }

    #[test]
    fn autonomous_behavior_drives_thrusters_clamped() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.request_authority(Authority::Ai, id);
            c.set_mode(FlightMode::Autonomous);
        }
        let mut behaviors = BehaviorRegistry::new();
        behaviors.register(id, Box::new(OrbitBehavior { ticks: 0 }));

        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);

        let thrusters = world.get::<ThrusterSystem>(id).unwrap();
        assert!((thrusters.linear_command.z - 1.0).abs() < 1e-6);
        assert!((thrusters.angular_command.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn assisted_mode_thrusts_toward_target() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.request_authority(Authority::Assistant, id);
            c.set_mode(FlightMode::Assisted);
            // Target straight ahead along body +Z.
            c.state.target_position = Vec3::new(0.0, 0.0, 200.0);
            c.assist_pd.kp = 2.0;
            c.assist_pd.kd = 0.0;
        }

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);

        let z = world.get::<ThrusterSystem>(id).unwrap().linear_command.z;
        assert!(z > 0.9);
    }

    #[test]
    fn assisted_mode_tolerates_zero_acceleration_limit() {
        let mut world = World::new(4);
        let id = spawn_ship(&mut world);
        {
            let c = world.get_mut::<UnifiedFlightControl>(id).unwrap();
            c.request_authority(Authority::Assistant, id);
            c.set_mode(FlightMode::Assisted);
            c.state.target_position = Vec3::new(0.0, 0.0, 200.0);
            c.state.max_linear_acceleration = 0.0;
        }

        let mut behaviors = BehaviorRegistry::new();
        control_update(&mut world, EntityId::NULL, &idle_pilot(), &mut behaviors, 1.0 / 60.0);

        let cmd = world.get::<ThrusterSystem>(id).unwrap().linear_command;
        assert!(cmd.x.is_finite() && cmd.y.is_finite() && cmd.z.is_finite());
        assert!(cmd.z > 0.0 && cmd.z <= 1.0);
    }
}
