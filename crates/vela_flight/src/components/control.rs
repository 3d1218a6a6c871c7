//! Unified flight-control component.
//!
//! One component covers every way an entity can be flown: direct manual
//! input, computer-assisted target seeking, scripted waypoint paths, and
//! opaque autonomous behaviors. An ordered authority level arbitrates
//! between actors that want to write commands this tick.

use vela_core::{Component, EntityId};
use vela_shared::math::Vec3;

use super::physics::Physics;
use super::transform::Transform;
use crate::error::{FlightError, FlightResult};
use crate::pd::PdController3;

/// Fixed waypoint capacity of a [`FlightPath`].
pub const MAX_WAYPOINTS: usize = 16;

/// How an entity is currently being flown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightMode {
    /// Direct input, optionally shaped by stability assist.
    #[default]
    Manual,
    /// Player sets a target; a PD controller flies toward it.
    Assisted,
    /// Follows a preloaded waypoint path.
    Scripted,
    /// Commands come from a registered behavior callback.
    Autonomous,
    /// Station-keeping relative to a lead ship. Currently flies the
    /// manual path; formation offsets land with the formation system.
    Formation,
}

/// Priority of the actor writing commands to an entity.
///
/// Declared in ascending order so the derived `Ord` matches the numeric
/// levels: a higher variant may pre-empt a lower one, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Authority {
    /// Nobody holds control.
    #[default]
    None,
    /// Background AI.
    Ai,
    /// Scripted flight paths.
    Script,
    /// The flight computer.
    Assistant,
    /// The player. Always wins.
    Player,
}

impl Authority {
    /// Numeric level used for logs and telemetry.
    pub fn level(self) -> u8 {
        match self {
            Authority::None => 0,
            Authority::Ai => 40,
            Authority::Script => 60,
            Authority::Assistant => 80,
            Authority::Player => 100,
        }
    }
}

/// What reaching a waypoint means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaypointKind {
    /// Arrive within tolerance, then move on.
    #[default]
    Position,
    /// Fly through at the waypoint's target speed.
    PassThrough,
    /// Hold position for `hover_duration` before advancing.
    Hover,
    /// Marks the return point when the path loops.
    LoopStart,
}

/// A single waypoint in a flight path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// World-space target position.
    pub position: Vec3,
    /// Arrival semantics.
    pub kind: WaypointKind,
    /// Desired speed when reaching the waypoint, m/s.
    pub target_speed: f32,
    /// Hold time for [`WaypointKind::Hover`], seconds.
    pub hover_duration: f32,
    /// Distance within which the waypoint counts as reached, meters.
    pub tolerance: f32,
}

impl Default for Waypoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            kind: WaypointKind::Position,
            target_speed: 10.0,
            hover_duration: 0.0,
            tolerance: 1.0,
        }
    }
}

impl Waypoint {
    /// Pass-through waypoint at `position` with the given speed and tolerance.
    pub fn pass_through(position: Vec3, target_speed: f32, tolerance: f32) -> Self {
        Self {
            position,
            kind: WaypointKind::PassThrough,
            target_speed,
            tolerance,
            ..Self::default()
        }
    }
}

/// Fixed-capacity waypoint path with kinematic limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPath {
    waypoints: [Waypoint; MAX_WAYPOINTS],
    len: usize,
    /// Return to the loop start (or waypoint 0) after the last waypoint.
    pub looping: bool,
    /// Speed used when a waypoint does not specify one, m/s.
    pub default_speed: f32,
    /// Path-wide acceleration ceiling, m/s^2.
    pub max_acceleration: f32,
    /// Path-wide turn-rate ceiling, rad/s.
    pub max_turn_rate: f32,
}

impl Default for FlightPath {
    fn default() -> Self {
        Self {
            waypoints: [Waypoint::default(); MAX_WAYPOINTS],
            len: 0,
            looping: false,
            default_speed: 15.0,
            max_acceleration: 10.0,
            max_turn_rate: 1.5,
        }
    }
}

impl FlightPath {
    /// Empty, non-looping path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a waypoint.
    ///
    /// # Errors
    /// [`FlightError::PathFull`] once [`MAX_WAYPOINTS`] entries are stored.
    pub fn push(&mut self, waypoint: Waypoint) -> FlightResult<()> {
        if self.len >= MAX_WAYPOINTS {
            return Err(FlightError::PathFull {
                capacity: MAX_WAYPOINTS,
            });
        }
        self.waypoints[self.len] = waypoint;
        self.len += 1;
        Ok(())
    }

    /// Waypoint at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        (index < self.len).then(|| &self.waypoints[index])
    }

    /// Number of stored waypoints.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the path holds no waypoints.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the first [`WaypointKind::LoopStart`] entry, or 0.
    pub fn loop_start(&self) -> usize {
        self.waypoints[..self.len]
            .iter()
            .position(|w| w.kind == WaypointKind::LoopStart)
            .unwrap_or(0)
    }

    /// Single-leg path from anywhere to `end`.
    pub fn straight_line(end: Vec3, speed: f32) -> Self {
        let mut path = Self {
            default_speed: speed,
            ..Self::default()
        };
        // Capacity 16, one push cannot fail.
        let _ = path.push(Waypoint {
            position: end,
            kind: WaypointKind::Position,
            target_speed: speed,
            tolerance: 2.0,
            ..Waypoint::default()
        });
        path
    }

    /// Looping rectangular circuit at `height`, 50 m on a side.
    pub fn circuit(height: f32) -> Self {
        let mut path = Self {
            looping: true,
            default_speed: 25.0,
            max_acceleration: 15.0,
            max_turn_rate: 1.5,
            ..Self::default()
        };
        let corners = [
            Vec3::new(50.0, height, 0.0),
            Vec3::new(0.0, height, 50.0),
            Vec3::new(-50.0, height, 0.0),
            Vec3::new(0.0, height, -50.0),
        ];
        for corner in corners {
            let _ = path.push(Waypoint::pass_through(corner, 25.0, 5.0));
        }
        path
    }

    /// Looping figure-eight of the given radius at `height`.
    pub fn figure_eight(radius: f32, height: f32) -> Self {
        let mut path = Self {
            looping: true,
            default_speed: 20.0,
            max_acceleration: 12.0,
            max_turn_rate: 2.0,
            ..Self::default()
        };
        for i in 0..8 {
            let angle = i as f32 * core::f32::consts::FRAC_PI_4;
            let position = Vec3::new(
                radius * angle.cos(),
                height,
                // Doubled frequency on Z traces the crossover.
                radius * (angle * 2.0).sin(),
            );
            let _ = path.push(Waypoint::pass_through(position, 20.0, 4.0));
        }
        path
    }
}

/// Per-axis shaping applied to manual input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputShaping {
    /// Multiplier on strafe/lift/thrust axes.
    pub linear_sensitivity: f32,
    /// Multiplier on pitch/yaw/roll axes.
    pub angular_sensitivity: f32,
    /// Axis values below this magnitude read as zero.
    pub dead_zone: f32,
    /// Square the response (`x * |x|`) for finer control near center.
    pub quadratic_curve: bool,
    /// Flip the pitch axis.
    pub invert_pitch: bool,
    /// Flip the yaw axis.
    pub invert_yaw: bool,
}

impl Default for InputShaping {
    fn default() -> Self {
        Self {
            linear_sensitivity: 1.0,
            angular_sensitivity: 1.0,
            dead_zone: 0.1,
            quadratic_curve: false,
            invert_pitch: false,
            invert_yaw: false,
        }
    }
}

impl InputShaping {
    /// Run one axis value through invert/deadzone/sensitivity/curve.
    pub fn shape(&self, value: f32, sensitivity: f32, invert: bool) -> f32 {
        let mut v = if invert { -value } else { value };
        v *= sensitivity;
        if v.abs() < self.dead_zone {
            return 0.0;
        }
        if self.quadratic_curve {
            v *= v.abs();
        }
        v.clamp(-1.0, 1.0)
    }
}

/// Live control state: processed inputs, assist targets, safety limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Processed linear input: x strafe, y lift, z thrust, each in `[-1, 1]`.
    pub linear_input: Vec3,
    /// Processed angular input: x pitch, y yaw, z roll, each in `[-1, 1]`.
    pub angular_input: Vec3,
    /// Boost intensity in `[0, 1]`.
    pub boost_input: f32,
    /// Brake intensity in `[0, 1]`.
    pub brake_input: f32,
    /// Assisted-mode position target, world space.
    pub target_position: Vec3,
    /// Assisted-mode velocity target, world space.
    pub target_velocity: Vec3,
    /// 0 = raw manual, 1 = fully computer-flown.
    pub assistance_level: f32,
    /// Commanded linear acceleration ceiling, m/s^2.
    pub max_linear_acceleration: f32,
    /// Commanded angular acceleration ceiling, rad/s^2.
    pub max_angular_acceleration: f32,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            linear_input: Vec3::ZERO,
            angular_input: Vec3::ZERO,
            boost_input: 0.0,
            brake_input: 0.0,
            target_position: Vec3::ZERO,
            target_velocity: Vec3::ZERO,
            assistance_level: 0.0,
            max_linear_acceleration: 50.0,
            max_angular_acceleration: 3.0,
        }
    }
}

/// Progress through a scripted flight path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScriptedState {
    /// Index of the waypoint currently being flown toward.
    pub current_waypoint: usize,
    /// Seconds since the script started.
    pub state_timer: f32,
    /// Script time at which the current hover began; zero when not hovering.
    pub hover_start_time: f32,
    /// Whether the script is flying the entity.
    pub active: bool,
    /// Player input has temporarily taken over.
    pub manual_override: bool,
    /// Speed over ground last tick, m/s.
    pub current_speed: f32,
}

/// Commands produced by an autonomous behavior for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommandPair {
    /// Body-frame linear command, each axis in `[-1, 1]`.
    pub linear: Vec3,
    /// Body-frame angular command, each axis in `[-1, 1]`.
    pub angular: Vec3,
}

/// Black-box flight behavior driving an entity in [`FlightMode::Autonomous`].
///
/// Behaviors live outside the component (they are not `Copy`); the control
/// system keeps a registry keyed by entity and invokes them each tick.
pub trait AutonomousBehavior: Send {
    /// Produce this tick's commands from the entity's current state.
    fn update(&mut self, dt: f32, transform: &Transform, physics: &Physics) -> CommandPair;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Consolidated control component: mode, authority, input shaping,
/// assist settings and scripted-path state for one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnifiedFlightControl {
    /// Active control mode.
    pub mode: FlightMode,
    /// Authority of the actor currently holding control.
    pub authority_level: Authority,
    /// Entity holding control, or [`EntityId::NULL`].
    pub controlled_by: EntityId,
    /// Disabled components produce zero commands and refuse mode switches.
    pub enabled: bool,
    /// Manual input shaping.
    pub input_config: InputShaping,
    /// Live control state.
    pub state: ControlState,
    /// Loaded flight path for scripted mode.
    pub path: FlightPath,
    /// Scripted-flight progress.
    pub scripted: ScriptedState,
    /// PD controller used by assisted mode.
    pub assist_pd: PdController3,
    /// 0-1 angular rate damping strength.
    pub stability_assist: f32,
    /// 0-1 automatic counter-thrust strength.
    pub inertia_dampening: f32,
    /// Master switch for the assist terms above.
    pub flight_assist_enabled: bool,
    /// Completed mode transitions. Same-mode requests do not count.
    pub mode_switches: u32,
    /// Control-system ticks applied to this component.
    pub update_count: u32,
}

impl Default for UnifiedFlightControl {
    fn default() -> Self {
        Self {
            mode: FlightMode::Manual,
            authority_level: Authority::None,
            controlled_by: EntityId::NULL,
            enabled: true,
            input_config: InputShaping::default(),
            state: ControlState::default(),
            path: FlightPath::default(),
            scripted: ScriptedState::default(),
            assist_pd: PdController3::tuned_for(1.0, 2.0, 0.7),
            stability_assist: 0.3,
            inertia_dampening: 0.2,
            flight_assist_enabled: true,
            mode_switches: 0,
            update_count: 0,
        }
    }
}

impl Component for UnifiedFlightControl {
    const ID: u8 = 3;
    const NAME: &'static str = "flight_control";
}

impl UnifiedFlightControl {
    /// Whether a switch to `new_mode` would be honored right now.
    ///
    /// Manual is always reachable while the component is enabled; every
    /// other mode requires at least the authority that owns it.
    pub fn can_switch_mode(&self, new_mode: FlightMode) -> bool {
        if !self.enabled {
            return false;
        }
        match new_mode {
            FlightMode::Manual => true,
            FlightMode::Assisted => self.authority_level >= Authority::Assistant,
            FlightMode::Scripted => self.authority_level >= Authority::Script,
            FlightMode::Autonomous | FlightMode::Formation => {
                self.authority_level >= Authority::Ai
            }
        }
    }

    /// Switch control modes if authority permits. Requests for the current
    /// mode and denied requests leave the component untouched.
    pub fn set_mode(&mut self, mode: FlightMode) {
        if mode == self.mode || !self.can_switch_mode(mode) {
            return;
        }
        let old = self.mode;
        self.mode = mode;
        self.mode_switches += 1;
        self.state.assistance_level = match mode {
            FlightMode::Manual => 0.0,
            FlightMode::Assisted => 0.8,
            FlightMode::Scripted | FlightMode::Autonomous | FlightMode::Formation => 1.0,
        };
        tracing::debug!(?old, new = ?mode, "flight control mode changed");
    }

    /// Take control at `level` on behalf of `requester`.
    ///
    /// Strictly higher authority always wins; equal or lower requests are
    /// denied silently.
    pub fn request_authority(&mut self, level: Authority, requester: EntityId) {
        if level > self.authority_level {
            self.authority_level = level;
            self.controlled_by = requester;
            tracing::debug!(level = level.level(), ?requester, "control authority granted");
        }
    }

    /// Relinquish control. Only the current holder may release.
    pub fn release_authority(&mut self, releaser: EntityId) {
        if self.controlled_by == releaser {
            self.authority_level = Authority::None;
            self.controlled_by = EntityId::NULL;
        }
    }

    /// Whether `entity` currently holds control.
    pub fn has_authority(&self, entity: EntityId) -> bool {
        self.controlled_by == entity
    }

    /// Set input sensitivities, clamped to `[0.1, 5.0]`.
    pub fn set_sensitivity(&mut self, linear: f32, angular: f32) {
        self.input_config.linear_sensitivity = linear.clamp(0.1, 5.0);
        self.input_config.angular_sensitivity = angular.clamp(0.1, 5.0);
    }

    /// Set assist strengths, clamped to `[0, 1]`.
    pub fn set_assistance(&mut self, stability: f32, inertia: f32) {
        self.stability_assist = stability.clamp(0.0, 1.0);
        self.inertia_dampening = inertia.clamp(0.0, 1.0);
    }

    /// Replace the loaded flight path. Does not start the script.
    pub fn load_path(&mut self, path: FlightPath) {
        self.path = path;
        self.scripted = ScriptedState::default();
    }

    /// Begin flying the loaded path from its first waypoint.
    ///
    /// # Errors
    /// [`FlightError::EmptyPath`] when no waypoints are loaded.
    pub fn start_script(&mut self) -> FlightResult<()> {
        if self.path.is_empty() {
            return Err(FlightError::EmptyPath);
        }
        self.scripted = ScriptedState {
            active: true,
            ..ScriptedState::default()
        };
        Ok(())
    }

    /// Halt scripted flight and clear any manual override.
    pub fn stop_script(&mut self) {
        self.scripted.active = false;
        self.scripted.manual_override = false;
    }

    /// Whether the loaded script is flying the entity.
    pub fn script_active(&self) -> bool {
        self.scripted.active
    }

    /// Body-frame linear command with boost applied, zero when disabled.
    pub fn linear_command(&self) -> Vec3 {
        if !self.enabled {
            return Vec3::ZERO;
        }
        let mut command = self.state.linear_input;
        if self.state.boost_input > 0.0 {
            // 3x output at full boost.
            command = command * (1.0 + self.state.boost_input * 2.0);
        }
        command
    }

    /// Body-frame angular command, zero when disabled.
    pub fn angular_command(&self) -> Vec3 {
        if self.enabled {
            self.state.angular_input
        } else {
            Vec3::ZERO
        }
    }

    /// Configure for raw player flying: minimal assist, manual mode.
    pub fn setup_manual_flight(&mut self) {
        self.set_mode(FlightMode::Manual);
        self.stability_assist = 0.1;
        self.inertia_dampening = 0.0;
        self.flight_assist_enabled = false;
        self.state.assistance_level = 0.0;
    }

    /// Configure for computer-assisted flying.
    pub fn setup_assisted_flight(&mut self) {
        self.set_mode(FlightMode::Assisted);
        self.stability_assist = 0.5;
        self.inertia_dampening = 0.3;
        self.flight_assist_enabled = true;
        self.state.assistance_level = 0.8;
    }

    /// Configure for fully autonomous flying.
    pub fn setup_autonomous_flight(&mut self) {
        self.set_mode(FlightMode::Autonomous);
        self.stability_assist = 1.0;
        self.inertia_dampening = 0.8;
        self.flight_assist_enabled = true;
        self.state.assistance_level = 1.0;
    }
}
