//! Action abstraction between the host's input backend and the sim.
//!
//! The simulation never talks to a gamepad API directly; it queries an
//! [`InputService`] for named actions. Tests and the headless binary
//! drive an [`ActionBuffer`] by hand.

/// Logical input actions the flight controller consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Action {
    /// Raw left-stick horizontal axis, `[-1, 1]`
    StickX,
    /// Raw left-stick vertical axis, `[-1, 1]`
    StickY,
    /// Forward thrust, `[0, 1]`
    ThrustForward,
    /// Reverse thrust, `[0, 1]`
    ThrustBack,
    /// Strafe right minus left, `[-1, 1]`
    StrafeRight,
    /// Vertical thrust up minus down, `[-1, 1]`
    StrafeUp,
    /// Roll right minus left, `[-1, 1]`
    RollRight,
    /// Boost intensity, `[0, 1]`
    Boost,
    /// Brake intensity, `[0, 1]`
    Brake,
}

impl Action {
    /// Every action, in storage order.
    pub const ALL: [Self; 9] = [
        Self::StickX,
        Self::StickY,
        Self::ThrustForward,
        Self::ThrustBack,
        Self::StrafeRight,
        Self::StrafeUp,
        Self::RollRight,
        Self::Boost,
        Self::Brake,
    ];

    /// Number of distinct actions.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable lowercase name, as used in binding config files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::StickX => "stick_x",
            Self::StickY => "stick_y",
            Self::ThrustForward => "thrust_forward",
            Self::ThrustBack => "thrust_back",
            Self::StrafeRight => "strafe_right",
            Self::StrafeUp => "strafe_up",
            Self::RollRight => "roll_right",
            Self::Boost => "boost",
            Self::Brake => "brake",
        }
    }

    /// Looks an action up by its [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

/// Which action feeds each pilot channel.
///
/// The default wiring matches the action names one-to-one; hosts remap
/// it from config for alternate pad layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionBindings {
    /// Raw stick horizontal axis, fed to the adaptive pipeline.
    pub stick_x: Action,
    /// Raw stick vertical axis, fed to the adaptive pipeline.
    pub stick_y: Action,
    /// Roll channel.
    pub roll: Action,
    /// Lateral strafe channel.
    pub strafe_x: Action,
    /// Vertical strafe channel.
    pub strafe_y: Action,
    /// Forward half of the throttle.
    pub thrust_forward: Action,
    /// Reverse half of the throttle.
    pub thrust_back: Action,
    /// Boost channel.
    pub boost: Action,
    /// Brake channel.
    pub brake: Action,
}

impl Default for ActionBindings {
    fn default() -> Self {
        Self {
            stick_x: Action::StickX,
            stick_y: Action::StickY,
            roll: Action::RollRight,
            strafe_x: Action::StrafeRight,
            strafe_y: Action::StrafeUp,
            thrust_forward: Action::ThrustForward,
            thrust_back: Action::ThrustBack,
            boost: Action::Boost,
            brake: Action::Brake,
        }
    }
}

/// Source of action values, implemented by the host.
pub trait InputService {
    /// Current analog value of an action.
    fn value(&self, action: Action) -> f32;

    /// Digital view of an action: true past half travel.
    fn pressed(&self, action: Action) -> bool {
        self.value(action).abs() > 0.5
    }
}

/// Plain in-memory [`InputService`] the host (or a test) writes into
/// once per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionBuffer {
    values: [f32; Action::COUNT],
}

impl ActionBuffer {
    /// Creates a buffer with every action at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an action's analog value.
    pub fn set(&mut self, action: Action, value: f32) {
        self.values[action as usize] = value;
    }

    /// Zeroes every action.
    pub fn clear(&mut self) {
        self.values = [0.0; Action::COUNT];
    }
}

impl InputService for ActionBuffer {
    fn value(&self, action: Action) -> f32 {
        self.values[action as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_set_and_query() {
        let mut buffer = ActionBuffer::new();
        buffer.set(Action::Boost, 0.7);
        assert!((buffer.value(Action::Boost) - 0.7).abs() < f32::EPSILON);
        assert!(buffer.pressed(Action::Boost));
        assert!(!buffer.pressed(Action::Brake));

        buffer.clear();
        assert_eq!(buffer.value(Action::Boost), 0.0);
    }

    #[test]
    fn test_action_names_resolve_back() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("warp_drive"), None);
    }
}
