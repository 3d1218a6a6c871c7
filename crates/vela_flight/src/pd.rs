//! Proportional-derivative controllers for assisted and scripted flight.

use vela_shared::math::Vec3;

/// 3-axis PD controller.
///
/// Output is `kp * position_error + kd * velocity_error`, clamped to
/// `max_output` by magnitude. An optional first-order smoothing blend
/// keeps successive outputs from stepping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdController3 {
    /// Proportional gain.
    pub kp: f32,
    /// Derivative gain.
    pub kd: f32,
    /// Output magnitude ceiling.
    pub max_output: f32,
    /// Blend factor toward the new output, `(0, 1]`. 1 disables smoothing.
    pub smoothing: f32,
    last_output: Vec3,
}

impl Default for PdController3 {
    fn default() -> Self {
        Self {
            kp: 1.0,
            kd: 0.5,
            max_output: f32::INFINITY,
            smoothing: 1.0,
            last_output: Vec3::ZERO,
        }
    }
}

impl PdController3 {
    /// Controller with the given gains and no output limit.
    #[must_use]
    pub fn new(kp: f32, kd: f32) -> Self {
        Self {
            kp,
            kd,
            ..Self::default()
        }
    }

    /// Critically-damped-ish gains for a body of `mass` settling in
    /// roughly `settle_time` seconds.
    ///
    /// Uses the 1% settling-time approximation `t_s = 4.6 / (zeta * wn)`.
    #[must_use]
    pub fn tuned_for(mass: f32, settle_time: f32, damping_ratio: f32) -> Self {
        let wn = 4.6 / settle_time.max(1e-3);
        Self {
            kp: mass * wn * wn,
            kd: 2.0 * damping_ratio * mass * wn,
            ..Self::default()
        }
    }

    /// One control step toward `target_position` / `target_velocity`.
    pub fn update(
        &mut self,
        current_position: Vec3,
        current_velocity: Vec3,
        target_position: Vec3,
        target_velocity: Vec3,
    ) -> Vec3 {
        let position_error = target_position - current_position;
        let velocity_error = target_velocity - current_velocity;
        let raw = position_error * self.kp + velocity_error * self.kd;
        let limited = raw.clamp_length(self.max_output);
        let output = self.last_output.lerp(limited, self.smoothing.clamp(0.0, 1.0));
        self.last_output = output;
        output
    }

    /// Forget the smoothing history.
    pub fn reset(&mut self) {
        self.last_output = Vec3::ZERO;
    }
}

/// Scalar PD controller, same law as [`PdController3`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdController {
    /// Proportional gain.
    pub kp: f32,
    /// Derivative gain.
    pub kd: f32,
    /// Output magnitude ceiling.
    pub max_output: f32,
}

impl Default for PdController {
    fn default() -> Self {
        Self {
            kp: 1.0,
            kd: 0.5,
            max_output: f32::INFINITY,
        }
    }
}

impl PdController {
    /// Controller with the given gains and no output limit.
    #[must_use]
    pub fn new(kp: f32, kd: f32) -> Self {
        Self {
            kp,
            kd,
            ..Self::default()
        }
    }

    /// One control step.
    #[must_use]
    pub fn update(
        &self,
        current_position: f32,
        current_velocity: f32,
        target_position: f32,
        target_velocity: f32,
    ) -> f32 {
        let raw = self.kp * (target_position - current_position)
            + self.kd * (target_velocity - current_velocity);
        raw.clamp(-self.max_output, self.max_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gains_give_zero_output() {
        let mut pd = PdController3::new(0.0, 0.0);
        let out = pd.update(
            Vec3::new(100.0, -50.0, 3.0),
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::ZERO,
            Vec3::ZERO,
        );
        assert_eq!(out, Vec3::ZERO);

        let scalar = PdController::new(0.0, 0.0);
        assert_eq!(scalar.update(10.0, -2.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn output_points_toward_target() {
        let mut pd = PdController3::new(2.0, 0.0);
        let out = pd.update(Vec3::ZERO, Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::ZERO);
        assert!((out.x - 10.0).abs() < 1e-6);
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn derivative_term_opposes_velocity() {
        let mut pd = PdController3::new(0.0, 1.0);
        // At the target but moving: output brakes.
        let out = pd.update(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, Vec3::ZERO);
        assert!((out.x + 3.0).abs() < 1e-6);
    }

    #[test]
    fn magnitude_clamp_preserves_direction() {
        let mut pd = PdController3 {
            kp: 100.0,
            max_output: 1.0,
            ..PdController3::new(100.0, 0.0)
        };
        let out = pd.update(Vec3::ZERO, Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0), Vec3::ZERO);
        assert!((out.length() - 1.0).abs() < 1e-5);
        // Direction of (3, 4, 0) survives the clamp.
        assert!((out.x - 0.6).abs() < 1e-5);
        assert!((out.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn smoothing_blends_successive_outputs() {
        let mut pd = PdController3 {
            smoothing: 0.5,
            ..PdController3::new(1.0, 0.0)
        };
        let first = pd.update(Vec3::ZERO, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO);
        assert!((first.x - 1.0).abs() < 1e-6); // 0.5 * (0 -> 2)
        let second = pd.update(Vec3::ZERO, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO);
        assert!((second.x - 1.5).abs() < 1e-6); // 1 + 0.5 * (2 - 1)
    }

    #[test]
    fn auto_tune_scales_with_mass_and_settle_time() {
        let light = PdController3::tuned_for(10.0, 2.0, 0.7);
        let heavy = PdController3::tuned_for(100.0, 2.0, 0.7);
        assert!((heavy.kp / light.kp - 10.0).abs() < 1e-4);
        assert!((heavy.kd / light.kd - 10.0).abs() < 1e-4);

        // Faster settle means stiffer gains.
        let fast = PdController3::tuned_for(10.0, 0.5, 0.7);
        assert!(fast.kp > light.kp);
    }
}
