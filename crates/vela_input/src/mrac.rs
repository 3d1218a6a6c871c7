//! Layer 4: model-reference adaptive safety shell.
//!
//! The final defense between the compensation network and the flight
//! controller. The shell blends the neural and statistical commands
//! with a convex weight `λ`, runs a second-order reference model of the
//! behavior we *want*, adapts small per-channel gains toward it, and
//! watches a Lyapunov-like energy. When the energy crosses the margin,
//! `λ` is cut multiplicatively — the network loses influence faster
//! than it can earn it back.

use vela_shared::Vec6;

const DEFAULT_REFERENCE_DAMPING: f32 = 0.7;
const DEFAULT_REFERENCE_FREQUENCY: f32 = 2.0;
const DEFAULT_ADAPTATION_RATE: f32 = 0.1;
const DEFAULT_SIGMA_BOUND: f32 = 1.0;
const DEFAULT_STABILITY_MARGIN: f32 = 1.0;
const INITIAL_LAMBDA: f32 = 0.1;
const LAMBDA_DECAY: f32 = 0.95;
const LAMBDA_GROWTH: f32 = 0.01;

/// Model-reference adaptive mixer over six command channels.
#[derive(Clone, Debug)]
pub struct MracShell {
    reference_state: Vec6,
    reference_output: Vec6,
    reference_damping: f32,
    reference_frequency: f32,

    adaptive_gains: Vec6,
    adaptation_rate: f32,
    sigma_bound: f32,

    lyapunov_energy: f32,
    stability_margin: f32,
    stability_assured: bool,

    neural_confidence: f32,
    mixing_lambda: f32,
}

impl Default for MracShell {
    fn default() -> Self {
        Self::new()
    }
}

impl MracShell {
    /// Creates a shell with a conservative initial mix (λ = 0.1).
    #[must_use]
    pub fn new() -> Self {
        Self {
            reference_state: Vec6::ZERO,
            reference_output: Vec6::ZERO,
            reference_damping: DEFAULT_REFERENCE_DAMPING,
            reference_frequency: DEFAULT_REFERENCE_FREQUENCY,
            adaptive_gains: Vec6::ZERO,
            adaptation_rate: DEFAULT_ADAPTATION_RATE,
            sigma_bound: DEFAULT_SIGMA_BOUND,
            lyapunov_energy: 0.0,
            stability_margin: DEFAULT_STABILITY_MARGIN,
            stability_assured: true,
            neural_confidence: 0.5,
            mixing_lambda: INITIAL_LAMBDA,
        }
    }

    /// Blends neural and statistical commands into the final output.
    ///
    /// `reference_command` drives the internal second-order reference
    /// model; the caller passes the neural command there so the model
    /// tracks what the network is asking for.
    pub fn mix(
        &mut self,
        neural: Vec6,
        statistical: Vec6,
        reference_command: Vec6,
        dt: f32,
    ) -> Vec6 {
        // Second-order reference dynamics:
        //   ÿ = ωₙ²(u − y) − 2ζωₙ ẏ
        let reference_error = reference_command - self.reference_state;
        let spring = reference_error * (self.reference_frequency * self.reference_frequency);
        let damping = self.reference_output
            * (2.0 * self.reference_damping * self.reference_frequency);
        self.reference_output = spring - damping;
        self.reference_state = self.reference_state + self.reference_output * dt;

        // Convex blend of the two candidate commands.
        let mixed = neural * self.mixing_lambda + statistical * (1.0 - self.mixing_lambda);

        // Gradient adaptation toward the reference, saturated per
        // channel so one bad sample can't run a gain away.
        let tracking_error = mixed - self.reference_output;
        let error_magnitude = tracking_error.length();

        let mut gains = self.adaptive_gains.to_array();
        for (gain, err) in gains.iter_mut().zip(tracking_error.to_array()) {
            *gain += self.adaptation_rate * err * error_magnitude * dt;
            *gain = gain.clamp(-self.sigma_bound, self.sigma_bound);
        }
        self.adaptive_gains = Vec6::from_array(gains);

        let compensated = mixed + self.adaptive_gains;

        // Lyapunov-like energy: tracking error plus gain magnitude.
        self.lyapunov_energy =
            error_magnitude * error_magnitude + self.adaptive_gains.dot(self.adaptive_gains);
        self.stability_assured = self.lyapunov_energy < self.stability_margin;

        if !self.stability_assured {
            self.mixing_lambda *= LAMBDA_DECAY;
        } else if self.mixing_lambda < self.neural_confidence {
            self.mixing_lambda += LAMBDA_GROWTH;
        }

        compensated
    }

    /// Sets the ceiling λ may grow toward.
    pub fn set_neural_confidence(&mut self, confidence: f32) {
        self.neural_confidence = confidence.clamp(0.0, 1.0);
    }

    /// Current convex mixing weight.
    #[must_use]
    pub const fn mixing_lambda(&self) -> f32 {
        self.mixing_lambda
    }

    /// Current Lyapunov-like energy.
    #[must_use]
    pub const fn lyapunov_energy(&self) -> f32 {
        self.lyapunov_energy
    }

    /// True while the energy stays under the stability margin.
    #[must_use]
    pub const fn stability_assured(&self) -> bool {
        self.stability_assured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_zero_inputs_stay_zero() {
        let mut shell = MracShell::new();
        let out = shell.mix(Vec6::ZERO, Vec6::ZERO, Vec6::ZERO, DT);
        assert_eq!(out, Vec6::ZERO);
        assert!(shell.stability_assured());
    }

    #[test]
    fn test_low_lambda_favors_statistical_path() {
        let mut shell = MracShell::new();
        let neural = Vec6::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        let statistical = Vec6::new(0.2, 0.0, 0.0, 0.0, 0.0, 0.0);
        let out = shell.mix(neural, statistical, neural, DT);
        // λ starts at 0.1: output leans heavily on the statistical command.
        assert!((out.pitch - (0.1 + 0.9 * 0.2)).abs() < 0.1);
        assert!(out.yaw < 0.3);
    }

    #[test]
    fn test_instability_cuts_lambda() {
        let mut shell = MracShell::new();
        shell.set_neural_confidence(1.0);
        let lambda_start = shell.mixing_lambda();

        // Violent disagreement between the paths drives the tracking
        // error, and with it the energy, over the margin.
        let neural = Vec6::new(1.0, -1.0, 1.0, -1.0, 1.0, -1.0);
        let statistical = Vec6::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let mut saw_unstable = false;
        for _ in 0..120 {
            shell.mix(neural, statistical, neural, DT);
            if !shell.stability_assured() {
                saw_unstable = true;
            }
        }
        assert!(saw_unstable);
        assert!(shell.mixing_lambda() < lambda_start + 0.2);
    }

    #[test]
    fn test_lambda_grows_toward_confidence_when_stable() {
        let mut shell = MracShell::new();
        shell.set_neural_confidence(0.8);
        // Agreeing, tiny commands keep the energy near zero.
        let calm = Vec6::new(0.01, 0.0, 0.0, 0.0, 0.0, 0.0);
        for _ in 0..30 {
            shell.mix(calm, calm, calm, DT);
        }
        assert!(shell.mixing_lambda() > INITIAL_LAMBDA);
        assert!(shell.mixing_lambda() <= 0.8 + LAMBDA_GROWTH);
    }

    #[test]
    fn test_adaptive_gains_saturate() {
        let mut shell = MracShell::new();
        let big = Vec6::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        for _ in 0..10_000 {
            shell.mix(big, big, Vec6::ZERO, DT);
        }
        for gain in shell.adaptive_gains.to_array() {
            assert!(gain.abs() <= DEFAULT_SIGMA_BOUND + f32::EPSILON);
        }
    }
}
