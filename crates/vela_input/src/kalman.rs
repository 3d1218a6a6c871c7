//! Layer 2: adaptive Kalman filtering.
//!
//! A two-state constant-position model: prediction is the previous
//! estimate, measurement is the calibrated stick sample. The filter is
//! "adaptive" in one place only — measurement noise `R` is inflated by
//! three orders of magnitude for the duration of a detected spike and
//! decays geometrically back to its base afterwards.

use vela_shared::{Mat2, Vec2};

const BASE_R: f32 = 0.1;
const SPIKE_MULTIPLIER: f32 = 1000.0;
const R_DECAY: f32 = 0.999;
const OUTLIER_Z_SCORE: f32 = 3.0;

/// Adaptive Kalman filter over a 2D stick position.
#[derive(Clone, Debug)]
pub struct AdaptiveKalman {
    state: Vec2,
    p: Mat2,
    q: Mat2,
    r: Mat2,
    innovation: Vec2,
    confidence: f32,
    base_r: f32,
    outlier_count: u32,
}

impl Default for AdaptiveKalman {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveKalman {
    /// Creates a filter with high initial uncertainty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Vec2::ZERO,
            p: Mat2::IDENTITY,
            q: Mat2::diagonal(0.01),
            r: Mat2::diagonal(BASE_R),
            innovation: Vec2::ZERO,
            confidence: 1.0,
            base_r: BASE_R,
            outlier_count: 0,
        }
    }

    /// Folds one measurement into the estimate and returns the new
    /// filtered position.
    pub fn update(&mut self, measurement: Vec2) -> Vec2 {
        // Predict: constant-position model, so only covariance grows.
        let x_pred = self.state;
        let p_pred = self.p.add(self.q);

        self.innovation = measurement - x_pred;
        let innovation_magnitude = self.innovation.length();

        // Z-score against the expected innovation scale.
        let expected = p_pred.trace().sqrt();
        let z_score = if expected > 1e-3 {
            innovation_magnitude / expected
        } else {
            0.0
        };

        if z_score > OUTLIER_Z_SCORE {
            // Spike: distrust the measurement hard, remember the event.
            self.r = self.r.scale(SPIKE_MULTIPLIER);
            self.confidence *= 0.5;
            self.outlier_count += 1;
        } else {
            // Recovery: R decays toward base, confidence climbs back.
            self.r.data[0] = R_DECAY * self.r.data[0] + (1.0 - R_DECAY) * self.base_r;
            self.r.data[3] = R_DECAY * self.r.data[3] + (1.0 - R_DECAY) * self.base_r;
            self.confidence = (self.confidence * 1.01).min(1.0);
        }

        // Update: K = P (P + R)^-1, with identity fallback on a
        // singular innovation covariance.
        let s = p_pred.add(self.r);
        let k = p_pred.mul(s.inverse().unwrap_or(Mat2::IDENTITY));

        self.state = Vec2::new(
            x_pred.x + k.data[0] * self.innovation.x + k.data[1] * self.innovation.y,
            x_pred.y + k.data[2] * self.innovation.x + k.data[3] * self.innovation.y,
        );

        let i_minus_k = Mat2::new(
            1.0 - k.data[0],
            -k.data[1],
            -k.data[2],
            1.0 - k.data[3],
        );
        self.p = i_minus_k.mul(p_pred);

        self.state
    }

    /// Filtered position without feeding a new measurement.
    #[must_use]
    pub const fn state(&self) -> Vec2 {
        self.state
    }

    /// Filter confidence in `[0, 1]`; halved per spike, recovers 1% a
    /// sample.
    #[must_use]
    pub const fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Number of spike rejections since creation.
    #[must_use]
    pub const fn outlier_count(&self) -> u32 {
        self.outlier_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_to_constant_input() {
        let mut kf = AdaptiveKalman::new();
        let target = Vec2::new(0.5, -0.3);
        let mut estimate = Vec2::ZERO;
        for _ in 0..200 {
            estimate = kf.update(target);
        }
        assert!((estimate - target).length() < 0.01);
        assert_eq!(kf.outlier_count(), 0);
    }

    #[test]
    fn test_spike_is_rejected() {
        let mut kf = AdaptiveKalman::new();
        for _ in 0..200 {
            kf.update(Vec2::new(0.5, 0.0));
        }
        let confidence_before = kf.confidence();

        // A single wild sample.
        let after_spike = kf.update(Vec2::new(-1.0, 1.0));

        assert_eq!(kf.outlier_count(), 1);
        assert!(kf.confidence() < confidence_before);
        // The estimate barely moves because R was inflated x1000.
        assert!((after_spike - Vec2::new(0.5, 0.0)).length() < 0.1);
    }

    #[test]
    fn test_confidence_recovers_after_spike() {
        let mut kf = AdaptiveKalman::new();
        for _ in 0..200 {
            kf.update(Vec2::new(0.2, 0.2));
        }
        kf.update(Vec2::new(1.0, -1.0)); // spike
        let low = kf.confidence();
        for _ in 0..300 {
            kf.update(Vec2::new(0.2, 0.2));
        }
        assert!(kf.confidence() > low);
    }
}
