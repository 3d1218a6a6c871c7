//! Layer 1: statistical stick calibration.
//!
//! Learns the pad's rest position (mean and variance of small samples),
//! its usable range (exponentially-weighted maxima of large samples),
//! and whether the rest position is drifting. Everything downstream
//! consumes the derived deadzone/gain/confidence estimates.

use vela_shared::Vec2;

/// Ring-buffer length for drift tracking: one second at 60 Hz.
pub const DRIFT_HISTORY: usize = 60;

const DEFAULT_ALPHA: f32 = 0.002;
const DEFAULT_REST_THRESHOLD: f32 = 0.05;
const DEFAULT_PERCENTILE_THRESHOLD: f32 = 0.9;
const MIN_SAMPLES_FOR_TRUST: u32 = 100;
const SIGMA_MULTIPLIER: f32 = 3.0;
const DRIFT_THRESHOLD: f32 = 0.05;
/// Samples after which confidence saturates (5 s at 60 Hz).
const CONFIDENCE_SAMPLES: f32 = 300.0;
/// Pad age normalization ceiling: ten minutes.
const AGE_CAP_SECONDS: f32 = 600.0;

/// Online rest/range estimator for one analog stick.
#[derive(Clone, Debug)]
pub struct StatisticalCalibrator {
    mu: Vec2,
    m2: Vec2,
    sigma: Vec2,
    m_max: Vec2,
    alpha: f32,
    sample_count: u32,
    rest_sample_count: u32,

    dynamic_deadzone: f32,
    gain_estimate: f32,
    confidence: f32,
    age_seconds: f32,

    drift_history: [Vec2; DRIFT_HISTORY],
    drift_index: usize,
    drift_detected: bool,

    rest_threshold: f32,
    percentile_threshold: f32,
    min_samples: u32,
}

impl Default for StatisticalCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticalCalibrator {
    /// Creates a calibrator with production defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_alpha(DEFAULT_ALPHA)
    }

    /// Creates a calibrator with a custom steady-state learning rate.
    /// Mainly useful for accelerated tests.
    #[must_use]
    pub fn with_alpha(alpha: f32) -> Self {
        Self {
            mu: Vec2::ZERO,
            m2: Vec2::ZERO,
            sigma: Vec2::ZERO,
            // Plausible range until real extremes are observed.
            m_max: Vec2::new(0.8, 0.8),
            alpha,
            sample_count: 0,
            rest_sample_count: 0,
            dynamic_deadzone: 0.0,
            gain_estimate: 0.0,
            confidence: 0.0,
            age_seconds: 0.0,
            drift_history: [Vec2::ZERO; DRIFT_HISTORY],
            drift_index: 0,
            drift_detected: false,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            percentile_threshold: DEFAULT_PERCENTILE_THRESHOLD,
            min_samples: MIN_SAMPLES_FOR_TRUST,
        }
    }

    /// Feeds one raw sample into the statistics.
    pub fn observe(&mut self, raw: Vec2, dt: f32) {
        self.sample_count += 1;
        self.age_seconds += dt;

        let magnitude = raw.length();

        // Rest statistics only from samples the player isn't deflecting.
        if magnitude < self.rest_threshold {
            self.rest_sample_count += 1;
            // True mean while young, exponentially-weighted once mature,
            // so early estimates converge fast and late ones track slowly.
            #[allow(clippy::cast_precision_loss)]
            let rate = self.alpha.max(1.0 / self.rest_sample_count as f32);

            let delta = raw - self.mu;
            self.mu = self.mu + delta * rate;
            let delta2 = raw - self.mu;

            // Welford-style second moment with the same blended rate.
            self.m2 = Vec2::new(
                (1.0 - rate) * self.m2.x + rate * delta.x * delta2.x,
                (1.0 - rate) * self.m2.y + rate * delta.y * delta2.y,
            );
            self.sigma = Vec2::new(self.m2.x.max(0.0).sqrt(), self.m2.y.max(0.0).sqrt());
        }

        // Range statistics only from near-full deflections.
        if magnitude > self.percentile_threshold {
            self.m_max = Vec2::new(
                0.999 * self.m_max.x + 0.001 * raw.x.abs(),
                0.999 * self.m_max.y + 0.001 * raw.y.abs(),
            );
        }

        self.dynamic_deadzone = self.mu.length() + SIGMA_MULTIPLIER * self.sigma.length();
        self.gain_estimate = self.m_max.length();
        #[allow(clippy::cast_precision_loss)]
        {
            self.confidence = (self.sample_count as f32 / CONFIDENCE_SAMPLES).min(1.0);
        }

        // Drift ring: compare the current mean to the mean one window ago.
        self.drift_history[self.drift_index] = self.mu;
        self.drift_index = (self.drift_index + 1) % DRIFT_HISTORY;
        if self.sample_count > 300 {
            let oldest = self.drift_history[self.drift_index];
            self.drift_detected = (self.mu - oldest).length() > DRIFT_THRESHOLD;
        }
    }

    /// Applies the learned correction to a raw sample: recenter, cut
    /// the dynamic deadzone, radially rescale into `[-1, 1]²`.
    #[must_use]
    pub fn correct(&self, raw: Vec2) -> Vec2 {
        // Until the statistics are trustworthy, fall back to a fixed
        // 10% radial deadzone with linear rescale.
        if self.sample_count < self.min_samples {
            let magnitude = raw.length();
            if magnitude < 0.1 {
                return Vec2::ZERO;
            }
            let scale = (magnitude - 0.1) / 0.9;
            return raw * (scale / magnitude);
        }

        let centered = raw - self.mu;
        let magnitude = centered.length();
        if magnitude < self.dynamic_deadzone {
            return Vec2::ZERO;
        }

        // Normalize against the learned usable range per axis.
        let range_x = (self.m_max.x - self.mu.x.abs()).max(1e-3);
        let range_y = (self.m_max.y - self.mu.y.abs()).max(1e-3);
        let normalized = Vec2::new(
            (centered.x / range_x).clamp(-1.0, 1.0),
            (centered.y / range_y).clamp(-1.0, 1.0),
        );

        let scale_factor = (magnitude - self.dynamic_deadzone) / (1.0 - self.dynamic_deadzone);
        let norm_magnitude = normalized.length();
        if norm_magnitude > 1e-4 {
            normalized * (scale_factor / norm_magnitude)
        } else {
            Vec2::ZERO
        }
    }

    /// Learned rest position.
    #[must_use]
    pub const fn mu(&self) -> Vec2 {
        self.mu
    }

    /// Learned rest noise (standard deviation per axis).
    #[must_use]
    pub const fn sigma(&self) -> Vec2 {
        self.sigma
    }

    /// Rest-position magnitude plus three sigma.
    #[must_use]
    pub const fn dynamic_deadzone(&self) -> f32 {
        self.dynamic_deadzone
    }

    /// Magnitude of the learned per-axis maxima.
    #[must_use]
    pub const fn gain_estimate(&self) -> f32 {
        self.gain_estimate
    }

    /// Statistics trust level in `[0, 1]`; saturates after 300 samples.
    #[must_use]
    pub const fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Whether the rest position moved more than the drift threshold
    /// within the last window.
    #[must_use]
    pub const fn drift_detected(&self) -> bool {
        self.drift_detected
    }

    /// Total samples observed.
    #[must_use]
    pub const fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Seconds since the calibrator was created, capped-normalized to
    /// `[0, 1]` for use as a feature.
    #[must_use]
    pub fn age_normalized(&self) -> f32 {
        (self.age_seconds / AGE_CAP_SECONDS).min(1.0)
    }
}
