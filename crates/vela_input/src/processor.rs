//! The assembled input pipeline and its calibration state machine.
//!
//! One [`InputProcessor`] per physical stick. Every sample flows
//! through all four layers in order; each layer may be disabled
//! independently, and Layer 3 additionally gates itself on calibration
//! confidence and the CPU budget.

use std::time::Instant;

use vela_shared::{Vec2, Vec6};

use crate::calibration::StatisticalCalibrator;
use crate::kalman::AdaptiveKalman;
use crate::mrac::MracShell;
use crate::neural::{Bypass, Compensation, FeatureVector, QuantizedNet};

/// Per-sample CPU budget in microseconds.
pub const CPU_BUDGET_US: f32 = 100.0;

/// Default seed for the compensation network's initial weights.
const DEFAULT_NET_SEED: u64 = 0x5645_4C41; // "VELA"

/// Calibration lifecycle of a connected pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// No meaningful input seen yet.
    Waiting,
    /// Building the statistical foundation.
    Statistical,
    /// Normal operation; compensation permitted.
    Production,
    /// Rest-position drift detected; statistics re-learning.
    Continual,
}

/// Pipeline layer switches and limits.
#[derive(Clone, Copy, Debug)]
pub struct ProcessorConfig {
    /// Layer 2 on/off.
    pub enable_kalman: bool,
    /// Layer 4 on/off. With it off, the mix is a plain λ-blend.
    pub enable_mrac: bool,
    /// Per-sample budget in microseconds; a breach latches and
    /// disables Layer 3 for the rest of the session.
    pub cpu_budget_us: f32,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            enable_kalman: true,
            enable_mrac: true,
            cpu_budget_us: CPU_BUDGET_US,
        }
    }
}

/// Read-only pipeline telemetry for HUD and debug overlays.
#[derive(Clone, Copy, Debug)]
pub struct Telemetry {
    /// Current calibration phase.
    pub phase: CalibrationPhase,
    /// Layer 1 confidence in `[0, 1]`.
    pub calibration_confidence: f32,
    /// Layer 1 dynamic deadzone estimate.
    pub dynamic_deadzone: f32,
    /// Layer 1 gain estimate.
    pub gain_estimate: f32,
    /// Layer 1 drift flag.
    pub drift_detected: bool,
    /// Layer 2 confidence in `[0, 1]`.
    pub kalman_confidence: f32,
    /// Layer 2 spike rejections so far.
    pub outlier_count: u32,
    /// Whether Layer 3 ran for the last sample.
    pub neural_active: bool,
    /// Layer 4 mixing weight λ.
    pub mixing_lambda: f32,
    /// Layer 4 Lyapunov-like energy.
    pub lyapunov_energy: f32,
    /// Layer 4 stability verdict.
    pub stability_assured: bool,
    /// Wall time of the last sample in microseconds.
    pub last_sample_us: f32,
    /// Samples processed since creation or reset.
    pub samples_processed: u64,
    /// Latched budget-breach flag.
    pub budget_exceeded: bool,
}

/// The four-layer adaptive input processor.
pub struct InputProcessor {
    calibrator: StatisticalCalibrator,
    kalman: AdaptiveKalman,
    compensator: Box<dyn Compensation>,
    mrac: MracShell,

    phase: CalibrationPhase,
    phase_timer: f32,
    neural_enabled: bool,
    budget_exceeded: bool,

    previous_output: Vec6,
    previous_filtered: Vec2,

    config: ProcessorConfig,
    samples_processed: u64,
    last_sample_us: f32,
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProcessor {
    /// Creates a processor with the default config and the quantized
    /// compensation network.
    #[must_use]
    pub fn new() -> Self {
        Self::with_compensator(
            ProcessorConfig::default(),
            Box::new(QuantizedNet::new(DEFAULT_NET_SEED)),
        )
    }

    /// Creates a processor whose Layer 3 passes the statistical
    /// command through unchanged.
    #[must_use]
    pub fn with_bypass(config: ProcessorConfig) -> Self {
        Self::with_compensator(config, Box::new(Bypass))
    }

    /// Creates a processor with an explicit Layer 3 strategy.
    #[must_use]
    pub fn with_compensator(config: ProcessorConfig, compensator: Box<dyn Compensation>) -> Self {
        Self {
            calibrator: StatisticalCalibrator::new(),
            kalman: AdaptiveKalman::new(),
            compensator,
            mrac: MracShell::new(),
            phase: CalibrationPhase::Waiting,
            phase_timer: 0.0,
            neural_enabled: false,
            budget_exceeded: false,
            previous_output: Vec6::ZERO,
            previous_filtered: Vec2::ZERO,
            config,
            samples_processed: 0,
            last_sample_us: 0.0,
        }
    }

    /// Processes one raw stick sample into a 6-axis command.
    pub fn process(&mut self, raw: Vec2, dt: f32) -> Vec6 {
        let started = Instant::now();

        self.advance_phase(raw, dt);

        // Layer 1: always active.
        self.calibrator.observe(raw, dt);
        let calibrated = self.calibrator.correct(raw);

        // Layer 2.
        let filtered = if self.config.enable_kalman {
            self.kalman.update(calibrated)
        } else {
            calibrated
        };

        let features = FeatureVector {
            stick: filtered,
            magnitude: filtered.length(),
            delta: filtered - self.previous_filtered,
            deadzone_estimate: self.calibrator.dynamic_deadzone(),
            gain_estimate: self.calibrator.gain_estimate(),
            age: self.calibrator.age_normalized(),
            previous_command: FeatureVector::quantize_command(self.previous_output),
        };
        self.previous_filtered = filtered;

        // The statistical command: the pipeline's floor. Stick axes
        // map straight onto the two primary rotation channels.
        let statistical = Vec6 {
            pitch: filtered.y,
            yaw: filtered.x,
            ..Vec6::ZERO
        };

        // Layer 3, gated.
        let neural = if self.neural_enabled {
            self.compensator.compensate(&features, statistical)
        } else {
            Vec6::ZERO
        };

        // Layer 4.
        let output = if self.config.enable_mrac {
            self.mrac
                .set_neural_confidence(self.calibrator.confidence() * self.kalman.confidence());
            self.mrac.mix(neural, statistical, neural, dt)
        } else {
            let lambda = self.mrac.mixing_lambda();
            neural * lambda + statistical * (1.0 - lambda)
        };

        self.previous_output = output;
        self.samples_processed += 1;

        #[allow(clippy::cast_precision_loss)]
        {
            self.last_sample_us = started.elapsed().as_nanos() as f32 / 1000.0;
        }
        if self.last_sample_us > self.config.cpu_budget_us && !self.budget_exceeded {
            self.budget_exceeded = true;
            self.neural_enabled = false;
            tracing::warn!(
                "input pipeline over budget ({:.1} us > {:.1} us), compensation disabled",
                self.last_sample_us,
                self.config.cpu_budget_us
            );
        }

        output
    }

    fn advance_phase(&mut self, raw: Vec2, dt: f32) {
        self.phase_timer += dt;

        match self.phase {
            CalibrationPhase::Waiting => {
                // Any real deflection, or a steady trickle of samples,
                // means a pad is connected.
                if raw.length() > 0.001 || self.calibrator.sample_count() > 10 {
                    tracing::info!("pad detected, starting statistical calibration");
                    self.phase = CalibrationPhase::Statistical;
                    self.phase_timer = 0.0;
                }
            }
            CalibrationPhase::Statistical => {
                if self.phase_timer >= 5.0 && self.calibrator.confidence() >= 0.8 {
                    tracing::info!(
                        "statistical calibration complete ({:.2} confidence)",
                        self.calibrator.confidence()
                    );
                    self.phase = CalibrationPhase::Production;
                    self.phase_timer = 0.0;
                    if !self.budget_exceeded {
                        self.neural_enabled = true;
                    }
                }
            }
            CalibrationPhase::Production => {
                if self.calibrator.drift_detected() {
                    tracing::info!("rest-position drift detected, re-learning");
                    self.phase = CalibrationPhase::Continual;
                }
            }
            CalibrationPhase::Continual => {
                if !self.calibrator.drift_detected() {
                    tracing::info!("drift compensation complete");
                    self.phase = CalibrationPhase::Production;
                }
            }
        }
    }

    /// Restores the processor to its freshly-created state, keeping
    /// the configured Layer 3 strategy. This is also the only way to
    /// clear a latched budget breach.
    pub fn reset(&mut self) {
        self.calibrator = StatisticalCalibrator::new();
        self.kalman = AdaptiveKalman::new();
        self.mrac = MracShell::new();
        self.phase = CalibrationPhase::Waiting;
        self.phase_timer = 0.0;
        self.neural_enabled = false;
        self.budget_exceeded = false;
        self.previous_output = Vec6::ZERO;
        self.previous_filtered = Vec2::ZERO;
        self.samples_processed = 0;
        self.last_sample_us = 0.0;
    }

    /// Current calibration phase.
    #[must_use]
    pub const fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    /// Whether Layer 3 will run for the next sample.
    #[must_use]
    pub const fn neural_active(&self) -> bool {
        self.neural_enabled
    }

    /// Latched budget-breach flag.
    #[must_use]
    pub const fn budget_exceeded(&self) -> bool {
        self.budget_exceeded
    }

    /// Direct access to Layer 1 for diagnostics.
    #[must_use]
    pub const fn calibrator(&self) -> &StatisticalCalibrator {
        &self.calibrator
    }

    /// Snapshot of the whole pipeline's state.
    #[must_use]
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            phase: self.phase,
            calibration_confidence: self.calibrator.confidence(),
            dynamic_deadzone: self.calibrator.dynamic_deadzone(),
            gain_estimate: self.calibrator.gain_estimate(),
            drift_detected: self.calibrator.drift_detected(),
            kalman_confidence: self.kalman.confidence(),
            outlier_count: self.kalman.outlier_count(),
            neural_active: self.neural_enabled,
            mixing_lambda: self.mrac.mixing_lambda(),
            lyapunov_energy: self.mrac.lyapunov_energy(),
            stability_assured: self.mrac.stability_assured(),
            last_sample_us: self.last_sample_us,
            samples_processed: self.samples_processed,
            budget_exceeded: self.budget_exceeded,
        }
    }
}
