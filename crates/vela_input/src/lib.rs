//! # VELA Input
//!
//! Adaptive gamepad input pipeline: raw 2D stick samples go in, shaped
//! 6-axis flight commands come out. Four layers run in sequence, each
//! allowed to degrade independently so a worn or drifting pad never
//! produces worse output than a plain deadzone would.
//!
//! - Layer 1 ([`calibration`]) learns the pad's rest position, noise
//!   floor, and usable range.
//! - Layer 2 ([`kalman`]) suppresses sensor noise and spikes.
//! - Layer 3 ([`neural`]) optionally compensates nonlinear pad quirks.
//! - Layer 4 ([`mrac`]) guarantees the blend stays stable.
//!
//! [`processor::InputProcessor`] owns all four plus the calibration
//! state machine and the per-sample CPU budget.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod actions;
pub mod calibration;
pub mod kalman;
pub mod mrac;
pub mod neural;
pub mod processor;

pub use actions::{Action, ActionBindings, ActionBuffer, InputService};
pub use calibration::StatisticalCalibrator;
pub use kalman::AdaptiveKalman;
pub use mrac::MracShell;
pub use neural::{Bypass, Compensation, FeatureVector, QuantizedNet};
pub use processor::{CalibrationPhase, InputProcessor, ProcessorConfig, Telemetry};
