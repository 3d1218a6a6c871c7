//! Layer 3: quantized compensation network.
//!
//! A small int8 fully-connected net (14 → 32 → 32 → 6) that maps stick
//! features to a full 6-axis command, intended to learn per-pad
//! nonlinearity that statistics can't express. Inference is integer
//! multiply-accumulate with clamped-linear hidden activations and a
//! tanh output, cheap enough to run every sample.
//!
//! The layer is an injectable strategy: [`QuantizedNet`] runs the
//! network, [`Bypass`] makes the layer a pass-through of the
//! statistical command so the rest of the pipeline is unaffected.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vela_shared::{Vec2, Vec6};

/// Network input width.
pub const INPUT_SIZE: usize = 14;
/// Hidden layer width.
pub const HIDDEN_SIZE: usize = 32;
/// Network output width (one per command axis).
pub const OUTPUT_SIZE: usize = 6;
/// Replay ring depth: eight seconds at 60 Hz.
pub const REPLAY_SIZE: usize = 480;

/// Feature vector handed to the compensation layer each sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureVector {
    /// Filtered stick sample, post Layers 1-2.
    pub stick: Vec2,
    /// Magnitude of `stick`.
    pub magnitude: f32,
    /// One-frame delta of the filtered sample.
    pub delta: Vec2,
    /// Dynamic deadzone estimate from Layer 1.
    pub deadzone_estimate: f32,
    /// Gain estimate from Layer 1.
    pub gain_estimate: f32,
    /// Pad age normalized to `[0, 1]` (caps at ten minutes).
    pub age: f32,
    /// Previous 6-axis command, quantized to int16 to keep the history
    /// compact in the replay ring.
    pub previous_command: [i16; OUTPUT_SIZE],
}

impl FeatureVector {
    /// Quantizes a command into the `previous_command` representation.
    #[must_use]
    pub fn quantize_command(command: Vec6) -> [i16; OUTPUT_SIZE] {
        let values = command.to_array();
        let mut out = [0_i16; OUTPUT_SIZE];
        for (slot, value) in out.iter_mut().zip(values) {
            #[allow(clippy::cast_possible_truncation)]
            {
                *slot = (value.clamp(-1.0, 1.0) * 32767.0) as i16;
            }
        }
        out
    }

    /// Flattens to the network's 14 input floats, dequantizing the
    /// command history back into `[-1, 1]`.
    #[must_use]
    pub fn to_inputs(&self) -> [f32; INPUT_SIZE] {
        let mut inputs = [0.0; INPUT_SIZE];
        inputs[0] = self.stick.x;
        inputs[1] = self.stick.y;
        inputs[2] = self.magnitude;
        inputs[3] = self.delta.x;
        inputs[4] = self.delta.y;
        inputs[5] = self.deadzone_estimate;
        inputs[6] = self.gain_estimate;
        inputs[7] = self.age;
        for (i, q) in self.previous_command.iter().enumerate() {
            inputs[8 + i] = f32::from(*q) / 32767.0;
        }
        inputs
    }
}

/// Strategy seam for Layer 3.
///
/// `compensate` receives the feature vector plus the statistical
/// command that Layers 1-2 would emit on their own; an implementation
/// may ignore either.
pub trait Compensation: Send {
    /// Produces the layer's 6-axis command for this sample.
    fn compensate(&mut self, features: &FeatureVector, statistical: Vec6) -> Vec6;

    /// Human-readable strategy name for telemetry.
    fn name(&self) -> &'static str;
}

/// Pass-through strategy: Layer 3 contributes exactly the statistical
/// command, leaving pipeline output identical to a two-layer build.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bypass;

impl Compensation for Bypass {
    fn compensate(&mut self, _features: &FeatureVector, statistical: Vec6) -> Vec6 {
        statistical
    }

    fn name(&self) -> &'static str {
        "bypass"
    }
}

/// One replay-ring slot: the features seen and the command emitted.
#[derive(Clone, Copy, Debug, Default)]
struct ReplaySlot {
    features: FeatureVector,
    target: Vec6,
}

/// Int8 fully-connected compensation network.
pub struct QuantizedNet {
    weights_fc1: Box<[i8; INPUT_SIZE * HIDDEN_SIZE]>,
    weights_fc2: Box<[i8; HIDDEN_SIZE * HIDDEN_SIZE]>,
    weights_fc3: Box<[i8; HIDDEN_SIZE * OUTPUT_SIZE]>,
    bias_fc1: [i8; HIDDEN_SIZE],
    bias_fc2: [i8; HIDDEN_SIZE],
    bias_fc3: [i8; OUTPUT_SIZE],

    input_scale: f32,
    fc1_scale: f32,
    fc2_scale: f32,
    output_scale: f32,

    replay: Box<[ReplaySlot; REPLAY_SIZE]>,
    replay_index: usize,
    replay_recorded: u64,

    total_inferences: u64,
}

impl QuantizedNet {
    /// Creates a network with small deterministic pseudo-random
    /// weights from `seed`. Weight blobs from an offline trainer would
    /// be loaded over these.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut fill = |buf: &mut [i8]| {
            for w in buf {
                *w = rng.gen_range(-127..=127);
            }
        };

        let mut weights_fc1 = Box::new([0_i8; INPUT_SIZE * HIDDEN_SIZE]);
        let mut weights_fc2 = Box::new([0_i8; HIDDEN_SIZE * HIDDEN_SIZE]);
        let mut weights_fc3 = Box::new([0_i8; HIDDEN_SIZE * OUTPUT_SIZE]);
        let mut bias_fc1 = [0_i8; HIDDEN_SIZE];
        let mut bias_fc2 = [0_i8; HIDDEN_SIZE];
        let mut bias_fc3 = [0_i8; OUTPUT_SIZE];
        fill(&mut weights_fc1[..]);
        fill(&mut weights_fc2[..]);
        fill(&mut weights_fc3[..]);
        fill(&mut bias_fc1);
        fill(&mut bias_fc2);
        fill(&mut bias_fc3);

        Self {
            weights_fc1,
            weights_fc2,
            weights_fc3,
            bias_fc1,
            bias_fc2,
            bias_fc3,
            input_scale: 127.0,
            fc1_scale: 1.0 / 127.0,
            fc2_scale: 1.0 / 127.0,
            output_scale: 1.0 / 127.0,
            replay: Box::new([ReplaySlot::default(); REPLAY_SIZE]),
            replay_index: 0,
            replay_recorded: 0,
            total_inferences: 0,
        }
    }

    /// Total inference count since creation.
    #[must_use]
    pub const fn total_inferences(&self) -> u64 {
        self.total_inferences
    }

    /// Samples recorded into the replay ring (monotonic, may exceed
    /// the ring depth).
    #[must_use]
    pub const fn replay_recorded(&self) -> u64 {
        self.replay_recorded
    }

    fn infer(&mut self, features: &FeatureVector) -> Vec6 {
        // Quantize inputs to int8.
        let inputs = features.to_inputs();
        let mut quantized = [0_i8; INPUT_SIZE];
        for (q, v) in quantized.iter_mut().zip(inputs) {
            #[allow(clippy::cast_possible_truncation)]
            {
                *q = (v * self.input_scale).clamp(-127.0, 127.0) as i8;
            }
        }

        // FC1 with clamped-linear activation.
        let mut hidden1 = [0_i16; HIDDEN_SIZE];
        for (i, h) in hidden1.iter_mut().enumerate() {
            let mut sum = i32::from(self.bias_fc1[i]);
            for (j, q) in quantized.iter().enumerate() {
                sum += i32::from(*q) * i32::from(self.weights_fc1[i * INPUT_SIZE + j]);
            }
            #[allow(clippy::cast_possible_truncation)]
            {
                *h = ((sum as f32 * self.fc1_scale) as i32).clamp(-127, 127) as i16;
            }
        }

        // FC2, same activation.
        let mut hidden2 = [0_i16; HIDDEN_SIZE];
        for (i, h) in hidden2.iter_mut().enumerate() {
            let mut sum = i32::from(self.bias_fc2[i]);
            for (j, v) in hidden1.iter().enumerate() {
                sum += i32::from(*v) * i32::from(self.weights_fc2[i * HIDDEN_SIZE + j]);
            }
            #[allow(clippy::cast_possible_truncation)]
            {
                *h = ((sum as f32 * self.fc2_scale) as i32).clamp(-127, 127) as i16;
            }
        }

        // FC3 with tanh output, back to float commands.
        let mut outputs = [0.0_f32; OUTPUT_SIZE];
        for (i, out) in outputs.iter_mut().enumerate() {
            let mut sum = i32::from(self.bias_fc3[i]);
            for (j, v) in hidden2.iter().enumerate() {
                sum += i32::from(*v) * i32::from(self.weights_fc3[i * HIDDEN_SIZE + j]);
            }
            #[allow(clippy::cast_precision_loss)]
            {
                *out = (sum as f32 * self.output_scale / 127.0).tanh();
            }
        }

        self.total_inferences += 1;
        Vec6::from_array(outputs)
    }

    fn record(&mut self, features: &FeatureVector, target: Vec6) {
        self.replay[self.replay_index] = ReplaySlot {
            features: *features,
            target,
        };
        self.replay_index = (self.replay_index + 1) % REPLAY_SIZE;
        self.replay_recorded += 1;
    }
}

impl Compensation for QuantizedNet {
    fn compensate(&mut self, features: &FeatureVector, _statistical: Vec6) -> Vec6 {
        let output = self.infer(features);
        // The ring holds the evidence an offline trainer would consume.
        self.record(features, output);
        output
    }

    fn name(&self) -> &'static str {
        "quantized-net"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_features(x: f32, y: f32) -> FeatureVector {
        FeatureVector {
            stick: Vec2::new(x, y),
            magnitude: Vec2::new(x, y).length(),
            delta: Vec2::ZERO,
            deadzone_estimate: 0.05,
            gain_estimate: 1.1,
            age: 0.2,
            previous_command: [0; OUTPUT_SIZE],
        }
    }

    #[test]
    fn test_bypass_is_identity_on_statistical_path() {
        let mut bypass = Bypass;
        let statistical = Vec6::new(0.3, -0.2, 0.0, 0.0, 0.0, 0.0);
        let out = bypass.compensate(&sample_features(0.3, -0.2), statistical);
        assert_eq!(out, statistical);
    }

    #[test]
    fn test_inference_is_bounded_and_deterministic() {
        let mut a = QuantizedNet::new(99);
        let mut b = QuantizedNet::new(99);
        let features = sample_features(0.4, 0.1);

        let out_a = a.compensate(&features, Vec6::ZERO);
        let out_b = b.compensate(&features, Vec6::ZERO);
        assert_eq!(out_a, out_b);

        // tanh output: every channel strictly inside [-1, 1].
        for v in out_a.to_array() {
            assert!(v > -1.0 && v < 1.0);
        }
        assert_eq!(a.total_inferences(), 1);
    }

    #[test]
    fn test_replay_ring_wraps() {
        let mut net = QuantizedNet::new(1);
        let features = sample_features(0.1, 0.1);
        for _ in 0..(REPLAY_SIZE + 10) {
            net.compensate(&features, Vec6::ZERO);
        }
        assert_eq!(net.replay_recorded() as usize, REPLAY_SIZE + 10);
        assert_eq!(net.replay_index, 10);
    }

    #[test]
    fn test_command_quantization_round_trip() {
        let command = Vec6::new(0.5, -0.5, 1.0, -1.0, 0.0, 0.25);
        let quantized = FeatureVector::quantize_command(command);
        let features = FeatureVector {
            previous_command: quantized,
            ..FeatureVector::default()
        };
        let inputs = features.to_inputs();
        for (restored, original) in inputs[8..].iter().zip(command.to_array()) {
            assert!((restored - original).abs() < 1e-3);
        }
    }
}
