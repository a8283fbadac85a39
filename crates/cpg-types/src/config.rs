// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{CpgError, CpgResult};
use crate::layout::LateralAxis;

/// Construction parameters for the differential CPG.
///
/// Parsing the robot description file that produces these values is the
/// simulation host's job; this struct only holds and validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpgConfig {
    /// Draw the initial neuron state uniformly from
    /// `[-init_neuron_state, init_neuron_state]` instead of the A/−B split.
    /// Default: false.
    pub reset_neuron_random: bool,

    /// Bias lateral actuators by the bearing to the target.
    /// Default: false.
    pub use_frame_of_reference: bool,

    /// Magnitude of the initial A/−B state split.
    /// Default: 0.707.
    pub init_neuron_state: f64,

    /// Symmetric coupling-weight range bound; genes map onto `[-range_ub, range_ub]`.
    /// Default: 1.0.
    pub range_ub: f64,

    /// Output gain applied after squashing.
    /// Default: 1.0.
    pub output_signal_factor: f64,

    /// Saturation bound of the output squash.
    /// Default: 1.0.
    pub abs_output_bound: f64,

    /// Planar Manhattan distance between lattice neighbours (module pitch).
    /// Default: 2.0.
    pub neighbor_distance: f64,

    /// Axis whose sign tags an actuator as left or right.
    /// Default: x.
    pub lateral_axis: LateralAxis,

    /// Seed for randomized resets. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Initial genome. `None` starts every gene at 0.5 (zero coupling).
    pub weights: Option<Vec<f64>>,
}

impl Default for CpgConfig {
    fn default() -> Self {
        Self {
            reset_neuron_random: false,
            use_frame_of_reference: false,
            init_neuron_state: 0.707,
            range_ub: 1.0,
            output_signal_factor: 1.0,
            abs_output_bound: 1.0,
            neighbor_distance: 2.0,
            lateral_axis: LateralAxis::X,
            seed: None,
            weights: None,
        }
    }
}

impl CpgConfig {
    /// Validate configuration parameters.
    ///
    /// The genome length is checked later, once the topology is known.
    pub fn validate(&self) -> CpgResult<()> {
        if !self.range_ub.is_finite() || self.range_ub <= 0.0 {
            return Err(CpgError::Config(format!(
                "range_ub must be finite and > 0, got {}",
                self.range_ub
            )));
        }
        if !self.init_neuron_state.is_finite() || self.init_neuron_state < 0.0 {
            return Err(CpgError::Config(format!(
                "init_neuron_state must be finite and >= 0, got {}",
                self.init_neuron_state
            )));
        }
        if !self.abs_output_bound.is_finite() || self.abs_output_bound <= 0.0 {
            return Err(CpgError::Config(format!(
                "abs_output_bound must be finite and > 0, got {}",
                self.abs_output_bound
            )));
        }
        if !self.output_signal_factor.is_finite() {
            return Err(CpgError::Config(format!(
                "output_signal_factor must be finite, got {}",
                self.output_signal_factor
            )));
        }
        if !self.neighbor_distance.is_finite() || self.neighbor_distance <= 0.0 {
            return Err(CpgError::Config(format!(
                "neighbor_distance must be finite and > 0, got {}",
                self.neighbor_distance
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> CpgResult<Self> {
        serde_json::from_str(json).map_err(|e| CpgError::Config(format!("JSON parse error: {e}")))
    }

    /// Largest magnitude an actuator command can reach.
    pub fn output_limit(&self) -> f64 {
        (self.output_signal_factor * self.abs_output_bound).abs()
    }
}

/// Open-loop sine controller parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineConfig {
    /// Peak command. Default: 1.0.
    pub amplitude: f64,
    /// Oscillation frequency in Hz. Default: 1.0.
    pub frequency: f64,
    /// Phase offset per unit of x-coordinate (rad). Default: π/4.
    pub phase_lag: f64,
}

impl Default for SineConfig {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 1.0,
            phase_lag: std::f64::consts::FRAC_PI_4,
        }
    }
}

impl SineConfig {
    pub fn validate(&self) -> CpgResult<()> {
        if !self.amplitude.is_finite() || !self.frequency.is_finite() || !self.phase_lag.is_finite()
        {
            return Err(CpgError::Config(format!(
                "sine parameters must be finite, got {self:?}"
            )));
        }
        if self.frequency < 0.0 {
            return Err(CpgError::Config(format!(
                "frequency must be >= 0, got {}",
                self.frequency
            )));
        }
        Ok(())
    }
}

/// Controller variant chosen at configuration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrainConfig {
    DifferentialCpg(CpgConfig),
    Sine(SineConfig),
}

impl BrainConfig {
    pub fn validate(&self) -> CpgResult<()> {
        match self {
            BrainConfig::DifferentialCpg(c) => c.validate(),
            BrainConfig::Sine(c) => c.validate(),
        }
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> CpgResult<Self> {
        serde_json::from_str(json).map_err(|e| CpgError::Config(format!("JSON parse error: {e}")))
    }
}
