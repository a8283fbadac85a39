// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Output Mapper
// ─────────────────────────────────────────────────────────────────────
//! Oscillator state → bounded actuator commands.
//!
//!   out = factor · bound · (2 / (1 + e^(−2·s/bound)) − 1)
//!
//! which is `factor · bound · tanh(s / bound)`, saturating at
//! ±factor·bound. An optional frame-of-reference bias slows the
//! lateral actuators on the outer side of the turn towards a target.

use cpg_types::{CpgConfig, LateralSide};

use crate::topology::Topology;

/// Saturating squash of a single neuron state.
#[inline]
pub fn squash(state: f64, factor: f64, bound: f64) -> f64 {
    factor * bound * (2.0 / (1.0 + (-2.0 * state / bound).exp()) - 1.0)
}

/// `((180 − |bearing|) / 180)^7`, with |bearing| clamped to 180°.
#[inline]
pub fn slow_down_factor(bearing_deg: f64) -> f64 {
    let b = bearing_deg.abs().min(180.0);
    ((180.0 - b) / 180.0).powi(7)
}

/// Wrap a bearing into (−180°, 180°], so sources reporting in [0, 360)
/// keep their meaning: 270° is −90° (target to the right).
#[inline]
pub fn wrap_bearing(bearing_deg: f64) -> f64 {
    let b = bearing_deg.rem_euclid(360.0);
    if b > 180.0 {
        b - 360.0
    } else {
        b
    }
}

/// True if `side` is on the outer side of the turn needed for `bearing_deg`.
///
/// Positive bearing means the target is to the left, so the right side
/// is outer; negative bearing makes the left side outer.
#[inline]
pub fn is_outer_side(side: LateralSide, bearing_deg: f64) -> bool {
    match side {
        LateralSide::Right => bearing_deg > 0.0,
        LateralSide::Left => bearing_deg < 0.0,
        LateralSide::Midline => false,
    }
}

/// Per-actuator output stage.
#[derive(Debug, Clone)]
pub struct OutputMapper {
    factor: f64,
    bound: f64,
    use_frame_of_reference: bool,
    sides: Vec<LateralSide>,
}

impl OutputMapper {
    pub fn new(config: &CpgConfig, topology: &Topology) -> Self {
        let sides = topology
            .actuators()
            .iter()
            .map(|a| a.coordinate.lateral_side(config.lateral_axis))
            .collect();
        Self {
            factor: config.output_signal_factor,
            bound: config.abs_output_bound,
            use_frame_of_reference: config.use_frame_of_reference,
            sides,
        }
    }

    pub fn sides(&self) -> &[LateralSide] {
        &self.sides
    }

    /// Command for actuator `index` given its A-neuron state.
    pub fn map_one(&self, index: usize, state: f64, bearing_deg: Option<f64>) -> f64 {
        let out = squash(state, self.factor, self.bound);
        if !self.use_frame_of_reference {
            return out;
        }
        match bearing_deg {
            Some(b) if is_outer_side(self.sides[index], b) => out * slow_down_factor(b),
            _ => out,
        }
    }

    /// Fill `out` from the flat neuron states (reads the A neuron, index 2i).
    pub fn map(&self, states: &[f64], bearing_deg: Option<f64>, out: &mut [f64]) {
        debug_assert_eq!(states.len(), 2 * out.len());
        for (i, o) in out.iter_mut().enumerate() {
            *o = self.map_one(i, states[2 * i], bearing_deg);
        }
    }
}
