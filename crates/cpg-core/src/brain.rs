// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Controller Variants
// ─────────────────────────────────────────────────────────────────────
//! Closed set of controllers selected at configuration time.
//!
//! Optimizers only need `update` plus genome get/set; variants without
//! a genome report `None` / `Unsupported`.

use std::sync::Arc;

use cpg_types::{ActuatorSpec, BrainConfig, CpgError, CpgResult};

use crate::controller::DifferentialCpg;
use crate::io::{Actuator, BearingSource, Sensor};
use crate::sine::SineOscillator;

pub enum Brain {
    DifferentialCpg(DifferentialCpg),
    Sine(SineOscillator),
}

impl Brain {
    pub fn from_config(layout: &[ActuatorSpec], config: &BrainConfig) -> CpgResult<Self> {
        match config {
            BrainConfig::DifferentialCpg(c) => {
                DifferentialCpg::new(layout, c.clone()).map(Brain::DifferentialCpg)
            }
            BrainConfig::Sine(c) => SineOscillator::new(layout, c.clone()).map(Brain::Sine),
        }
    }

    /// Attach a bearing source; no-op for variants that ignore bearing.
    pub fn with_bearing_source(self, bearing: Arc<dyn BearingSource>) -> Self {
        match self {
            Brain::DifferentialCpg(cpg) => Brain::DifferentialCpg(cpg.with_bearing_source(bearing)),
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Brain::DifferentialCpg(_) => "differential_cpg",
            Brain::Sine(_) => "sine",
        }
    }

    pub fn update(
        &self,
        actuators: &mut [Box<dyn Actuator>],
        sensors: &[Box<dyn Sensor>],
        time: f64,
        step: f64,
    ) -> CpgResult<()> {
        match self {
            Brain::DifferentialCpg(cpg) => cpg.update(actuators, sensors, time, step),
            Brain::Sine(sine) => sine.update(actuators, sensors, time, step),
        }
    }

    /// Genome length; 0 for variants without one.
    pub fn n_weights(&self) -> usize {
        match self {
            Brain::DifferentialCpg(cpg) => cpg.n_weights(),
            Brain::Sine(_) => 0,
        }
    }

    pub fn connection_weights(&self) -> Option<Vec<f64>> {
        match self {
            Brain::DifferentialCpg(cpg) => Some(cpg.get_connection_weights()),
            Brain::Sine(_) => None,
        }
    }

    pub fn set_connection_weights(&self, weights: &[f64]) -> CpgResult<()> {
        match self {
            Brain::DifferentialCpg(cpg) => cpg.set_connection_weights(weights),
            Brain::Sine(_) => Err(CpgError::Unsupported(
                "sine controller has no genome".to_string(),
            )),
        }
    }
}
