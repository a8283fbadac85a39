// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Genome Mapper
// ─────────────────────────────────────────────────────────────────────
//! Flat genome → signed, antisymmetric coupling matrix.
//!
//! Genes live in [0, 1] and are scaled linearly onto
//! `[-range_ub, range_ub]`. Genes `0..N` drive each actuator's A↔B
//! coupling; genes `N..` drive the inter-actuator A↔A couplings in
//! connection discovery order.

use std::collections::HashSet;

use cpg_types::{CpgError, CpgResult, Polarity};

use crate::matrix::CouplingMatrix;
use crate::topology::Topology;

/// Builds coupling matrices for one topology and weight range.
#[derive(Debug, Clone)]
pub struct GenomeMapper {
    range_lb: f64,
    range_ub: f64,
}

impl GenomeMapper {
    /// A zero-width range would collapse every weight to 0.
    pub fn new(range_ub: f64) -> CpgResult<Self> {
        if !range_ub.is_finite() || range_ub <= 0.0 {
            return Err(CpgError::Config(format!(
                "range_ub must be finite and > 0, got {range_ub}"
            )));
        }
        Ok(Self {
            range_lb: -range_ub,
            range_ub,
        })
    }

    /// Map a raw gene in [0, 1] onto the coupling range.
    #[inline]
    pub fn scale(&self, v: f64) -> f64 {
        self.range_lb + v * (self.range_ub - self.range_lb)
    }

    pub fn validate_length(&self, topology: &Topology, weights: &[f64]) -> bool {
        weights.len() == topology.n_weights()
    }

    /// Length and finiteness check.
    pub fn check(&self, topology: &Topology, weights: &[f64]) -> CpgResult<()> {
        if !self.validate_length(topology, weights) {
            return Err(CpgError::GenomeLength {
                expected: topology.n_weights(),
                got: weights.len(),
            });
        }
        if let Some((index, &value)) = weights.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CpgError::GenomeValue { index, value });
        }
        if weights.iter().any(|v| !(0.0..=1.0).contains(v)) {
            log::warn!("genome has genes outside [0, 1]; scaling extrapolates past ±range_ub");
        }
        Ok(())
    }

    /// Assemble the coupling matrix for `weights`.
    pub fn build_matrix(&self, topology: &Topology, weights: &[f64]) -> CpgResult<CouplingMatrix> {
        self.check(topology, weights)?;

        let n_actuators = topology.n_actuators();
        let mut m = CouplingMatrix::zeros(topology.n_neurons());

        for (i, &gene) in weights.iter().take(n_actuators).enumerate() {
            m.set_antisymmetric(2 * i, 2 * i + 1, self.scale(gene));
        }

        // The lookup holds every connection twice; apply each once, oriented
        // from the lower flat position so the sign does not depend on
        // iteration order.
        let neurons = topology.neurons();
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(topology.n_connections());
        for ((a, b), conn) in topology.directed_pairs() {
            let pa = topology.neuron_position(&neurons[2 * a].coordinate, Polarity::A);
            let pb = topology.neuron_position(&neurons[2 * b].coordinate, Polarity::A);
            let (Some(pa), Some(pb)) = (pa, pb) else {
                return Err(CpgError::Topology(format!(
                    "connection ({a}, {b}) references a missing neuron"
                )));
            };
            let key = (pa.min(pb), pa.max(pb));
            if !seen.insert(key) {
                continue;
            }
            m.set_antisymmetric(key.0, key.1, self.scale(weights[conn.weight_index]));
        }

        Ok(m)
    }
}
