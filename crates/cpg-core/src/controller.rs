// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Controller Facade
// ─────────────────────────────────────────────────────────────────────
//! Per-tick `update` and genome accessors over the oscillator network.
//!
//! Lifecycle: construction builds the topology, the coupling matrix for
//! the initial genome and the initial neuron state. Each `update`
//! advances one RK4 step and writes one command per actuator. A genome
//! write replaces the genome and matrix wholesale and resets the neuron
//! state, so every optimizer evaluation starts from the same point.
//!
//! Thread-safe: genome, matrix, neuron state and clock sit behind one
//! `parking_lot::Mutex`. A tick or a genome write holds it for its full
//! duration; a genome write is validated and its matrix built before the
//! lock is taken, so a rejected genome leaves the controller untouched.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use cpg_dynamics::{
    wrap_bearing, CouplingMatrix, GenomeMapper, OscillatorState, OutputMapper, Rk4Stepper,
    Topology,
};
use cpg_types::{ActuatorSpec, CpgConfig, CpgError, CpgResult};

use crate::io::{Actuator, BearingSource, Sensor};

/// Serializable view of the controller for external logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpgSnapshot {
    /// Host time passed to the most recent `update`; 0 after a reset.
    pub time: f64,
    /// Ticks since construction or the last reset.
    pub step_count: u64,
    /// Flat neuron states.
    pub states: Vec<f64>,
    /// Most recent command per actuator (layout order).
    pub outputs: Vec<f64>,
}

struct CpgState {
    weights: Vec<f64>,
    matrix: CouplingMatrix,
    oscillator: OscillatorState,
    stepper: Rk4Stepper,
    outputs: Vec<f64>,
    channel: Vec<f64>,
    time: f64,
}

/// Initial neuron state: A = +init, B = −init, or uniform noise in ±init.
fn initial_neuron_state(config: &CpgConfig, n_neurons: usize) -> Vec<f64> {
    let init = config.init_neuron_state;
    if config.reset_neuron_random {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        (0..n_neurons).map(|_| rng.gen_range(-init..=init)).collect()
    } else {
        (0..n_neurons)
            .map(|i| if i % 2 == 0 { init } else { -init })
            .collect()
    }
}

/// Coupled-oscillator motor controller driven by a flat genome.
pub struct DifferentialCpg {
    config: CpgConfig,
    topology: Topology,
    mapper: GenomeMapper,
    output: OutputMapper,
    bearing: Option<Arc<dyn BearingSource>>,
    state: Mutex<CpgState>,
}

impl DifferentialCpg {
    /// Build the controller for an actuator layout.
    ///
    /// Fails on invalid configuration, malformed layout or a genome whose
    /// length does not match the topology.
    pub fn new(layout: &[ActuatorSpec], config: CpgConfig) -> CpgResult<Self> {
        config.validate()?;
        let topology = Topology::build(layout, config.neighbor_distance)?;
        let mapper = GenomeMapper::new(config.range_ub)?;

        let weights = config
            .weights
            .clone()
            .unwrap_or_else(|| vec![0.5; topology.n_weights()]);
        let matrix = mapper.build_matrix(&topology, &weights)?;

        let n_neurons = topology.n_neurons();
        let output = OutputMapper::new(&config, &topology);
        let state = CpgState {
            weights,
            matrix,
            oscillator: OscillatorState::new(initial_neuron_state(&config, n_neurons)),
            stepper: Rk4Stepper::new(n_neurons),
            outputs: vec![0.0; topology.n_actuators()],
            channel: Vec::new(),
            time: 0.0,
        };

        log::info!(
            "differential CPG: {} actuators, {} connections, {} weights",
            topology.n_actuators(),
            topology.n_connections(),
            topology.n_weights()
        );

        Ok(Self {
            config,
            topology,
            mapper,
            output,
            bearing: None,
            state: Mutex::new(state),
        })
    }

    /// Attach the bearing-to-target source used by the frame-of-reference bias.
    pub fn with_bearing_source(mut self, bearing: Arc<dyn BearingSource>) -> Self {
        self.bearing = Some(bearing);
        self
    }

    /// Construction-time configuration. Its `weights` field is the
    /// initial genome only; `get_connection_weights` is authoritative.
    pub fn config(&self) -> &CpgConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn n_actuators(&self) -> usize {
        self.topology.n_actuators()
    }

    pub fn n_connections(&self) -> usize {
        self.topology.n_connections()
    }

    pub fn n_weights(&self) -> usize {
        self.topology.n_weights()
    }

    /// The genome most recently set, exactly as given.
    pub fn get_connection_weights(&self) -> Vec<f64> {
        self.state.lock().weights.clone()
    }

    /// Replace the genome, rebuild the matrix and reset the neuron state.
    pub fn set_connection_weights(&self, weights: &[f64]) -> CpgResult<()> {
        let matrix = match self.mapper.build_matrix(&self.topology, weights) {
            Ok(m) => m,
            Err(e) => {
                log::error!("rejected genome: {e}");
                return Err(e);
            }
        };
        let initial = initial_neuron_state(&self.config, self.topology.n_neurons());

        let mut state = self.state.lock();
        state.weights = weights.to_vec();
        state.matrix = matrix;
        state.oscillator = OscillatorState::new(initial);
        state.outputs.iter_mut().for_each(|o| *o = 0.0);
        state.time = 0.0;
        log::debug!("genome replaced ({} weights), neuron state reset", weights.len());
        Ok(())
    }

    /// Restore the initial neuron state, keeping the genome.
    pub fn reset(&self) {
        let initial = initial_neuron_state(&self.config, self.topology.n_neurons());
        let mut state = self.state.lock();
        state.oscillator = OscillatorState::new(initial);
        state.outputs.iter_mut().for_each(|o| *o = 0.0);
        state.time = 0.0;
    }

    /// Copy of the current coupling matrix.
    pub fn coupling_matrix(&self) -> CouplingMatrix {
        self.state.lock().matrix.clone()
    }

    /// Copy of the flat neuron states.
    pub fn neuron_states(&self) -> Vec<f64> {
        self.state.lock().oscillator.x.clone()
    }

    pub fn snapshot(&self) -> CpgSnapshot {
        let state = self.state.lock();
        CpgSnapshot {
            time: state.time,
            step_count: state.oscillator.step_count,
            states: state.oscillator.x.clone(),
            outputs: state.outputs.clone(),
        }
    }

    fn current_bearing(&self) -> Option<f64> {
        if !self.config.use_frame_of_reference {
            return None;
        }
        let bearing = self.bearing.as_ref()?.bearing_deg();
        if !bearing.is_finite() {
            log::warn!("bearing source returned {bearing}; frame-of-reference bias skipped");
            return None;
        }
        if bearing.abs() > 180.0 {
            log::warn!("bearing {bearing:.1}° outside ±180°, wrapping");
            return Some(wrap_bearing(bearing));
        }
        Some(bearing)
    }

    /// Advance one step and return the command for every actuator, in
    /// layout order.
    pub fn compute_outputs(&self, step: f64) -> Vec<f64> {
        let bearing = self.current_bearing();
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.stepper.step(&mut state.oscillator, &state.matrix, step);
        self.output.map(&state.oscillator.x, bearing, &mut state.outputs);
        state.outputs.clone()
    }

    /// One control tick: advance the dynamics by `step`, then write one
    /// command per actuator.
    ///
    /// Actuators are routed by their (x, y) coordinate, so their order
    /// may differ from the construction layout. Sensors are accepted for
    /// interface symmetry and not read.
    pub fn update(
        &self,
        actuators: &mut [Box<dyn Actuator>],
        _sensors: &[Box<dyn Sensor>],
        time: f64,
        step: f64,
    ) -> CpgResult<()> {
        for actuator in actuators.iter() {
            let c = actuator.coordinate();
            if self.topology.actuator_index_at(c.x, c.y).is_none() {
                let err = CpgError::UnknownActuator { x: c.x, y: c.y };
                log::error!("update rejected: {err}");
                return Err(err);
            }
        }

        let bearing = self.current_bearing();
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.stepper.step(&mut state.oscillator, &state.matrix, step);
        self.output.map(&state.oscillator.x, bearing, &mut state.outputs);
        state.time = time;

        for actuator in actuators.iter_mut() {
            let c = actuator.coordinate();
            let Some(idx) = self.topology.actuator_index_at(c.x, c.y) else {
                continue;
            };
            let command = state.outputs[idx];
            state.channel.clear();
            state.channel.resize(actuator.n_outputs(), command);
            actuator.write(&state.channel, step);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{FixedBearing, SimulatedActuator};

    fn pair_layout() -> Vec<ActuatorSpec> {
        vec![ActuatorSpec::at(0.0, 0.0, 0.0), ActuatorSpec::at(2.0, 0.0, 0.0)]
    }

    fn pair_cpg(weights: Vec<f64>) -> DifferentialCpg {
        let cfg = CpgConfig {
            init_neuron_state: 1.0,
            weights: Some(weights),
            ..Default::default()
        };
        DifferentialCpg::new(&pair_layout(), cfg).unwrap()
    }

    fn boxed(layout: &[ActuatorSpec]) -> Vec<Box<dyn Actuator>> {
        layout
            .iter()
            .map(|s| Box::new(SimulatedActuator::new(s.clone())) as Box<dyn Actuator>)
            .collect()
    }

    #[test]
    fn test_counts() {
        let cpg = pair_cpg(vec![1.0; 3]);
        assert_eq!(cpg.n_actuators(), 2);
        assert_eq!(cpg.n_connections(), 1);
        assert_eq!(cpg.n_weights(), 3);
    }

    #[test]
    fn test_default_genome_is_half() {
        let cpg = DifferentialCpg::new(&pair_layout(), CpgConfig::default()).unwrap();
        assert_eq!(cpg.get_connection_weights(), vec![0.5; 3]);
        assert!(cpg.coupling_matrix().is_zero());
    }

    #[test]
    fn test_initial_state_split() {
        let cpg = pair_cpg(vec![1.0; 3]);
        assert_eq!(cpg.neuron_states(), vec![1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_wrong_initial_genome_rejected() {
        let cfg = CpgConfig {
            weights: Some(vec![0.5; 2]),
            ..Default::default()
        };
        let err = DifferentialCpg::new(&pair_layout(), cfg).err().unwrap();
        assert_eq!(err, CpgError::GenomeLength { expected: 3, got: 2 });
    }

    #[test]
    fn test_round_trip_exact() {
        let cpg = pair_cpg(vec![1.0; 3]);
        let w = vec![0.123456789, 0.987654321, 1.0 / 3.0];
        cpg.set_connection_weights(&w).unwrap();
        assert_eq!(cpg.get_connection_weights(), w);
    }

    #[test]
    fn test_rejected_genome_leaves_state() {
        let cpg = pair_cpg(vec![1.0; 3]);
        cpg.compute_outputs(0.01);
        let before = cpg.snapshot();
        assert!(cpg.set_connection_weights(&[0.5; 5]).is_err());
        assert_eq!(cpg.get_connection_weights(), vec![1.0; 3]);
        assert_eq!(cpg.snapshot(), before);
    }

    #[test]
    fn test_genome_write_resets_state() {
        let cpg = pair_cpg(vec![1.0; 3]);
        for _ in 0..10 {
            cpg.compute_outputs(0.05);
        }
        assert_ne!(cpg.neuron_states(), vec![1.0, -1.0, 1.0, -1.0]);
        cpg.set_connection_weights(&[0.9, 0.1, 0.7]).unwrap();
        assert_eq!(cpg.neuron_states(), vec![1.0, -1.0, 1.0, -1.0]);
        assert_eq!(cpg.snapshot().step_count, 0);
    }

    #[test]
    fn test_reset_keeps_genome() {
        let cpg = pair_cpg(vec![0.2, 0.8, 0.6]);
        cpg.compute_outputs(0.1);
        cpg.reset();
        assert_eq!(cpg.neuron_states(), vec![1.0, -1.0, 1.0, -1.0]);
        assert_eq!(cpg.get_connection_weights(), vec![0.2, 0.8, 0.6]);
    }

    #[test]
    fn test_seeded_random_reset_reproducible() {
        let cfg = CpgConfig {
            reset_neuron_random: true,
            seed: Some(7),
            init_neuron_state: 0.5,
            ..Default::default()
        };
        let cpg = DifferentialCpg::new(&pair_layout(), cfg).unwrap();
        let first = cpg.neuron_states();
        assert!(first.iter().all(|v| (-0.5..=0.5).contains(v)));
        cpg.compute_outputs(0.1);
        cpg.set_connection_weights(&[0.3; 3]).unwrap();
        assert_eq!(cpg.neuron_states(), first);
    }

    #[test]
    fn test_update_writes_every_actuator() {
        let cpg = pair_cpg(vec![1.0; 3]);
        let mut actuators = boxed(&pair_layout());
        cpg.update(&mut actuators, &[], 0.01, 0.01).unwrap();
        let snap = cpg.snapshot();
        assert_eq!(snap.step_count, 1);
        assert!((snap.time - 0.01).abs() < 1e-15);
        assert!(snap.outputs.iter().all(|o| o.abs() <= 1.0));
    }

    #[test]
    fn test_update_routes_by_coordinate() {
        let reference = pair_cpg(vec![0.9, 0.2, 0.8]);
        let expected = reference.compute_outputs(0.02);

        let cpg = pair_cpg(vec![0.9, 0.2, 0.8]);
        let mut layout = pair_layout();
        layout.reverse();
        let mut actuators = boxed(&layout);
        cpg.update(&mut actuators, &[], 0.02, 0.02).unwrap();
        assert_eq!(cpg.snapshot().outputs, expected);
    }

    #[test]
    fn test_unknown_actuator_rejected_without_stepping() {
        let cpg = pair_cpg(vec![1.0; 3]);
        let mut actuators: Vec<Box<dyn Actuator>> =
            vec![Box::new(SimulatedActuator::at(8.0, 8.0, 0.0))];
        let err = cpg.update(&mut actuators, &[], 0.01, 0.01).unwrap_err();
        assert!(matches!(err, CpgError::UnknownActuator { .. }));
        assert_eq!(cpg.snapshot().step_count, 0);
    }

    #[test]
    fn test_bearing_ignored_when_frame_disabled() {
        let layout = vec![ActuatorSpec::at(-1.0, 0.0, 0.0), ActuatorSpec::at(1.0, 0.0, 0.0)];
        let cfg = CpgConfig {
            weights: Some(vec![0.9, 0.1, 0.5]),
            ..Default::default()
        };
        let plain = DifferentialCpg::new(&layout, cfg.clone()).unwrap();
        let biased = DifferentialCpg::new(&layout, cfg)
            .unwrap()
            .with_bearing_source(Arc::new(FixedBearing(150.0)));
        for _ in 0..20 {
            assert_eq!(plain.compute_outputs(0.05), biased.compute_outputs(0.05));
        }
    }

    #[test]
    fn test_bearing_slows_outer_side() {
        let layout = vec![ActuatorSpec::at(-2.0, 0.0, 0.0), ActuatorSpec::at(2.0, 0.0, 0.0)];
        let cfg = CpgConfig {
            use_frame_of_reference: true,
            ..Default::default()
        };
        let plain = DifferentialCpg::new(&layout, cfg.clone()).unwrap();
        let biased = DifferentialCpg::new(&layout, cfg)
            .unwrap()
            .with_bearing_source(Arc::new(FixedBearing(90.0)));
        let a = plain.compute_outputs(0.01);
        let b = biased.compute_outputs(0.01);
        assert_eq!(a[0], b[0]);
        assert!((b[1] - a[1] * 0.5f64.powi(7)).abs() < 1e-15);
    }

    #[test]
    fn test_bearing_wraps_into_signed_range() {
        let layout = vec![ActuatorSpec::at(-2.0, 0.0, 0.0), ActuatorSpec::at(2.0, 0.0, 0.0)];
        let cfg = CpgConfig {
            use_frame_of_reference: true,
            ..Default::default()
        };
        let run = |bearing: f64| {
            DifferentialCpg::new(&layout, cfg.clone())
                .unwrap()
                .with_bearing_source(Arc::new(FixedBearing(bearing)))
                .compute_outputs(0.01)
        };
        assert_eq!(run(270.0), run(-90.0));
        assert_eq!(run(-270.0), run(90.0));
        let right_turn = run(270.0);
        assert!(right_turn[0].abs() < run(0.0)[0].abs());
        assert_eq!(right_turn[1], run(0.0)[1]);
    }

    #[test]
    fn test_reset_clears_host_time() {
        let cpg = pair_cpg(vec![1.0; 3]);
        let mut actuators = boxed(&pair_layout());
        cpg.update(&mut actuators, &[], 5.0, 0.01).unwrap();
        assert_eq!(cpg.snapshot().time, 5.0);
        cpg.set_connection_weights(&[0.2, 0.9, 0.4]).unwrap();
        assert_eq!(cpg.snapshot().time, 0.0);
        cpg.update(&mut actuators, &[], 6.0, 0.01).unwrap();
        cpg.reset();
        let snap = cpg.snapshot();
        assert_eq!((snap.time, snap.step_count), (0.0, 0));
    }

    #[test]
    fn test_config_keeps_initial_genome() {
        let cpg = pair_cpg(vec![0.2, 0.9, 0.4]);
        cpg.set_connection_weights(&[0.7, 0.1, 0.3]).unwrap();
        assert_eq!(cpg.config().weights, Some(vec![0.2, 0.9, 0.4]));
        assert_eq!(cpg.get_connection_weights(), vec![0.7, 0.1, 0.3]);
    }
}
