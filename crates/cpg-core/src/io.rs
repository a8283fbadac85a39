// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Actuator / Sensor Interfaces
// ─────────────────────────────────────────────────────────────────────
//! Abstract read/write contracts for the simulation host's hardware.
//!
//! Motor drivers and sensors live outside this crate; controllers only
//! see these traits. `SimulatedActuator` records what it is told and
//! serves tests, benches and the Python bindings.

use cpg_types::{ActuatorSpec, Coordinate};

/// A motor that accepts commands once per tick.
pub trait Actuator: Send {
    /// Grid position; used to route the command to this motor.
    fn coordinate(&self) -> Coordinate;

    fn n_outputs(&self) -> usize {
        1
    }

    /// Apply `outputs` (one value per channel) for the next `step` seconds.
    fn write(&mut self, outputs: &[f64], step: f64);
}

/// A sensor that fills a slice of inputs.
pub trait Sensor: Send {
    fn n_inputs(&self) -> usize;

    fn read(&self, input: &mut [f64]);
}

/// Signed bearing to the target, in degrees (positive = target to the left).
pub trait BearingSource: Send + Sync {
    fn bearing_deg(&self) -> f64;
}

/// Bearing that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedBearing(pub f64);

impl BearingSource for FixedBearing {
    fn bearing_deg(&self) -> f64 {
        self.0
    }
}

/// Bearing source that calls a function pointer.
///
/// Used by hosts that compute the angle to the target themselves.
type BearingFn = Box<dyn Fn() -> f64 + Send + Sync>;

pub struct ExternalBearing {
    bearing_fn: BearingFn,
}

impl ExternalBearing {
    pub fn new(bearing_fn: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self {
            bearing_fn: Box::new(bearing_fn),
        }
    }
}

impl BearingSource for ExternalBearing {
    fn bearing_deg(&self) -> f64 {
        (self.bearing_fn)()
    }
}

/// In-memory actuator that keeps every command it receives.
#[derive(Debug, Clone)]
pub struct SimulatedActuator {
    spec: ActuatorSpec,
    last: Vec<f64>,
    history: Vec<f64>,
}

impl SimulatedActuator {
    pub fn new(spec: ActuatorSpec) -> Self {
        let last = vec![0.0; spec.n_outputs];
        Self {
            spec,
            last,
            history: Vec::new(),
        }
    }

    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(ActuatorSpec::at(x, y, z))
    }

    /// Most recent command, one value per channel.
    pub fn last(&self) -> &[f64] {
        &self.last
    }

    /// First-channel command of every tick so far.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl Actuator for SimulatedActuator {
    fn coordinate(&self) -> Coordinate {
        self.spec.coordinate
    }

    fn n_outputs(&self) -> usize {
        self.spec.n_outputs
    }

    fn write(&mut self, outputs: &[f64], _step: f64) {
        self.last.clear();
        self.last.extend_from_slice(outputs);
        if let Some(&first) = outputs.first() {
            self.history.push(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_bearing() {
        assert_eq!(FixedBearing(42.0).bearing_deg(), 42.0);
    }

    #[test]
    fn test_external_bearing() {
        let b = ExternalBearing::new(|| -12.5);
        assert!((b.bearing_deg() + 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_simulated_actuator_records() {
        let mut a = SimulatedActuator::at(2.0, 0.0, 0.0);
        assert_eq!(a.last(), &[0.0]);
        a.write(&[0.25], 0.01);
        a.write(&[-0.5], 0.01);
        assert_eq!(a.last(), &[-0.5]);
        assert_eq!(a.history(), &[0.25, -0.5]);
        assert_eq!(a.coordinate(), Coordinate::new(2.0, 0.0, 0.0));
    }
}
