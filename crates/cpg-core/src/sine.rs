// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Open-Loop Sine Controller
// ─────────────────────────────────────────────────────────────────────
//! Fixed travelling-wave gait: every actuator follows
//!
//!   out = A · sin(2π f t + φ · x)
//!
//! No genome, no state. Serves as a baseline next to the differential CPG.

use std::f64::consts::TAU;

use cpg_types::{validate_layout, ActuatorSpec, CpgError, CpgResult, SineConfig};

use crate::io::{Actuator, Sensor};

pub struct SineOscillator {
    config: SineConfig,
    layout: Vec<ActuatorSpec>,
}

impl SineOscillator {
    pub fn new(layout: &[ActuatorSpec], config: SineConfig) -> CpgResult<Self> {
        config.validate()?;
        validate_layout(layout)?;
        Ok(Self {
            config,
            layout: layout.to_vec(),
        })
    }

    pub fn config(&self) -> &SineConfig {
        &self.config
    }

    pub fn n_actuators(&self) -> usize {
        self.layout.len()
    }

    /// Command for an actuator at lateral position `x` at `time`.
    #[inline]
    pub fn command(&self, x: f64, time: f64) -> f64 {
        self.config.amplitude * (TAU * self.config.frequency * time + self.config.phase_lag * x).sin()
    }

    pub fn update(
        &self,
        actuators: &mut [Box<dyn Actuator>],
        _sensors: &[Box<dyn Sensor>],
        time: f64,
        step: f64,
    ) -> CpgResult<()> {
        for actuator in actuators.iter() {
            let c = actuator.coordinate();
            if !self.layout.iter().any(|a| a.coordinate.same_xy(c.x, c.y)) {
                return Err(CpgError::UnknownActuator { x: c.x, y: c.y });
            }
        }
        for actuator in actuators.iter_mut() {
            let command = self.command(actuator.coordinate().x, time);
            match actuator.n_outputs() {
                1 => actuator.write(std::slice::from_ref(&command), step),
                n => actuator.write(&vec![command; n], step),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cpg_types::Coordinate;
    use parking_lot::Mutex;

    use crate::io::SimulatedActuator;

    #[test]
    fn test_command_phase_lag() {
        let osc = SineOscillator::new(
            &[ActuatorSpec::at(0.0, 0.0, 0.0)],
            SineConfig {
                amplitude: 2.0,
                frequency: 0.25,
                phase_lag: std::f64::consts::FRAC_PI_2,
            },
        )
        .unwrap();
        assert!(osc.command(0.0, 0.0).abs() < 1e-12);
        assert!((osc.command(1.0, 0.0) - 2.0).abs() < 1e-12);
        // Quarter period at 0.25 Hz is 1 s.
        assert!((osc.command(0.0, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_unknown_actuator() {
        let osc = SineOscillator::new(&[ActuatorSpec::at(0.0, 0.0, 0.0)], SineConfig::default())
            .unwrap();
        let mut actuators: Vec<Box<dyn Actuator>> =
            vec![Box::new(SimulatedActuator::at(4.0, 0.0, 0.0))];
        assert!(osc.update(&mut actuators, &[], 0.0, 0.01).is_err());
    }

    struct Recorder {
        spec: ActuatorSpec,
        seen: Arc<Mutex<Vec<f64>>>,
    }

    impl Actuator for Recorder {
        fn coordinate(&self) -> Coordinate {
            self.spec.coordinate
        }

        fn n_outputs(&self) -> usize {
            self.spec.n_outputs
        }

        fn write(&mut self, outputs: &[f64], _step: f64) {
            *self.seen.lock() = outputs.to_vec();
        }
    }

    #[test]
    fn test_update_fills_every_channel() {
        let mut wide = ActuatorSpec::at(2.0, 0.0, 0.0);
        wide.n_outputs = 3;
        let layout = vec![ActuatorSpec::at(0.0, 0.0, 0.0), wide];
        let osc = SineOscillator::new(&layout, SineConfig::default()).unwrap();
        let seen: Vec<Arc<Mutex<Vec<f64>>>> = layout.iter().map(|_| Arc::default()).collect();
        let mut actuators: Vec<Box<dyn Actuator>> = layout
            .iter()
            .zip(&seen)
            .map(|(spec, s)| {
                Box::new(Recorder {
                    spec: spec.clone(),
                    seen: Arc::clone(s),
                }) as Box<dyn Actuator>
            })
            .collect();
        osc.update(&mut actuators, &[], 0.3, 0.01).unwrap();
        assert_eq!(*seen[0].lock(), vec![osc.command(0.0, 0.3)]);
        assert_eq!(*seen[1].lock(), vec![osc.command(2.0, 0.3); 3]);
    }

    #[test]
    fn test_invalid_config() {
        let cfg = SineConfig {
            amplitude: f64::NAN,
            ..Default::default()
        };
        assert!(SineOscillator::new(&[ActuatorSpec::at(0.0, 0.0, 0.0)], cfg).is_err());
    }
}
