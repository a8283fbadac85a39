// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the differential CPG.
//!
//! Optimizers written in Python (Bayesian optimization, CMA-ES,
//! neuro-evolution) drive the controller through the genome get/set
//! calls and `step`, which returns one command per actuator.
//!
//! # FFI Safety
//!
//! - GIL acquired via `Python::with_gil` before every Python callback.
//! - A failing bearing callback yields 0° (no bias) instead of raising
//!   inside the tick.
//! - Configuration and genome errors surface as `ValueError`.
//!
//! Install: `cd crates/cpg-ffi && maturin develop --release`.
//!
//! Usage from Python:
//! ```python
//! from cpg_kernel import CpgConfig, DifferentialCpg
//!
//! cpg = DifferentialCpg([(0, 0, 0), (2, 0, 0)], CpgConfig(range_ub=1.0))
//! cpg.set_connection_weights([1.0, 1.0, 1.0])
//! commands = cpg.step(0.01)
//! ```

use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use cpg_core::{DifferentialCpg, ExternalBearing};
use cpg_types::{ActuatorSpec, CpgConfig, CpgError, LateralAxis};

fn to_py_err(e: CpgError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Bearing returned by a Python callback; 0° (no bias) if it raised or
/// returned something that is not a float.
fn bearing_or_zero<E: std::fmt::Display>(result: Result<f64, E>) -> f64 {
    match result {
        Ok(bearing) => bearing,
        Err(e) => {
            log::warn!("bearing callback failed ({e}), using 0°");
            0.0
        }
    }
}

fn parse_axis(axis: &str) -> Result<LateralAxis, CpgError> {
    match axis.to_ascii_lowercase().as_str() {
        "x" => Ok(LateralAxis::X),
        "y" => Ok(LateralAxis::Y),
        other => Err(CpgError::Config(format!(
            "lateral_axis must be 'x' or 'y', got '{other}'"
        ))),
    }
}

// ─── PyCpgConfig ────────────────────────────────────────────────────

/// Python-visible configuration for the differential CPG.
#[pyclass(name = "CpgConfig")]
#[derive(Clone)]
struct PyCpgConfig {
    inner: CpgConfig,
}

#[pymethods]
impl PyCpgConfig {
    #[new]
    #[pyo3(signature = (
        reset_neuron_random = false,
        use_frame_of_reference = false,
        init_neuron_state = 0.707,
        range_ub = 1.0,
        output_signal_factor = 1.0,
        abs_output_bound = 1.0,
        neighbor_distance = 2.0,
        lateral_axis = "x",
        seed = None,
        weights = None,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        reset_neuron_random: bool,
        use_frame_of_reference: bool,
        init_neuron_state: f64,
        range_ub: f64,
        output_signal_factor: f64,
        abs_output_bound: f64,
        neighbor_distance: f64,
        lateral_axis: &str,
        seed: Option<u64>,
        weights: Option<Vec<f64>>,
    ) -> PyResult<Self> {
        let config = CpgConfig {
            reset_neuron_random,
            use_frame_of_reference,
            init_neuron_state,
            range_ub,
            output_signal_factor,
            abs_output_bound,
            neighbor_distance,
            lateral_axis: parse_axis(lateral_axis).map_err(to_py_err)?,
            seed,
            weights,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = CpgConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    fn __repr__(&self) -> String {
        format!(
            "CpgConfig(range_ub={}, init_neuron_state={}, frame_of_reference={})",
            self.inner.range_ub, self.inner.init_neuron_state, self.inner.use_frame_of_reference
        )
    }
}

// ─── PyDifferentialCpg ──────────────────────────────────────────────

/// Differential CPG exposed to Python.
///
/// `bearing` is an optional `Callable[[], float]` returning the signed
/// bearing to the target in degrees; it is only consulted when the
/// frame-of-reference bias is enabled.
#[pyclass(name = "DifferentialCpg")]
struct PyDifferentialCpg {
    inner: DifferentialCpg,
}

#[pymethods]
impl PyDifferentialCpg {
    #[new]
    #[pyo3(signature = (coordinates, config = None, bearing = None))]
    fn new(
        coordinates: Vec<(f64, f64, f64)>,
        config: Option<PyCpgConfig>,
        bearing: Option<PyObject>,
    ) -> PyResult<Self> {
        let layout: Vec<ActuatorSpec> = coordinates
            .into_iter()
            .map(|(x, y, z)| ActuatorSpec::at(x, y, z))
            .collect();
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let mut inner = DifferentialCpg::new(&layout, cfg).map_err(to_py_err)?;
        if let Some(cb) = bearing {
            inner = inner.with_bearing_source(Arc::new(ExternalBearing::new(move || {
                Python::with_gil(|py| {
                    bearing_or_zero(cb.call0(py).and_then(|r| r.extract::<f64>(py)))
                })
            })));
        }
        Ok(Self { inner })
    }

    #[getter]
    fn n_actuators(&self) -> usize {
        self.inner.n_actuators()
    }

    #[getter]
    fn n_connections(&self) -> usize {
        self.inner.n_connections()
    }

    #[getter]
    fn n_weights(&self) -> usize {
        self.inner.n_weights()
    }

    fn get_connection_weights(&self) -> Vec<f64> {
        self.inner.get_connection_weights()
    }

    /// Replace the genome; resets the neuron state.
    fn set_connection_weights(&self, weights: Vec<f64>) -> PyResult<()> {
        self.inner
            .set_connection_weights(&weights)
            .map_err(to_py_err)
    }

    /// Advance one tick of `dt` seconds. Returns one command per actuator.
    fn step(&self, py: Python<'_>, dt: f64) -> Vec<f64> {
        // The bearing callback re-acquires the GIL itself.
        py.allow_threads(|| self.inner.compute_outputs(dt))
    }

    #[getter]
    fn neuron_states(&self) -> Vec<f64> {
        self.inner.neuron_states()
    }

    /// Coupling matrix as a list of rows.
    fn coupling_matrix(&self) -> Vec<Vec<f64>> {
        let m = self.inner.coupling_matrix();
        m.as_slice().chunks(m.dim()).map(<[f64]>::to_vec).collect()
    }

    fn reset(&self) {
        self.inner.reset();
    }

    fn snapshot<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let snap = self.inner.snapshot();
        let dict = PyDict::new(py);
        dict.set_item("time", snap.time)?;
        dict.set_item("step_count", snap.step_count)?;
        dict.set_item("states", snap.states)?;
        dict.set_item("outputs", snap.outputs)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "DifferentialCpg(actuators={}, connections={}, weights={})",
            self.inner.n_actuators(),
            self.inner.n_connections(),
            self.inner.n_weights()
        )
    }
}

// ─── Module ─────────────────────────────────────────────────────────

/// Python module `cpg_kernel`.
///
/// Exports:
/// - `CpgConfig` — construction parameters
/// - `DifferentialCpg` — genome-driven coupled-oscillator controller
#[pymodule]
fn cpg_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCpgConfig>()?;
    m.add_class::<PyDifferentialCpg>()?;
    Ok(())
}
