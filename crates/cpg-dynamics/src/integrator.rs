// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — RK4 Integrator
// ─────────────────────────────────────────────────────────────────────
//! Fixed-step 4th-order Runge-Kutta integrator for the linear system
//!
//!   dx_i/dt = Σ_j x_j · M[j][i]      (dx/dt = Mᵗ x)
//!
//! With M antisymmetric the flow is a rotation: ‖x‖ is conserved in
//! continuous time. One step per tick, no sub-stepping and no error
//! control. Stage buffers are pre-allocated so a tick never allocates.

use serde::{Deserialize, Serialize};

use crate::matrix::CouplingMatrix;

/// Neuron state vector plus integration clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorState {
    /// Flat neuron states (A at 2i, B at 2i+1).
    pub x: Vec<f64>,
    /// Integrated time.
    pub t: f64,
    /// Integration step counter.
    pub step_count: u64,
}

impl OscillatorState {
    pub fn new(x: Vec<f64>) -> Self {
        Self {
            x,
            t: 0.0,
            step_count: 0,
        }
    }

    /// Euclidean norm of the state vector.
    pub fn norm(&self) -> f64 {
        self.x.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Single-step RK4 integrator with owned scratch space.
#[derive(Debug, Clone)]
pub struct Rk4Stepper {
    n: usize,
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    probe: Vec<f64>,
}

impl Rk4Stepper {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            k4: vec![0.0; n],
            probe: vec![0.0; n],
        }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    /// Advance `state` by one step of size `dt`.
    ///
    /// `dt` must be positive and sane; the integrator does not guard it.
    pub fn step(&mut self, state: &mut OscillatorState, matrix: &CouplingMatrix, dt: f64) {
        debug_assert_eq!(state.x.len(), self.n);
        debug_assert_eq!(matrix.dim(), self.n);
        let x = &mut state.x;
        let half = 0.5 * dt;

        matrix.transpose_mul(x, &mut self.k1);

        for ((p, &xi), &k) in self.probe.iter_mut().zip(x.iter()).zip(&self.k1) {
            *p = xi + half * k;
        }
        matrix.transpose_mul(&self.probe, &mut self.k2);

        for ((p, &xi), &k) in self.probe.iter_mut().zip(x.iter()).zip(&self.k2) {
            *p = xi + half * k;
        }
        matrix.transpose_mul(&self.probe, &mut self.k3);

        for ((p, &xi), &k) in self.probe.iter_mut().zip(x.iter()).zip(&self.k3) {
            *p = xi + dt * k;
        }
        matrix.transpose_mul(&self.probe, &mut self.k4);

        let sixth = dt / 6.0;
        for i in 0..self.n {
            x[i] += sixth * (self.k1[i] + 2.0 * self.k2[i] + 2.0 * self.k3[i] + self.k4[i]);
        }

        state.t += dt;
        state.step_count += 1;
    }

    /// Run multiple steps.
    pub fn run(
        &mut self,
        state: &mut OscillatorState,
        matrix: &CouplingMatrix,
        dt: f64,
        n_steps: u64,
    ) {
        for _ in 0..n_steps {
            self.step(state, matrix, dt);
        }
    }
}
