// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Oscillator Dynamics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Differential CPG dynamics: actuator topology, genome → coupling
//! matrix mapping, fixed-step RK4 integration and the saturating
//! output stage.

pub mod genome;
pub mod integrator;
pub mod matrix;
pub mod output;
pub mod topology;

pub use genome::GenomeMapper;
pub use integrator::{OscillatorState, Rk4Stepper};
pub use matrix::CouplingMatrix;
pub use output::{is_outer_side, slow_down_factor, squash, wrap_bearing, OutputMapper};
pub use topology::{is_adjacent, Connection, Neuron, Topology};
