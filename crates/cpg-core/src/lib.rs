// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Controller Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Controller facade for the differential CPG and its sibling variants.
//!
//! Optimizers (Bayesian optimization, evolution strategies,
//! neuro-evolution) treat a controller as a black box: write a genome,
//! run ticks, read fitness elsewhere.
//!
//! # Invariants
//!
//! 1. **Genome round-trip is exact**: `get_connection_weights()` returns
//!    the vector last passed to `set_connection_weights()`, unscaled.
//!    The coupling matrix is derived from it and never read back.
//!
//! 2. **Genome writes are atomic and reset the dynamics**: a genome is
//!    validated and its matrix built before the state lock is taken; on
//!    success genome, matrix and neuron state are swapped together.
//!
//! 3. **Commands are bounded**: every command lies in
//!    `[-factor·bound, factor·bound]`, whatever the neuron state.
//!
//! 4. **`DifferentialCpg::update` does not allocate**: integrator stage
//!    buffers, the output vector and the channel buffer are allocated once
//!    and reused. `compute_outputs` returns an owned copy of the outputs.

pub mod brain;
pub mod controller;
pub mod io;
pub mod sine;

pub use brain::Brain;
pub use controller::{CpgSnapshot, DifferentialCpg};
pub use io::{Actuator, BearingSource, ExternalBearing, FixedBearing, Sensor, SimulatedActuator};
pub use sine::SineOscillator;
