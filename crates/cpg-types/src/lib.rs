// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! differential CPG kernel — the coupled-oscillator motor controller
//! shared by every optimizer that evolves robot gaits.

pub mod config;
pub mod error;
pub mod layout;

pub use config::{BrainConfig, CpgConfig, SineConfig};
pub use error::{CpgError, CpgResult};
pub use layout::{validate_layout, ActuatorSpec, Coordinate, LateralAxis, LateralSide, Polarity};
