// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Actuator Layout Types
// ─────────────────────────────────────────────────────────────────────
//! Spatial description of a robot's actuators.
//!
//! The simulation host supplies one `ActuatorSpec` per motor, in a
//! fixed order, at construction time. Layouts are immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{CpgError, CpgResult};

/// Tolerance used when comparing grid coordinates.
pub const COORD_EPS: f64 = 1e-9;

/// Grid coordinate of an actuator (module units, not metres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Manhattan distance in the (x, y) plane.
    #[inline]
    pub fn planar_manhattan(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True if both share the same (x, y) routing key.
    #[inline]
    pub fn same_xy(&self, x: f64, y: f64) -> bool {
        (self.x - x).abs() < COORD_EPS && (self.y - y).abs() < COORD_EPS
    }

    #[inline]
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        self.same_xy(other.x, other.y) && (self.z - other.z).abs() < COORD_EPS
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Which side of the body midline this coordinate lies on.
    pub fn lateral_side(&self, axis: LateralAxis) -> LateralSide {
        let v = match axis {
            LateralAxis::X => self.x,
            LateralAxis::Y => self.y,
        };
        if v < -COORD_EPS {
            LateralSide::Left
        } else if v > COORD_EPS {
            LateralSide::Right
        } else {
            LateralSide::Midline
        }
    }
}

/// One motor as described by the simulation host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorSpec {
    /// Free-form identifier (part id in the robot description).
    #[serde(default)]
    pub name: String,
    pub coordinate: Coordinate,
    /// Output channels driven by this actuator. Normally 1.
    #[serde(default = "default_n_outputs")]
    pub n_outputs: usize,
}

fn default_n_outputs() -> usize {
    1
}

impl ActuatorSpec {
    pub fn new(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.into(),
            coordinate: Coordinate::new(x, y, z),
            n_outputs: 1,
        }
    }

    /// Unnamed single-channel actuator at (x, y, z).
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(String::new(), x, y, z)
    }
}

/// Member of an oscillator pair: A (`+1`) or B (`-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    A,
    B,
}

impl Polarity {
    pub fn sign(self) -> i8 {
        match self {
            Polarity::A => 1,
            Polarity::B => -1,
        }
    }
}

/// Coordinate axis separating left from right actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateralAxis {
    #[default]
    X,
    Y,
}

/// Lateral tag used by the frame-of-reference bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LateralSide {
    Left,
    Right,
    Midline,
}

/// Validate an actuator layout.
///
/// Rejects empty layouts, non-finite coordinates, zero-channel actuators
/// and (x, y) collisions; output routing is keyed by (x, y), so two
/// actuators stacked along z cannot be told apart.
pub fn validate_layout(actuators: &[ActuatorSpec]) -> CpgResult<()> {
    if actuators.is_empty() {
        return Err(CpgError::Topology("actuator list is empty".to_string()));
    }
    for (i, a) in actuators.iter().enumerate() {
        if !a.coordinate.is_finite() {
            return Err(CpgError::Topology(format!(
                "actuator {i} ({}) has non-finite coordinate {:?}",
                a.name, a.coordinate
            )));
        }
        if a.n_outputs == 0 {
            return Err(CpgError::Topology(format!(
                "actuator {i} ({}) declares zero output channels",
                a.name
            )));
        }
        if a.n_outputs > 1 {
            log::warn!(
                "actuator {i} ({}) has {} channels; every channel receives the same command",
                a.name,
                a.n_outputs
            );
        }
        if let Some(j) = actuators[..i]
            .iter()
            .position(|b| b.coordinate.same_xy(a.coordinate.x, a.coordinate.y))
        {
            return Err(CpgError::Topology(format!(
                "actuators {j} and {i} collide at ({}, {})",
                a.coordinate.x, a.coordinate.y
            )));
        }
    }
    Ok(())
}
