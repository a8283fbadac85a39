// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all CPG kernel failures.
///
/// Every variant is a configuration-class failure: it is reported at
/// construction or genome replacement and nothing is partially applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CpgError {
    /// Invalid configuration parameter.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed actuator layout (empty, colliding or non-finite coordinates).
    #[error("topology error: {0}")]
    Topology(String),

    /// Genome length does not match the topology.
    #[error("genome length mismatch: expected {expected} weights, got {got}")]
    GenomeLength { expected: usize, got: usize },

    /// Genome contains a NaN or infinite gene.
    #[error("genome value at index {index} is not finite: {value}")]
    GenomeValue { index: usize, value: f64 },

    /// An actuator passed to `update` was not part of the construction layout.
    #[error("no actuator registered at ({x}, {y})")]
    UnknownActuator { x: f64, y: f64 },

    /// Operation not offered by this controller variant.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type CpgResult<T> = Result<T, CpgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_length_message() {
        let err = CpgError::GenomeLength {
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "genome length mismatch: expected 3 weights, got 2"
        );
    }

    #[test]
    fn test_config_message() {
        let err = CpgError::Config("range_ub must be > 0".into());
        assert_eq!(err.to_string(), "config error: range_ub must be > 0");
    }
}
