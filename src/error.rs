//! Error types.
//!
//! Errors are categorized by where they originate:
//!
//! | Category | Variants | Recovery |
//! |----------|----------|----------|
//! | **Validation** | `InvalidParameter`, `InvalidOracleSpec`, `Configuration` | Fix input |
//! | **Simulation** | `InvalidCircuit`, `CircuitTooLarge`, `InvalidShots`, `Unsupported`, `JobFailed`, `JobNotFound`, `Timeout` | Fix circuit or backend |
//! | **Algorithm** | `FactorizationFailed` | Raise the attempt ceiling or retry |
//!
//! Validation errors are raised before any circuit is built. Simulation
//! errors are surfaced unchanged from the [`Backend`](crate::Backend).

use thiserror::Error;

/// Errors that can occur while synthesizing, running or interpreting circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    // ── Validation errors (fix input) ────────────────────────────────
    /// Non-positive qubit count, shot count, out-of-range constant, etc.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Custom oracle truth table has the wrong shape.
    #[error("Invalid oracle spec: {0}")]
    InvalidOracleSpec(String),

    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Simulation errors (surfaced from the backend) ────────────────
    /// Circuit is malformed (e.g. references an undeclared qubit).
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Invalid number of shots at the backend boundary.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Gate not supported by the backend.
    #[error("Unsupported gate: {0}")]
    Unsupported(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    // ── Algorithm errors ─────────────────────────────────────────────
    /// The factoring loop exhausted its attempt ceiling.
    #[error("Failed to factor {modulus} after {attempts} attempts")]
    FactorizationFailed {
        /// The number being factored.
        modulus: u64,
        /// Number of attempts made.
        attempts: u32,
    },
}

impl AlgoError {
    /// Returns `true` if the error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_) | Self::InvalidOracleSpec(_) | Self::Configuration(_)
        )
    }

    /// Returns `true` if the error originated at the simulation boundary.
    pub fn is_simulation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCircuit(_)
                | Self::CircuitTooLarge(_)
                | Self::InvalidShots(_)
                | Self::Unsupported(_)
                | Self::JobFailed(_)
                | Self::JobNotFound(_)
                | Self::Timeout(_)
        )
    }

    /// Returns `true` if the operation may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<serde_json::Error> for AlgoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for algorithm operations.
pub type AlgoResult<T> = Result<T, AlgoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(AlgoError::InvalidParameter("shots".into()).is_validation());
        assert!(AlgoError::InvalidOracleSpec("len".into()).is_validation());
        assert!(AlgoError::InvalidCircuit("q9".into()).is_simulation());
        assert!(AlgoError::InvalidShots("0".into()).is_simulation());
        assert!(!AlgoError::InvalidShots("0".into()).is_validation());
        assert!(AlgoError::Timeout("job-1".into()).is_transient());
        assert!(!AlgoError::JobFailed("boom".into()).is_transient());

        let failed = AlgoError::FactorizationFailed {
            modulus: 15,
            attempts: 3,
        };
        assert!(!failed.is_validation());
        assert!(!failed.is_simulation());
    }

    #[test]
    fn test_error_display() {
        let err = AlgoError::InvalidOracleSpec("expected 4 bits, got 3".into());
        assert_eq!(err.to_string(), "Invalid oracle spec: expected 4 bits, got 3");

        let err = AlgoError::FactorizationFailed {
            modulus: 21,
            attempts: 8,
        };
        assert_eq!(err.to_string(), "Failed to factor 21 after 8 attempts");
    }

    #[test]
    fn test_json_error_maps_to_configuration() {
        let err: AlgoError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AlgoError::Configuration(_)));
    }
}
