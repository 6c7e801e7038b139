//! The backend trait: the seam between circuit synthesis and execution.
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! Algorithm engines only see a `&B where B: Backend<Circuit>`; they never
//! own or construct one. Each engine awaits one job at a time, so a pipeline
//! run is strictly sequential even though the trait is async.
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `validate()` | async | yes | `AlgoResult<ValidationResult>` |
//! | `submit()` | async | yes | `AlgoResult<JobId>` |
//! | `status()` | async | yes | `AlgoResult<JobStatus>` |
//! | `result()` | async | yes | `AlgoResult<ExecutionResult>` |
//! | `wait()` | async | provided | `AlgoResult<ExecutionResult>` |
//! | `run()` | async | provided | `AlgoResult<ExecutionResult>` |

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::capability::Capabilities;
use crate::error::{AlgoError, AlgoResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Polling interval used by [`Backend::wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Maximum number of polls before [`Backend::wait`] gives up.
pub const MAX_POLLS: u32 = 6_000;

/// A quantum execution engine that turns circuits into measurement counts.
///
/// Generic over the circuit type `C`.
///
/// # Contract
///
/// - `capabilities()` is synchronous and infallible.
/// - `submit()` fails with `InvalidShots` when `shots == 0` or exceeds
///   `capabilities().max_shots`, with `CircuitTooLarge` or `Unsupported`
///   when the circuit exceeds the capabilities, and with `InvalidCircuit`
///   when it references an undeclared qubit.
/// - `run()` surfaces the first reason reported by `validate()` unchanged.
/// - `result()` is only valid once `status()` reports `Completed`.
#[async_trait]
pub trait Backend<C>: Send + Sync
where
    C: Sync,
{
    /// Name of this backend.
    fn name(&self) -> &str;

    /// Capabilities, cached at construction time.
    fn capabilities(&self) -> &Capabilities;

    /// Check a circuit against backend constraints.
    async fn validate(&self, circuit: &C) -> AlgoResult<ValidationResult>;

    /// Submit a circuit for `shots` repetitions.
    async fn submit(&self, circuit: &C, shots: u32) -> AlgoResult<JobId>;

    /// Status of a job.
    async fn status(&self, job_id: &JobId) -> AlgoResult<JobStatus>;

    /// Result of a completed job.
    async fn result(&self, job_id: &JobId) -> AlgoResult<ExecutionResult>;

    /// Poll until the job is terminal and return its result.
    async fn wait(&self, job_id: &JobId) -> AlgoResult<ExecutionResult> {
        for _ in 0..MAX_POLLS {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(AlgoError::JobFailed(msg)),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        Err(AlgoError::Timeout(job_id.0.clone()))
    }

    /// Validate, submit and wait: the single call engines use to obtain
    /// measurement counts for a circuit.
    async fn run(&self, circuit: &C, shots: u32) -> AlgoResult<ExecutionResult> {
        if let Some(err) = self.validate(circuit).await?.into_error() {
            debug!(backend = self.name(), error = %err, "circuit rejected");
            return Err(err);
        }
        let job_id = self.submit(circuit, shots).await?;
        debug!(backend = self.name(), job = %job_id, shots, "submitted circuit");
        self.wait(&job_id).await
    }
}

/// Result of checking a circuit against backend constraints.
#[derive(Debug)]
pub enum ValidationResult {
    /// Circuit can be submitted as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid, most fundamental first.
        reasons: Vec<AlgoError>,
    },
}

impl ValidationResult {
    /// Build a result from a list of problems; empty means valid.
    pub fn from_reasons(reasons: Vec<AlgoError>) -> Self {
        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }

    /// Check if the circuit was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The error to report for a rejected circuit: its first reason.
    pub fn into_error(self) -> Option<AlgoError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { reasons } => reasons.into_iter().next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_from_reasons() {
        let valid = ValidationResult::from_reasons(vec![]);
        assert!(valid.is_valid());
        assert!(valid.into_error().is_none());

        let invalid = ValidationResult::from_reasons(vec![
            AlgoError::CircuitTooLarge("too wide".into()),
            AlgoError::Unsupported("rz".into()),
        ]);
        assert!(!invalid.is_valid());
        let err = invalid.into_error().unwrap();
        assert!(matches!(err, AlgoError::CircuitTooLarge(_)));
    }
}
