//! Job lifecycle types.
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                              │
//!                              └──→ Failed(reason)
//! ```
//!
//! Transitions only move forward. `Completed` and `Failed` are terminal, and
//! a result is only available once a job is `Completed`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a submitted circuit run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Build the `seq`-th ID issued by a backend named `backend`.
    pub fn sequential(backend: &str, seq: u64) -> Self {
        Self(format!("{backend}-{seq}"))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed(String),
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed(_))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("oom".into()).is_terminal());
    }

    #[test]
    fn test_job_status_display() {
        assert_eq!(JobStatus::Completed.to_string(), "Completed");
        assert_eq!(JobStatus::Failed("oom".into()).to_string(), "Failed: oom");
    }

    #[test]
    fn test_job_id_sequential() {
        let id = JobId::sequential("statevector", 7);
        assert_eq!(id, JobId("statevector-7".to_string()));
        assert_eq!(id.to_string(), "statevector-7");
    }
}
