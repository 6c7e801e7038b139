//! Run configuration.
//!
//! Every section deserializes with defaults for missing fields, so an empty
//! JSON object is a valid configuration:
//!
//! ```json
//! {
//!   "deutsch_jozsa": { "shots": 1024 },
//!   "shor": { "shots": 1000, "max_attempts": 64, "reject_trivial_factors": false },
//!   "simulator": { "seed": 7, "max_qubits": 20, "max_shots": 100000 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AlgoError, AlgoResult};

/// Deutsch-Jozsa engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeutschJozsaConfig {
    /// Shots per classification run.
    pub shots: u32,
}

impl Default for DeutschJozsaConfig {
    fn default() -> Self {
        Self { shots: 1024 }
    }
}

impl DeutschJozsaConfig {
    pub fn validate(&self) -> AlgoResult<()> {
        positive("deutsch_jozsa.shots", self.shots)
    }
}

/// Shor factoring loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShorConfig {
    /// Shots per period-finding circuit.
    pub shots: u32,
    /// Ceiling on probabilistic attempts before giving up.
    pub max_attempts: u32,
    /// Treat a quantum-path result containing 1 or N as a spurious period.
    /// Off by default: any pair whose product is N is accepted.
    pub reject_trivial_factors: bool,
}

impl Default for ShorConfig {
    fn default() -> Self {
        Self {
            shots: 1000,
            max_attempts: 64,
            reject_trivial_factors: false,
        }
    }
}

impl ShorConfig {
    pub fn validate(&self) -> AlgoResult<()> {
        positive("shor.shots", self.shots)?;
        positive("shor.max_attempts", self.max_attempts)
    }
}

/// State-vector simulator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Sampling seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Largest circuit the simulator accepts.
    pub max_qubits: u32,
    /// Largest shot count per job.
    pub max_shots: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: 20,
            max_shots: 100_000,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> AlgoResult<()> {
        positive("simulator.max_shots", self.max_shots)?;
        if self.max_qubits == 0 || self.max_qubits > 30 {
            return Err(AlgoError::Configuration(format!(
                "simulator.max_qubits must be in 1..=30, got {}",
                self.max_qubits
            )));
        }
        Ok(())
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub deutsch_jozsa: DeutschJozsaConfig,
    pub shor: ShorConfig,
    pub simulator: SimulatorConfig,
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> AlgoResult<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AlgoResult<()> {
        self.deutsch_jozsa.validate()?;
        self.shor.validate()?;
        self.simulator.validate()
    }
}

fn positive(field: &str, value: u32) -> AlgoResult<()> {
    if value == 0 {
        return Err(AlgoError::InvalidParameter(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(())
}
