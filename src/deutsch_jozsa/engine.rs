//! Deutsch-Jozsa circuit assembly and result interpretation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::oracle::{self, OracleCategory, OracleSpec};
use crate::backend::Backend;
use crate::circuit::{Circuit, CircuitBuilder};
use crate::config::DeutschJozsaConfig;
use crate::error::{AlgoError, AlgoResult};
use crate::result::Counts;

/// Outcome of running the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Constant,
    Balanced,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Classification::Constant => "constant",
            Classification::Balanced => "balanced",
        })
    }
}

/// A configured Deutsch-Jozsa instance: input width, oracle and shot count.
#[derive(Debug, Clone)]
pub struct DeutschJozsa {
    num_inputs: u32,
    oracle: OracleSpec,
    config: DeutschJozsaConfig,
}

impl DeutschJozsa {
    /// Validate parameters eagerly; nothing is built or run here.
    pub fn new(num_inputs: u32, oracle: OracleSpec, config: DeutschJozsaConfig) -> AlgoResult<Self> {
        if num_inputs == 0 || num_inputs > oracle::MAX_ORACLE_INPUTS {
            return Err(AlgoError::InvalidParameter(format!(
                "number of input qubits must be in 1..={}, got {num_inputs}",
                oracle::MAX_ORACLE_INPUTS
            )));
        }
        config.validate()?;
        if let OracleSpec::Custom(table) = &oracle {
            if table.num_inputs() != num_inputs {
                return Err(AlgoError::InvalidOracleSpec(format!(
                    "custom bitstring length must be 2^{num_inputs} = {}, got {}",
                    1usize << num_inputs,
                    table.len()
                )));
            }
        }
        Ok(Self {
            num_inputs,
            oracle,
            config,
        })
    }

    /// Number of input qubits, excluding the ancilla.
    pub fn num_inputs(&self) -> u32 {
        self.num_inputs
    }

    /// The oracle being classified.
    pub fn oracle(&self) -> &OracleSpec {
        &self.oracle
    }

    /// Shots requested per classification run.
    pub fn shots(&self) -> u32 {
        self.config.shots
    }

    /// Offline category of the configured oracle.
    pub fn validate_oracle(&self) -> OracleCategory {
        oracle::validate_oracle(&self.oracle)
    }

    /// Assemble the full algorithm circuit without running it.
    ///
    /// Inputs get a Hadamard each; the output is flipped to `|1⟩` and rotated
    /// into `|−⟩` for phase kickback; the oracle follows; the inputs get a
    /// second Hadamard and only they are measured.
    pub fn circuit(&self) -> AlgoResult<Circuit> {
        let mut b = CircuitBuilder::new("deutsch_jozsa");
        let input = b.qreg("input", self.num_inputs);
        let output = b.qreg("output", 1);
        let c = b.creg("c", self.num_inputs);
        let target = output.qubit(0);

        for q in input.iter() {
            b.h(q);
        }
        b.x(target).h(target);

        let inputs: Vec<_> = input.iter().collect();
        b.extend(oracle::synthesize(&self.oracle, &inputs, target)?);

        for q in input.iter() {
            b.h(q);
        }
        b.measure_register(&input, &c)?;
        b.build()
    }

    /// Run the circuit on `backend` and classify the oracle.
    pub async fn classify<B>(&self, backend: &B) -> AlgoResult<Classification>
    where
        B: Backend<Circuit> + ?Sized,
    {
        let circuit = self.circuit()?;
        debug!(
            inputs = self.num_inputs,
            oracle = %self.oracle.kind(),
            gates = circuit.gate_count(),
            "built Deutsch-Jozsa circuit"
        );
        let result = backend.run(&circuit, self.config.shots).await?;
        let class = interpret(&result.counts, self.num_inputs, self.config.shots);
        info!(
            inputs = self.num_inputs,
            shots = self.config.shots,
            all_zero = result.counts.get(&"0".repeat(self.num_inputs as usize)),
            %class,
            "classified oracle"
        );
        Ok(class)
    }
}

/// Classify measured counts: constant iff the all-zero outcome holds a
/// strict majority of `shots`.
pub fn interpret(counts: &Counts, num_inputs: u32, shots: u32) -> Classification {
    let zeros = counts.get(&"0".repeat(num_inputs as usize));
    if 2 * zeros > u64::from(shots) {
        Classification::Constant
    } else {
        Classification::Balanced
    }
}

/// Build, run and classify in one call.
pub async fn classify<B>(
    num_inputs: u32,
    oracle: OracleSpec,
    shots: u32,
    backend: &B,
) -> AlgoResult<Classification>
where
    B: Backend<Circuit> + ?Sized,
{
    DeutschJozsa::new(num_inputs, oracle, DeutschJozsaConfig { shots })?
        .classify(backend)
        .await
}
