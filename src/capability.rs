//! Backend capability introspection.
//!
//! [`Capabilities`] describe what a backend accepts: a qubit ceiling, the
//! gates it can execute and a per-job shot limit. Engines never consult
//! them directly; backends use them in [`Backend::validate`](crate::Backend::validate).

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::AlgoError;

/// Capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (not real hardware).
    pub is_simulator: bool,
}

impl Capabilities {
    /// Create capabilities for an ideal state-vector simulator.
    pub fn simulator(num_qubits: u32, max_shots: u32) -> Self {
        Self {
            name: "statevector".into(),
            num_qubits,
            gate_set: GateSet::statevector(),
            max_shots,
            is_simulator: true,
        }
    }

    /// Collect every reason `circuit` cannot run as-is, qubit ceiling first.
    pub fn check(&self, circuit: &Circuit) -> Vec<AlgoError> {
        let mut reasons = Vec::new();
        if circuit.num_qubits() > self.num_qubits {
            reasons.push(AlgoError::CircuitTooLarge(format!(
                "circuit '{}' requires {} qubits, backend has {}",
                circuit.name(),
                circuit.num_qubits(),
                self.num_qubits
            )));
        }
        for gate in circuit.gate_names() {
            if !self.gate_set.contains(gate) {
                reasons.push(AlgoError::Unsupported(gate.to_string()));
            }
        }
        reasons
    }
}

/// Gate set supported by a backend, by OpenQASM 3 name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Gates with an arbitrary number of controls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multi_qubit: Vec<String>,
}

impl GateSet {
    /// Gates the state-vector simulator executes natively.
    pub fn statevector() -> Self {
        Self {
            single_qubit: vec!["h".into(), "x".into()],
            two_qubit: vec!["cx".into(), "cp".into(), "swap".into()],
            multi_qubit: vec!["mcx".into()],
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.multi_qubit.iter().any(|g| g == gate)
    }
}
