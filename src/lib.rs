//! Quantum algorithms as circuit-synthesis engines over a pluggable backend.
//!
//! This crate implements two canonical algorithms as parameterized
//! circuit-construction and interpretation pipelines:
//!
//! - **Deutsch-Jozsa** ([`deutsch_jozsa`]): encode a boolean oracle as a
//!   reversible gate sequence and decide "constant" vs "balanced" from the
//!   measured input register.
//! - **Shor** ([`shor`]): build a phase-estimation circuit, read the most
//!   likely phase, recover a period by continued fractions and turn it into
//!   a factor pair, retrying with fresh bases as needed.
//!
//! Execution is delegated to a [`Backend`]: anything that turns a
//! [`Circuit`] and a shot count into [`Counts`]. [`StateVectorSimulator`] is
//! an in-process ideal backend.
//!
//! # Example
//!
//! ```ignore
//! use quantum_algos::{ShorConfig, ShorsAlgorithm, RandomBases, StateVectorSimulator};
//!
//! #[tokio::main]
//! async fn main() -> quantum_algos::AlgoResult<()> {
//!     let backend = StateVectorSimulator::seeded(7);
//!     let shor = ShorsAlgorithm::new(15, ShorConfig::default())?;
//!     let pair = shor.factor(&backend, &mut RandomBases::seeded(7)).await?;
//!     println!("15 = {} x {}", pair.first, pair.second);
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! ```text
//!   synthesizer ──→ Circuit ──→ Backend::run() ──→ Counts ──→ interpreter
//! ```

pub mod backend;
pub mod capability;
pub mod circuit;
pub mod config;
pub mod deutsch_jozsa;
pub mod error;
pub mod job;
pub mod result;
pub mod shor;
pub mod simulator;
pub mod statevector;

pub use backend::{Backend, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use circuit::{
    Circuit, CircuitBuilder, ClassicalRegister, ClbitId, GateOp, Measurement, QuantumRegister,
    QubitId,
};
pub use config::{Config, DeutschJozsaConfig, ShorConfig, SimulatorConfig};
pub use deutsch_jozsa::{
    Classification, DeutschJozsa, OracleCategory, OracleKind, OracleSpec, TruthTable,
    validate_oracle,
};
pub use error::{AlgoError, AlgoResult};
pub use job::{JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
pub use shor::{Attempt, BaseSource, FactorPair, FixedBases, RandomBases, ShorsAlgorithm};
pub use simulator::StateVectorSimulator;
pub use statevector::StateVector;
