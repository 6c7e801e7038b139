//! In-process ideal simulator backend.
//!
//! [`StateVectorSimulator`] evolves a dense state vector through the gate
//! sequence, then samples `shots` measurement outcomes from the Born
//! probabilities. There is no noise model: a basis state with zero
//! amplitude is never sampled.
//!
//! Jobs complete during `submit()`; `status()` therefore always reports
//! `Completed` for a known job. Fetching a job's result hands it over and
//! forgets the job, so the job table only holds results nobody has read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, ValidationResult};
use crate::capability::Capabilities;
use crate::circuit::Circuit;
use crate::config::SimulatorConfig;
use crate::error::{AlgoError, AlgoResult};
use crate::job::{JobId, JobStatus};
use crate::result::{Counts, ExecutionResult};
use crate::statevector::StateVector;

struct JobRecord {
    status: JobStatus,
    result: Option<ExecutionResult>,
}

/// Noiseless state-vector simulator.
pub struct StateVectorSimulator {
    capabilities: Capabilities,
    rng: Mutex<StdRng>,
    jobs: Mutex<FxHashMap<JobId, JobRecord>>,
    next_id: AtomicU64,
}

impl StateVectorSimulator {
    /// Build a simulator from configuration.
    pub fn new(config: &SimulatorConfig) -> AlgoResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            capabilities: Capabilities::simulator(config.max_qubits, config.max_shots),
            rng: Mutex::new(rng),
            jobs: Mutex::new(FxHashMap::default()),
            next_id: AtomicU64::new(0),
        })
    }

    /// Default limits with a fixed sampling seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            capabilities: Capabilities::simulator(
                SimulatorConfig::default().max_qubits,
                SimulatorConfig::default().max_shots,
            ),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            jobs: Mutex::new(FxHashMap::default()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of jobs whose result has not been fetched yet.
    pub fn pending_jobs(&self) -> usize {
        lock(&self.jobs).len()
    }

    /// Number of jobs accepted so far.
    pub fn jobs_submitted(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Evolve `|0…0⟩` through the circuit's gates.
    pub fn evolve(circuit: &Circuit) -> AlgoResult<StateVector> {
        let mut state = StateVector::zero(circuit.num_qubits());
        state.apply_all(circuit.ops())?;
        Ok(state)
    }

    fn sample(&self, circuit: &Circuit, state: &StateVector, shots: u32) -> Counts {
        let mut cumulative = Vec::with_capacity(state.amplitudes().len());
        let mut total = 0.0;
        for p in state.probabilities() {
            total += p;
            cumulative.push(total);
        }

        let mut outcomes: FxHashMap<usize, u64> = FxHashMap::default();
        {
            let mut rng = lock(&self.rng);
            for _ in 0..shots {
                let r = rng.gen_range(0.0..total);
                let idx = cumulative
                    .partition_point(|&c| c <= r)
                    .min(cumulative.len() - 1);
                *outcomes.entry(idx).or_default() += 1;
            }
        }

        Counts::from_pairs(
            outcomes
                .into_iter()
                .map(|(idx, count)| (classical_bits(circuit, idx), count)),
        )
    }
}

/// Render the measured bits of basis state `index`, classical bit 0 rightmost.
fn classical_bits(circuit: &Circuit, index: usize) -> String {
    let width = circuit.num_clbits() as usize;
    let mut bits = vec![b'0'; width];
    for m in circuit.measurements() {
        if (index >> m.qubit.0) & 1 == 1 {
            bits[width - 1 - m.clbit.0 as usize] = b'1';
        }
    }
    bits.into_iter().map(char::from).collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Backend<Circuit> for StateVectorSimulator {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn validate(&self, circuit: &Circuit) -> AlgoResult<ValidationResult> {
        let mut reasons = self.capabilities.check(circuit);
        if let Err(err) = circuit.validate() {
            reasons.push(err);
        }
        Ok(ValidationResult::from_reasons(reasons))
    }

    async fn submit(&self, circuit: &Circuit, shots: u32) -> AlgoResult<JobId> {
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(AlgoError::InvalidShots(format!(
                "shots must be 1..={}, got {shots}",
                self.capabilities.max_shots
            )));
        }
        if let Some(err) = self.capabilities.check(circuit).into_iter().next() {
            return Err(err);
        }
        circuit.validate()?;

        let seq = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let id = JobId::sequential(&self.capabilities.name, seq);

        let start = Instant::now();
        let state = Self::evolve(circuit)?;
        let counts = self.sample(circuit, &state, shots);
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            job = %id,
            circuit = circuit.name(),
            qubits = circuit.num_qubits(),
            gates = circuit.gate_count(),
            shots,
            elapsed_ms,
            "simulated circuit"
        );

        let result = ExecutionResult::new(counts, shots)
            .with_execution_time(elapsed_ms)
            .with_completed_at(Utc::now())
            .with_metadata(serde_json::json!({
                "backend": self.capabilities.name,
                "num_qubits": circuit.num_qubits(),
                "gate_count": circuit.gate_count(),
            }));

        lock(&self.jobs).insert(
            id.clone(),
            JobRecord {
                status: JobStatus::Completed,
                result: Some(result),
            },
        );

        Ok(id)
    }

    async fn status(&self, job_id: &JobId) -> AlgoResult<JobStatus> {
        lock(&self.jobs)
            .get(job_id)
            .map(|record| record.status.clone())
            .ok_or_else(|| AlgoError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> AlgoResult<ExecutionResult> {
        lock(&self.jobs)
            .remove(job_id)
            .and_then(|record| record.result)
            .ok_or_else(|| AlgoError::JobNotFound(job_id.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitBuilder, QubitId};

    fn bell() -> Circuit {
        let mut b = CircuitBuilder::new("bell");
        let q = b.qreg("q", 2);
        let c = b.creg("c", 2);
        b.h(q.qubit(0)).cx(q.qubit(0), q.qubit(1));
        b.measure_register(&q, &c).unwrap();
        b.build().unwrap()
    }

    #[tokio::test]
    async fn test_bell_counts_are_correlated() {
        let sim = StateVectorSimulator::seeded(1);
        let result = sim.run(&bell(), 2000).await.unwrap();

        assert_eq!(result.shots, 2000);
        assert_eq!(result.counts.total_shots(), 2000);
        assert_eq!(result.counts.get("01") + result.counts.get("10"), 0);
        assert!(result.counts.get("00") > 800);
        assert!(result.counts.get("11") > 800);
        assert!(result.completed_at.is_some());
        assert_eq!(sim.jobs_submitted(), 1);
    }

    #[tokio::test]
    async fn test_bit_order_is_little_endian() {
        let mut b = CircuitBuilder::new("x1");
        let q = b.qreg("q", 3);
        let c = b.creg("c", 3);
        b.x(q.qubit(1));
        b.measure_register(&q, &c).unwrap();
        let circuit = b.build().unwrap();

        let sim = StateVectorSimulator::seeded(2);
        let result = sim.run(&circuit, 10).await.unwrap();
        assert_eq!(result.counts.get("010"), 10);
    }

    #[tokio::test]
    async fn test_only_measured_qubits_appear() {
        let mut b = CircuitBuilder::new("partial");
        let q = b.qreg("q", 2);
        let flag = b.qreg("flag", 1);
        let c = b.creg("c", 2);
        b.x(flag.qubit(0)).x(q.qubit(0));
        b.measure_register(&q, &c).unwrap();
        let circuit = b.build().unwrap();

        let sim = StateVectorSimulator::seeded(3);
        let result = sim.run(&circuit, 5).await.unwrap();
        assert_eq!(result.counts.get("01"), 5);
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        let sim = StateVectorSimulator::seeded(4);
        let err = sim.submit(&bell(), 0).await.unwrap_err();
        assert!(matches!(err, AlgoError::InvalidShots(_)));
        assert!(err.is_simulation());
        assert_eq!(sim.jobs_submitted(), 0);
    }

    #[tokio::test]
    async fn test_circuit_too_large() {
        let sim = StateVectorSimulator::new(&SimulatorConfig {
            seed: Some(5),
            max_qubits: 1,
            ..SimulatorConfig::default()
        })
        .unwrap();
        let err = sim.submit(&bell(), 10).await.unwrap_err();
        assert!(matches!(err, AlgoError::CircuitTooLarge(_)));

        let validation = sim.validate(&bell()).await.unwrap();
        assert!(!validation.is_valid());

        let err = sim.run(&bell(), 10).await.unwrap_err();
        assert!(matches!(err, AlgoError::CircuitTooLarge(_)), "{err}");
        assert_eq!(sim.jobs_submitted(), 0);
    }

    #[tokio::test]
    async fn test_run_rejects_undeclared_qubit() {
        let mut b = CircuitBuilder::new("ok");
        let q = b.qreg("q", 1);
        b.h(q.qubit(0));
        let mut circuit = b.build().unwrap();
        // Serialize round-trip to smuggle in an op the builder would refuse.
        let mut json = serde_json::to_value(&circuit).unwrap();
        json["ops"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!({"gate": "x", "qubit": 5}));
        circuit = serde_json::from_value(json).unwrap();
        assert_eq!(circuit.ops()[1].qubits(), vec![QubitId(5)]);

        let sim = StateVectorSimulator::seeded(6);
        let err = sim.run(&circuit, 10).await.unwrap_err();
        assert!(matches!(err, AlgoError::InvalidCircuit(_)));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let sim = StateVectorSimulator::seeded(7);
        let err = sim.status(&JobId::sequential("statevector", 999)).await.unwrap_err();
        assert!(matches!(err, AlgoError::JobNotFound(_)));
    }

    #[tokio::test]
    async fn test_result_releases_job() {
        let sim = StateVectorSimulator::seeded(8);
        for _ in 0..5 {
            sim.run(&bell(), 10).await.unwrap();
        }
        assert_eq!(sim.jobs_submitted(), 5);
        assert_eq!(sim.pending_jobs(), 0);

        let id = sim.submit(&bell(), 10).await.unwrap();
        assert_eq!(sim.pending_jobs(), 1);
        assert_eq!(sim.status(&id).await.unwrap(), JobStatus::Completed);
        assert_eq!(sim.result(&id).await.unwrap().shots, 10);
        assert_eq!(sim.pending_jobs(), 0);

        let err = sim.result(&id).await.unwrap_err();
        assert!(matches!(err, AlgoError::JobNotFound(_)));
        let err = sim.status(&id).await.unwrap_err();
        assert!(matches!(err, AlgoError::JobNotFound(_)));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let circuit = bell();
        let state = StateVectorSimulator::evolve(&circuit).unwrap();
        let a = StateVectorSimulator::seeded(42).sample(&circuit, &state, 500);
        let b = StateVectorSimulator::seeded(42).sample(&circuit, &state, 500);
        assert_eq!(a, b);
    }
}
