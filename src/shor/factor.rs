//! The factoring control loop.
//!
//! ```text
//!   N even ──────────────────────────────→ (2, N/2)
//!   pick a ──→ gcd(a, N) ≠ 1 ─────────────→ (g, N/g)
//!          └─→ period r ──→ r odd ─────────→ retry
//!                      └──→ x = a^(r/2) mod N
//!                           (gcd(x+1,N), gcd(x-1,N)) ──→ product ≠ N → retry
//!                                                   └──→ pair
//! ```
//!
//! Retries draw a fresh base and rerun the whole pipeline. The loop is
//! iterative and gives up with `FactorizationFailed` after
//! `ShorConfig::max_attempts` attempts.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::arith::{bit_length, gcd, mod_pow};
use super::period::{build_period_circuit, check_modulus, most_likely_measurement};
use super::postprocess::measurement_to_period;
use crate::backend::Backend;
use crate::circuit::Circuit;
use crate::config::ShorConfig;
use crate::error::{AlgoError, AlgoResult};

/// Two factors whose product is the modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorPair {
    pub first: u64,
    pub second: u64,
}

impl FactorPair {
    /// Pair `first` and `second` in the order given.
    pub fn new(first: u64, second: u64) -> Self {
        Self { first, second }
    }

    /// Product of both factors, widened so it cannot overflow.
    pub fn product(&self) -> u128 {
        u128::from(self.first) * u128::from(self.second)
    }

    /// The pair with the smaller factor first.
    pub fn sorted(&self) -> (u64, u64) {
        (self.first.min(self.second), self.first.max(self.second))
    }

    /// Check if either factor is 1.
    pub fn is_trivial(&self) -> bool {
        self.first == 1 || self.second == 1
    }
}

impl fmt::Display for FactorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Supplies the base `a` for each factoring attempt.
pub trait BaseSource {
    /// A base in `[2, modulus - 1]`.
    fn next_base(&mut self, modulus: u64) -> u64;
}

/// Uniformly random bases.
#[derive(Debug, Clone)]
pub struct RandomBases<R> {
    rng: R,
}

impl<R: Rng> RandomBases<R> {
    /// Draw bases from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomBases<StdRng> {
    /// Reproducible bases from a seeded `StdRng`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Bases from an OS-seeded `StdRng`.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> BaseSource for RandomBases<R> {
    fn next_base(&mut self, modulus: u64) -> u64 {
        self.rng.gen_range(2..modulus)
    }
}

/// A scripted sequence of bases, cycled when exhausted.
///
/// Entries outside `[2, modulus - 1]` are skipped; when no entry fits the
/// source falls back to 2.
#[derive(Debug, Clone)]
pub struct FixedBases {
    bases: Vec<u64>,
    pos: usize,
}

impl FixedBases {
    /// Script the bases handed out, in order.
    pub fn new(bases: impl Into<Vec<u64>>) -> Self {
        Self {
            bases: bases.into(),
            pos: 0,
        }
    }
}

impl BaseSource for FixedBases {
    fn next_base(&mut self, modulus: u64) -> u64 {
        for _ in 0..self.bases.len() {
            let base = self.bases[self.pos % self.bases.len()];
            self.pos += 1;
            if (2..modulus).contains(&base) {
                return base;
            }
        }
        2
    }
}

/// What a single attempt with one base produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// A factor pair; `quantum` is false when gcd(a, N) gave it away.
    Factors { pair: FactorPair, quantum: bool },
    /// The candidate period was odd.
    OddPeriod(u64),
    /// The candidate period did not yield a valid pair.
    SpuriousPeriod(u64),
}

/// Shor's algorithm for one modulus.
#[derive(Debug, Clone)]
pub struct ShorsAlgorithm {
    modulus: u64,
    config: ShorConfig,
}

impl ShorsAlgorithm {
    /// Validate the modulus and configuration.
    pub fn new(modulus: u64, config: ShorConfig) -> AlgoResult<Self> {
        check_modulus(modulus)?;
        config.validate()?;
        Ok(Self { modulus, config })
    }

    /// The integer being factored.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Bit length of the modulus; the circuit has `2n` counting qubits.
    pub fn num_bits(&self) -> u32 {
        bit_length(self.modulus)
    }

    /// Settings every attempt runs with.
    pub fn config(&self) -> &ShorConfig {
        &self.config
    }

    /// Run one attempt with base `base`.
    pub async fn attempt<B>(&self, base: u64, backend: &B) -> AlgoResult<Attempt>
    where
        B: Backend<Circuit> + ?Sized,
    {
        let n = self.modulus;
        let g = gcd(base, n);
        if g != 1 {
            debug!(modulus = n, base, gcd = g, "base shares a factor");
            return Ok(Attempt::Factors {
                pair: FactorPair::new(g, n / g),
                quantum: false,
            });
        }

        let circuit = build_period_circuit(n, base)?;
        let measurement = most_likely_measurement(backend, &circuit, self.config.shots).await?;
        let r = measurement_to_period(&measurement, self.num_bits(), n)?;
        debug!(modulus = n, base, %measurement, period = r, "candidate period");

        if r % 2 != 0 {
            return Ok(Attempt::OddPeriod(r));
        }

        let x = mod_pow(base, r / 2, n);
        let pair = FactorPair::new(gcd(x + 1, n), gcd(x.checked_sub(1).unwrap_or(n - 1), n));
        if pair.product() != u128::from(n) || (self.config.reject_trivial_factors && pair.is_trivial())
        {
            return Ok(Attempt::SpuriousPeriod(r));
        }

        Ok(Attempt::Factors {
            pair,
            quantum: true,
        })
    }

    /// Factor the modulus, retrying with fresh bases up to `max_attempts`.
    pub async fn factor<B, S>(&self, backend: &B, bases: &mut S) -> AlgoResult<FactorPair>
    where
        B: Backend<Circuit> + ?Sized,
        S: BaseSource + ?Sized,
    {
        let n = self.modulus;
        if n % 2 == 0 {
            let pair = FactorPair::new(2, n / 2);
            info!(modulus = n, %pair, "even modulus");
            return Ok(pair);
        }

        for attempt in 1..=self.config.max_attempts {
            let base = bases.next_base(n);
            match self.attempt(base, backend).await? {
                Attempt::Factors { pair, quantum } => {
                    info!(modulus = n, base, attempt, quantum, %pair, "factored");
                    return Ok(pair);
                }
                Attempt::OddPeriod(r) => {
                    debug!(modulus = n, base, attempt, period = r, "odd period, retrying");
                }
                Attempt::SpuriousPeriod(r) => {
                    debug!(modulus = n, base, attempt, period = r, "spurious period, retrying");
                }
            }
        }

        warn!(modulus = n, attempts = self.config.max_attempts, "attempt ceiling reached");
        Err(AlgoError::FactorizationFailed {
            modulus: n,
            attempts: self.config.max_attempts,
        })
    }
}

/// Factor `modulus` with entropy-seeded random bases.
pub async fn factor<B>(modulus: u64, config: ShorConfig, backend: &B) -> AlgoResult<FactorPair>
where
    B: Backend<Circuit> + ?Sized,
{
    ShorsAlgorithm::new(modulus, config)?
        .factor(backend, &mut RandomBases::from_entropy())
        .await
}
