//! Boolean oracles as reversible gate sequences.
//!
//! An oracle for `f: {0,1}^n → {0,1}` maps `|x⟩|y⟩ → |x⟩|y ⊕ f(x)⟩`. Three
//! families are supported:
//!
//! - `Constant(b)`: nothing for `b = 0`, a bit flip on the output for `b = 1`.
//! - `Balanced`: parity `x₁ ⊕ … ⊕ xₙ`, one CX per input in ascending order.
//! - `Custom(table)`: one flip-conjugated multi-controlled X per `1` entry.
//!
//! Truth-table index `i` is written most-significant bit first onto the
//! inputs, so input qubit 0 carries the top bit of `i`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::circuit::{GateOp, QubitId};
use crate::error::{AlgoError, AlgoResult};

/// Largest input width accepted for oracles (the truth table has `2^n` rows).
pub const MAX_ORACLE_INPUTS: u32 = 24;

/// Oracle family requested by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    Constant,
    Balanced,
    Custom,
}

impl FromStr for OracleKind {
    type Err = AlgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(OracleKind::Constant),
            "balanced" => Ok(OracleKind::Balanced),
            "custom" => Ok(OracleKind::Custom),
            other => Err(AlgoError::InvalidParameter(format!(
                "oracle type must be one of: constant, balanced, custom (got '{other}')"
            ))),
        }
    }
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OracleKind::Constant => "constant",
            OracleKind::Balanced => "balanced",
            OracleKind::Custom => "custom",
        })
    }
}

/// Truth table of a custom oracle: `2^n` output bits, row `i` is `f(i)`.
///
/// Deserialization enforces the same shape as [`TruthTable::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTruthTable")]
pub struct TruthTable {
    num_inputs: u32,
    bits: Vec<bool>,
}

#[derive(Deserialize)]
struct RawTruthTable {
    num_inputs: u32,
    bits: Vec<bool>,
}

impl TryFrom<RawTruthTable> for TruthTable {
    type Error = AlgoError;

    fn try_from(raw: RawTruthTable) -> AlgoResult<Self> {
        check_inputs(raw.num_inputs)?;
        let expected = 1usize << raw.num_inputs;
        if raw.bits.len() != expected {
            return Err(AlgoError::InvalidOracleSpec(format!(
                "custom bitstring length must be 2^{} = {expected}, got {}",
                raw.num_inputs,
                raw.bits.len()
            )));
        }
        Ok(Self {
            num_inputs: raw.num_inputs,
            bits: raw.bits,
        })
    }
}

impl TruthTable {
    /// Parse a string of exactly `2^num_inputs` `'0'`/`'1'` characters.
    pub fn parse(num_inputs: u32, bits: &str) -> AlgoResult<Self> {
        check_inputs(num_inputs)?;
        let expected = 1usize << num_inputs;
        if bits.len() != expected {
            return Err(AlgoError::InvalidOracleSpec(format!(
                "custom bitstring length must be 2^{num_inputs} = {expected}, got {}",
                bits.len()
            )));
        }
        let bits = bits
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(AlgoError::InvalidOracleSpec(format!(
                    "custom bitstring must contain only 0 and 1, found '{other}'"
                ))),
            })
            .collect::<AlgoResult<Vec<_>>>()?;
        Ok(Self { num_inputs, bits })
    }

    /// A uniformly shuffled table with exactly half the rows set.
    pub fn random_balanced<R: Rng + ?Sized>(num_inputs: u32, rng: &mut R) -> AlgoResult<Self> {
        check_inputs(num_inputs)?;
        let half = 1usize << (num_inputs - 1);
        let mut bits = vec![false; half];
        bits.resize(2 * half, true);
        bits.shuffle(rng);
        Ok(Self { num_inputs, bits })
    }

    /// Number of inputs the table is indexed by.
    pub fn num_inputs(&self) -> u32 {
        self.num_inputs
    }

    /// Number of rows (`2^n`).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// `f(index)`.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Number of rows where `f` is 1.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Number of rows where `f` is 0.
    pub fn zeros(&self) -> usize {
        self.len() - self.ones()
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Which boolean function an oracle implements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleSpec {
    /// `f(x) = b` for every `x`.
    Constant(bool),
    /// `f(x) = x₁ ⊕ x₂ ⊕ … ⊕ xₙ`.
    Balanced,
    /// Arbitrary truth table.
    Custom(TruthTable),
}

impl OracleSpec {
    /// Turn driver-level inputs into a spec.
    ///
    /// `constant_value` must be 0 or 1 whatever the kind. For
    /// [`OracleKind::Custom`] without a bitstring a random balanced table is
    /// drawn from `rng`.
    pub fn resolve<R: Rng + ?Sized>(
        num_inputs: u32,
        kind: OracleKind,
        constant_value: u8,
        custom_bitstring: Option<&str>,
        rng: &mut R,
    ) -> AlgoResult<Self> {
        check_inputs(num_inputs)?;
        if constant_value > 1 {
            return Err(AlgoError::InvalidParameter(format!(
                "constant value must be 0 or 1, got {constant_value}"
            )));
        }
        match kind {
            OracleKind::Constant => Ok(OracleSpec::Constant(constant_value == 1)),
            OracleKind::Balanced => Ok(OracleSpec::Balanced),
            OracleKind::Custom => match custom_bitstring {
                Some(bits) => Ok(OracleSpec::Custom(TruthTable::parse(num_inputs, bits)?)),
                None => Ok(OracleSpec::Custom(TruthTable::random_balanced(
                    num_inputs, rng,
                )?)),
            },
        }
    }

    /// The variant this oracle was built as.
    pub fn kind(&self) -> OracleKind {
        match self {
            OracleSpec::Constant(_) => OracleKind::Constant,
            OracleSpec::Balanced => OracleKind::Balanced,
            OracleSpec::Custom(_) => OracleKind::Custom,
        }
    }
}

/// Offline category of an oracle, computed without running any circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleCategory {
    Constant,
    Balanced,
    /// Neither constant nor balanced.
    Neither { ones: usize, zeros: usize },
}

impl fmt::Display for OracleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleCategory::Constant => write!(f, "constant"),
            OracleCategory::Balanced => write!(f, "balanced"),
            OracleCategory::Neither { ones, zeros } => {
                write!(f, "neither (ones: {ones}, zeros: {zeros})")
            }
        }
    }
}

/// Classify an oracle from its definition alone.
pub fn validate_oracle(spec: &OracleSpec) -> OracleCategory {
    match spec {
        OracleSpec::Constant(_) => OracleCategory::Constant,
        OracleSpec::Balanced => OracleCategory::Balanced,
        OracleSpec::Custom(table) => {
            let ones = table.ones();
            if ones == 0 || ones == table.len() {
                OracleCategory::Constant
            } else if 2 * ones == table.len() {
                OracleCategory::Balanced
            } else {
                OracleCategory::Neither {
                    ones,
                    zeros: table.zeros(),
                }
            }
        }
    }
}

/// Emit the gate sequence implementing `spec` from `inputs` onto `output`.
///
/// Fails with `InvalidOracleSpec` before emitting anything when a custom
/// table does not have `2^inputs.len()` rows.
pub fn synthesize(spec: &OracleSpec, inputs: &[QubitId], output: QubitId) -> AlgoResult<Vec<GateOp>> {
    if inputs.is_empty() {
        return Err(AlgoError::InvalidParameter(
            "oracle needs at least one input qubit".into(),
        ));
    }

    match spec {
        OracleSpec::Constant(false) => Ok(Vec::new()),
        OracleSpec::Constant(true) => Ok(vec![GateOp::X { qubit: output }]),
        OracleSpec::Balanced => Ok(inputs
            .iter()
            .map(|&control| GateOp::Cx {
                control,
                target: output,
            })
            .collect()),
        OracleSpec::Custom(table) => {
            let n = inputs.len();
            if table.num_inputs() as usize != n {
                return Err(AlgoError::InvalidOracleSpec(format!(
                    "truth table is for {} inputs, oracle has {n}",
                    table.num_inputs()
                )));
            }

            let mut ops = Vec::new();
            for i in (0..table.len()).filter(|&i| table.get(i) == Some(true)) {
                // Inputs whose bit in `i` is 0 get flipped so the controls fire on `i`.
                let flips: Vec<GateOp> = inputs
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (i >> (n - 1 - j)) & 1 == 0)
                    .map(|(_, &qubit)| GateOp::X { qubit })
                    .collect();

                ops.extend(flips.iter().cloned());
                if n == 1 {
                    ops.push(GateOp::Cx {
                        control: inputs[0],
                        target: output,
                    });
                } else {
                    ops.push(GateOp::Mcx {
                        controls: inputs.to_vec(),
                        target: output,
                    });
                }
                ops.extend(flips);
            }
            Ok(ops)
        }
    }
}

fn check_inputs(num_inputs: u32) -> AlgoResult<()> {
    if num_inputs == 0 || num_inputs > MAX_ORACLE_INPUTS {
        return Err(AlgoError::InvalidParameter(format!(
            "number of input qubits must be in 1..={MAX_ORACLE_INPUTS}, got {num_inputs}"
        )));
    }
    Ok(())
}
