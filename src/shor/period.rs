//! Period-finding circuit synthesis.
//!
//! For a modulus `N` of bit length `n` the circuit uses `2n` counting qubits
//! and `n` power qubits:
//!
//! 1. Hadamard on every counting qubit.
//! 2. Power register set to `|1⟩`.
//! 3. For counting qubit `i`, with `p = a^(2^i) mod N`, a controlled phase
//!    of `2π·p / 2^(j+1)` onto each power qubit `j`.
//! 4. Inverse QFT over the counting register.
//! 5. Counting register measured into `2n` classical bits.
//!
//! Step 3 is a phase-only stand-in for controlled modular multiplication:
//! the rotation is proportional to the power rather than an exact
//! permutation unitary. The classical checks in the factor loop reject any
//! period it gets wrong.

use std::f64::consts::PI;

use tracing::debug;

use super::arith::{bit_length, gcd};
use crate::backend::Backend;
use crate::circuit::{Circuit, CircuitBuilder, QubitId};
use crate::error::{AlgoError, AlgoResult};

/// Largest modulus bit length accepted (measurements must fit in 64 bits).
pub const MAX_MODULUS_BITS: u32 = 32;

/// Build the phase-estimation circuit for modulus `modulus` and base `base`.
///
/// `base` must lie in `[2, modulus - 1]` and be coprime to `modulus`.
pub fn build_period_circuit(modulus: u64, base: u64) -> AlgoResult<Circuit> {
    check_modulus(modulus)?;
    if base < 2 || base >= modulus {
        return Err(AlgoError::InvalidParameter(format!(
            "base must be in [2, {}], got {base}",
            modulus - 1
        )));
    }
    if gcd(base, modulus) != 1 {
        return Err(AlgoError::InvalidParameter(format!(
            "base {base} is not coprime to {modulus}"
        )));
    }

    let n = bit_length(modulus);
    let mut b = CircuitBuilder::new(format!("period_finding_{base}_mod_{modulus}"));
    let count = b.qreg("count", 2 * n);
    let power = b.qreg("power", n);
    let c = b.creg("c", 2 * n);

    for q in count.iter() {
        b.h(q);
    }
    b.x(power.qubit(0));

    let mut p = base % modulus;
    for control in count.iter() {
        for (j, target) in power.iter().enumerate() {
            let theta = 2.0 * PI * p as f64 / 2f64.powi(j as i32 + 1);
            b.cp(theta, control, target);
        }
        p = ((u128::from(p) * u128::from(p)) % u128::from(modulus)) as u64;
    }

    let counting: Vec<_> = count.iter().collect();
    append_inverse_qft(&mut b, &counting);

    b.measure_register(&count, &c)?;
    b.build()
}

/// Append an inverse quantum Fourier transform over `qubits`.
///
/// Mirror swaps first, then for each qubit `j` a `-π/2^(j-k)` controlled
/// phase from every earlier qubit `k`, then a Hadamard on `j`.
pub fn append_inverse_qft(b: &mut CircuitBuilder, qubits: &[QubitId]) {
    let len = qubits.len();
    for i in 0..len / 2 {
        b.swap(qubits[i], qubits[len - 1 - i]);
    }
    for j in 0..len {
        for k in 0..j {
            let theta = -PI / 2f64.powi((j - k) as i32);
            b.cp(theta, qubits[k], qubits[j]);
        }
        b.h(qubits[j]);
    }
}

/// Run the period-finding circuit and return its most frequent outcome.
///
/// Ties go to the lexicographically smallest bitstring.
pub async fn most_likely_measurement<B>(backend: &B, circuit: &Circuit, shots: u32) -> AlgoResult<String>
where
    B: Backend<Circuit> + ?Sized,
{
    let result = backend.run(circuit, shots).await?;
    if let Some(width) = result.counts.width() {
        if width != circuit.num_clbits() as usize {
            return Err(AlgoError::JobFailed(format!(
                "expected {}-bit outcomes, backend returned {width}-bit",
                circuit.num_clbits()
            )));
        }
    }
    let (bits, count) = result
        .counts
        .most_frequent()
        .ok_or_else(|| AlgoError::JobFailed(format!("no counts returned for '{}'", circuit.name())))?;
    debug!(
        circuit = circuit.name(),
        measurement = %bits,
        count,
        distinct = result.counts.len(),
        "most likely measurement"
    );
    Ok(bits.clone())
}

pub(crate) fn check_modulus(modulus: u64) -> AlgoResult<()> {
    if modulus <= 1 {
        return Err(AlgoError::InvalidParameter(format!(
            "N must be an integer greater than 1, got {modulus}"
        )));
    }
    if bit_length(modulus) > MAX_MODULUS_BITS {
        return Err(AlgoError::InvalidParameter(format!(
            "N must fit in {MAX_MODULUS_BITS} bits, got {modulus}"
        )));
    }
    Ok(())
}
