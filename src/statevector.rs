//! Dense state-vector evolution.
//!
//! Qubit `k` corresponds to bit `k` of the basis-state index, so basis state
//! `|…q2 q1 q0⟩` lives at index `Σ qk·2^k`.

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;

use crate::circuit::{GateOp, QubitId};
use crate::error::{AlgoError, AlgoResult};

/// Amplitudes of an `n`-qubit register.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: u32,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// `|0…0⟩` on `num_qubits` qubits.
    pub fn zero(num_qubits: u32) -> Self {
        Self::basis(num_qubits, 0)
    }

    /// Computational basis state `|index⟩`.
    pub fn basis(num_qubits: u32, index: usize) -> Self {
        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        amplitudes[index % dim] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Check that two states agree amplitude-wise within `tolerance`.
    pub fn approx_eq(&self, other: &StateVector, tolerance: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Apply one gate in place.
    pub fn apply(&mut self, op: &GateOp) -> AlgoResult<()> {
        for q in op.qubits() {
            self.check(q)?;
        }
        match op {
            GateOp::H { qubit } => self.apply_h(mask(*qubit)),
            GateOp::X { qubit } => self.apply_controlled_x(0, mask(*qubit)),
            GateOp::Cx { control, target } => self.apply_controlled_x(mask(*control), mask(*target)),
            GateOp::Mcx { controls, target } => {
                let controls = controls.iter().fold(0, |acc, q| acc | mask(*q));
                self.apply_controlled_x(controls, mask(*target));
            }
            GateOp::Cp {
                theta,
                control,
                target,
            } => self.apply_phase(mask(*control) | mask(*target), *theta),
            GateOp::Swap { a, b } => self.apply_swap(mask(*a), mask(*b)),
        }
        Ok(())
    }

    /// Apply a gate sequence in order.
    pub fn apply_all<'a>(&mut self, ops: impl IntoIterator<Item = &'a GateOp>) -> AlgoResult<()> {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }

    fn check(&self, qubit: QubitId) -> AlgoResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(AlgoError::InvalidCircuit(format!(
                "qubit {} outside {}-qubit state",
                qubit.0, self.num_qubits
            )));
        }
        Ok(())
    }

    fn apply_h(&mut self, target: usize) {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        for i in 0..self.amplitudes.len() {
            if i & target != 0 {
                continue;
            }
            let j = i | target;
            let (a0, a1) = (self.amplitudes[i], self.amplitudes[j]);
            self.amplitudes[i] = s * (a0 + a1);
            self.amplitudes[j] = s * (a0 - a1);
        }
    }

    /// Flip `target` on every basis state whose `controls` bits are all set.
    /// An empty control mask is a plain bit flip.
    fn apply_controlled_x(&mut self, controls: usize, target: usize) {
        for i in 0..self.amplitudes.len() {
            if i & target == 0 && i & controls == controls {
                self.amplitudes.swap(i, i | target);
            }
        }
    }

    /// Multiply by `e^{iθ}` every basis state whose `bits` are all set.
    fn apply_phase(&mut self, bits: usize, theta: f64) {
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & bits == bits {
                *amp *= phase;
            }
        }
    }

    fn apply_swap(&mut self, a: usize, b: usize) {
        for i in 0..self.amplitudes.len() {
            if i & a != 0 && i & b == 0 {
                self.amplitudes.swap(i, i ^ a ^ b);
            }
        }
    }
}

fn mask(qubit: QubitId) -> usize {
    1usize << qubit.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_x_flips_basis_state() {
        let mut state = StateVector::zero(2);
        state.apply(&GateOp::X { qubit: q(1) }).unwrap();
        assert!(state.approx_eq(&StateVector::basis(2, 0b10), EPS));
    }

    #[test]
    fn test_h_twice_is_identity() {
        let mut state = StateVector::basis(1, 1);
        state.apply(&GateOp::H { qubit: q(0) }).unwrap();
        let probs = state.probabilities();
        assert!((probs[0] - 0.5).abs() < EPS);
        assert!(state.amplitudes()[1].re < 0.0);
        state.apply(&GateOp::H { qubit: q(0) }).unwrap();
        assert!(state.approx_eq(&StateVector::basis(1, 1), EPS));
    }

    #[test]
    fn test_cx_only_fires_on_control() {
        let mut state = StateVector::basis(2, 0b01);
        state
            .apply(&GateOp::Cx {
                control: q(0),
                target: q(1),
            })
            .unwrap();
        assert!(state.approx_eq(&StateVector::basis(2, 0b11), EPS));

        let mut state = StateVector::basis(2, 0b10);
        state
            .apply(&GateOp::Cx {
                control: q(0),
                target: q(1),
            })
            .unwrap();
        assert!(state.approx_eq(&StateVector::basis(2, 0b10), EPS));
    }

    #[test]
    fn test_mcx_requires_all_controls() {
        let toffoli = GateOp::Mcx {
            controls: vec![q(0), q(1)],
            target: q(2),
        };
        let mut state = StateVector::basis(3, 0b011);
        state.apply(&toffoli).unwrap();
        assert!(state.approx_eq(&StateVector::basis(3, 0b111), EPS));

        let mut state = StateVector::basis(3, 0b001);
        state.apply(&toffoli).unwrap();
        assert!(state.approx_eq(&StateVector::basis(3, 0b001), EPS));
    }

    #[test]
    fn test_cp_phases_only_11() {
        let mut state = StateVector::basis(2, 0b11);
        state
            .apply(&GateOp::Cp {
                theta: PI,
                control: q(0),
                target: q(1),
            })
            .unwrap();
        assert!((state.amplitudes()[3].re + 1.0).abs() < EPS);

        let mut state = StateVector::basis(2, 0b01);
        state
            .apply(&GateOp::Cp {
                theta: PI,
                control: q(0),
                target: q(1),
            })
            .unwrap();
        assert!(state.approx_eq(&StateVector::basis(2, 0b01), EPS));
    }

    #[test]
    fn test_swap_exchanges_bits() {
        let mut state = StateVector::basis(3, 0b001);
        state.apply(&GateOp::Swap { a: q(0), b: q(2) }).unwrap();
        assert!(state.approx_eq(&StateVector::basis(3, 0b100), EPS));
    }

    #[test]
    fn test_rejects_qubit_outside_state() {
        let mut state = StateVector::zero(2);
        let err = state.apply(&GateOp::H { qubit: q(2) }).unwrap_err();
        assert!(matches!(err, AlgoError::InvalidCircuit(_)));
    }
}
