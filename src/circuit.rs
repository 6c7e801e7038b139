//! Circuit description: registers, gate operations and measurements.
//!
//! A [`Circuit`] is the unit handed to a [`Backend`](crate::Backend). It is
//! assembled by a [`CircuitBuilder`] that lives for exactly one synthesis
//! call and is consumed by [`CircuitBuilder::build`], which checks structural
//! well-formedness:
//!
//! - every qubit referenced by a gate or measurement belongs to a declared
//!   register, and every classical bit to a declared classical register;
//! - registers are disjoint (qubit indices are never reused);
//! - a single gate never names the same qubit twice;
//! - rotation angles are finite.
//!
//! Gate names follow the OpenQASM 3 convention (`h`, `x`, `cx`, `mcx`, `cp`,
//! `swap`) so they can be checked against a backend's
//! [`GateSet`](crate::GateSet). `Display` renders the circuit as OpenQASM 3.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{AlgoError, AlgoResult};

/// Index of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

/// Index of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

/// A named, contiguous run of qubits. Carries no state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    name: String,
    offset: u32,
    size: u32,
}

impl QuantumRegister {
    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.size as usize
    }

    /// Check if the register is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Get the `i`-th qubit of the register.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn qubit(&self, i: usize) -> QubitId {
        assert!(
            i < self.len(),
            "qubit index {i} out of range for register '{}' of size {}",
            self.name,
            self.size
        );
        QubitId(self.offset + i as u32)
    }

    /// Iterate over the register's qubits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        (self.offset..self.offset + self.size).map(QubitId)
    }

    /// Check if the register owns `qubit`.
    pub fn contains(&self, qubit: QubitId) -> bool {
        (self.offset..self.offset + self.size).contains(&qubit.0)
    }
}

/// A named, contiguous run of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    name: String,
    offset: u32,
    size: u32,
}

impl ClassicalRegister {
    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.size as usize
    }

    /// Check if the register is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterate over the register's bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ClbitId> + '_ {
        (self.offset..self.offset + self.size).map(ClbitId)
    }

    fn contains(&self, clbit: ClbitId) -> bool {
        (self.offset..self.offset + self.size).contains(&clbit.0)
    }
}

/// A gate operation. Emission order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum GateOp {
    /// Hadamard.
    H { qubit: QubitId },
    /// Bit flip (Pauli-X).
    X { qubit: QubitId },
    /// Controlled bit flip.
    Cx { control: QubitId, target: QubitId },
    /// Bit flip on `target` when every control is `|1⟩`.
    Mcx {
        controls: Vec<QubitId>,
        target: QubitId,
    },
    /// Controlled phase rotation by `theta` radians.
    Cp {
        theta: f64,
        control: QubitId,
        target: QubitId,
    },
    /// Swap two qubits.
    Swap { a: QubitId, b: QubitId },
}

impl GateOp {
    /// OpenQASM 3 gate name.
    pub fn name(&self) -> &'static str {
        match self {
            GateOp::H { .. } => "h",
            GateOp::X { .. } => "x",
            GateOp::Cx { .. } => "cx",
            GateOp::Mcx { .. } => "mcx",
            GateOp::Cp { .. } => "cp",
            GateOp::Swap { .. } => "swap",
        }
    }

    /// Qubits the gate acts on, controls first.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            GateOp::H { qubit } | GateOp::X { qubit } => vec![*qubit],
            GateOp::Cx { control, target } | GateOp::Cp { control, target, .. } => {
                vec![*control, *target]
            }
            GateOp::Mcx { controls, target } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                qubits
            }
            GateOp::Swap { a, b } => vec![*a, *b],
        }
    }
}

/// Measurement of one qubit into one classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub qubit: QubitId,
    pub clbit: ClbitId,
}

/// An ordered gate sequence over declared registers plus its measurement map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    ops: Vec<GateOp>,
    measurements: Vec<Measurement>,
}

impl Circuit {
    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of declared qubits.
    pub fn num_qubits(&self) -> u32 {
        self.qregs.iter().map(|r| r.size).sum()
    }

    /// Total number of declared classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.cregs.iter().map(|r| r.size).sum()
    }

    /// Declared quantum registers, in declaration order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Declared classical registers, in declaration order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Gate operations in emission order.
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Measurement map.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of gate operations.
    pub fn gate_count(&self) -> usize {
        self.ops.len()
    }

    /// Distinct gate names used by the circuit.
    pub fn gate_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.ops.iter().map(GateOp::name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Find the register owning `qubit`.
    pub fn register_of(&self, qubit: QubitId) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.contains(qubit))
    }

    /// Check structural well-formedness.
    pub fn validate(&self) -> AlgoResult<()> {
        let mut seen = FxHashSet::default();
        for reg in &self.qregs {
            for q in reg.iter() {
                if !seen.insert(q) {
                    return Err(AlgoError::InvalidCircuit(format!(
                        "qubit {} of register '{}' overlaps another register",
                        q.0, reg.name
                    )));
                }
            }
        }

        for (idx, op) in self.ops.iter().enumerate() {
            let qubits = op.qubits();
            let mut distinct = FxHashSet::default();
            for q in &qubits {
                if self.register_of(*q).is_none() {
                    return Err(AlgoError::InvalidCircuit(format!(
                        "gate #{idx} ({}) references undeclared qubit {}",
                        op.name(),
                        q.0
                    )));
                }
                if !distinct.insert(*q) {
                    return Err(AlgoError::InvalidCircuit(format!(
                        "gate #{idx} ({}) names qubit {} more than once",
                        op.name(),
                        q.0
                    )));
                }
            }
            if let GateOp::Cp { theta, .. } = op {
                if !theta.is_finite() {
                    return Err(AlgoError::InvalidCircuit(format!(
                        "gate #{idx} (cp) has non-finite angle {theta}"
                    )));
                }
            }
        }

        let mut written = FxHashSet::default();
        for m in &self.measurements {
            if self.register_of(m.qubit).is_none() {
                return Err(AlgoError::InvalidCircuit(format!(
                    "measurement of undeclared qubit {}",
                    m.qubit.0
                )));
            }
            if !self.cregs.iter().any(|r| r.contains(m.clbit)) {
                return Err(AlgoError::InvalidCircuit(format!(
                    "measurement into undeclared classical bit {}",
                    m.clbit.0
                )));
            }
            if !written.insert(m.clbit) {
                return Err(AlgoError::InvalidCircuit(format!(
                    "classical bit {} is measured into more than once",
                    m.clbit.0
                )));
            }
        }

        Ok(())
    }

    fn qubit_label(&self, qubit: QubitId) -> String {
        match self.register_of(qubit) {
            Some(reg) => format!("{}[{}]", reg.name, qubit.0 - reg.offset),
            None => format!("${}", qubit.0),
        }
    }

    fn clbit_label(&self, clbit: ClbitId) -> String {
        match self.cregs.iter().find(|r| r.contains(clbit)) {
            Some(reg) => format!("{}[{}]", reg.name, clbit.0 - reg.offset),
            None => format!("b{}", clbit.0),
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OPENQASM 3.0;")?;
        writeln!(f, "include \"stdgates.inc\";")?;
        writeln!(f, "// {}", self.name)?;
        for reg in &self.qregs {
            writeln!(f, "qubit[{}] {};", reg.size, reg.name)?;
        }
        for reg in &self.cregs {
            writeln!(f, "bit[{}] {};", reg.size, reg.name)?;
        }
        for op in &self.ops {
            match op {
                GateOp::H { qubit } | GateOp::X { qubit } => {
                    writeln!(f, "{} {};", op.name(), self.qubit_label(*qubit))?;
                }
                GateOp::Cx { control, target } | GateOp::Swap { a: control, b: target } => {
                    writeln!(
                        f,
                        "{} {}, {};",
                        op.name(),
                        self.qubit_label(*control),
                        self.qubit_label(*target)
                    )?;
                }
                GateOp::Cp {
                    theta,
                    control,
                    target,
                } => {
                    writeln!(
                        f,
                        "cp({theta}) {}, {};",
                        self.qubit_label(*control),
                        self.qubit_label(*target)
                    )?;
                }
                GateOp::Mcx { controls, target } => {
                    let args: Vec<_> = controls
                        .iter()
                        .chain(std::iter::once(target))
                        .map(|q| self.qubit_label(*q))
                        .collect();
                    writeln!(f, "ctrl({}) @ x {};", controls.len(), args.join(", "))?;
                }
            }
        }
        for m in &self.measurements {
            writeln!(
                f,
                "{} = measure {};",
                self.clbit_label(m.clbit),
                self.qubit_label(m.qubit)
            )?;
        }
        Ok(())
    }
}

/// Mutable builder scoped to a single synthesis call.
///
/// Registers are allocated contiguously in declaration order, so qubit
/// indices are never shared between registers.
#[derive(Debug)]
pub struct CircuitBuilder {
    name: String,
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    ops: Vec<GateOp>,
    measurements: Vec<Measurement>,
    next_qubit: u32,
    next_clbit: u32,
}

impl CircuitBuilder {
    /// Start an empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: Vec::new(),
            cregs: Vec::new(),
            ops: Vec::new(),
            measurements: Vec::new(),
            next_qubit: 0,
            next_clbit: 0,
        }
    }

    /// Declare a quantum register of `size` qubits.
    pub fn qreg(&mut self, name: impl Into<String>, size: u32) -> QuantumRegister {
        let reg = QuantumRegister {
            name: name.into(),
            offset: self.next_qubit,
            size,
        };
        self.next_qubit += size;
        self.qregs.push(reg.clone());
        reg
    }

    /// Declare a classical register of `size` bits.
    pub fn creg(&mut self, name: impl Into<String>, size: u32) -> ClassicalRegister {
        let reg = ClassicalRegister {
            name: name.into(),
            offset: self.next_clbit,
            size,
        };
        self.next_clbit += size;
        self.cregs.push(reg.clone());
        reg
    }

    /// Append a gate.
    pub fn push(&mut self, op: GateOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Append a gate sequence in order.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = GateOp>) -> &mut Self {
        self.ops.extend(ops);
        self
    }

    pub fn h(&mut self, qubit: QubitId) -> &mut Self {
        self.push(GateOp::H { qubit })
    }

    pub fn x(&mut self, qubit: QubitId) -> &mut Self {
        self.push(GateOp::X { qubit })
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> &mut Self {
        self.push(GateOp::Cx { control, target })
    }

    pub fn mcx(&mut self, controls: Vec<QubitId>, target: QubitId) -> &mut Self {
        self.push(GateOp::Mcx { controls, target })
    }

    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> &mut Self {
        self.push(GateOp::Cp {
            theta,
            control,
            target,
        })
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) -> &mut Self {
        self.push(GateOp::Swap { a, b })
    }

    /// Measure one qubit into one classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> &mut Self {
        self.measurements.push(Measurement { qubit, clbit });
        self
    }

    /// Measure a whole quantum register into an equally sized classical one,
    /// qubit `i` into bit `i`.
    pub fn measure_register(
        &mut self,
        qreg: &QuantumRegister,
        creg: &ClassicalRegister,
    ) -> AlgoResult<&mut Self> {
        if qreg.size != creg.size {
            return Err(AlgoError::InvalidCircuit(format!(
                "cannot measure register '{}' ({} qubits) into '{}' ({} bits)",
                qreg.name, qreg.size, creg.name, creg.size
            )));
        }
        for (qubit, clbit) in qreg.iter().zip(creg.iter()) {
            self.measure(qubit, clbit);
        }
        Ok(self)
    }

    /// Finish the circuit, checking well-formedness.
    pub fn build(self) -> AlgoResult<Circuit> {
        let circuit = Circuit {
            name: self.name,
            qregs: self.qregs,
            cregs: self.cregs,
            ops: self.ops,
            measurements: self.measurements,
        };
        circuit.validate()?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell() -> Circuit {
        let mut b = CircuitBuilder::new("bell");
        let q = b.qreg("q", 2);
        let c = b.creg("c", 2);
        b.h(q.qubit(0)).cx(q.qubit(0), q.qubit(1));
        b.measure_register(&q, &c).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_registers_are_disjoint() {
        let mut b = CircuitBuilder::new("regs");
        let a = b.qreg("a", 3);
        let z = b.qreg("z", 2);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(z.qubit(0), QubitId(3));
        assert!(!a.contains(QubitId(3)));
        let circuit = b.build().unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.register_of(QubitId(4)).unwrap().name(), "z");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_register_index_out_of_range() {
        let mut b = CircuitBuilder::new("oob");
        let a = b.qreg("a", 2);
        let _ = a.qubit(2);
    }

    #[test]
    fn test_build_rejects_undeclared_qubit() {
        let mut b = CircuitBuilder::new("bad");
        let q = b.qreg("q", 1);
        b.cx(q.qubit(0), QubitId(7));
        let err = b.build().unwrap_err();
        assert!(matches!(err, AlgoError::InvalidCircuit(_)));
        assert!(err.to_string().contains("undeclared qubit 7"));
    }

    #[test]
    fn test_build_rejects_repeated_qubit() {
        let mut b = CircuitBuilder::new("bad");
        let q = b.qreg("q", 2);
        b.mcx(vec![q.qubit(0), q.qubit(1)], q.qubit(1));
        assert!(b.build().is_err());
    }

    #[test]
    fn test_build_rejects_non_finite_angle() {
        let mut b = CircuitBuilder::new("bad");
        let q = b.qreg("q", 2);
        b.cp(f64::NAN, q.qubit(0), q.qubit(1));
        assert!(b.build().is_err());
    }

    #[test]
    fn test_measure_register_size_mismatch() {
        let mut b = CircuitBuilder::new("bad");
        let q = b.qreg("q", 2);
        let c = b.creg("c", 3);
        assert!(b.measure_register(&q, &c).is_err());
    }

    #[test]
    fn test_gate_names() {
        let circuit = bell();
        assert_eq!(circuit.gate_names(), vec!["cx", "h"]);
        assert_eq!(circuit.gate_count(), 2);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_display_qasm() {
        let text = bell().to_string();
        assert!(text.starts_with("OPENQASM 3.0;"));
        assert!(text.contains("qubit[2] q;"));
        assert!(text.contains("h q[0];"));
        assert!(text.contains("cx q[0], q[1];"));
        assert!(text.contains("c[1] = measure q[1];"));
    }

    #[test]
    fn test_display_mcx() {
        let mut b = CircuitBuilder::new("toffoli");
        let q = b.qreg("q", 3);
        b.mcx(vec![q.qubit(0), q.qubit(1)], q.qubit(2));
        let text = b.build().unwrap().to_string();
        assert!(text.contains("ctrl(2) @ x q[0], q[1], q[2];"));
    }
}
