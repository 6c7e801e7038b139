//! Shor's algorithm: factor `N` through quantum period finding.
//!
//! - [`arith`]: gcd, modular exponentiation, bit length.
//! - [`period`]: phase-estimation circuit and most-likely readout.
//! - [`postprocess`]: continued-fraction period extraction.
//! - [`factor`]: the retrying control loop.

pub mod arith;
pub mod factor;
pub mod period;
pub mod postprocess;

pub use factor::{
    Attempt, BaseSource, FactorPair, FixedBases, RandomBases, ShorsAlgorithm, factor,
};
pub use period::{append_inverse_qft, build_period_circuit, most_likely_measurement};
pub use postprocess::{Fraction, LimitDenominator, measurement_to_period};
