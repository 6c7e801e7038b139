//! Classical post-processing: measured phase to candidate period.

use num_rational::Ratio;

use crate::error::{AlgoError, AlgoResult};

/// A non-negative rational, reduced to lowest terms on construction.
pub type Fraction = Ratio<u128>;

/// Best rational approximation under a denominator bound.
pub trait LimitDenominator {
    /// Closest fraction to `self` whose denominator is at most `max_denom`.
    ///
    /// Walks the continued-fraction convergents until the next one would
    /// exceed `max_denom`, then picks between the last convergent and the
    /// best semiconvergent, preferring the convergent on a tie.
    fn limit_denominator(&self, max_denom: u128) -> Self;
}

impl LimitDenominator for Fraction {
    fn limit_denominator(&self, max_denom: u128) -> Self {
        let (numer, denom) = (*self.numer(), *self.denom());
        if max_denom == 0 || denom <= max_denom {
            return *self;
        }

        let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
        let (mut n, mut d) = (numer, denom);
        loop {
            let a = n / d;
            let q2 = q0 + a * q1;
            if q2 > max_denom {
                break;
            }
            (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
            (n, d) = (d, n - a * d);
        }

        let k = (max_denom - q0) / q1;
        // |p1/q1 - self| = d / (q1·denom); the semiconvergent sits 1/(q1·(q0+k·q1)) away from p1/q1.
        if 2 * d * (q0 + k * q1) <= denom {
            Ratio::new(p1, q1)
        } else {
            Ratio::new(p0 + k * p1, q0 + k * q1)
        }
    }
}

/// Turn a measured counting-register bitstring into a candidate period.
///
/// The bitstring (classical bit 0 rightmost) is read as an unsigned integer
/// `y`; the phase `y / 2^(2n)` is approximated by the closest fraction with
/// denominator at most `modulus`, whose denominator is returned.
pub fn measurement_to_period(measurement: &str, n: u32, modulus: u64) -> AlgoResult<u64> {
    let width = 2 * n;
    if width == 0 || width > 64 {
        return Err(AlgoError::InvalidParameter(format!(
            "counting register width must be in 1..=64, got {width}"
        )));
    }
    if measurement.is_empty() || measurement.len() > width as usize {
        return Err(AlgoError::InvalidParameter(format!(
            "measurement '{measurement}' does not fit a {width}-bit register"
        )));
    }
    let value = u64::from_str_radix(measurement, 2).map_err(|_| {
        AlgoError::InvalidParameter(format!("measurement '{measurement}' is not a bitstring"))
    })?;

    let phase = Fraction::new(u128::from(value), 1u128 << width);
    let approx = phase.limit_denominator(u128::from(modulus));
    Ok(*approx.denom() as u64)
}
