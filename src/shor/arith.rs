//! Integer helpers for the classical side of Shor's algorithm.

use num_integer::Integer;

/// Greatest common divisor; `gcd(0, n) == n`.
pub fn gcd(a: u64, b: u64) -> u64 {
    a.gcd(&b)
}

/// `base^exp mod modulus` by square-and-multiply.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = u128::from(modulus);
    let mut result: u128 = 1;
    let mut b = u128::from(base) % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exp >>= 1;
    }
    result as u64
}

/// Number of bits in the binary representation of `n` (0 for 0).
pub fn bit_length(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}
