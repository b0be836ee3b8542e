//! Galois Field GF(2^8) arithmetic for the chunk-level Reed-Solomon codec.
//!
//! The field is generated by the primitive polynomial 0x11D
//! (x⁸ + x⁴ + x³ + x² + 1) with primitive root α = 2. All arithmetic is
//! table-driven: one log table and one antilog table are built once and
//! shared read-only across every codec instance.

use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};
use std::sync::OnceLock;
use thiserror::Error;

/// Primitive polynomial for GF(2^8): 0x11D (x⁸ + x⁴ + x³ + x² + 1)
const GF8_GENERATOR: u32 = 0x11D;

/// Order of the multiplicative group: every nonzero element satisfies
/// α^255 = 1, so log-domain exponents are taken mod 255.
pub const FIELD_ORDER: usize = 255;

/// Attempted division by the additive identity.
///
/// Unreachable through the codec's public API; hitting it indicates a
/// caller bug, not bad input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("division by zero in GF(256)")]
pub struct DivisionByZero;

/// Precomputed log/antilog tables for GF(2^8).
pub struct GaloisTable {
    pub log: [u8; 256],
    pub antilog: [u8; 256],
}

impl GaloisTable {
    fn new() -> Self {
        let mut table = GaloisTable {
            log: [0; 256],
            antilog: [0; 256],
        };
        table.build_tables();
        table
    }

    fn build_tables(&mut self) {
        let mut b = 1u32;

        for l in 0..FIELD_ORDER {
            self.log[b as usize] = l as u8;
            self.antilog[l] = b as u8;

            b <<= 1;
            if b & 0x100 != 0 {
                b ^= GF8_GENERATOR;
            }
        }

        // α has period 255, so index 255 wraps around to α^0.
        self.antilog[FIELD_ORDER] = self.antilog[0];
    }
}

fn table() -> &'static GaloisTable {
    static TABLE: OnceLock<GaloisTable> = OnceLock::new();
    TABLE.get_or_init(GaloisTable::new)
}

/// One GF(2^8) element. A symbol in codec terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gf256(u8);

impl Gf256 {
    pub const ZERO: Gf256 = Gf256(0);
    pub const ONE: Gf256 = Gf256(1);

    pub fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// α^exponent, with the exponent reduced mod 255.
    pub fn alpha_pow(exponent: usize) -> Self {
        Gf256(table().antilog[exponent % FIELD_ORDER])
    }

    /// Power operation in the log domain.
    ///
    /// `pow(0)` is 1 for every element including zero; `0.pow(n)` is 0
    /// for n > 0.
    pub fn pow(self, exponent: u32) -> Self {
        if exponent == 0 {
            return Gf256::ONE;
        }
        if self.0 == 0 {
            return Gf256::ZERO;
        }
        let t = table();
        let log_val = t.log[self.0 as usize] as u64;
        let result_log = (log_val * exponent as u64) % FIELD_ORDER as u64;
        Gf256(t.antilog[result_log as usize])
    }

    /// Division, failing on a zero divisor. `0 / b` is 0 for nonzero `b`.
    pub fn checked_div(self, rhs: Gf256) -> Result<Gf256, DivisionByZero> {
        if rhs.0 == 0 {
            return Err(DivisionByZero);
        }
        if self.0 == 0 {
            return Ok(Gf256::ZERO);
        }
        let t = table();
        let log_diff = (t.log[self.0 as usize] as i32 - t.log[rhs.0 as usize] as i32
            + FIELD_ORDER as i32)
            % FIELD_ORDER as i32;
        Ok(Gf256(t.antilog[log_diff as usize]))
    }

    /// Multiplicative inverse, failing on zero.
    pub fn inverse(self) -> Result<Gf256, DivisionByZero> {
        Gf256::ONE.checked_div(self)
    }
}

// Addition (XOR in GF(2^n))
impl Add for Gf256 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Gf256(self.0 ^ rhs.0)
    }
}

impl AddAssign for Gf256 {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// Subtraction (same as addition in GF(2^n))
impl Sub for Gf256 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Gf256(self.0 ^ rhs.0)
    }
}

impl SubAssign for Gf256 {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// Multiplication using log tables
impl Mul for Gf256 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.0 == 0 || rhs.0 == 0 {
            return Gf256::ZERO;
        }
        let t = table();
        let log_sum =
            (t.log[self.0 as usize] as usize + t.log[rhs.0 as usize] as usize) % FIELD_ORDER;
        Gf256(t.antilog[log_sum])
    }
}

impl MulAssign for Gf256 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl From<u8> for Gf256 {
    fn from(value: u8) -> Self {
        Gf256(value)
    }
}

impl From<Gf256> for u8 {
    fn from(val: Gf256) -> Self {
        val.0
    }
}

impl std::fmt::Display for Gf256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_log_antilog_inverse() {
        let t = table();
        for a in 1u16..=255 {
            let log = t.log[a as usize];
            assert_eq!(t.antilog[log as usize], a as u8);
        }
    }

    #[test]
    fn test_addition_is_xor() {
        let a = Gf256::new(5);
        let b = Gf256::new(3);

        assert_eq!((a + b).value(), 6);
        assert_eq!(a + b, a - b);
    }

    #[test]
    fn test_multiplication_by_zero() {
        let a = Gf256::new(42);
        assert_eq!((a * Gf256::ZERO).value(), 0);
        assert_eq!((Gf256::ZERO * a).value(), 0);
    }

    #[test]
    fn test_multiplicative_identity() {
        let a = Gf256::new(87);
        assert_eq!(a * Gf256::ONE, a);
    }

    #[test]
    fn test_mul_div_round_trip() {
        for a in 1u16..=255 {
            for b in [1u8, 2, 7, 100, 254, 255] {
                let ga = Gf256::new(a as u8);
                let gb = Gf256::new(b);
                let quotient = (ga * gb).checked_div(gb).unwrap();
                assert_eq!(quotient, ga);
            }
        }
    }

    #[test]
    fn test_division_by_zero_fails() {
        let a = Gf256::new(9);
        assert_eq!(a.checked_div(Gf256::ZERO), Err(DivisionByZero));
        assert_eq!(Gf256::ZERO.inverse(), Err(DivisionByZero));
    }

    #[test]
    fn test_zero_dividend() {
        assert_eq!(Gf256::ZERO.checked_div(Gf256::new(17)), Ok(Gf256::ZERO));
    }

    #[test]
    fn test_pow() {
        let a = Gf256::new(2);
        assert_eq!(a.pow(0), Gf256::ONE);
        assert_eq!(a.pow(1), a);
        assert_eq!(a.pow(2), a * a);
        assert_eq!(a.pow(8).value(), 0x1D); // x^8 reduced by 0x11D

        assert_eq!(Gf256::ZERO.pow(1), Gf256::ZERO);
        assert_eq!(Gf256::ZERO.pow(100), Gf256::ZERO);
    }

    #[test]
    fn test_alpha_pow_wraps() {
        assert_eq!(Gf256::alpha_pow(0), Gf256::ONE);
        assert_eq!(Gf256::alpha_pow(255), Gf256::ONE);
        assert_eq!(Gf256::alpha_pow(1), Gf256::new(2));
        assert_eq!(Gf256::alpha_pow(256), Gf256::new(2));
    }

    #[test]
    fn test_inverse_times_self_is_one() {
        for a in 1u16..=255 {
            let ga = Gf256::new(a as u8);
            assert_eq!(ga * ga.inverse().unwrap(), Gf256::ONE);
        }
    }
}
