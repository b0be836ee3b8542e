//! Polynomial algebra over GF(2^8).
//!
//! Polynomials are slices of field elements with index 0 holding the
//! lowest-degree coefficient. The codec keeps its codeword evaluation
//! (highest degree first) local to itself; everything that passes
//! through this module uses the lowest-first convention.

use crate::galois::Gf256;

/// Polynomial product by convolution.
pub fn mul(a: &[Gf256], b: &[Gf256]) -> Vec<Gf256> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut result = vec![Gf256::ZERO; a.len() + b.len() - 1];
    for (i, &ca) in a.iter().enumerate() {
        if ca.is_zero() {
            continue;
        }
        for (j, &cb) in b.iter().enumerate() {
            result[i + j] += ca * cb;
        }
    }
    result
}

/// Evaluate at a point by Horner's rule.
pub fn eval(poly: &[Gf256], x: Gf256) -> Gf256 {
    let mut acc = Gf256::ZERO;
    for &coeff in poly.iter().rev() {
        acc = acc * x + coeff;
    }
    acc
}
