//! GF(2^8) arithmetic tests.

use qrstitch::galois::Gf256;

// ============================================================================
// Basic Arithmetic Operations
// ============================================================================

#[test]
fn test_addition_is_self_inverse() {
    let a = Gf256::new(0x53);
    let b = Gf256::new(0xCA);

    assert_eq!(a + b + b, a);
    assert_eq!(a + a, Gf256::ZERO);
}

#[test]
fn test_add_and_sub_coincide() {
    let a = Gf256::new(77);
    let b = Gf256::new(190);
    assert_eq!(a + b, a - b);
}

#[test]
fn test_multiplication_commutative() {
    for (a, b) in [(3u8, 7u8), (0x53, 0xCA), (255, 254)] {
        let ga = Gf256::new(a);
        let gb = Gf256::new(b);
        assert_eq!(ga * gb, gb * ga);
    }
}

#[test]
fn test_multiplication_distributes_over_addition() {
    let a = Gf256::new(19);
    let b = Gf256::new(200);
    let c = Gf256::new(91);
    assert_eq!(a * (b + c), a * b + a * c);
}

// ============================================================================
// Division and Powers
// ============================================================================

#[test]
fn test_divide_undoes_multiply_for_all_nonzero() {
    for a in 1u16..=255 {
        let ga = Gf256::new(a as u8);
        for b in [1u8, 3, 64, 129, 255] {
            let gb = Gf256::new(b);
            assert_eq!((ga * gb).checked_div(gb).unwrap(), ga);
        }
    }
}

#[test]
fn test_multiply_by_zero_is_zero() {
    for a in 0u16..=255 {
        assert_eq!(Gf256::new(a as u8) * Gf256::ZERO, Gf256::ZERO);
    }
}

#[test]
fn test_power_zero_is_one() {
    for a in [0u8, 1, 2, 100, 255] {
        assert_eq!(Gf256::new(a).pow(0), Gf256::ONE);
    }
}

#[test]
fn test_power_matches_repeated_multiplication() {
    let a = Gf256::new(29);
    let mut acc = Gf256::ONE;
    for exponent in 0..20u32 {
        assert_eq!(a.pow(exponent), acc);
        acc *= a;
    }
}

#[test]
fn test_multiplicative_order_divides_255() {
    // α is primitive: α^255 = 1 and no smaller power of α is 1.
    let alpha = Gf256::alpha_pow(1);
    assert_eq!(alpha.pow(255), Gf256::ONE);
    for exponent in 1..255u32 {
        assert_ne!(alpha.pow(exponent), Gf256::ONE);
    }
}

#[test]
fn test_division_by_zero_is_an_error() {
    assert!(Gf256::new(1).checked_div(Gf256::ZERO).is_err());
    assert!(Gf256::ZERO.checked_div(Gf256::ZERO).is_err());
}
