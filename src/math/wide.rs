//! Width conversions between stored and intermediate integers.
//!
//! Pool snapshots store `U256` fields; every kernel computes in `U512`
//! so that chained products of three `PRECISION`-scaled quantities plus
//! the invariant cannot overflow. Widening is total; narrowing back is
//! checked and surfaces [`AmmError::Overflow`].

use primitive_types::{U256, U512};

use crate::error::{AmmError, Result};

/// Widens a stored 256-bit value into the 512-bit computation domain.
#[must_use]
pub fn widen(value: U256) -> U512 {
    let mut limbs = [0u64; 8];
    limbs[..4].copy_from_slice(&value.0);
    U512(limbs)
}

/// Narrows a 512-bit intermediate back to 256 bits.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if any of the upper four limbs is
/// non-zero.
pub fn narrow(value: U512) -> Result<U256> {
    if value.0[4..].iter().any(|&limb| limb != 0) {
        return Err(AmmError::Overflow("512-bit value exceeds 256 bits"));
    }
    Ok(U256([value.0[0], value.0[1], value.0[2], value.0[3]]))
}

/// Returns `10^exp` as a `U256`.
///
/// # Errors
///
/// Returns [`AmmError::InvalidDecimals`] if `exp > 77` (the largest
/// power of ten representable in 256 bits).
pub fn pow10(exp: u32) -> Result<U256> {
    if exp > 77 {
        return Err(AmmError::InvalidDecimals("10^exp exceeds 256 bits"));
    }
    Ok(U256::from(10u64).pow(U256::from(exp)))
}

/// Absolute difference of two 512-bit values.
#[must_use]
pub fn abs_diff(a: U512, b: U512) -> U512 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// `a * b / den` entirely in the 512-bit domain.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the product overflows 512 bits —
/// callers keep magnitudes far below that, so hitting this indicates a
/// corrupted snapshot rather than a rounding concern.
pub fn mul_div(a: U512, b: U512, den: U512) -> Result<U512> {
    if den.is_zero() {
        return Err(AmmError::Overflow("division by zero in mul_div"));
    }
    let product = a
        .checked_mul(b)
        .ok_or(AmmError::Overflow("product exceeds 512 bits"))?;
    Ok(product / den)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- widen / narrow ------------------------------------------------------

    #[test]
    fn widen_then_narrow_is_identity() {
        let values = [
            U256::zero(),
            U256::one(),
            U256::from(10u64).pow(U256::from(18u64)),
            U256::MAX,
        ];
        for v in values {
            let Ok(back) = narrow(widen(v)) else {
                panic!("expected Ok");
            };
            assert_eq!(back, v);
        }
    }

    #[test]
    fn narrow_rejects_wide_values() {
        let wide = widen(U256::MAX) + U512::one();
        assert!(matches!(narrow(wide), Err(AmmError::Overflow(_))));
    }

    #[test]
    fn narrow_rejects_high_limbs() {
        let mut limbs = [0u64; 8];
        limbs[7] = 1;
        assert!(narrow(U512(limbs)).is_err());
    }

    // -- pow10 ---------------------------------------------------------------

    #[test]
    fn pow10_small_values() {
        let Ok(one) = pow10(0) else {
            panic!("expected Ok");
        };
        assert_eq!(one, U256::one());
        let Ok(million) = pow10(6) else {
            panic!("expected Ok");
        };
        assert_eq!(million, U256::from(1_000_000u64));
    }

    #[test]
    fn pow10_rate_range() {
        // 10^36 is the largest rate factor (0-decimal token, exact mode).
        let Ok(rate) = pow10(36) else {
            panic!("expected Ok");
        };
        let Ok(sq) = pow10(18) else {
            panic!("expected Ok");
        };
        assert_eq!(rate, sq * sq);
    }

    #[test]
    fn pow10_upper_bound() {
        assert!(pow10(77).is_ok());
        assert!(pow10(78).is_err());
    }

    // -- abs_diff ------------------------------------------------------------

    #[test]
    fn abs_diff_is_symmetric() {
        let a = U512::from(100u64);
        let b = U512::from(42u64);
        assert_eq!(abs_diff(a, b), U512::from(58u64));
        assert_eq!(abs_diff(b, a), U512::from(58u64));
        assert_eq!(abs_diff(a, a), U512::zero());
    }

    // -- mul_div -------------------------------------------------------------

    #[test]
    fn mul_div_rounds_toward_zero() {
        let Ok(q) = mul_div(U512::from(7u64), U512::from(10u64), U512::from(8u64)) else {
            panic!("expected Ok");
        };
        assert_eq!(q, U512::from(8u64));
    }

    #[test]
    fn mul_div_zero_denominator() {
        let r = mul_div(U512::one(), U512::one(), U512::zero());
        assert!(matches!(r, Err(AmmError::Overflow(_))));
    }

    #[test]
    fn mul_div_overflow_detected() {
        let r = mul_div(U512::MAX, U512::from(2u64), U512::one());
        assert!(matches!(r, Err(AmmError::Overflow(_))));
    }
}
