//! Token decimal places and the scale factors derived from them.

use primitive_types::U256;

use crate::error::{AmmError, Result};
use crate::math::wide::pow10;

/// Largest decimal count supported by the exact-rate representation.
const MAX_RATE_DECIMALS: u8 = 36;

/// Largest decimal count supported by the precision representation.
const MAX_PRECISION_DECIMALS: u8 = 18;

/// The number of decimal places of a pool token.
///
/// Valid range is `0..=36`. Two scale factors derive from a decimal
/// count:
///
/// - [`rate`](Self::rate) — `10^(36 - d)`, the exact-mode multiplier
///   that lifts a raw balance to a 36-decimal intermediate;
/// - [`precision`](Self::precision) — `10^(18 - d)`, the normalized-mode
///   multiplier that lifts a raw balance straight to 18 decimals
///   (requires `d <= 18`).
///
/// # Examples
///
/// ```
/// use curve_amm_math::domain::Decimals;
/// use primitive_types::U256;
///
/// let usdc = Decimals::new(6).expect("6 is valid");
/// assert_eq!(usdc.rate().expect("rate"), U256::from(10u64).pow(U256::from(30u64)));
/// assert_eq!(usdc.precision().expect("precision"), U256::from(10u64).pow(U256::from(12u64)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimals(u8);

impl Decimals {
    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidDecimals`] if `value` exceeds 36.
    pub const fn new(value: u8) -> Result<Self> {
        if value > MAX_RATE_DECIMALS {
            return Err(AmmError::InvalidDecimals("decimals must be 0..=36"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns the exact-mode rate factor `10^(36 - decimals)`.
    ///
    /// # Errors
    ///
    /// Infallible for validated values; the `Result` mirrors the other
    /// factor accessor.
    pub fn rate(&self) -> Result<U256> {
        pow10(u32::from(MAX_RATE_DECIMALS - self.0))
    }

    /// Returns the normalized-mode precision factor `10^(18 - decimals)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidDecimals`] if the decimal count
    /// exceeds 18 — the normalized representation cannot express such
    /// tokens.
    pub fn precision(&self) -> Result<U256> {
        if self.0 > MAX_PRECISION_DECIMALS {
            return Err(AmmError::InvalidDecimals(
                "precision factors require decimals 0..=18",
            ));
        }
        pow10(u32::from(MAX_PRECISION_DECIMALS - self.0))
    }
}
