//! Slippage-tolerance bounds for router integrations.

use primitive_types::U256;

use crate::domain::BasisPoints;
use crate::error::{AmmError, Result};
use crate::math::constants::BPS_DENOMINATOR;
use crate::math::wide::{narrow, widen};

/// Smallest acceptable output for a quoted amount under a slippage
/// tolerance: `amount · (10_000 − bps) / 10_000`.
///
/// # Errors
///
/// Returns [`AmmError::InvalidSlippage`] if `slippage` exceeds 10 000 bps.
pub fn min_amount_out(amount: U256, slippage: BasisPoints) -> Result<U256> {
    if !slippage.is_valid_percent() {
        return Err(AmmError::InvalidSlippage("tolerance above 10000 bps"));
    }
    let keep = BPS_DENOMINATOR - U256::from(slippage.get());
    narrow(widen(amount) * widen(keep) / widen(BPS_DENOMINATOR))
}

/// Largest acceptable input for a quoted amount under a slippage
/// tolerance: `amount · (10_000 + bps) / 10_000`.
///
/// # Errors
///
/// Returns [`AmmError::InvalidSlippage`] if `slippage` exceeds 10 000 bps,
/// or [`AmmError::Overflow`] if the padded amount exceeds 256 bits.
pub fn max_amount_in(amount: U256, slippage: BasisPoints) -> Result<U256> {
    if !slippage.is_valid_percent() {
        return Err(AmmError::InvalidSlippage("tolerance above 10000 bps"));
    }
    let pad = BPS_DENOMINATOR + U256::from(slippage.get());
    narrow(widen(amount) * widen(pad) / widen(BPS_DENOMINATOR))
}
