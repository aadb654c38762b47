//! Derived analytics shared across pool families.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`price_impact_bps`] | spot-vs-effective deviation in basis points |
//! | [`ramp`] | piecewise-linear A/gamma ramp interpolation |
//! | [`slippage`] | min-out / max-in tolerance bounds |

pub mod ramp;
pub mod slippage;

use primitive_types::U256;

use crate::math::constants::BPS_DENOMINATOR;
use crate::math::wide::widen;

/// Deviation of the effective price from spot, in basis points.
///
/// `(spot − effective) · 10^4 / spot`, clamped at zero: a swap that
/// crosses the peg can realize a better-than-spot price, which reports
/// as zero impact rather than a negative number.
#[must_use]
pub fn price_impact_bps(spot: U256, effective: U256) -> U256 {
    if spot.is_zero() || effective >= spot {
        return U256::zero();
    }
    let raw = widen(spot - effective) * widen(BPS_DENOMINATOR) / widen(spot);
    // Cannot exceed 10^4: (spot − effective) < spot.
    U256([raw.0[0], raw.0[1], raw.0[2], raw.0[3]])
}
