//! Parameter-ramp interpolation.
//!
//! On-chain pools change `A` and `gamma` gradually over a scheduled
//! window so arbitrageurs cannot exploit a step change. This module
//! reproduces only the interpolation formula; the timer that drives a
//! live ramp is out of scope.

use primitive_types::U256;

use crate::error::{AmmError, Result};
use crate::math::wide::{narrow, widen};

/// Returns `(A, gamma)` at `now` for a ramp from `(initial_a,
/// initial_gamma)` at `initial_time` to `(future_a, future_gamma)` at
/// `future_time`.
///
/// Strictly before the window the initial pair is returned verbatim; at
/// or after `future_time` the future pair; inside the window both
/// parameters interpolate linearly (in either direction — ramps may
/// lower a parameter).
///
/// # Errors
///
/// Returns [`AmmError::InvalidRamp`] if `future_time <= initial_time`.
pub fn a_gamma_at_time(
    initial_a: U256,
    future_a: U256,
    initial_gamma: U256,
    future_gamma: U256,
    initial_time: u64,
    future_time: u64,
    now: u64,
) -> Result<(U256, U256)> {
    if future_time <= initial_time {
        return Err(AmmError::InvalidRamp(
            "future_time must exceed initial_time",
        ));
    }
    if now <= initial_time {
        return Ok((initial_a, initial_gamma));
    }
    if now >= future_time {
        return Ok((future_a, future_gamma));
    }

    let elapsed = U256::from(now - initial_time);
    let window = U256::from(future_time - initial_time);
    let a = interpolate(initial_a, future_a, elapsed, window)?;
    let gamma = interpolate(initial_gamma, future_gamma, elapsed, window)?;
    Ok((a, gamma))
}

/// `from + (to − from) · elapsed / window`, valid for ramps in either
/// direction.
fn interpolate(from: U256, to: U256, elapsed: U256, window: U256) -> Result<U256> {
    if to >= from {
        let step = narrow(widen(to - from) * widen(elapsed) / widen(window))?;
        from.checked_add(step)
            .ok_or(AmmError::Overflow("ramp interpolation"))
    } else {
        let step = narrow(widen(from - to) * widen(elapsed) / widen(window))?;
        Ok(from - step)
    }
}
