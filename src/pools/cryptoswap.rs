//! CryptoSwap kernel shared by the two- and three-coin pools.
//!
//! CryptoSwap concentrates liquidity around an internal peg
//! (`price_scale`) and lets the peg move; the invariant blends
//! constant-product and StableSwap behaviour through the `gamma`
//! parameter. This module holds the family's Newton solvers and fee
//! curve; the pool types in `twocrypto`/`tricrypto` own scaling and the
//! public operations.
//!
//! # Solvers
//!
//! | Function | Solves for | Coins |
//! |----------|-----------|-------|
//! | [`calc_d`] | the invariant `D` | 2 or 3 |
//! | [`newton_y`] | one balance given `D` | 2 |
//! | [`newton_y3`] | one balance given `D` | 3 |
//!
//! # Oscillation Handling
//!
//! The `y` iteration can overshoot into a region where the next update
//! would go negative. That is not a failure: the iterate is halved
//! (floored at 1) and the loop continues. Only a zero divisor or an
//! exhausted iteration budget reports [`AmmError::NonConvergence`].

use primitive_types::{U256, U512};

use crate::error::{AmmError, Result};
use crate::math::constants::{
    A_MULTIPLIER, BPS_DENOMINATOR, CONVERGENCE_THRESHOLD, MAX_NEWTON_ITERATIONS,
    MIN_CONVERGENCE, PRECISION, SEARCH_EXPANSIONS,
};
use crate::math::wide::{abs_diff, narrow, widen};

/// CryptoSwap shape parameters as supplied by the pool.
///
/// `a` is denominated in `A_MULTIPLIER` units; `d` is the invariant the
/// pool last stored, in 18-decimal units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoShape {
    /// Amplification coefficient (`A_MULTIPLIER` units).
    pub a: U256,
    /// Liquidity-concentration parameter.
    pub gamma: U256,
    /// Pool-supplied invariant.
    pub d: U256,
}

impl CryptoShape {
    /// Rejects zero divisor parameters.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidAmplification`] / [`AmmError::InvalidGamma`]
    /// on a zero field (a zero `d` is allowed: it marks an unusable but
    /// well-formed snapshot).
    pub fn validate(&self) -> Result<()> {
        check_a_gamma(self.a, self.gamma)
    }
}

/// CryptoSwap fee-curve parameters, all in `FEE_DENOMINATOR` units
/// except `fee_gamma` (18-decimal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoFees {
    /// Fee charged by a balanced pool.
    pub mid_fee: U256,
    /// Fee approached by a maximally skewed pool.
    pub out_fee: U256,
    /// Sharpness of the blend between the two.
    pub fee_gamma: U256,
}

impl CryptoFees {
    /// Rejects an inverted fee range.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] when `out_fee < mid_fee`.
    pub fn validate(&self) -> Result<()> {
        if self.out_fee < self.mid_fee {
            return Err(AmmError::InvalidConfiguration(
                "out_fee must be at least mid_fee",
            ));
        }
        Ok(())
    }
}

/// Checked 512-bit product with a named overflow site.
fn mul(a: U512, b: U512, site: &'static str) -> Result<U512> {
    a.checked_mul(b).ok_or(AmmError::Overflow(site))
}

/// Inverts a forward quote by binary search, seeded from the spot price.
///
/// `high` starts at twice the linear estimate `dy / spot` (falling back
/// to `10 · reserve_in` when no spot price is available), doubles up to
/// [`SEARCH_EXPANSIONS`] times, then bisects for up to 255 rounds with
/// tolerance `max(1, dy / 10_000)`. An oracle error counts as an
/// undershoot so the interval moves away from the failing region.
pub(crate) fn spot_seeded_search(
    get_dy: impl Fn(U256) -> Result<U256>,
    dy: U256,
    spot: U256,
    reserve_in: U256,
) -> Result<U256> {
    let mut high = if spot.is_zero() {
        reserve_in.checked_mul(U256::from(10u64)).unwrap_or(U256::MAX)
    } else {
        narrow(
            widen(dy) * widen(PRECISION) * U512::from(2u64) / widen(spot),
        )
        .unwrap_or(U256::MAX)
    }
    .max(U256::one());

    let mut expansions = 0;
    while get_dy(high).unwrap_or_else(|_| U256::zero()) < dy {
        if expansions == SEARCH_EXPANSIONS {
            return Ok(U256::zero());
        }
        high = high.checked_mul(U256::from(2u64)).unwrap_or(U256::MAX);
        expansions += 1;
    }

    let tolerance = (dy / BPS_DENOMINATOR).max(U256::one());
    let mut low = U256::zero();
    for _ in 0..MAX_NEWTON_ITERATIONS {
        if high - low <= U256::one() {
            break;
        }
        let mid = low + (high - low) / U256::from(2u64);
        let out = get_dy(mid).unwrap_or_else(|_| U256::zero());
        if out >= dy {
            if out - dy <= tolerance {
                return Ok(mid);
            }
            high = mid;
        } else {
            low = mid;
        }
    }
    Ok(high)
}

/// Geometric mean of normalized balances, by Newton iteration.
///
/// Callers guarantee every entry is non-zero.
fn geometric_mean(xs: &[U512]) -> Result<U512> {
    let n = U512::from(xs.len());
    let precision = widen(PRECISION);
    let one = U512::one();

    let sum = xs.iter().fold(U512::zero(), |acc, &x| acc + x);
    let mut mean = sum / n;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let prev = mean;
        if mean.is_zero() {
            return Err(AmmError::NonConvergence("geometric mean collapsed"));
        }
        let mut tmp = precision;
        for &x in xs {
            tmp = mul(tmp, x, "geometricMean: product")? / mean;
        }
        mean = mul(mean, (n - one) * precision + tmp, "geometricMean: update")?
            / (n * precision);
        if abs_diff(mean, prev) <= one {
            return Ok(mean);
        }
    }
    Err(AmmError::NonConvergence("geometric mean exceeded 255 iterations"))
}

/// Solves the CryptoSwap invariant for `D` over 2 or 3 normalized
/// balances, starting from `n · geometric_mean(xp)`.
///
/// Convergence is relative: `|ΔD| · 10^14 < max(D, 10^16)` — the
/// absolute floor keeps the criterion reachable for dust-sized pools.
///
/// # Errors
///
/// - [`AmmError::InvalidAmplification`] / [`AmmError::InvalidGamma`] on
///   a zero parameter.
/// - [`AmmError::InvalidConfiguration`] for a coin count other than 2 or 3.
/// - [`AmmError::ZeroBalance`] if some (but not all) balances are zero;
///   all-zero balances return 0.
/// - [`AmmError::NonConvergence`] on a zero divisor or after 255
///   iterations.
pub fn calc_d(a: U256, gamma: U256, xp: &[U256]) -> Result<U256> {
    if a.is_zero() {
        return Err(AmmError::InvalidAmplification("A must be positive"));
    }
    if gamma.is_zero() {
        return Err(AmmError::InvalidGamma("gamma must be positive"));
    }
    if !(2..=3).contains(&xp.len()) {
        return Err(AmmError::InvalidConfiguration(
            "CryptoSwap pools hold 2 or 3 coins",
        ));
    }
    if xp.iter().all(U256::is_zero) {
        return Ok(U256::zero());
    }
    if xp.iter().any(U256::is_zero) {
        return Err(AmmError::ZeroBalance);
    }

    let n = U512::from(xp.len());
    let xs: Vec<U512> = xp.iter().map(|&x| widen(x)).collect();
    let s = xs.iter().fold(U512::zero(), |acc, &x| acc + x);

    let precision = widen(PRECISION);
    let one = U512::one();
    let two = U512::from(2u64);
    let a_w = widen(a);
    let gamma_w = widen(gamma);
    let threshold = widen(CONVERGENCE_THRESHOLD);
    // 10^16, the absolute floor of the convergence criterion.
    let d_floor = precision / U512::from(100u64);

    let mut d = mul(n, geometric_mean(&xs)?, "calcD: initial guess")?;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let d_prev = d;
        if d.is_zero() {
            return Err(AmmError::NonConvergence("calcD: D collapsed to zero"));
        }

        let mut k0 = precision;
        for &x in &xs {
            k0 = mul(mul(k0, x, "calcD: K0 product")?, n, "calcD: K0·n")? / d;
        }
        if k0.is_zero() {
            return Err(AmmError::NonConvergence("calcD: K0 collapsed to zero"));
        }

        let g1k0 = abs_diff(gamma_w + precision, k0) + one;
        let mul1 = mul(
            mul(
                mul(precision, d, "calcD: mul1·D")? / gamma_w,
                g1k0,
                "calcD: mul1·g1k0",
            )? / gamma_w,
            g1k0,
            "calcD: mul1·g1k0²",
        )
        .and_then(|v| mul(v, widen(A_MULTIPLIER), "calcD: mul1·A_MULTIPLIER"))?
            / a_w;
        let mul2 = mul(mul(two, precision, "calcD: 2·PRECISION")? * n, k0, "calcD: mul2")?
            / g1k0;

        let lhs = s + mul(s, mul2, "calcD: S·mul2")? / precision
            + mul(mul1, n, "calcD: mul1·n")? / k0;
        let rhs = mul(mul2, d, "calcD: mul2·D")? / precision;
        if lhs <= rhs {
            return Err(AmmError::NonConvergence("calcD: derivative went negative"));
        }
        let neg_fprime = lhs - rhs;

        let d_plus = mul(d, neg_fprime + s, "calcD: D_plus")? / neg_fprime;
        let mut d_minus = mul(d, d, "calcD: D²")? / neg_fprime;
        let correction = mul(
            d,
            mul1 / neg_fprime,
            "calcD: correction",
        )? / precision;
        if precision > k0 {
            d_minus = d_minus + mul(correction, precision - k0, "calcD: correction·(1−K0)")? / k0;
        } else {
            let term = mul(correction, k0 - precision, "calcD: correction·(K0−1)")? / k0;
            if term > d_minus {
                return Err(AmmError::NonConvergence("calcD: correction overshoot"));
            }
            d_minus = d_minus - term;
        }

        d = if d_plus > d_minus {
            d_plus - d_minus
        } else {
            (d_minus - d_plus) / two
        };

        let diff = abs_diff(d, d_prev);
        let scale = if d > d_floor { d } else { d_floor };
        if mul(diff, threshold, "calcD: convergence check")? < scale {
            return narrow(d);
        }
    }

    Err(AmmError::NonConvergence("calcD exceeded 255 iterations"))
}

/// Solves for balance `i` of a two-coin pool given the other balance
/// and the invariant `D`.
///
/// Initial guess `y = D² / (x_j · 4)`; see the module docs for the
/// oscillation rule.
///
/// # Errors
///
/// - [`AmmError::InvalidAmplification`] / [`AmmError::InvalidGamma`] on
///   a zero parameter.
/// - [`AmmError::InvalidIndex`] / [`AmmError::InvalidConfiguration`] on
///   shape errors.
/// - [`AmmError::NonConvergence`] on any zero divisor (including
///   `x_j = 0` or `D = 0`) or after 255 iterations.
pub fn newton_y(a: U256, gamma: U256, xp: &[U256], d: U256, i: usize) -> Result<U256> {
    if xp.len() != 2 {
        return Err(AmmError::InvalidConfiguration("newtonY expects 2 coins"));
    }
    if i >= 2 {
        return Err(AmmError::InvalidIndex("coin index out of range"));
    }
    check_a_gamma(a, gamma)?;

    let x_j = widen(xp[1 - i]);
    let d_w = widen(d);
    if x_j.is_zero() || d_w.is_zero() {
        return Err(AmmError::NonConvergence("newtonY: zero divisor"));
    }

    let precision = widen(PRECISION);
    let two = U512::from(2u64);

    let y0 = mul(d_w, d_w, "newtonY: D²")? / mul(x_j, U512::from(4u64), "newtonY: x·4")?;
    let k0_i = mul(mul(precision, two, "newtonY: K0 base")?, x_j, "newtonY: K0·x")? / d_w;
    let limit = convergence_limit(&[x_j, d_w]);

    let y = solve_y(widen(a), widen(gamma), d_w, x_j, k0_i, two, y0, limit)?;
    narrow(y)
}

/// Solves for balance `i` of a three-coin pool given the other two
/// balances and the invariant `D`.
///
/// Initial guess `y = D³ / (27 · PRECISION · prod)` with `prod` the
/// running product of the other balances.
///
/// # Errors
///
/// As [`newton_y`], plus [`AmmError::InsufficientLiquidity`] when
/// `D² / PRECISION` truncates to zero and [`AmmError::ZeroBalance`]
/// when the product of the other balances does.
pub fn newton_y3(a: U256, gamma: U256, xp: &[U256], d: U256, i: usize) -> Result<U256> {
    if xp.len() != 3 {
        return Err(AmmError::InvalidConfiguration("newtonY3 expects 3 coins"));
    }
    if i >= 3 {
        return Err(AmmError::InvalidIndex("coin index out of range"));
    }
    check_a_gamma(a, gamma)?;

    let others: Vec<U512> = (0..3)
        .filter(|&k| k != i)
        .map(|k| widen(xp[k]))
        .collect();
    let d_w = widen(d);
    let precision = widen(PRECISION);
    let three = U512::from(3u64);

    let d_sq = mul(d_w, d_w, "newtonY3: D²")? / precision;
    if d_sq.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let prod = mul(others[0], others[1], "newtonY3: balance product")? / precision;
    if prod.is_zero() {
        return Err(AmmError::ZeroBalance);
    }

    let y0 = mul(d_sq, d_w, "newtonY3: D³")?
        / mul(U512::from(27u64), prod, "newtonY3: 27·prod")?;
    let mut k0_i = mul(mul(precision, three, "newtonY3: K0 base")?, others[0], "newtonY3: K0·x1")?
        / d_w;
    k0_i = mul(mul(k0_i, three, "newtonY3: K0·3")?, others[1], "newtonY3: K0·x2")? / d_w;
    let limit = convergence_limit(&[others[0], others[1], d_w]);

    let y = solve_y(
        widen(a),
        widen(gamma),
        d_w,
        others[0] + others[1],
        k0_i,
        three,
        y0,
        limit,
    )?;
    narrow(y)
}

/// K-based dynamic fee: a convex blend of `mid_fee` (balanced pool) and
/// `out_fee` (skewed pool).
///
/// `K = PRECISION · n^n · Πxp / S^n` is 1.0 for a perfectly balanced
/// pool and falls towards 0 with skew; the blend weight is
/// `f = fee_gamma · PRECISION / (fee_gamma + PRECISION − K)`.
///
/// The hardened short-circuit is implemented: when `fee_gamma +
/// PRECISION <= K` (extreme skew artifacts), the fee is `out_fee`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] only for snapshot-corrupting inputs.
pub fn dynamic_fee(xp: &[U256], fee_gamma: U256, mid_fee: U256, out_fee: U256) -> Result<U256> {
    let n = U512::from(xp.len());
    let precision = widen(PRECISION);
    let s = xp.iter().fold(U512::zero(), |acc, &x| acc + widen(x));
    if s.is_zero() {
        return Ok(mid_fee);
    }

    let mut k = mul(precision, n.pow(n), "dynamicFee: n^n")?;
    for &x in xp {
        k = mul(k, widen(x), "dynamicFee: K product")? / s;
    }

    let fee_gamma_w = widen(fee_gamma);
    if fee_gamma_w + precision <= k {
        return Ok(out_fee);
    }
    let f = mul(fee_gamma_w, precision, "dynamicFee: blend weight")?
        / (fee_gamma_w + precision - k);

    let blended = (mul(widen(mid_fee), f, "dynamicFee: mid term")?
        + mul(widen(out_fee), precision - f, "dynamicFee: out term")?)
        / precision;
    narrow(blended)
}

/// Rejects zero CryptoSwap shape parameters.
fn check_a_gamma(a: U256, gamma: U256) -> Result<()> {
    if a.is_zero() {
        return Err(AmmError::InvalidAmplification("A must be positive"));
    }
    if gamma.is_zero() {
        return Err(AmmError::InvalidGamma("gamma must be positive"));
    }
    Ok(())
}

/// `max(max(inputs) / CONVERGENCE_THRESHOLD, MIN_CONVERGENCE)`.
fn convergence_limit(inputs: &[U512]) -> U512 {
    let largest = inputs
        .iter()
        .copied()
        .max()
        .unwrap_or_else(U512::zero);
    let scaled = largest / widen(CONVERGENCE_THRESHOLD);
    let floor = widen(MIN_CONVERGENCE);
    if scaled > floor {
        scaled
    } else {
        floor
    }
}

/// Shared `y` iteration of [`newton_y`] and [`newton_y3`].
///
/// `s_base` is the sum of the non-solved balances; `k0_i` carries their
/// contribution to `K0`, so each step only folds in `y`.
#[allow(clippy::too_many_arguments)]
fn solve_y(
    a: U512,
    gamma: U512,
    d: U512,
    s_base: U512,
    k0_i: U512,
    n: U512,
    y0: U512,
    convergence_limit: U512,
) -> Result<U512> {
    let precision = widen(PRECISION);
    let one = U512::one();
    let two = U512::from(2u64);
    let threshold = widen(CONVERGENCE_THRESHOLD);

    let mut y = y0;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let y_prev = y;
        if y.is_zero() {
            return Err(AmmError::NonConvergence("newtonY: y collapsed to zero"));
        }

        let k0 = mul(mul(k0_i, y, "newtonY: K0·y")?, n, "newtonY: K0·n")? / d;
        if k0.is_zero() {
            return Err(AmmError::NonConvergence("newtonY: K0 collapsed to zero"));
        }
        let s = s_base + y;

        let g1k0 = abs_diff(gamma + precision, k0) + one;
        let mul1 = mul(
            mul(
                mul(precision, d, "newtonY: mul1·D")? / gamma,
                g1k0,
                "newtonY: mul1·g1k0",
            )? / gamma,
            g1k0,
            "newtonY: mul1·g1k0²",
        )
        .and_then(|v| mul(v, widen(A_MULTIPLIER), "newtonY: mul1·A_MULTIPLIER"))?
            / a;
        let mul2 = precision + mul(mul(two, precision, "newtonY: 2·PRECISION")?, k0, "newtonY: mul2")? / g1k0;

        let yfprime_pos = mul(precision, y, "newtonY: PRECISION·y")?
            + mul(s, mul2, "newtonY: S·mul2")?
            + mul1;
        let dyfprime = mul(d, mul2, "newtonY: D·mul2")?;
        if yfprime_pos < dyfprime {
            // Overshoot: halve and retry rather than erroring.
            y = y_prev / two;
            if y.is_zero() {
                y = one;
            }
            continue;
        }
        let yfprime = yfprime_pos - dyfprime;

        let fprime = yfprime / y;
        if fprime.is_zero() {
            return Err(AmmError::NonConvergence("newtonY: fprime collapsed to zero"));
        }

        let y_minus_base = mul1 / fprime;
        let y_plus = (yfprime + mul(precision, d, "newtonY: PRECISION·D")?) / fprime
            + mul(y_minus_base, precision, "newtonY: y_minus·PRECISION")? / k0;
        let y_minus = y_minus_base + mul(precision, s, "newtonY: PRECISION·S")? / fprime;

        if y_plus < y_minus {
            y = y_prev / two;
            if y.is_zero() {
                y = one;
            }
        } else {
            y = y_plus - y_minus;
        }

        let diff = abs_diff(y, y_prev);
        let relative = y / threshold;
        let bound = if convergence_limit > relative {
            convergence_limit
        } else {
            relative
        };
        if diff < bound {
            return Ok(y);
        }
    }

    Err(AmmError::NonConvergence("newtonY exceeded 255 iterations"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn u(v: u128) -> U256 {
        U256::from(v)
    }

    fn e18(v: u128) -> U256 {
        U256::from(v) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn e24(v: u128) -> U256 {
        U256::from(v) * U256::from(10u64).pow(U256::from(24u64))
    }

    /// Twocrypto mainnet-shaped parameters.
    const A: u128 = 400_000;
    const GAMMA: u128 = 145_000_000_000_000;

    // -- calc_d ---------------------------------------------------------------

    #[test]
    fn calc_d_balanced_two_coins() {
        let Ok(d) = calc_d(u(A), u(GAMMA), &[e24(1), e24(1)]) else {
            panic!("expected Ok");
        };
        let target = e24(2);
        let diff = if d > target { d - target } else { target - d };
        assert!(diff <= e18(1), "D = {d}");
    }

    #[test]
    fn calc_d_balanced_three_coins() {
        let Ok(d) = calc_d(u(1_707_629), u(11_809_167_828_997), &[e24(1), e24(1), e24(1)])
        else {
            panic!("expected Ok");
        };
        let target = e24(3);
        let diff = if d > target { d - target } else { target - d };
        assert!(diff <= e18(1), "D = {d}");
    }

    #[test]
    fn calc_d_skewed_pool_converges() {
        let Ok(d) = calc_d(u(A), u(GAMMA), &[e24(4), e18(250_000)]) else {
            panic!("expected Ok");
        };
        assert!(d > U256::zero());
        // Between the constant-product and constant-sum extremes.
        assert!(d < e24(4) + e18(250_000));
    }

    #[test]
    fn calc_d_zero_parameters_rejected() {
        assert!(matches!(
            calc_d(U256::zero(), u(GAMMA), &[e24(1), e24(1)]),
            Err(AmmError::InvalidAmplification(_))
        ));
        assert!(matches!(
            calc_d(u(A), U256::zero(), &[e24(1), e24(1)]),
            Err(AmmError::InvalidGamma(_))
        ));
    }

    #[test]
    fn calc_d_empty_pool_is_zero() {
        let Ok(d) = calc_d(u(A), u(GAMMA), &[U256::zero(), U256::zero()]) else {
            panic!("expected Ok");
        };
        assert_eq!(d, U256::zero());
    }

    #[test]
    fn calc_d_partial_zero_rejected() {
        assert!(matches!(
            calc_d(u(A), u(GAMMA), &[e24(1), U256::zero()]),
            Err(AmmError::ZeroBalance)
        ));
    }

    #[test]
    fn calc_d_wrong_coin_count_rejected() {
        assert!(matches!(
            calc_d(u(A), u(GAMMA), &[e24(1)]),
            Err(AmmError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            calc_d(u(A), u(GAMMA), &[e24(1); 4]),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn calc_d_round_trips_newton_y() {
        // D computed from balances must make newton_y return those
        // balances back.
        let xp = [e24(1), e24(1)];
        let Ok(d) = calc_d(u(A), u(GAMMA), &xp) else {
            panic!("expected Ok");
        };
        let Ok(y) = newton_y(u(A), u(GAMMA), &xp, d, 1) else {
            panic!("expected Ok");
        };
        let diff = if y > xp[1] { y - xp[1] } else { xp[1] - y };
        assert!(diff <= e18(1) / u(1_000), "y = {y}");
    }

    // -- newton_y -------------------------------------------------------------

    #[test]
    fn newton_y_balanced_fixed_point() {
        let Ok(y) = newton_y(u(A), u(GAMMA), &[e24(1), e24(1)], e24(2), 0) else {
            panic!("expected Ok");
        };
        let diff = if y > e24(1) { y - e24(1) } else { e24(1) - y };
        assert!(diff <= e18(1) / u(1_000), "y = {y}");
    }

    #[test]
    fn newton_y_output_falls_as_input_rises() {
        let bumped = [e24(1) + e18(100), e24(1)];
        let Ok(y) = newton_y(u(A), u(GAMMA), &bumped, e24(2), 1) else {
            panic!("expected Ok");
        };
        assert!(y < e24(1));
        let received = e24(1) - y;
        // Near peg the curve pays out almost 1:1.
        assert!(received > e18(99));
        assert!(received < e18(101));
    }

    #[test]
    fn newton_y_zero_parameters_rejected() {
        assert!(matches!(
            newton_y(U256::zero(), u(GAMMA), &[e24(1), e24(1)], e24(2), 0),
            Err(AmmError::InvalidAmplification(_))
        ));
        assert!(matches!(
            newton_y(u(A), U256::zero(), &[e24(1), e24(1)], e24(2), 0),
            Err(AmmError::InvalidGamma(_))
        ));
    }

    #[test]
    fn newton_y_zero_divisors_do_not_converge() {
        assert!(matches!(
            newton_y(u(A), u(GAMMA), &[U256::zero(), e24(1)], e24(2), 1),
            Err(AmmError::NonConvergence(_))
        ));
        assert!(matches!(
            newton_y(u(A), u(GAMMA), &[e24(1), e24(1)], U256::zero(), 0),
            Err(AmmError::NonConvergence(_))
        ));
    }

    #[test]
    fn newton_y_shape_errors() {
        assert!(matches!(
            newton_y(u(A), u(GAMMA), &[e24(1)], e24(2), 0),
            Err(AmmError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            newton_y(u(A), u(GAMMA), &[e24(1), e24(1)], e24(2), 2),
            Err(AmmError::InvalidIndex(_))
        ));
    }

    #[test]
    fn newton_y_tiny_gamma_converges() {
        let Ok(y) = newton_y(u(A), u(10_000_000_000), &[e24(1), e24(1)], e24(2), 0) else {
            panic!("expected Ok");
        };
        assert!(y > U256::zero());
    }

    #[test]
    fn newton_y_extreme_imbalance_converges() {
        // 100 000 : 1 skew
        let xp = [e24(100_000), e18(1_000_000)];
        let Ok(d) = calc_d(u(A), u(GAMMA), &xp) else {
            panic!("expected Ok");
        };
        let Ok(y) = newton_y(u(A), u(GAMMA), &xp, d, 1) else {
            panic!("expected Ok");
        };
        assert!(y > U256::zero());
    }

    // -- newton_y3 ------------------------------------------------------------

    #[test]
    fn newton_y3_balanced_fixed_point() {
        let a = u(1_707_629);
        let gamma = u(11_809_167_828_997);
        let xp = [e24(1), e24(1), e24(1)];
        let Ok(y) = newton_y3(a, gamma, &xp, e24(3), 2) else {
            panic!("expected Ok");
        };
        let diff = if y > e24(1) { y - e24(1) } else { e24(1) - y };
        assert!(diff <= e18(1) / u(1_000), "y = {y}");
    }

    #[test]
    fn newton_y3_output_falls_as_input_rises() {
        let a = u(1_707_629);
        let gamma = u(11_809_167_828_997);
        let bumped = [e24(1) + e18(1_000), e24(1), e24(1)];
        let Ok(y) = newton_y3(a, gamma, &bumped, e24(3), 1) else {
            panic!("expected Ok");
        };
        assert!(y < e24(1));
    }

    #[test]
    fn newton_y3_insufficient_liquidity() {
        let r = newton_y3(u(A), u(GAMMA), &[e18(1), e18(1), e18(1)], u(100), 0);
        assert!(matches!(r, Err(AmmError::InsufficientLiquidity)));
    }

    #[test]
    fn newton_y3_zero_product_rejected() {
        let r = newton_y3(u(A), u(GAMMA), &[U256::zero(), e24(1), e24(1)], e24(3), 1);
        assert!(matches!(r, Err(AmmError::ZeroBalance)));
    }

    #[test]
    fn newton_y3_shape_errors() {
        assert!(matches!(
            newton_y3(u(A), u(GAMMA), &[e24(1), e24(1)], e24(2), 0),
            Err(AmmError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            newton_y3(u(A), u(GAMMA), &[e24(1), e24(1), e24(1)], e24(3), 3),
            Err(AmmError::InvalidIndex(_))
        ));
    }

    // -- dynamic_fee ----------------------------------------------------------

    const MID_FEE: u128 = 3_000_000;
    const OUT_FEE: u128 = 30_000_000;
    const FEE_GAMMA: u128 = 230_000_000_000_000;

    #[test]
    fn dynamic_fee_balanced_pays_mid() {
        let Ok(fee) = dynamic_fee(&[e24(1), e24(1)], u(FEE_GAMMA), u(MID_FEE), u(OUT_FEE))
        else {
            panic!("expected Ok");
        };
        assert_eq!(fee, u(MID_FEE));
    }

    #[test]
    fn dynamic_fee_rises_with_skew() {
        let Ok(balanced) = dynamic_fee(&[e24(1), e24(1)], u(FEE_GAMMA), u(MID_FEE), u(OUT_FEE))
        else {
            panic!("expected Ok");
        };
        let Ok(skewed) = dynamic_fee(&[e24(4), e24(1)], u(FEE_GAMMA), u(MID_FEE), u(OUT_FEE))
        else {
            panic!("expected Ok");
        };
        assert!(skewed > balanced);
        assert!(skewed <= u(OUT_FEE));
    }

    #[test]
    fn dynamic_fee_extreme_skew_approaches_out() {
        let Ok(fee) = dynamic_fee(&[e24(1_000_000), e18(1)], u(FEE_GAMMA), u(MID_FEE), u(OUT_FEE))
        else {
            panic!("expected Ok");
        };
        assert!(fee > u(OUT_FEE) * u(9) / u(10), "fee = {fee}");
        assert!(fee <= u(OUT_FEE));
    }

    #[test]
    fn dynamic_fee_three_coins_balanced() {
        let Ok(fee) = dynamic_fee(&[e24(1), e24(1), e24(1)], u(FEE_GAMMA), u(MID_FEE), u(OUT_FEE))
        else {
            panic!("expected Ok");
        };
        assert_eq!(fee, u(MID_FEE));
    }

    #[test]
    fn dynamic_fee_empty_pool_pays_mid() {
        let Ok(fee) = dynamic_fee(
            &[U256::zero(), U256::zero()],
            u(FEE_GAMMA),
            u(MID_FEE),
            u(OUT_FEE),
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(fee, u(MID_FEE));
    }
}
