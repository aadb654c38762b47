//! Property-based tests using `proptest` for the universal quoting
//! invariants.
//!
//! Covered properties:
//!
//! 1. **Output bounds** — `0 <= get_dy <= balances[j]`.
//! 2. **Monotonicity** — a larger input never buys less output.
//! 3. **Marginal-rate slippage** — the average price never improves as
//!    size grows (modulo 1-unit rounding).
//! 4. **Roundtrip** — `get_dx(get_dy(dx))` recovers `dx` within 2%.
//! 5. **D bounds & homogeneity** — `0 < D <= Σxp`; doubling balances
//!    doubles `D`.
//! 6. **Proportional withdrawal** — exact per-coin pro-rata amounts.
//! 7. **Virtual-price floor** — a healthy pool never quotes below par.
//! 8. **Ramp endpoints** — interpolation pinned at both ends of the
//!    window.

#![cfg(all(feature = "stable", feature = "twocrypto"))]

use primitive_types::U256;
use proptest::prelude::*;

use crate::analytics::ramp::a_gamma_at_time;
use crate::math::constants::PRECISION;
use crate::pools::cryptoswap::{CryptoFees, CryptoShape};
use crate::pools::stable::{get_d, StablePool};
use crate::pools::twocrypto::TwoCryptoPool;
use crate::traits::{LiquidityMath, QuotePool};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn u(v: u128) -> U256 {
    U256::from(v)
}

fn e18(v: u128) -> U256 {
    U256::from(v) * U256::from(10u64).pow(U256::from(18u64))
}

fn make_stable(reserve_a: u128, reserve_b: u128, amp: u128) -> StablePool {
    let balances = vec![e18(reserve_a), e18(reserve_b)];
    let supply = e18(reserve_a + reserve_b);
    StablePool::from_decimals(
        balances,
        &[18, 18],
        u(amp),
        u(4_000_000),
        u(20_000_000_000),
        supply,
    )
    .expect("valid stable pool")
}

fn make_twocrypto(reserve: u128) -> TwoCryptoPool {
    let balances = [e18(reserve), e18(reserve)];
    TwoCryptoPool::new(
        balances,
        [u(1), u(1)],
        e18(1),
        CryptoShape {
            a: u(400_000),
            gamma: u(145_000_000_000_000),
            d: e18(2 * reserve),
        },
        CryptoFees {
            mid_fee: u(3_000_000),
            out_fee: u(30_000_000),
            fee_gamma: u(230_000_000_000_000),
        },
        e18(2 * reserve),
    )
    .expect("valid twocrypto pool")
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Whole-token reserves in [10_000, 10_000_000] to avoid extremes.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000u128
}

/// StableSwap amplification values in [1, 5000].
fn amplification_strategy() -> impl Strategy<Value = u128> {
    1u128..=5_000u128
}

/// Swap size as a per-mille fraction of the input reserve.
fn trade_fraction_strategy() -> impl Strategy<Value = u128> {
    1u128..=500u128
}

// ---------------------------------------------------------------------------
// Properties 1-3: output bounds, monotonicity, marginal rate
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_output_bounded_by_reserve_stable(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
        fraction in trade_fraction_strategy(),
    ) {
        let pool = make_stable(ra, rb, amp);
        let dx = e18(ra) * u(fraction) / u(1_000);
        let Ok(dy) = pool.get_dy(0, 1, dx) else {
            return Ok(());
        };
        prop_assert!(dy <= pool.balances()[1], "dy={dy} above reserve");
    }

    #[test]
    fn prop_output_bounded_by_reserve_twocrypto(
        reserve in reserve_strategy(),
        fraction in trade_fraction_strategy(),
    ) {
        let pool = make_twocrypto(reserve);
        let dx = e18(reserve) * u(fraction) / u(1_000);
        let Ok(dy) = pool.get_dy(0, 1, dx) else {
            return Ok(());
        };
        prop_assert!(dy <= pool.balances()[1], "dy={dy} above reserve");
    }

    #[test]
    fn prop_monotone_in_input_stable(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
        fraction in trade_fraction_strategy(),
    ) {
        let pool = make_stable(ra, rb, amp);
        let dx1 = e18(ra) * u(fraction) / u(1_000);
        let dx2 = dx1 * u(2);
        let Ok(dy1) = pool.get_dy(0, 1, dx1) else {
            return Ok(());
        };
        let Ok(dy2) = pool.get_dy(0, 1, dx2) else {
            return Ok(());
        };
        prop_assert!(dy1 <= dy2, "dy regressed: {dy1} > {dy2}");
    }

    #[test]
    fn prop_monotone_in_input_twocrypto(
        reserve in reserve_strategy(),
        fraction in trade_fraction_strategy(),
    ) {
        let pool = make_twocrypto(reserve);
        let dx1 = e18(reserve) * u(fraction) / u(1_000);
        let dx2 = dx1 * u(2);
        let Ok(dy1) = pool.get_dy(0, 1, dx1) else {
            return Ok(());
        };
        let Ok(dy2) = pool.get_dy(0, 1, dx2) else {
            return Ok(());
        };
        prop_assert!(dy1 <= dy2, "dy regressed: {dy1} > {dy2}");
    }

    #[test]
    fn prop_marginal_rate_never_improves_stable(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
        fraction in trade_fraction_strategy(),
    ) {
        // Flat fee: a rebalancing trade under the off-peg multiplier can
        // legitimately pay a lower rate as it grows.
        let pool = StablePool::from_decimals(
            vec![e18(ra), e18(rb)],
            &[18, 18],
            u(amp),
            u(4_000_000),
            U256::zero(),
            e18(ra + rb),
        )
        .expect("valid stable pool");
        let dx1 = e18(ra) * u(fraction) / u(1_000);
        let dx2 = dx1 * u(2);
        let Ok(rate1) = pool.get_effective_price(0, 1, dx1) else {
            return Ok(());
        };
        let Ok(rate2) = pool.get_effective_price(0, 1, dx2) else {
            return Ok(());
        };
        // Allow 1-unit output rounding on both quotes; dx >= 10^19
        // keeps the induced rate error far below this slack.
        let slack = u(1_000_000);
        prop_assert!(
            rate1 + slack >= rate2,
            "average price improved with size: {rate1} -> {rate2}"
        );
    }

    #[test]
    fn prop_roundtrip_recovers_input_stable(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
        fraction in 1u128..=200u128,
    ) {
        let pool = make_stable(ra, rb, amp);
        // Sized against the smaller reserve: a trade that drains the
        // output side flattens dy(dx) and makes the inverse ill-posed.
        let dx = e18(ra.min(rb)) * u(fraction) / u(1_000);
        let Ok(dy) = pool.get_dy(0, 1, dx) else {
            return Ok(());
        };
        if dy.is_zero() {
            return Ok(());
        }
        let Ok(dx_back) = pool.get_dx(0, 1, dy) else {
            return Ok(());
        };
        let diff = if dx_back > dx { dx_back - dx } else { dx - dx_back };
        prop_assert!(
            diff <= (dx / u(50)).max(U256::one()),
            "roundtrip drift: dx={dx}, back={dx_back}"
        );
    }

    #[test]
    fn prop_roundtrip_recovers_input_twocrypto(
        reserve in reserve_strategy(),
        fraction in 1u128..=200u128,
    ) {
        let pool = make_twocrypto(reserve);
        let dx = e18(reserve) * u(fraction) / u(1_000);
        let Ok(dy) = pool.get_dy(0, 1, dx) else {
            return Ok(());
        };
        if dy.is_zero() {
            return Ok(());
        }
        let Ok(dx_back) = pool.get_dx(0, 1, dy) else {
            return Ok(());
        };
        let diff = if dx_back > dx { dx_back - dx } else { dx - dx_back };
        prop_assert!(
            diff <= (dx / u(50)).max(U256::one()),
            "roundtrip drift: dx={dx}, back={dx_back}"
        );
    }
}

// ---------------------------------------------------------------------------
// Property 5: D bounds and homogeneity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_d_bounded_by_sum(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
    ) {
        let xp = [e18(ra), e18(rb)];
        let Ok(d) = get_d(&xp, u(amp) * u(100)) else {
            return Ok(());
        };
        prop_assert!(d > U256::zero());
        prop_assert!(d <= xp[0] + xp[1], "D={d} above sum");
    }

    #[test]
    fn prop_d_is_homogeneous(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
    ) {
        let Ok(d1) = get_d(&[e18(ra), e18(rb)], u(amp) * u(100)) else {
            return Ok(());
        };
        let Ok(d2) = get_d(&[e18(2 * ra), e18(2 * rb)], u(amp) * u(100)) else {
            return Ok(());
        };
        let twice = d1 * u(2);
        let diff = if d2 > twice { d2 - twice } else { twice - d2 };
        prop_assert!(diff <= u(16), "doubling drifted: {d1} -> {d2}");
    }
}

// ---------------------------------------------------------------------------
// Properties 6-7: withdrawals and virtual price
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_proportional_withdrawal_is_exact(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
        share in 1u128..=1_000u128,
    ) {
        let pool = make_stable(ra, rb, amp);
        let lp = pool.total_supply() * u(share) / u(1_000);
        let Ok(amounts) = pool.calc_remove_liquidity(lp) else {
            return Ok(());
        };
        for (k, &amount) in amounts.iter().enumerate() {
            let expected = pool.balances()[k] * lp / pool.total_supply();
            prop_assert_eq!(amount, expected, "coin {} not pro-rata", k);
        }
    }

    #[test]
    fn prop_virtual_price_floor(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amp in amplification_strategy(),
    ) {
        // A healthy pool has supply == D at snapshot time.
        let balances = vec![e18(ra), e18(rb)];
        let Ok(d) = get_d(&[e18(ra), e18(rb)], u(amp) * u(100)) else {
            return Ok(());
        };
        let Ok(pool) = StablePool::from_decimals(
            balances,
            &[18, 18],
            u(amp),
            u(4_000_000),
            U256::zero(),
            d,
        ) else {
            return Ok(());
        };
        let Ok(vp) = pool.get_virtual_price() else {
            return Ok(());
        };
        prop_assert!(
            vp + U256::one() >= PRECISION,
            "virtual price {vp} below par"
        );
    }
}

// ---------------------------------------------------------------------------
// Property 8: ramp endpoints
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_ramp_endpoints_pinned(
        a0 in 1u64..=1_000_000u64,
        a1 in 1u64..=1_000_000u64,
        g0 in 1u64..=1_000_000u64,
        g1 in 1u64..=1_000_000u64,
        t0 in 0u64..=1_000_000u64,
        span in 1u64..=1_000_000u64,
        now in 0u64..=3_000_000u64,
    ) {
        let t1 = t0 + span;
        let Ok((a, gamma)) = a_gamma_at_time(
            U256::from(a0),
            U256::from(a1),
            U256::from(g0),
            U256::from(g1),
            t0,
            t1,
            now,
        ) else {
            return Ok(());
        };
        if now <= t0 {
            prop_assert_eq!(a, U256::from(a0));
            prop_assert_eq!(gamma, U256::from(g0));
        } else if now >= t1 {
            prop_assert_eq!(a, U256::from(a1));
            prop_assert_eq!(gamma, U256::from(g1));
        } else {
            let (lo, hi) = if a0 <= a1 { (a0, a1) } else { (a1, a0) };
            prop_assert!(a >= U256::from(lo) && a <= U256::from(hi));
            let (lo, hi) = if g0 <= g1 { (g0, g1) } else { (g1, g0) };
            prop_assert!(gamma >= U256::from(lo) && gamma <= U256::from(hi));
        }
    }
}
