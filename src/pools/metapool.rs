//! Metapool composition: one token paired against a base pool's LP
//! token.
//!
//! A metapool holds `[paired_token, base_lp_token]` in an ordinary
//! two-coin StableSwap; the base pool holds the underlying coins. A
//! swap between the paired token and an underlying coin composes one
//! meta swap with one base-pool liquidity operation — no new kernel
//! primitive is involved.
//!
//! # Underlying Index Convention
//!
//! Index 0 is the paired token; indices `1..=n` are the base pool's
//! coins shifted by one.

use primitive_types::U256;

use crate::error::{AmmError, Result};
use crate::pools::stable::StablePool;
use crate::traits::{LiquidityMath, QuotePool};

/// A metapool snapshot: the 2-coin meta pool plus its base pool.
///
/// The meta pool's coin 1 must be the base pool's LP token, and the
/// meta snapshot's rates must already express the base LP token's
/// virtual price if the caller wants on-chain parity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaPool {
    meta: StablePool,
    base: StablePool,
}

impl MetaPool {
    /// Couples a meta pool with its base pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the meta pool is
    /// not a two-coin pool.
    pub fn new(meta: StablePool, base: StablePool) -> Result<Self> {
        if meta.n_coins() != 2 {
            return Err(AmmError::InvalidConfiguration(
                "meta pool must hold exactly 2 coins",
            ));
        }
        Ok(Self { meta, base })
    }

    /// Returns the meta pool snapshot.
    #[must_use]
    pub const fn meta(&self) -> &StablePool {
        &self.meta
    }

    /// Returns the base pool snapshot.
    #[must_use]
    pub const fn base(&self) -> &StablePool {
        &self.base
    }

    /// Number of underlying coins (paired token + base coins).
    #[must_use]
    pub fn n_underlying(&self) -> usize {
        1 + self.base.n_coins()
    }

    /// Swap output across the metapool's underlying coin space.
    ///
    /// - paired → underlying: meta swap into LP, then single-coin
    ///   withdrawal from the base pool;
    /// - underlying → paired: single-coin deposit into the base pool,
    ///   then meta swap of the minted LP;
    /// - underlying → underlying: delegated to the base pool.
    ///
    /// Returns 0 for `i == j`, out-of-range indices, or zero input.
    ///
    /// # Errors
    ///
    /// Propagates solver failures from either pool.
    pub fn get_dy_underlying(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        let n = self.n_underlying();
        if i == j || i >= n || j >= n || dx.is_zero() {
            return Ok(U256::zero());
        }

        if i == 0 {
            // paired → base coin j-1
            let lp = self.meta.get_dy(0, 1, dx)?;
            if lp.is_zero() {
                return Ok(U256::zero());
            }
            return self.base.calc_withdraw_one_coin(lp, j - 1);
        }
        if j == 0 {
            // base coin i-1 → paired
            let mut amounts = vec![U256::zero(); self.base.n_coins()];
            amounts[i - 1] = dx;
            let lp = self.base.calc_token_amount(&amounts, true)?;
            if lp.is_zero() {
                return Ok(U256::zero());
            }
            return self.meta.get_dy(1, 0, lp);
        }
        // base coin → base coin never leaves the base pool
        self.base.get_dy(i - 1, j - 1, dx)
    }
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

    fn e6(v: u128) -> U256 {
        U256::from(v) * U256::from(1_000_000u64)
    }

    /// DAI/USDC base pool plus a FRAX-style metapool on its LP token.
    fn frax_3pool() -> MetaPool {
        let Ok(base) = StablePool::from_decimals(
            vec![e18(1_000_000), e6(1_000_000)],
            &[18, 6],
            u(100),
            u(4_000_000),
            U256::zero(),
            e18(2_000_000),
        ) else {
            panic!("valid base pool");
        };
        let Ok(meta) = StablePool::from_decimals(
            vec![e18(500_000), e18(500_000)],
            &[18, 18],
            u(200),
            u(4_000_000),
            U256::zero(),
            e18(1_000_000),
        ) else {
            panic!("valid meta pool");
        };
        let Ok(pool) = MetaPool::new(meta, base) else {
            panic!("valid metapool");
        };
        pool
    }

    #[test]
    fn wide_meta_pool_rejected() {
        let Ok(base) = StablePool::from_decimals(
            vec![e18(1), e18(1)],
            &[18, 18],
            u(100),
            U256::zero(),
            U256::zero(),
            U256::zero(),
        ) else {
            panic!("valid pool");
        };
        let Ok(wide) = StablePool::from_decimals(
            vec![e18(1), e18(1), e18(1)],
            &[18, 18, 18],
            u(100),
            U256::zero(),
            U256::zero(),
            U256::zero(),
        ) else {
            panic!("valid pool");
        };
        assert!(matches!(
            MetaPool::new(wide, base),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn underlying_count() {
        assert_eq!(frax_3pool().n_underlying(), 3);
    }

    #[test]
    fn paired_to_underlying() {
        let pool = frax_3pool();
        // 1000 FRAX → USDC through LP withdrawal.
        let Ok(dy) = pool.get_dy_underlying(0, 2, e18(1_000)) else {
            panic!("expected Ok");
        };
        assert!(dy > e6(985), "dy = {dy}");
        assert!(dy < e6(1_000), "dy = {dy}");
    }

    #[test]
    fn underlying_to_paired() {
        let pool = frax_3pool();
        // 1000 DAI → FRAX through LP deposit.
        let Ok(dy) = pool.get_dy_underlying(1, 0, e18(1_000)) else {
            panic!("expected Ok");
        };
        assert!(dy > e18(985), "dy = {dy}");
        assert!(dy < e18(1_000), "dy = {dy}");
    }

    #[test]
    fn underlying_to_underlying_uses_base_pool() {
        let pool = frax_3pool();
        let Ok(through_meta) = pool.get_dy_underlying(1, 2, e18(1_000)) else {
            panic!("expected Ok");
        };
        let Ok(direct) = pool.base().get_dy(0, 1, e18(1_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(through_meta, direct);
    }

    #[test]
    fn invalid_inputs_return_zero() {
        let pool = frax_3pool();
        for (i, j, dx) in [(0, 0, e18(1)), (3, 0, e18(1)), (0, 1, U256::zero())] {
            let Ok(dy) = pool.get_dy_underlying(i, j, dx) else {
                panic!("expected Ok");
            };
            assert_eq!(dy, U256::zero());
        }
    }

    #[test]
    fn round_trip_pays_fees_twice() {
        let pool = frax_3pool();
        let Ok(out) = pool.get_dy_underlying(0, 1, e18(1_000)) else {
            panic!("expected Ok");
        };
        let Ok(back) = pool.get_dy_underlying(1, 0, out) else {
            panic!("expected Ok");
        };
        assert!(back < e18(1_000));
    }
}
