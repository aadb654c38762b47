//! Enum dispatch wrapper for all pool families.
//!
//! [`AnyPool`] wraps every concrete snapshot type behind a single enum,
//! enabling heterogeneous collections and zero-cost static dispatch.
//! Each variant is feature-gated to match its pool family.

#[cfg(feature = "stable")]
use super::stable::StablePool;
#[cfg(feature = "tricrypto")]
use super::tricrypto::TriCryptoPool;
#[cfg(feature = "twocrypto")]
use super::twocrypto::TwoCryptoPool;

use primitive_types::U256;

use crate::domain::SwapQuote;
use crate::error::Result;
use crate::traits::{LiquidityMath, QuotePool};

/// Dispatch enum wrapping every concrete pool snapshot.
///
/// Each variant is feature-gated behind its family's Cargo feature.
/// The enum implements [`QuotePool`] and [`LiquidityMath`] by
/// delegating every call to the inner snapshot via `match` — no
/// vtables, no allocation, exhaustive handling enforced by the
/// compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyPool {
    /// StableSwap, 2–8 coins.
    #[cfg(feature = "stable")]
    Stable(StablePool),

    /// CryptoSwap, 2 coins.
    #[cfg(feature = "twocrypto")]
    TwoCrypto(TwoCryptoPool),

    /// CryptoSwap, 3 coins.
    #[cfg(feature = "tricrypto")]
    TriCrypto(TriCryptoPool),
}

/// Delegates a method call to every `AnyPool` variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            #[cfg(feature = "stable")]
            AnyPool::Stable(p) => p.$method($($arg),*),
            #[cfg(feature = "twocrypto")]
            AnyPool::TwoCrypto(p) => p.$method($($arg),*),
            #[cfg(feature = "tricrypto")]
            AnyPool::TriCrypto(p) => p.$method($($arg),*),
        }
    };
}

impl QuotePool for AnyPool {
    fn n_coins(&self) -> usize {
        delegate!(self, n_coins())
    }

    fn get_dy(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        delegate!(self, get_dy(i, j, dx))
    }

    fn get_dx(&self, i: usize, j: usize, dy: U256) -> Result<U256> {
        delegate!(self, get_dx(i, j, dy))
    }

    fn get_spot_price(&self, i: usize, j: usize) -> Result<U256> {
        delegate!(self, get_spot_price(i, j))
    }

    fn get_effective_price(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        delegate!(self, get_effective_price(i, j, dx))
    }

    fn get_price_impact(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        delegate!(self, get_price_impact(i, j, dx))
    }

    fn quote_swap(&self, i: usize, j: usize, dx: U256) -> Result<SwapQuote> {
        delegate!(self, quote_swap(i, j, dx))
    }
}

impl LiquidityMath for AnyPool {
    fn calc_token_amount(&self, amounts: &[U256], deposit: bool) -> Result<U256> {
        delegate!(self, calc_token_amount(amounts, deposit))
    }

    fn calc_withdraw_one_coin(&self, lp: U256, i: usize) -> Result<U256> {
        delegate!(self, calc_withdraw_one_coin(lp, i))
    }

    fn calc_remove_liquidity(&self, lp: U256) -> Result<Vec<U256>> {
        delegate!(self, calc_remove_liquidity(lp))
    }

    fn get_virtual_price(&self) -> Result<U256> {
        delegate!(self, get_virtual_price())
    }
}

#[cfg(feature = "stable")]
impl From<StablePool> for AnyPool {
    fn from(pool: StablePool) -> Self {
        Self::Stable(pool)
    }
}

#[cfg(feature = "twocrypto")]
impl From<TwoCryptoPool> for AnyPool {
    fn from(pool: TwoCryptoPool) -> Self {
        Self::TwoCrypto(pool)
    }
}

#[cfg(feature = "tricrypto")]
impl From<TriCryptoPool> for AnyPool {
    fn from(pool: TriCryptoPool) -> Self {
        Self::TriCrypto(pool)
    }
}

#[cfg(all(test, feature = "stable", feature = "twocrypto"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::pools::cryptoswap::{CryptoFees, CryptoShape};

    fn u(v: u128) -> U256 {
        U256::from(v)
    }

    fn e18(v: u128) -> U256 {
        U256::from(v) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn e24(v: u128) -> U256 {
        U256::from(v) * U256::from(10u64).pow(U256::from(24u64))
    }

    fn stable() -> AnyPool {
        let Ok(pool) = StablePool::from_decimals(
            vec![e18(1_000_000), e18(1_000_000)],
            &[18, 18],
            u(100),
            u(4_000_000),
            U256::zero(),
            e18(2_000_000),
        ) else {
            panic!("valid pool");
        };
        AnyPool::from(pool)
    }

    fn twocrypto() -> AnyPool {
        let Ok(pool) = TwoCryptoPool::new(
            [e24(1), e24(1)],
            [u(1), u(1)],
            e18(1),
            CryptoShape {
                a: u(400_000),
                gamma: u(145_000_000_000_000),
                d: e24(2),
            },
            CryptoFees {
                mid_fee: u(3_000_000),
                out_fee: u(30_000_000),
                fee_gamma: u(230_000_000_000_000),
            },
            e24(2),
        ) else {
            panic!("valid pool");
        };
        AnyPool::from(pool)
    }

    #[test]
    fn dispatches_coin_counts() {
        assert_eq!(stable().n_coins(), 2);
        assert_eq!(twocrypto().n_coins(), 2);
    }

    #[test]
    fn heterogeneous_quoting() {
        for pool in [stable(), twocrypto()] {
            let Ok(dy) = pool.get_dy(0, 1, e18(1_000)) else {
                panic!("expected Ok");
            };
            assert!(dy > U256::zero());
            let Ok(quote) = pool.quote_swap(0, 1, e18(1_000)) else {
                panic!("expected Ok");
            };
            assert_eq!(quote.amount_out(), dy);
        }
    }

    #[test]
    fn dispatches_liquidity_math() {
        for pool in [stable(), twocrypto()] {
            let Ok(vp) = pool.get_virtual_price() else {
                panic!("expected Ok");
            };
            assert_eq!(vp, crate::math::PRECISION);
        }
    }
}
