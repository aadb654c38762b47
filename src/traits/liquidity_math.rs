//! Liquidity-side math implemented by every pool family.

use primitive_types::U256;

use crate::error::Result;

/// LP-token mathematics over an immutable pool snapshot.
///
/// The snapshot's `total_supply` field anchors every calculation; pools
/// with a zero supply accept only first-deposit estimates and report
/// [`AmmError::ZeroSupply`](crate::error::AmmError::ZeroSupply) for
/// anything that would burn tokens.
pub trait LiquidityMath {
    /// LP tokens minted for depositing (or burned for withdrawing)
    /// `amounts`, one entry per coin in raw native units.
    ///
    /// With a zero supply this returns the post-deposit invariant `D₁`
    /// (the first-deposit mint).
    ///
    /// # Errors
    ///
    /// Implementation-specific; see each pool type.
    fn calc_token_amount(&self, amounts: &[U256], deposit: bool) -> Result<U256>;

    /// Amount of coin `i` received for burning `lp` tokens against a
    /// single coin. Burning the full supply returns the entire balance.
    ///
    /// # Errors
    ///
    /// Implementation-specific; see each pool type.
    fn calc_withdraw_one_coin(&self, lp: U256, i: usize) -> Result<U256>;

    /// Per-coin amounts of a strictly proportional withdrawal:
    /// `balances[k] · lp / total_supply`.
    ///
    /// # Errors
    ///
    /// Implementation-specific; see each pool type.
    fn calc_remove_liquidity(&self, lp: U256) -> Result<Vec<U256>>;

    /// The invariant per LP token, `D · 10^18 / total_supply`; exactly
    /// `10^18` for an empty pool.
    ///
    /// # Errors
    ///
    /// Implementation-specific; see each pool type.
    fn get_virtual_price(&self) -> Result<U256>;
}
