//! Three-coin CryptoSwap pool (Curve tricrypto style).
//!
//! Token 0 is the numéraire; tokens 1 and 2 carry their own internal
//! pegs:
//!
//! ```text
//! xp = [ b₀ · p₀,
//!        b₁ · p₁ · price_scales[0] / 10^18,
//!        b₂ · p₂ · price_scales[1] / 10^18 ]
//! ```
//!
//! The swap pipeline mirrors the two-coin pool with [`newton_y3`] as
//! the solver and `n^n = 27` in the fee curve.

use primitive_types::U256;

use crate::domain::SwapQuote;
use crate::error::{AmmError, Result};
use crate::math::constants::{DERIVATIVE_EPSILON, FEE_DENOMINATOR, PRECISION};
use crate::math::wide::{narrow, widen};
use crate::pools::cryptoswap::{self, newton_y3, spot_seeded_search, CryptoFees, CryptoShape};
use crate::traits::{LiquidityMath, QuotePool};

/// An immutable three-coin CryptoSwap pool snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriCryptoPool {
    balances: [U256; 3],
    precisions: [U256; 3],
    price_scales: [U256; 2],
    shape: CryptoShape,
    fees: CryptoFees,
    total_supply: U256,
}

impl TriCryptoPool {
    /// Creates a snapshot after validating it.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`validate`](Self::validate).
    pub fn new(
        balances: [U256; 3],
        precisions: [U256; 3],
        price_scales: [U256; 2],
        shape: CryptoShape,
        fees: CryptoFees,
        total_supply: U256,
    ) -> Result<Self> {
        let pool = Self {
            balances,
            precisions,
            price_scales,
            shape,
            fees,
            total_supply,
        };
        pool.validate()?;
        Ok(pool)
    }

    /// Validates all snapshot invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmplification`] / [`AmmError::InvalidGamma`]
    ///   on a zero shape parameter.
    /// - [`AmmError::InvalidConfiguration`] on a zero precision or price
    ///   scale, or `out_fee < mid_fee`.
    pub fn validate(&self) -> Result<()> {
        self.shape.validate()?;
        self.fees.validate()?;
        if self.precisions.iter().any(U256::is_zero) {
            return Err(AmmError::InvalidConfiguration(
                "precision factors must be positive",
            ));
        }
        if self.price_scales.iter().any(U256::is_zero) {
            return Err(AmmError::InvalidConfiguration(
                "price scales must be positive",
            ));
        }
        Ok(())
    }

    /// Returns the raw reserves in native token decimals.
    #[must_use]
    pub const fn balances(&self) -> &[U256; 3] {
        &self.balances
    }

    /// Returns the per-coin precision multipliers.
    #[must_use]
    pub const fn precisions(&self) -> &[U256; 3] {
        &self.precisions
    }

    /// Returns the internal pegs of tokens 1 and 2 in token-0 terms.
    #[must_use]
    pub const fn price_scales(&self) -> &[U256; 2] {
        &self.price_scales
    }

    /// Returns the shape parameters `(A, gamma, D)`.
    #[must_use]
    pub const fn shape(&self) -> &CryptoShape {
        &self.shape
    }

    /// Returns the fee-curve parameters.
    #[must_use]
    pub const fn fees(&self) -> &CryptoFees {
        &self.fees
    }

    /// Returns the LP-token supply used by liquidity operations.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Scales raw balances into the kernel's normalized units.
    fn xp_of(&self, balances: &[U256; 3]) -> Result<[U256; 3]> {
        let xp0 = balances[0]
            .checked_mul(self.precisions[0])
            .ok_or(AmmError::Overflow("xp[0] scaling"))?;
        let xp1 = narrow(
            (widen(balances[1]) * widen(self.precisions[1]))
                .checked_mul(widen(self.price_scales[0]))
                .ok_or(AmmError::Overflow("xp[1] scaling"))?
                / widen(PRECISION),
        )?;
        let xp2 = narrow(
            (widen(balances[2]) * widen(self.precisions[2]))
                .checked_mul(widen(self.price_scales[1]))
                .ok_or(AmmError::Overflow("xp[2] scaling"))?
                / widen(PRECISION),
        )?;
        Ok([xp0, xp1, xp2])
    }

    /// Translates a normalized amount of coin `j` back to raw units.
    fn unscale(&self, amount_xp: U256, j: usize) -> Result<U256> {
        let descaled = if j == 0 {
            widen(amount_xp)
        } else {
            widen(amount_xp) * widen(PRECISION) / widen(self.price_scales[j - 1])
        };
        narrow(descaled / widen(self.precisions[j]))
    }

    /// Returns `true` for an index pair no swap helper should price.
    fn invalid_pair(&self, i: usize, j: usize) -> bool {
        i == j || i >= 3 || j >= 3
    }

    /// Full swap pipeline returning `(net_dy, fee)` in raw output units.
    fn get_dy_with_fee(&self, i: usize, j: usize, dx: U256) -> Result<(U256, U256)> {
        if self.invalid_pair(i, j) || dx.is_zero() {
            return Ok((U256::zero(), U256::zero()));
        }
        if self.balances.iter().any(U256::is_zero) || self.shape.d.is_zero() {
            return Ok((U256::zero(), U256::zero()));
        }

        let mut balances = self.balances;
        balances[i] = balances[i]
            .checked_add(dx)
            .ok_or(AmmError::Overflow("post-trade balance"))?;
        let xp = self.xp_of(&balances)?;

        let y = newton_y3(self.shape.a, self.shape.gamma, &xp, self.shape.d, j)?;
        let dy_raw = if xp[j] > y {
            xp[j] - y - U256::one()
        } else {
            U256::zero()
        };

        let mut xp_after = xp;
        xp_after[j] = y;
        let fee_rate = cryptoswap::dynamic_fee(
            &xp_after,
            self.fees.fee_gamma,
            self.fees.mid_fee,
            self.fees.out_fee,
        )?;
        let fee_xp = narrow(widen(dy_raw) * widen(fee_rate) / widen(FEE_DENOMINATOR))?;

        Ok((
            self.unscale(dy_raw - fee_xp, j)?,
            self.unscale(fee_xp, j)?,
        ))
    }

    /// Pool value in token-0 terms per LP token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ZeroSupply`] for a supply-less snapshot.
    pub fn lp_price(&self) -> Result<U256> {
        if self.total_supply.is_zero() {
            return Err(AmmError::ZeroSupply);
        }
        let xp = self.xp_of(&self.balances)?;
        let value = widen(xp[0]) + widen(xp[1]) + widen(xp[2]);
        narrow(value * widen(PRECISION) / widen(self.total_supply))
    }
}

impl QuotePool for TriCryptoPool {
    fn n_coins(&self) -> usize {
        3
    }

    /// Swap output net of fees; 0 for invalid indices, zero input, or
    /// an unusable (empty / `D = 0`) snapshot.
    ///
    /// # Errors
    ///
    /// Propagates solver failures.
    fn get_dy(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        self.get_dy_with_fee(i, j, dx).map(|(dy, _)| dy)
    }

    /// Inverts [`get_dy`](Self::get_dy) with a spot-price-seeded binary
    /// search (tolerance `max(1, dy / 10_000)`).
    ///
    /// # Errors
    ///
    /// Propagates solver failures from the forward quotes.
    fn get_dx(&self, i: usize, j: usize, dy: U256) -> Result<U256> {
        if self.invalid_pair(i, j) || dy.is_zero() {
            return Ok(U256::zero());
        }
        if dy >= self.balances[j] {
            return Ok(U256::zero());
        }
        let spot = self.get_spot_price(i, j)?;
        spot_seeded_search(
            |dx| self.get_dy(i, j, dx),
            dy,
            spot,
            self.balances[i],
        )
    }

    /// Marginal price probed with `dx = max(1, DERIVATIVE_EPSILON /
    /// precisionᵢ)`.
    ///
    /// # Errors
    ///
    /// Propagates solver failures from the probe quote.
    fn get_spot_price(&self, i: usize, j: usize) -> Result<U256> {
        if self.invalid_pair(i, j) {
            return Ok(U256::zero());
        }
        let dx = (DERIVATIVE_EPSILON / self.precisions[i]).max(U256::one());
        let dy = self.get_dy(i, j, dx)?;
        narrow(widen(dy) * widen(PRECISION) / widen(dx))
    }

    /// Realized price `dy · 10^18 / dx`.
    ///
    /// # Errors
    ///
    /// Propagates solver failures from the forward quote.
    fn get_effective_price(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        if self.invalid_pair(i, j) || dx.is_zero() {
            return Ok(U256::zero());
        }
        let dy = self.get_dy(i, j, dx)?;
        narrow(widen(dy) * widen(PRECISION) / widen(dx))
    }

    /// Price impact in basis points, clamped at zero.
    ///
    /// # Errors
    ///
    /// Propagates solver failures from the underlying quotes.
    fn get_price_impact(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        let spot = self.get_spot_price(i, j)?;
        let effective = self.get_effective_price(i, j, dx)?;
        Ok(crate::analytics::price_impact_bps(spot, effective))
    }

    /// Gathers output, fee, prices, and impact in a single pass.
    ///
    /// # Errors
    ///
    /// Propagates solver failures from the underlying quotes.
    fn quote_swap(&self, i: usize, j: usize, dx: U256) -> Result<SwapQuote> {
        let (dy, fee) = self.get_dy_with_fee(i, j, dx)?;
        let spot = self.get_spot_price(i, j)?;
        let effective = if dx.is_zero() {
            U256::zero()
        } else {
            narrow(widen(dy) * widen(PRECISION) / widen(dx))?
        };
        let impact = crate::analytics::price_impact_bps(spot, effective);
        Ok(SwapQuote::new(dy, fee, impact, effective, spot))
    }
}

impl LiquidityMath for TriCryptoPool {
    /// LP tokens for a deposit or withdrawal, from the `D` change.
    ///
    /// # Errors
    ///
    /// As the two-coin pool: shape errors, exhausted balances, and
    /// solver failures propagate.
    fn calc_token_amount(&self, amounts: &[U256], deposit: bool) -> Result<U256> {
        if amounts.len() != 3 {
            return Err(AmmError::InvalidConfiguration(
                "amounts length must match balances",
            ));
        }

        let d0 = cryptoswap::calc_d(
            self.shape.a,
            self.shape.gamma,
            &self.xp_of(&self.balances)?,
        )?;

        let mut new_balances = self.balances;
        for (balance, &amount) in new_balances.iter_mut().zip(amounts) {
            *balance = if deposit {
                balance
                    .checked_add(amount)
                    .ok_or(AmmError::Overflow("deposit balance"))?
            } else {
                balance
                    .checked_sub(amount)
                    .ok_or(AmmError::InsufficientLiquidity)?
            };
        }
        let d1 = cryptoswap::calc_d(
            self.shape.a,
            self.shape.gamma,
            &self.xp_of(&new_balances)?,
        )?;

        if self.total_supply.is_zero() {
            return Ok(d1);
        }
        if d0.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }
        let diff = if deposit {
            d1.saturating_sub(d0)
        } else {
            d0.saturating_sub(d1)
        };
        narrow(widen(self.total_supply) * widen(diff) / widen(d0))
    }

    /// Single-sided withdrawal through a proportional `D` reduction.
    ///
    /// # Errors
    ///
    /// As the two-coin pool.
    fn calc_withdraw_one_coin(&self, lp: U256, i: usize) -> Result<U256> {
        if i >= 3 {
            return Err(AmmError::InvalidIndex("coin index out of range"));
        }
        if lp.is_zero() {
            return Ok(U256::zero());
        }
        if self.total_supply.is_zero() {
            return Err(AmmError::ZeroSupply);
        }
        if lp > self.total_supply {
            return Err(AmmError::InsufficientLiquidity);
        }
        if lp == self.total_supply {
            return Ok(self.balances[i]);
        }
        if self.shape.d.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }

        let xp = self.xp_of(&self.balances)?;
        let d1 = narrow(
            widen(self.shape.d) * (widen(self.total_supply) - widen(lp))
                / widen(self.total_supply),
        )?;
        let y = newton_y3(self.shape.a, self.shape.gamma, &xp, d1, i)?;
        let dy_xp = xp[i].saturating_sub(y);

        let mut xp_after = xp;
        xp_after[i] = y;
        let fee_rate = cryptoswap::dynamic_fee(
            &xp_after,
            self.fees.fee_gamma,
            self.fees.mid_fee,
            self.fees.out_fee,
        )?;
        let fee_xp = narrow(widen(dy_xp) * widen(fee_rate) / widen(FEE_DENOMINATOR))?;
        self.unscale(dy_xp - fee_xp, i)
    }

    /// Proportional multi-coin withdrawal.
    ///
    /// # Errors
    ///
    /// As the two-coin pool.
    fn calc_remove_liquidity(&self, lp: U256) -> Result<Vec<U256>> {
        if self.total_supply.is_zero() {
            return Err(AmmError::ZeroSupply);
        }
        if lp > self.total_supply {
            return Err(AmmError::InsufficientLiquidity);
        }
        self.balances
            .iter()
            .map(|&b| narrow(widen(b) * widen(lp) / widen(self.total_supply)))
            .collect()
    }

    /// `D · 10^18 / total_supply` from the pool-supplied `D`; exactly
    /// `10^18` for a supply-less snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] only for corrupted snapshots.
    fn get_virtual_price(&self) -> Result<U256> {
        if self.total_supply.is_zero() {
            return Ok(PRECISION);
        }
        narrow(widen(self.shape.d) * widen(PRECISION) / widen(self.total_supply))
    }
}
