//! StableSwap pool math (Curve style, 2–8 coins).
//!
//! Reproduces the on-chain StableSwap contracts off-chain: swap outputs,
//! swap inputs, liquidity amounts, and prices from a reserve snapshot.
//!
//! # Invariant
//!
//! ```text
//! A · n^n · Σxᵢ + D = A · D · n^n + D^(n+1) / (n^n · Πxᵢ)
//! ```
//!
//! where:
//! - `A` — amplification coefficient (constant-sum weight).
//! - `D` — the invariant (≈ total normalized reserves at peg).
//! - `xᵢ` — normalized balances (`xp`), every coin in 18-decimal units.
//!
//! # Division Order
//!
//! Each Newton step chains several integer divisions. The order below is
//! copied from the reference contracts and must not be re-associated:
//! `(a·b)/c` and `a·(b/c)` round differently, and a single reordering
//! loses last-unit parity with on-chain results.
//!
//! # Swap Pipeline (`get_dy`)
//!
//! 1. Normalize balances: `xp[k] = rates[k] · balances[k] / 10^18`.
//! 2. Solve `D` for the current `xp`.
//! 3. Substitute `x = xp[i] + dx · rates[i] / 10^18`, solve for `y`.
//! 4. `dy_raw = xp[j] − y − 1` (deliberate round-down).
//! 5. Charge the dynamic fee on the mid-swap balance average.
//! 6. Unscale to the output token's native decimals.

use primitive_types::{U256, U512};

use crate::domain::{Decimals, SwapQuote};
use crate::error::{AmmError, Result};
use crate::math::constants::{
    A_PRECISION, DERIVATIVE_EPSILON, FEE_DENOMINATOR, MAX_BISECTION_ROUNDS, MAX_COINS,
    MAX_NEWTON_ITERATIONS, MIN_COINS, PRECISION, SEARCH_EXPANSIONS,
};
use crate::math::wide::{abs_diff, narrow, widen};
use crate::traits::{LiquidityMath, QuotePool};

// ---------------------------------------------------------------------------
// Kernel primitives
// ---------------------------------------------------------------------------

/// Solves the StableSwap invariant for `D` via Newton-Raphson.
///
/// `xp` holds normalized balances; `amp` is the amplification scaled by
/// `A_PRECISION` (i.e. `A · 100`). The per-iteration division order is
/// load-bearing; see the module docs.
///
/// # Errors
///
/// - [`AmmError::InvalidConfiguration`] if the coin count is outside 2..=8.
/// - [`AmmError::InvalidAmplification`] if `amp` is zero or below `A_PRECISION`.
/// - [`AmmError::ZeroBalance`] if some (but not all) balances are zero.
/// - [`AmmError::NonConvergence`] after 255 iterations without a ±1 fix.
pub fn get_d(xp: &[U256], amp: U256) -> Result<U256> {
    if xp.len() < MIN_COINS || xp.len() > MAX_COINS {
        return Err(AmmError::InvalidConfiguration("pool must hold 2..=8 coins"));
    }
    if amp.is_zero() {
        return Err(AmmError::InvalidAmplification("amp must be positive"));
    }

    let n = U512::from(xp.len());
    let xs: Vec<U512> = xp.iter().map(|&x| widen(x)).collect();
    let s = xs.iter().fold(U512::zero(), |acc, &x| acc + x);
    if s.is_zero() {
        return Ok(U256::zero());
    }
    if xs.iter().any(U512::is_zero) {
        return Err(AmmError::ZeroBalance);
    }

    let a_precision = widen(A_PRECISION);
    let ann = widen(amp)
        .checked_mul(n)
        .ok_or(AmmError::Overflow("getD: Ann"))?;
    if ann < a_precision {
        return Err(AmmError::InvalidAmplification("amp below A_PRECISION"));
    }
    let nn = n.pow(n);
    let one = U512::one();

    let mut d = s;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        // D_P = D^(n+1) / (n^n · Πxᵢ), accumulated one coin at a time so
        // the magnitude never exceeds D · n^n.
        let mut d_p = d;
        for &x in &xs {
            d_p = d_p
                .checked_mul(d)
                .ok_or(AmmError::Overflow("getD: D_P product"))?
                / x;
        }
        d_p = d_p / nn;

        let d_prev = d;

        let numerator = (ann
            .checked_mul(s)
            .ok_or(AmmError::Overflow("getD: Ann·S"))?
            / a_precision
            + d_p
                .checked_mul(n)
                .ok_or(AmmError::Overflow("getD: D_P·n"))?)
        .checked_mul(d)
        .ok_or(AmmError::Overflow("getD: numerator"))?;

        let denominator = (ann - a_precision)
            .checked_mul(d)
            .ok_or(AmmError::Overflow("getD: denominator"))?
            / a_precision
            + (n + one)
                .checked_mul(d_p)
                .ok_or(AmmError::Overflow("getD: (n+1)·D_P"))?;
        if denominator.is_zero() {
            return Err(AmmError::NonConvergence("getD denominator collapsed"));
        }

        d = numerator / denominator;

        if abs_diff(d, d_prev) <= one {
            return narrow(d);
        }
    }

    Err(AmmError::NonConvergence("getD exceeded 255 iterations"))
}

/// Solves the invariant for the output balance `y = x_j` after coin `i`
/// moves to `new_x`, holding `D` fixed.
///
/// Iterates `y ← (y² + c) / (2y + b − D)` from the initial guess `D`.
///
/// # Errors
///
/// - [`AmmError::InvalidIndex`] if `i == j` or either index is out of range.
/// - [`AmmError::InvalidAmplification`] / [`AmmError::ZeroBalance`] /
///   [`AmmError::InvalidConfiguration`] as in [`get_d`].
/// - [`AmmError::BadDenominator`] if `2y + b − D` becomes non-positive.
/// - [`AmmError::NonConvergence`] after 255 iterations.
pub fn get_y(i: usize, j: usize, new_x: U256, xp: &[U256], amp: U256, d: U256) -> Result<U256> {
    let n_coins = xp.len();
    if n_coins < MIN_COINS || n_coins > MAX_COINS {
        return Err(AmmError::InvalidConfiguration("pool must hold 2..=8 coins"));
    }
    if i == j {
        return Err(AmmError::InvalidIndex("input and output coin coincide"));
    }
    if i >= n_coins || j >= n_coins {
        return Err(AmmError::InvalidIndex("coin index out of range"));
    }

    solve_y(xp, amp, d, j, |k| if k == i { new_x } else { xp[k] })
}

/// Solves the invariant for `y_i` against a *new* `D` with the existing
/// other balances — the add/remove-liquidity form of [`get_y`].
///
/// # Errors
///
/// As [`get_y`], minus the `i == j` case.
pub fn get_y_d(i: usize, xp: &[U256], amp: U256, d: U256) -> Result<U256> {
    let n_coins = xp.len();
    if n_coins < MIN_COINS || n_coins > MAX_COINS {
        return Err(AmmError::InvalidConfiguration("pool must hold 2..=8 coins"));
    }
    if i >= n_coins {
        return Err(AmmError::InvalidIndex("coin index out of range"));
    }

    solve_y(xp, amp, d, i, |k| xp[k])
}

/// Shared `y` iteration behind [`get_y`] and [`get_y_d`]: solves for the
/// balance at `solve_index`, reading every other balance through `x_at`.
fn solve_y(
    xp: &[U256],
    amp: U256,
    d: U256,
    solve_index: usize,
    x_at: impl Fn(usize) -> U256,
) -> Result<U256> {
    if amp.is_zero() {
        return Err(AmmError::InvalidAmplification("amp must be positive"));
    }

    let n = U512::from(xp.len());
    let a_precision = widen(A_PRECISION);
    let ann = widen(amp)
        .checked_mul(n)
        .ok_or(AmmError::Overflow("getY: Ann"))?;
    if ann < a_precision {
        return Err(AmmError::InvalidAmplification("amp below A_PRECISION"));
    }

    let d_w = widen(d);
    let one = U512::one();
    let two = U512::from(2u64);

    // c = D^(n+1) · A_PRECISION / (n^n · Ann · n · Πx'_k), built up one
    // division per coin; b = S' + D · A_PRECISION / Ann.
    let mut c = d_w;
    let mut s = U512::zero();
    for k in 0..xp.len() {
        if k == solve_index {
            continue;
        }
        let xk = widen(x_at(k));
        if xk.is_zero() {
            return Err(AmmError::ZeroBalance);
        }
        s += xk;
        c = c
            .checked_mul(d_w)
            .ok_or(AmmError::Overflow("getY: c product"))?
            / (xk
                .checked_mul(n)
                .ok_or(AmmError::Overflow("getY: x·n"))?);
    }
    c = c
        .checked_mul(d_w)
        .ok_or(AmmError::Overflow("getY: c·D"))?
        .checked_mul(a_precision)
        .ok_or(AmmError::Overflow("getY: c·A_PRECISION"))?
        / (ann
            .checked_mul(n)
            .ok_or(AmmError::Overflow("getY: Ann·n"))?);
    let b = s + d_w * a_precision / ann;

    let mut y = d_w;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        let y_prev = y;

        let numerator = y
            .checked_mul(y)
            .ok_or(AmmError::Overflow("getY: y²"))?
            + c;
        let denom_base = y
            .checked_mul(two)
            .ok_or(AmmError::Overflow("getY: 2y"))?
            + b;
        if denom_base <= d_w {
            return Err(AmmError::BadDenominator);
        }
        y = numerator / (denom_base - d_w);

        if abs_diff(y, y_prev) <= one {
            return narrow(y);
        }
    }

    Err(AmmError::NonConvergence("getY exceeded 255 iterations"))
}

/// Computes the off-peg fee for a coin pair.
///
/// With dynamic scaling disabled (`multiplier <= FEE_DENOMINATOR`) this
/// is `base_fee` verbatim. Otherwise the fee is `base_fee` for a
/// balanced pair and rises towards `multiplier · base_fee /
/// FEE_DENOMINATOR` as the pair skews:
///
/// ```text
/// fee = multiplier · base_fee
///       / ((multiplier − FEE_DENOMINATOR) · 4·xᵢ·xⱼ / (xᵢ+xⱼ)² + FEE_DENOMINATOR)
/// ```
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] only for snapshot-corrupting inputs.
pub fn dynamic_fee(xpi: U256, xpj: U256, base_fee: U256, multiplier: U256) -> Result<U256> {
    if multiplier <= FEE_DENOMINATOR {
        return Ok(base_fee);
    }
    let s = widen(xpi) + widen(xpj);
    if s.is_zero() {
        return Ok(base_fee);
    }

    let fee_den = widen(FEE_DENOMINATOR);
    let xps2 = s
        .checked_mul(s)
        .ok_or(AmmError::Overflow("dynamicFee: S²"))?;
    let skew = (widen(multiplier) - fee_den)
        .checked_mul(U512::from(4u64))
        .ok_or(AmmError::Overflow("dynamicFee: 4·(mult−1)"))?
        .checked_mul(widen(xpi))
        .ok_or(AmmError::Overflow("dynamicFee: ·xᵢ"))?
        .checked_mul(widen(xpj))
        .ok_or(AmmError::Overflow("dynamicFee: ·xⱼ"))?
        / xps2;
    let numerator = widen(multiplier)
        .checked_mul(widen(base_fee))
        .ok_or(AmmError::Overflow("dynamicFee: numerator"))?;

    narrow(numerator / (skew + fee_den))
}

// ---------------------------------------------------------------------------
// StablePool
// ---------------------------------------------------------------------------

/// How the snapshot's per-coin multipliers were specified.
///
/// Both modes produce identical `xp` vectors; they differ only in the
/// last-unit rounding of the withdraw-one-coin path, reproducing the
/// respective reference code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateMode {
    /// Rates `10^(36 − decimals)`; matches the reference within ±1 unit.
    Exact,
    /// Precisions `10^(18 − decimals)`; matches within 10 bps.
    Normalized,
}

/// An immutable StableSwap pool snapshot.
///
/// Holds raw reserves in native token decimals plus the pool parameters
/// needed to reproduce on-chain quoting. Every operation is a pure
/// function of this struct; nothing is cached or mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StablePool {
    balances: Vec<U256>,
    rates: Vec<U256>,
    amp: U256,
    fee: U256,
    offpeg_fee_multiplier: U256,
    total_supply: U256,
    mode: RateMode,
}

impl StablePool {
    /// Creates an exact-mode snapshot from explicit per-coin rates
    /// (`rates[k] = 10^(36 − decimals[k])`).
    ///
    /// # Errors
    ///
    /// Propagates any error from [`validate`](Self::validate).
    pub fn from_rates(
        balances: Vec<U256>,
        rates: Vec<U256>,
        amp: U256,
        fee: U256,
        offpeg_fee_multiplier: U256,
        total_supply: U256,
    ) -> Result<Self> {
        let pool = Self {
            balances,
            rates,
            amp,
            fee,
            offpeg_fee_multiplier,
            total_supply,
            mode: RateMode::Exact,
        };
        pool.validate()?;
        Ok(pool)
    }

    /// Creates an exact-mode snapshot from token decimal counts.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidDecimals`] if any decimal count exceeds 36.
    /// - Propagates any error from [`validate`](Self::validate).
    pub fn from_decimals(
        balances: Vec<U256>,
        decimals: &[u8],
        amp: U256,
        fee: U256,
        offpeg_fee_multiplier: U256,
        total_supply: U256,
    ) -> Result<Self> {
        let rates = decimals
            .iter()
            .map(|&d| Decimals::new(d)?.rate())
            .collect::<Result<Vec<U256>>>()?;
        Self::from_rates(
            balances,
            rates,
            amp,
            fee,
            offpeg_fee_multiplier,
            total_supply,
        )
    }

    /// Creates a normalized-mode snapshot from per-coin precision
    /// multipliers (`precisions[k] = 10^(18 − decimals[k])`).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if a precision is zero or
    ///   too large to express as a rate.
    /// - Propagates any error from [`validate`](Self::validate).
    pub fn from_precisions(
        balances: Vec<U256>,
        precisions: &[U256],
        amp: U256,
        fee: U256,
        offpeg_fee_multiplier: U256,
        total_supply: U256,
    ) -> Result<Self> {
        let rates = precisions
            .iter()
            .map(|&p| {
                p.checked_mul(PRECISION)
                    .ok_or(AmmError::InvalidConfiguration("precision factor too large"))
            })
            .collect::<Result<Vec<U256>>>()?;
        let pool = Self {
            balances,
            rates,
            amp,
            fee,
            offpeg_fee_multiplier,
            total_supply,
            mode: RateMode::Normalized,
        };
        pool.validate()?;
        Ok(pool)
    }

    /// Validates all snapshot invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] on coin-count or length
    ///   mismatches, or a zero rate.
    /// - [`AmmError::InvalidAmplification`] if `amp` is zero.
    pub fn validate(&self) -> Result<()> {
        let n = self.balances.len();
        if !(MIN_COINS..=MAX_COINS).contains(&n) {
            return Err(AmmError::InvalidConfiguration("pool must hold 2..=8 coins"));
        }
        if self.rates.len() != n {
            return Err(AmmError::InvalidConfiguration(
                "rates length must match balances",
            ));
        }
        if self.rates.iter().any(U256::is_zero) {
            return Err(AmmError::InvalidConfiguration("rate factors must be positive"));
        }
        if self.amp.is_zero() {
            return Err(AmmError::InvalidAmplification(
                "amplification must be positive",
            ));
        }
        Ok(())
    }

    /// Returns the raw reserves in native token decimals.
    #[must_use]
    pub fn balances(&self) -> &[U256] {
        &self.balances
    }

    /// Returns the per-coin rate multipliers.
    #[must_use]
    pub fn rates(&self) -> &[U256] {
        &self.rates
    }

    /// Returns the raw amplification coefficient `A`.
    #[must_use]
    pub const fn amp(&self) -> U256 {
        self.amp
    }

    /// Returns the base swap fee in `FEE_DENOMINATOR` units.
    #[must_use]
    pub const fn fee(&self) -> U256 {
        self.fee
    }

    /// Returns the off-peg fee multiplier in `FEE_DENOMINATOR` units.
    #[must_use]
    pub const fn offpeg_fee_multiplier(&self) -> U256 {
        self.offpeg_fee_multiplier
    }

    /// Returns the LP-token supply used by liquidity operations.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Returns the rate representation mode of this snapshot.
    #[must_use]
    pub const fn mode(&self) -> RateMode {
        self.mode
    }

    /// Normalizes raw balances into 18-decimal `xp` units.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if a normalized balance exceeds
    /// 256 bits.
    pub fn xp(&self) -> Result<Vec<U256>> {
        self.balances
            .iter()
            .zip(&self.rates)
            .map(|(&b, &r)| narrow(widen(b) * widen(r) / widen(PRECISION)))
            .collect()
    }

    /// Amplification scaled by `A_PRECISION`, as consumed by the kernel.
    fn amp_precise(&self) -> Result<U256> {
        self.amp
            .checked_mul(A_PRECISION)
            .ok_or(AmmError::Overflow("amp·A_PRECISION"))
    }

    /// Returns `true` for an index pair no swap helper should price.
    fn invalid_pair(&self, i: usize, j: usize) -> bool {
        i == j || i >= self.balances.len() || j >= self.balances.len()
    }

    /// Full swap-output pipeline, returning `(net_dy, fee)` in raw
    /// output-token units. The step order matches the reference exactly;
    /// see the module docs.
    fn get_dy_with_fee(&self, i: usize, j: usize, dx: U256) -> Result<(U256, U256)> {
        if self.invalid_pair(i, j) || dx.is_zero() {
            return Ok((U256::zero(), U256::zero()));
        }

        let xp = self.xp()?;
        let amp = self.amp_precise()?;
        let d = get_d(&xp, amp)?;
        if d.is_zero() {
            return Ok((U256::zero(), U256::zero()));
        }

        let x = narrow(widen(xp[i]) + widen(dx) * widen(self.rates[i]) / widen(PRECISION))?;
        let y = get_y(i, j, x, &xp, amp, d)?;

        if widen(xp[j]) <= widen(y) + U512::one() {
            return Ok((U256::zero(), U256::zero()));
        }
        let dy_raw = xp[j] - y - U256::one();

        let fee_rate = dynamic_fee(
            narrow((widen(xp[i]) + widen(x)) / U512::from(2u64))?,
            narrow((widen(xp[j]) + widen(y)) / U512::from(2u64))?,
            self.fee,
            self.offpeg_fee_multiplier,
        )?;
        let fee_xp = narrow(widen(dy_raw) * widen(fee_rate) / widen(FEE_DENOMINATOR))?;

        let rate_j = widen(self.rates[j]);
        let dy = narrow(widen(dy_raw - fee_xp) * widen(PRECISION) / rate_j)?;
        let fee_out = narrow(widen(fee_xp) * widen(PRECISION) / rate_j)?;
        Ok((dy, fee_out))
    }
}

impl QuotePool for StablePool {
    fn n_coins(&self) -> usize {
        self.balances.len()
    }

    /// Computes the swap output for `dx` of coin `i` into coin `j`.
    ///
    /// Returns 0 for `i == j`, out-of-range indices, zero input, or an
    /// empty pool.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors ([`AmmError::NonConvergence`],
    /// [`AmmError::BadDenominator`], [`AmmError::ZeroBalance`], …).
    fn get_dy(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        self.get_dy_with_fee(i, j, dx).map(|(dy, _)| dy)
    }

    /// Computes the input needed to receive at least `dy` of coin `j`,
    /// by binary search over [`get_dy`](Self::get_dy).
    ///
    /// The upper bound starts at `10 · max(balances)` and doubles up to
    /// ten times; an unreachable target yields 0. The returned `dx` is
    /// the search interval's upper endpoint, so the caller always
    /// receives at least `dy`.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors from the forward quotes.
    fn get_dx(&self, i: usize, j: usize, dy: U256) -> Result<U256> {
        if self.invalid_pair(i, j) || dy.is_zero() {
            return Ok(U256::zero());
        }

        let max_balance = self
            .balances
            .iter()
            .copied()
            .max()
            .unwrap_or_else(U256::zero);
        let mut hi = max_balance
            .checked_mul(U256::from(10u64))
            .unwrap_or(U256::MAX);
        if hi.is_zero() {
            return Ok(U256::zero());
        }

        let mut expansions = 0;
        while self.get_dy(i, j, hi).unwrap_or_else(|_| U256::zero()) < dy {
            if expansions == SEARCH_EXPANSIONS {
                return Ok(U256::zero());
            }
            hi = hi.checked_mul(U256::from(2u64)).unwrap_or(U256::MAX);
            expansions += 1;
        }

        let mut lo = U256::zero();
        for _ in 0..MAX_BISECTION_ROUNDS {
            if hi - lo <= U256::one() {
                break;
            }
            let mid = lo + (hi - lo) / U256::from(2u64);
            let out = self.get_dy(i, j, mid).unwrap_or_else(|_| U256::zero());
            if out >= dy {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(hi)
    }

    /// Marginal price of coin `j` in units of coin `i`, probed with a
    /// precision-adjusted epsilon input.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors from the probe quote.
    fn get_spot_price(&self, i: usize, j: usize) -> Result<U256> {
        if self.invalid_pair(i, j) {
            return Ok(U256::zero());
        }
        // dx = max(1, DERIVATIVE_EPSILON / precisionᵢ), with the
        // precision expressed through the rate to stay exact for
        // >18-decimal tokens.
        let dx = narrow(widen(DERIVATIVE_EPSILON) * widen(PRECISION) / widen(self.rates[i]))?
            .max(U256::one());
        let dy = self.get_dy(i, j, dx)?;
        narrow(widen(dy) * widen(PRECISION) / widen(dx))
    }

    /// Realized price `dy · 10^18 / dx` for the actual trade size.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors from the forward quote.
    fn get_effective_price(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        if self.invalid_pair(i, j) || dx.is_zero() {
            return Ok(U256::zero());
        }
        let dy = self.get_dy(i, j, dx)?;
        narrow(widen(dy) * widen(PRECISION) / widen(dx))
    }

    /// Price impact of the trade in basis points, clamped at zero.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors from the underlying quotes.
    fn get_price_impact(&self, i: usize, j: usize, dx: U256) -> Result<U256> {
        let spot = self.get_spot_price(i, j)?;
        let effective = self.get_effective_price(i, j, dx)?;
        Ok(crate::analytics::price_impact_bps(spot, effective))
    }

    /// Gathers output, fee, prices, and impact in a single pass.
    ///
    /// # Errors
    ///
    /// Propagates kernel errors from the underlying quotes.
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

impl LiquidityMath for StablePool {
    /// LP tokens minted (or burned) for a balance change of `amounts`.
    ///
    /// Computes `D` before and after the change; the first deposit mints
    /// `D₁` outright.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] on a length mismatch.
    /// - [`AmmError::InsufficientLiquidity`] if a withdrawal exceeds a
    ///   balance, or the pool has supply but no liquidity.
    /// - Kernel errors from the two `D` solves.
    fn calc_token_amount(&self, amounts: &[U256], deposit: bool) -> Result<U256> {
        if amounts.len() != self.balances.len() {
            return Err(AmmError::InvalidConfiguration(
                "amounts length must match balances",
            ));
        }

        let amp = self.amp_precise()?;
        let d0 = get_d(&self.xp()?, amp)?;

        let new_balances = self
            .balances
            .iter()
            .zip(amounts)
            .map(|(&b, &a)| {
                if deposit {
                    b.checked_add(a).ok_or(AmmError::Overflow("deposit balance"))
                } else {
                    b.checked_sub(a).ok_or(AmmError::InsufficientLiquidity)
                }
            })
            .collect::<Result<Vec<U256>>>()?;
        let xp1 = new_balances
            .iter()
            .zip(&self.rates)
            .map(|(&b, &r)| narrow(widen(b) * widen(r) / widen(PRECISION)))
            .collect::<Result<Vec<U256>>>()?;
        let d1 = get_d(&xp1, amp)?;

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

    /// Amount of coin `i` received for burning `lp` tokens single-sided.
    ///
    /// Burning the entire supply short-circuits to the full balance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidIndex`] for an out-of-range coin.
    /// - [`AmmError::ZeroSupply`] if the pool has no LP supply.
    /// - [`AmmError::InsufficientLiquidity`] if `lp` exceeds the supply.
    /// - Kernel errors from the `D` and `y` solves.
    fn calc_withdraw_one_coin(&self, lp: U256, i: usize) -> Result<U256> {
        if i >= self.balances.len() {
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

        let xp = self.xp()?;
        let amp = self.amp_precise()?;
        let d0 = get_d(&xp, amp)?;
        let d1 = narrow(
            widen(d0) * (widen(self.total_supply) - widen(lp)) / widen(self.total_supply),
        )?;
        let y = get_y_d(i, &xp, amp, d1)?;

        // Exact mode keeps the reference's deliberate extra-unit
        // round-down; normalized mode does not. Both clamp at zero.
        let dy_xp = match self.mode {
            RateMode::Exact => {
                if xp[i] > y {
                    xp[i] - y - U256::one()
                } else {
                    U256::zero()
                }
            }
            RateMode::Normalized => xp[i].saturating_sub(y),
        };

        let fee_amt = narrow(widen(dy_xp) * widen(self.fee) / widen(FEE_DENOMINATOR))?;
        narrow(widen(dy_xp - fee_amt) * widen(PRECISION) / widen(self.rates[i]))
    }

    /// Proportional multi-coin withdrawal: `balances[k] · lp / supply`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroSupply`] if the pool has no LP supply.
    /// - [`AmmError::InsufficientLiquidity`] if `lp` exceeds the supply.
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

    /// LP-token price floor `D · 10^18 / total_supply`; exactly
    /// `PRECISION` for an empty pool.
    ///
    /// # Errors
    ///
    /// Kernel errors from the `D` solve.
    fn get_virtual_price(&self) -> Result<U256> {
        if self.total_supply.is_zero() {
            return Ok(PRECISION);
        }
        let d = get_d(&self.xp()?, self.amp_precise()?)?;
        narrow(widen(d) * widen(PRECISION) / widen(self.total_supply))
    }
}
