//! Core quoting trait implemented by every pool family.
//!
//! [`QuotePool`] is the read-only swap surface: given an immutable pool
//! snapshot, it prices exact-input swaps, inverts them, and derives
//! spot/effective prices and price impact.
//!
//! # Silent-zero Policy
//!
//! Every method returns `Ok(0)` (or a zeroed quote) for inputs that are
//! semantically invalid but cheap to detect — `i == j`, an index outside
//! `0..n`, or a zero amount. This lets callers compose quotes inside
//! search loops without branching on errors. Genuine failures (solver
//! non-convergence, corrupted snapshots) still surface as errors.
//!
//! # Dispatch Model
//!
//! Pools are dispatched via the `AnyPool` enum (not `dyn` trait
//! objects), enabling static polymorphism across families.

use primitive_types::U256;

use crate::domain::SwapQuote;
use crate::error::Result;

/// Read-only swap quoting over an immutable pool snapshot.
///
/// Every implementation is a pure function of the snapshot: no caches,
/// no interior mutability, safe to call concurrently from any thread.
///
/// # Implementors
///
/// - `StablePool` — StableSwap, 2–8 coins
/// - `TwoCryptoPool` — CryptoSwap, 2 coins
/// - `TriCryptoPool` — CryptoSwap, 3 coins
/// - `AnyPool` — enum dispatch over the above
pub trait QuotePool {
    /// Returns the number of coins in the pool.
    fn n_coins(&self) -> usize;

    /// Output of swapping `dx` of coin `i` into coin `j`, net of fees,
    /// in raw output-token units.
    ///
    /// # Errors
    ///
    /// Solver failures propagate; invalid indices and zero input
    /// return `Ok(0)`.
    fn get_dy(&self, i: usize, j: usize, dx: U256) -> Result<U256>;

    /// Input of coin `i` required to receive `dy` of coin `j`.
    ///
    /// # Errors
    ///
    /// Solver failures propagate; an unachievable target returns `Ok(0)`.
    fn get_dx(&self, i: usize, j: usize, dy: U256) -> Result<U256>;

    /// Marginal price of `j` per unit of `i`, as an 18-decimal ratio of
    /// raw units.
    ///
    /// # Errors
    ///
    /// Solver failures from the probe swap propagate.
    fn get_spot_price(&self, i: usize, j: usize) -> Result<U256>;

    /// Realized price `dy · 10^18 / dx` for an actual trade size.
    ///
    /// # Errors
    ///
    /// Solver failures from the forward quote propagate.
    fn get_effective_price(&self, i: usize, j: usize, dx: U256) -> Result<U256>;

    /// Price impact of the trade in basis points, clamped at zero for
    /// peg-crossing swaps whose effective price beats spot.
    ///
    /// # Errors
    ///
    /// Solver failures from the underlying quotes propagate.
    fn get_price_impact(&self, i: usize, j: usize, dx: U256) -> Result<U256>;

    /// Aggregates `{amount_out, fee, price_impact, effective_price,
    /// spot_price}` into one call.
    ///
    /// # Errors
    ///
    /// Solver failures from the underlying quotes propagate.
    fn quote_swap(&self, i: usize, j: usize, dx: U256) -> Result<SwapQuote>;
}
