//! Fixed-point denominators and solver limits.
//!
//! Every fee, price, and scale in the crate is an integer with one of
//! the implied denominators below. The values mirror the on-chain
//! reference contracts exactly; changing any of them breaks last-unit
//! parity.

use primitive_types::U256;

/// Base of the internal 18-decimal fixed-point representation (`10^18`).
pub const PRECISION: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Denominator of the StableSwap amplification coefficient (`100`).
pub const A_PRECISION: U256 = U256([100, 0, 0, 0]);

/// Denominator of the CryptoSwap amplification coefficient (`10^4`).
pub const A_MULTIPLIER: U256 = U256([10_000, 0, 0, 0]);

/// Denominator of every fee parameter (`10^10`).
pub const FEE_DENOMINATOR: U256 = U256([10_000_000_000, 0, 0, 0]);

/// One hundred percent in basis points (`10^4`).
pub const BPS_DENOMINATOR: U256 = U256([10_000, 0, 0, 0]);

/// Relative convergence scale of the CryptoSwap solvers (`10^14`).
///
/// An iterate is converged when `|delta| * CONVERGENCE_THRESHOLD` drops
/// below the magnitude being solved for.
pub const CONVERGENCE_THRESHOLD: U256 = U256([100_000_000_000_000, 0, 0, 0]);

/// Absolute floor of the CryptoSwap convergence limit, in raw units.
pub const MIN_CONVERGENCE: U256 = U256([100, 0, 0, 0]);

/// Spot-price probe size in 18-decimal units (`10^15`).
///
/// The first derivative is taken with `dx = max(1, DERIVATIVE_EPSILON /
/// precision_i)`: large enough that 1-unit output rounding stays below
/// one part in a thousand, small enough not to move the curve.
pub const DERIVATIVE_EPSILON: U256 = U256([1_000_000_000_000_000, 0, 0, 0]);

/// Maximum Newton-Raphson iterations before declaring non-convergence.
pub const MAX_NEWTON_ITERATIONS: u32 = 255;

/// Maximum rounds of an inverse-problem binary search.
pub const MAX_BISECTION_ROUNDS: u32 = 256;

/// Maximum doublings of a search upper bound before the target is
/// declared unachievable.
pub const SEARCH_EXPANSIONS: u32 = 10;

/// Smallest supported StableSwap pool.
pub const MIN_COINS: usize = 2;

/// Largest supported StableSwap pool.
pub const MAX_COINS: usize = 8;
