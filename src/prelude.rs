//! Convenience re-exports for common types and traits.
//!
//! A single import brings the whole quoting surface into scope:
//!
//! ```rust
//! use curve_amm_math::prelude::*;
//! ```

// Re-export domain types
pub use crate::domain::{BasisPoints, Decimals, SwapQuote};

// Re-export core traits
pub use crate::traits::{LiquidityMath, QuotePool, SnapshotSource};

// Re-export analytics helpers
pub use crate::analytics::price_impact_bps;
pub use crate::analytics::ramp::a_gamma_at_time;
pub use crate::analytics::slippage::{max_amount_in, min_amount_out};

// Re-export error types
pub use crate::error::{AmmError, Result};

// Re-export pool snapshots and dispatch
pub use crate::pools::AnyPool;

#[cfg(feature = "stable")]
pub use crate::pools::{MetaPool, RateMode, StablePool};

#[cfg(any(feature = "twocrypto", feature = "tricrypto"))]
pub use crate::pools::{CryptoFees, CryptoShape};

#[cfg(feature = "tricrypto")]
pub use crate::pools::TriCryptoPool;
#[cfg(feature = "twocrypto")]
pub use crate::pools::TwoCryptoPool;

// Re-export the fixed-point constants callers quote against
pub use crate::math::{A_MULTIPLIER, A_PRECISION, BPS_DENOMINATOR, FEE_DENOMINATOR, PRECISION};
