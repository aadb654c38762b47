//! Core abstractions: quoting, liquidity math, and the snapshot seam.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`QuotePool`] | exact-in/exact-out quoting, prices, impact |
//! | [`LiquidityMath`] | mint/withdraw amounts, virtual price |
//! | [`SnapshotSource`] | external snapshot fetcher (contract only) |

mod liquidity_math;
mod quote_pool;
mod snapshot_source;

pub use liquidity_math::LiquidityMath;
pub use quote_pool::QuotePool;
pub use snapshot_source::SnapshotSource;
