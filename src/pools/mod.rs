//! Feature-gated pool families and the [`AnyPool`] dispatch enum.
//!
//! Each family is behind its own Cargo feature flag. [`AnyPool`]
//! provides zero-cost static dispatch across all enabled families,
//! allowing heterogeneous collections without `dyn` trait objects.
//!
//! # Pool Families
//!
//! | Feature | Snapshot | Style |
//! |---------|----------|-------|
//! | `stable` | [`StablePool`] | Curve StableSwap, 2–8 coins |
//! | `stable` | [`MetaPool`] | metapool composition over a base pool |
//! | `twocrypto` | [`TwoCryptoPool`] | Curve CryptoSwap, 2 coins |
//! | `tricrypto` | [`TriCryptoPool`] | Curve CryptoSwap, 3 coins |

#[cfg(any(feature = "twocrypto", feature = "tricrypto"))]
pub mod cryptoswap;
#[cfg(feature = "stable")]
pub mod metapool;
#[cfg(feature = "stable")]
pub mod stable;
#[cfg(feature = "tricrypto")]
pub mod tricrypto;
#[cfg(feature = "twocrypto")]
pub mod twocrypto;

mod any_pool;

#[cfg(test)]
mod proptest_properties;

pub use any_pool::AnyPool;
#[cfg(any(feature = "twocrypto", feature = "tricrypto"))]
pub use cryptoswap::{CryptoFees, CryptoShape};
#[cfg(feature = "stable")]
pub use metapool::MetaPool;
#[cfg(feature = "stable")]
pub use stable::{RateMode, StablePool};
#[cfg(feature = "tricrypto")]
pub use tricrypto::TriCryptoPool;
#[cfg(feature = "twocrypto")]
pub use twocrypto::TwoCryptoPool;
