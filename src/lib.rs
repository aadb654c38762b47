//! # Curve AMM Math
//!
//! Off-chain, gas-free reimplementation of the Curve AMM math: given a
//! snapshot of a pool's on-chain state, compute swap outputs and
//! inputs, liquidity amounts, prices, price impact, and dynamic fees —
//! with exact wide-integer arithmetic that reproduces on-chain results
//! within a small, quantified tolerance.
//!
//! Three pool families are supported, each behind a feature flag:
//!
//! - **StableSwap** (2–8 pegged coins) — `stable` feature
//! - **CryptoSwap two-coin** (volatile pairs) — `twocrypto` feature
//! - **CryptoSwap three-coin** (tricrypto) — `tricrypto` feature
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `all-pools` | yes | Enables all three families |
//! | `stable` | via `all-pools` | StableSwap pools and metapools |
//! | `twocrypto` | via `all-pools` | Two-coin CryptoSwap pools |
//! | `tricrypto` | via `all-pools` | Three-coin CryptoSwap pools |
//!
//! # Quick Start
//!
//! ```rust
//! use curve_amm_math::pools::StablePool;
//! use curve_amm_math::traits::QuotePool;
//! use primitive_types::U256;
//!
//! // 1. Snapshot a DAI/USDC pool: 1M of each side, A = 100, 0.04% fee.
//! let e18 = U256::from(10u64).pow(U256::from(18u64));
//! let e6 = U256::from(1_000_000u64);
//! let pool = StablePool::from_decimals(
//!     vec![U256::from(1_000_000u64) * e18, U256::from(1_000_000u64) * e6],
//!     &[18, 6],
//!     U256::from(100u64),
//!     U256::from(4_000_000u64),
//!     U256::zero(),
//!     U256::zero(),
//! )
//! .expect("valid snapshot");
//!
//! // 2. Quote 1000 DAI -> USDC.
//! let dx = U256::from(1_000u64) * e18;
//! let quote = pool.quote_swap(0, 1, dx).expect("quote succeeded");
//!
//! assert!(quote.amount_out() > U256::from(990u64) * e6);
//! assert!(quote.amount_out() < U256::from(1_000u64) * e6);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Consumer    │  builds validated snapshots (or fetches them
//! └──────┬───────┘   through a SnapshotSource implementation)
//!        │ StablePool / TwoCryptoPool / TriCryptoPool / AnyPool
//!        ▼
//! ┌──────────────┐
//! │  Operations   │  QuotePool + LiquidityMath trait impls per family
//! └──────┬───────┘
//!        │ get_d / get_y / newton_y / newton_y3 / dynamic fees
//!        ▼
//! ┌──────────────┐
//! │   Kernels     │  Newton solvers, exact division order
//! └──────┬───────┘
//!        │ U256 stored, U512 intermediates
//!        ▼
//! ┌──────────────┐
//! │    math       │  constants, widen/narrow, pow10
//! └──────────────┘
//! ```
//!
//! # Numeric Contract
//!
//! Everything is unsigned integer arithmetic; division truncates toward
//! zero, and the reference contracts' division *order* is preserved
//! step for step. Exact-mode StableSwap matches the reference within
//! ±1 output unit; CryptoSwap and normalized-mode StableSwap within
//! 10 bps. There is no floating point anywhere.
//!
//! Every call is a pure function of its snapshot: no globals, no
//! caches, no I/O. Calls are re-entrant and freely concurrent.
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`pools`] | pool snapshots, kernels, [`AnyPool`](pools::AnyPool) dispatch |
//! | [`traits`] | [`QuotePool`](traits::QuotePool), [`LiquidityMath`](traits::LiquidityMath), [`SnapshotSource`](traits::SnapshotSource) |
//! | [`analytics`] | ramp interpolation, slippage bounds, price impact |
//! | [`domain`] | [`Decimals`](domain::Decimals), [`BasisPoints`](domain::BasisPoints), [`SwapQuote`](domain::SwapQuote) |
//! | [`math`] | constants and wide-integer helpers |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | convenience re-exports |

pub mod analytics;
pub mod domain;
pub mod error;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
