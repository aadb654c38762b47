//! Newtype value objects shared by every pool family.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Decimals`] | validated token decimal count and its scale factors |
//! | [`BasisPoints`] | percentage in 1/10 000 units |
//! | [`SwapQuote`] | aggregated output of `quote_swap` |

mod basis_points;
mod decimals;
mod quote;

pub use basis_points::BasisPoints;
pub use decimals::Decimals;
pub use quote::SwapQuote;
