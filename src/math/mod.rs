//! Wide-integer arithmetic and fixed-point constants.
//!
//! Stored snapshot fields are `U256`; kernels compute in `U512` so that
//! every chained product in the Newton solvers stays exact. There is no
//! floating point anywhere in the crate.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`constants`] | `PRECISION`, fee denominators, solver limits |
//! | [`wide`] | `widen`/`narrow` conversions, `pow10`, `mul_div` |

pub mod constants;
pub mod wide;

pub use constants::{
    A_MULTIPLIER, A_PRECISION, BPS_DENOMINATOR, CONVERGENCE_THRESHOLD, DERIVATIVE_EPSILON,
    FEE_DENOMINATOR, MAX_BISECTION_ROUNDS, MAX_COINS, MAX_NEWTON_ITERATIONS, MIN_COINS,
    MIN_CONVERGENCE, PRECISION, SEARCH_EXPANSIONS,
};
pub use wide::{abs_diff, mul_div, narrow, pow10, widen};
