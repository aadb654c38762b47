//! Unified error types for the Curve AMM math library.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type. Kernel primitives (`get_d`, `get_y`, `newton_y`, …) are
//! strict and fail loudly on malformed input; top-level swap helpers
//! instead return 0 for cheap-to-detect invalid inputs (`i == j`, index
//! out of range, zero amount) so callers can compose them in search
//! loops without branching on errors.
//!
//! # Error Code Ranges
//!
//! | Range | Category | Description |
//! |-------|----------|-------------|
//! | 1000–1999 | Validation | Invalid parameters or snapshot fields |
//! | 2000–2999 | State | Pool-state violations (zero balances, supply) |
//! | 3000–3999 | Arithmetic | Width overflow on narrowing |
//! | 4000–4999 | Algorithm | Solver-level failures |
//!
//! In addition to the numeric code, every variant carries a short stable
//! identifier (see [`AmmError::identifier`]) intended for cross-language
//! comparison against reference implementations; the human-readable
//! message is advisory only.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

// ---------------------------------------------------------------------------
// AmmError
// ---------------------------------------------------------------------------

/// Unified error enum for the Curve AMM math library.
///
/// Every fallible operation in the crate returns `Result<T, AmmError>`.
/// Variants are grouped by numeric error-code ranges so that callers can
/// pattern-match on categories or inspect individual codes for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmmError {
    // ----- 1000–1999: Validation errors ------------------------------------
    /// A coin index is out of range or `i == j` in a kernel primitive (code 1000).
    #[error("invalid coin index: {0}")]
    InvalidIndex(&'static str),

    /// An amount is zero where a positive value is required (code 1001).
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// The amplification coefficient is zero (code 1002).
    #[error("invalid amplification: {0}")]
    InvalidAmplification(&'static str),

    /// The gamma parameter is zero (code 1003).
    #[error("invalid gamma: {0}")]
    InvalidGamma(&'static str),

    /// A ramp schedule has `future_time <= initial_time` (code 1004).
    #[error("invalid ramp schedule: {0}")]
    InvalidRamp(&'static str),

    /// A slippage tolerance is outside `0..=10_000` bps (code 1005).
    #[error("invalid slippage tolerance: {0}")]
    InvalidSlippage(&'static str),

    /// Token decimals are outside the supported range (code 1006).
    #[error("invalid decimals: {0}")]
    InvalidDecimals(&'static str),

    /// A pool snapshot is structurally invalid (code 1007).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    // ----- 2000–2999: State errors -----------------------------------------
    /// A balance is zero in an otherwise non-empty pool (code 2000).
    #[error("zero balance in non-empty pool")]
    ZeroBalance,

    /// A liquidity operation requires a non-zero LP supply (code 2001).
    #[error("zero LP supply")]
    ZeroSupply,

    /// Reserves or liquidity cannot satisfy the operation (code 2002).
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    // ----- 3000–3999: Arithmetic errors ------------------------------------
    /// A 512-bit intermediate does not fit back into 256 bits (code 3000).
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    // ----- 4000–4999: Algorithm errors -------------------------------------
    /// The StableSwap `y` iteration hit a non-positive denominator (code 4000).
    #[error("non-positive solver denominator")]
    BadDenominator,

    /// A Newton iteration or search exceeded its iteration cap (code 4001).
    #[error("solver did not converge: {0}")]
    NonConvergence(&'static str),
}

impl AmmError {
    /// Returns the numeric error code for this variant.
    ///
    /// Codes are organized into ranges:
    /// - 1000–1999 for validation errors
    /// - 2000–2999 for state errors
    /// - 3000–3999 for arithmetic errors
    /// - 4000–4999 for algorithm errors
    #[must_use]
    pub const fn error_code(&self) -> u16 {
        match self {
            // Validation (1000–1999)
            Self::InvalidIndex(_) => 1000,
            Self::InvalidAmount(_) => 1001,
            Self::InvalidAmplification(_) => 1002,
            Self::InvalidGamma(_) => 1003,
            Self::InvalidRamp(_) => 1004,
            Self::InvalidSlippage(_) => 1005,
            Self::InvalidDecimals(_) => 1006,
            Self::InvalidConfiguration(_) => 1007,

            // State (2000–2999)
            Self::ZeroBalance => 2000,
            Self::ZeroSupply => 2001,
            Self::InsufficientLiquidity => 2002,

            // Arithmetic (3000–3999)
            Self::Overflow(_) => 3000,

            // Algorithm (4000–4999)
            Self::BadDenominator => 4000,
            Self::NonConvergence(_) => 4001,
        }
    }

    /// Returns the short stable identifier for this failure kind.
    ///
    /// Identifiers are part of the external contract and never change;
    /// display messages are advisory only.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::InvalidIndex(_) => "INVALID_INDEX",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidAmplification(_) => "INVALID_A",
            Self::InvalidGamma(_) => "INVALID_GAMMA",
            Self::InvalidRamp(_) => "INVALID_RAMP",
            Self::InvalidSlippage(_) => "INVALID_SLIPPAGE",
            Self::InvalidDecimals(_) => "INVALID_DECIMALS",
            Self::InvalidConfiguration(_) => "INVALID_CONFIG",
            Self::ZeroBalance => "ZERO_BALANCE",
            Self::ZeroSupply => "SUPPLY_ZERO",
            Self::InsufficientLiquidity => "INSUFFICIENT_LIQUIDITY",
            Self::Overflow(_) => "OVERFLOW",
            Self::BadDenominator => "BAD_DENOM",
            Self::NonConvergence(_) => "NO_CONVERGE",
        }
    }

    /// Returns `true` if this is a validation error (1000–1999).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        self.error_code() >= 1000 && self.error_code() < 2000
    }

    /// Returns `true` if this is a state error (2000–2999).
    #[must_use]
    pub const fn is_state(&self) -> bool {
        self.error_code() >= 2000 && self.error_code() < 3000
    }

    /// Returns `true` if this is an arithmetic error (3000–3999).
    #[must_use]
    pub const fn is_arithmetic(&self) -> bool {
        self.error_code() >= 3000 && self.error_code() < 4000
    }

    /// Returns `true` if this is an algorithm error (4000–4999).
    #[must_use]
    pub const fn is_algorithm(&self) -> bool {
        self.error_code() >= 4000 && self.error_code() < 5000
    }
}
