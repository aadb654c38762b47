//! Aggregated swap quote.

use core::fmt;

use primitive_types::U256;

/// Everything a router needs to know about one prospective swap,
/// gathered in a single pass.
///
/// Produced by `quote_swap` on every pool family. Prices are 18-decimal
/// fixed-point ratios of raw output units to raw input units; the fee
/// is denominated in output-token units; price impact is in basis
/// points, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapQuote {
    amount_out: U256,
    fee: U256,
    price_impact_bps: U256,
    effective_price: U256,
    spot_price: U256,
}

impl SwapQuote {
    /// Creates a new quote.
    pub const fn new(
        amount_out: U256,
        fee: U256,
        price_impact_bps: U256,
        effective_price: U256,
        spot_price: U256,
    ) -> Self {
        Self {
            amount_out,
            fee,
            price_impact_bps,
            effective_price,
            spot_price,
        }
    }

    /// Returns the net output amount in raw output-token units.
    #[must_use]
    pub const fn amount_out(&self) -> U256 {
        self.amount_out
    }

    /// Returns the fee charged, in raw output-token units.
    #[must_use]
    pub const fn fee(&self) -> U256 {
        self.fee
    }

    /// Returns the price impact in basis points (0 when the effective
    /// price beats spot).
    #[must_use]
    pub const fn price_impact_bps(&self) -> U256 {
        self.price_impact_bps
    }

    /// Returns the realized price `dy * 10^18 / dx`.
    #[must_use]
    pub const fn effective_price(&self) -> U256 {
        self.effective_price
    }

    /// Returns the marginal price for an infinitesimal trade.
    #[must_use]
    pub const fn spot_price(&self) -> U256 {
        self.spot_price
    }
}

impl fmt::Display for SwapQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapQuote(out={}, fee={}, impact={}bp)",
            self.amount_out, self.fee, self.price_impact_bps
        )
    }
}
