pub mod aggregator;
pub mod equity;

pub use aggregator::{summarize, PortfolioSummary};
pub use equity::{EquityCurve, EquityPoint};

use crate::pricing::Greeks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// A position as entered by the user: symbol, direction, size and entry
/// price. Quantity is a magnitude; direction lives in `side`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RawPosition {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub avg_price: f64,
}

impl RawPosition {
    /// Quantity with the direction folded in: negative for shorts.
    #[inline]
    pub fn signed_quantity(&self) -> f64 {
        match self.side {
            Side::Long => self.quantity,
            Side::Short => -self.quantity,
        }
    }
}

/// A position marked against a current price, ready for display and
/// aggregation. Greeks are optional because not every instrument in a
/// book has a pricing model behind it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_price: f64,
    pub market_value: f64,
    pub unrealized_pnl: f64,
    pub unrealized_pnl_percent: f64,
    pub greeks: Option<Greeks>,
}

impl PortfolioPosition {
    pub fn from_raw(raw: &RawPosition, current_price: f64, greeks: Option<Greeks>) -> Self {
        let pnl = match raw.side {
            Side::Long => (current_price - raw.avg_price) * raw.quantity,
            Side::Short => (raw.avg_price - current_price) * raw.quantity,
        };
        let cost_basis = raw.avg_price * raw.quantity;
        let pnl_percent = if cost_basis.abs() > f64::EPSILON {
            pnl / cost_basis * 100.0
        } else {
            0.0
        };
        Self {
            symbol: raw.symbol.clone(),
            side: raw.side,
            quantity: raw.quantity,
            avg_price: raw.avg_price,
            current_price,
            market_value: current_price * raw.quantity,
            unrealized_pnl: pnl,
            unrealized_pnl_percent: pnl_percent,
            greeks,
        }
    }

    #[inline]
    pub fn signed_quantity(&self) -> f64 {
        match self.side {
            Side::Long => self.quantity,
            Side::Short => -self.quantity,
        }
    }
}

/// Where current marks come from. Implementations wrap whatever quote
/// cache or feed snapshot the caller has on hand.
pub trait PriceSource: Send + Sync {
    fn price(&self, symbol: &str) -> Option<f64>;
}

/// Mark a book of raw positions. A symbol with no quote, or a non-finite
/// one, falls back to its entry price, which shows the position at flat
/// P/L instead of dropping it from the view.
pub fn mark_positions(raws: &[RawPosition], prices: &dyn PriceSource) -> Vec<PortfolioPosition> {
    mark_positions_with(raws, prices, |_| None)
}

/// Marking with a per-position greeks lookup, for books where some legs
/// have a pricing model behind them.
pub fn mark_positions_with<F>(
    raws: &[RawPosition],
    prices: &dyn PriceSource,
    greeks_for: F,
) -> Vec<PortfolioPosition>
where
    F: Fn(&RawPosition) -> Option<Greeks>,
{
    raws.iter()
        .map(|raw| {
            let mark = match prices.price(&raw.symbol) {
                Some(p) if p.is_finite() => p,
                Some(p) => {
                    tracing::warn!(symbol = %raw.symbol, quote = p, "non-finite quote, marking at entry price");
                    raw.avg_price
                }
                None => {
                    tracing::warn!(symbol = %raw.symbol, "no quote, marking at entry price");
                    raw.avg_price
                }
            };
            PortfolioPosition::from_raw(raw, mark, greeks_for(raw))
        })
        .collect()
}
