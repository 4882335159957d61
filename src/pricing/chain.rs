use crate::errors::{AnalyticsError, AnalyticsResult};
use crate::pricing::black_scholes::{quote, OptionQuote};
use crate::pricing::{Moneyness, OptionKind, PricingParams};

/// Upper bound on strikes per side, to keep a bad config from allocating
/// an absurd chain.
const MAX_STRIKES_PER_SIDE: usize = 250;

/// Layout of a synthetic chain: strikes on a fixed grid centered at the
/// rounded spot, priced off one shared volatility and rate set.
#[derive(Debug, Clone, Copy)]
pub struct ChainParams {
    pub spot: f64,
    pub time_to_expiry: f64,
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub strike_step: f64,
    pub strikes_per_side: usize,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ChainRow {
    pub strike: f64,
    pub call: OptionQuote,
    pub put: OptionQuote,
    pub call_moneyness: Moneyness,
    pub put_moneyness: Moneyness,
}

/// Build a deterministic two-sided chain around the spot. Rows whose grid
/// strike would be non-positive are dropped rather than priced.
pub fn build_chain(params: &ChainParams) -> AnalyticsResult<Vec<ChainRow>> {
    if !params.strike_step.is_finite() || params.strike_step <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "strike_step must be positive and finite, got {}",
            params.strike_step
        )));
    }
    if params.strikes_per_side > MAX_STRIKES_PER_SIDE {
        return Err(AnalyticsError::InvalidInput(format!(
            "strikes_per_side must be at most {MAX_STRIKES_PER_SIDE}, got {}",
            params.strikes_per_side
        )));
    }

    let center = (params.spot / params.strike_step).round() * params.strike_step;
    let side = params.strikes_per_side as i64;

    let mut rows = Vec::with_capacity(2 * params.strikes_per_side + 1);
    for i in -side..=side {
        let strike = center + i as f64 * params.strike_step;
        if strike <= 0.0 {
            continue;
        }
        let leg = PricingParams {
            spot: params.spot,
            strike,
            time_to_expiry: params.time_to_expiry,
            volatility: params.volatility,
            risk_free_rate: params.risk_free_rate,
            dividend_yield: params.dividend_yield,
        };
        // quote() validates each leg, so a bad spot or expiry surfaces
        // on the first row instead of producing a partial chain.
        rows.push(ChainRow {
            strike,
            call: quote(&leg, OptionKind::Call)?,
            put: quote(&leg, OptionKind::Put)?,
            call_moneyness: leg.moneyness(OptionKind::Call),
            put_moneyness: leg.moneyness(OptionKind::Put),
        });
    }
    Ok(rows)
}
