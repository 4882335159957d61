use crate::errors::{AnalyticsError, AnalyticsResult};
use crate::pricing::black_scholes::{self, OptionQuote};
use crate::pricing::{OptionKind, PricingParams};

/// Newton-Raphson starting volatility.
const SEED_VOL: f64 = 0.2;

/// Convergence tolerance on price difference, in price units.
const PRICE_TOLERANCE: f64 = 1e-4;

const MAX_ITERATIONS: u32 = 100;

/// Volatility is clamped to this range after every step so a wild Newton
/// update cannot walk the solver into a region where vega vanishes.
const VOL_FLOOR: f64 = 0.01;
const VOL_CEILING: f64 = 2.0;

/// Raw vega below this is treated as a flat objective and stops the solve.
const MIN_RAW_VEGA: f64 = 1e-10;

/// Solve for the volatility at which the model reproduces an observed
/// market price. The volatility field of `params` is ignored; iteration
/// always starts from the fixed seed.
pub fn implied_volatility(
    market_price: f64,
    params: &PricingParams,
    kind: OptionKind,
) -> AnalyticsResult<f64> {
    if !market_price.is_finite() || market_price <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "market_price must be positive and finite, got {market_price}"
        )));
    }
    // Validate everything except volatility, which the solver owns.
    PricingParams {
        volatility: SEED_VOL,
        ..*params
    }
    .validate()?;

    let mut sigma = SEED_VOL;
    for iteration in 0..MAX_ITERATIONS {
        let working = PricingParams {
            volatility: sigma,
            ..*params
        };
        let (model_price, raw_vega) = black_scholes::price_and_raw_vega(&working, kind);
        let diff = model_price - market_price;

        if diff.abs() < PRICE_TOLERANCE {
            tracing::debug!(iterations = iteration, sigma, "implied volatility converged");
            return Ok(sigma);
        }
        if raw_vega < MIN_RAW_VEGA {
            return Err(AnalyticsError::IvNoConvergence {
                iterations: iteration,
                last_sigma: sigma,
            });
        }

        sigma = (sigma - diff / raw_vega).clamp(VOL_FLOOR, VOL_CEILING);
    }

    Err(AnalyticsError::IvNoConvergence {
        iterations: MAX_ITERATIONS,
        last_sigma: sigma,
    })
}

/// Solve for implied volatility, then quote price and greeks at the solved
/// level. Useful when the only live input is an observed premium.
pub fn implied_quote(
    market_price: f64,
    params: &PricingParams,
    kind: OptionKind,
) -> AnalyticsResult<OptionQuote> {
    let sigma = implied_volatility(market_price, params, kind)?;
    black_scholes::quote(
        &PricingParams {
            volatility: sigma,
            ..*params
        },
        kind,
    )
}
