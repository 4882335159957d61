use crate::errors::AnalyticsResult;
use crate::pricing::normal;
use crate::pricing::{OptionKind, PricingParams};

/// Calendar days used to rescale annual theta to per-day decay.
const DAYS_PER_YEAR: f64 = 365.0;

/// Per-contract greeks in display conventions: theta is per calendar day,
/// vega is per one volatility point, rho is per one percentage point of rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl Greeks {
    /// Scale every greek by a signed position quantity.
    #[inline]
    pub fn scaled(&self, quantity: f64) -> Self {
        Self {
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            theta: self.theta * quantity,
            vega: self.vega * quantity,
            rho: self.rho * quantity,
        }
    }

    /// Accumulate another leg into this one.
    #[inline]
    pub fn add(&mut self, other: &Greeks) {
        self.delta += other.delta;
        self.gamma += other.gamma;
        self.theta += other.theta;
        self.vega += other.vega;
        self.rho += other.rho;
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct OptionQuote {
    pub price: f64,
    pub greeks: Greeks,
}

/// Terms shared by the price and greek formulas, computed once per contract.
struct Core {
    d1: f64,
    d2: f64,
    sqrt_t: f64,
    df_r: f64, // e^(-r T)
    df_q: f64, // e^(-q T)
}

fn core(p: &PricingParams) -> Core {
    let sqrt_t = p.time_to_expiry.sqrt();
    let vol_sqrt_t = p.volatility * sqrt_t;
    let d1 = ((p.spot / p.strike).ln()
        + (p.risk_free_rate - p.dividend_yield + 0.5 * p.volatility * p.volatility)
            * p.time_to_expiry)
        / vol_sqrt_t;
    Core {
        d1,
        d2: d1 - vol_sqrt_t,
        sqrt_t,
        df_r: (-p.risk_free_rate * p.time_to_expiry).exp(),
        df_q: (-p.dividend_yield * p.time_to_expiry).exp(),
    }
}

fn price_from(p: &PricingParams, c: &Core, kind: OptionKind) -> f64 {
    match kind {
        OptionKind::Call => {
            p.spot * c.df_q * normal::cdf(c.d1) - p.strike * c.df_r * normal::cdf(c.d2)
        }
        OptionKind::Put => {
            p.strike * c.df_r * normal::cdf(-c.d2) - p.spot * c.df_q * normal::cdf(-c.d1)
        }
    }
}

fn greeks_from(p: &PricingParams, c: &Core, kind: OptionKind) -> Greeks {
    let pdf_d1 = normal::pdf(c.d1);
    let gamma = c.df_q * pdf_d1 / (p.spot * p.volatility * c.sqrt_t);
    let vega = p.spot * c.df_q * pdf_d1 * c.sqrt_t / 100.0;
    // Time decay common to both kinds, before the rate and yield legs.
    let decay = -p.spot * c.df_q * pdf_d1 * p.volatility / (2.0 * c.sqrt_t);

    match kind {
        OptionKind::Call => {
            let nd1 = normal::cdf(c.d1);
            let nd2 = normal::cdf(c.d2);
            Greeks {
                delta: c.df_q * nd1,
                gamma,
                theta: (decay - p.risk_free_rate * p.strike * c.df_r * nd2
                    + p.dividend_yield * p.spot * c.df_q * nd1)
                    / DAYS_PER_YEAR,
                vega,
                rho: p.strike * p.time_to_expiry * c.df_r * nd2 / 100.0,
            }
        }
        OptionKind::Put => {
            let nmd1 = normal::cdf(-c.d1);
            let nmd2 = normal::cdf(-c.d2);
            Greeks {
                delta: c.df_q * (normal::cdf(c.d1) - 1.0),
                gamma,
                theta: (decay + p.risk_free_rate * p.strike * c.df_r * nmd2
                    - p.dividend_yield * p.spot * c.df_q * nmd1)
                    / DAYS_PER_YEAR,
                vega,
                rho: -p.strike * p.time_to_expiry * c.df_r * nmd2 / 100.0,
            }
        }
    }
}

/// Black-Scholes price of a European option under a continuous dividend yield.
pub fn price(params: &PricingParams, kind: OptionKind) -> AnalyticsResult<f64> {
    params.validate()?;
    let c = core(params);
    Ok(price_from(params, &c, kind))
}

/// Full greek set for one contract.
pub fn greeks(params: &PricingParams, kind: OptionKind) -> AnalyticsResult<Greeks> {
    params.validate()?;
    let c = core(params);
    Ok(greeks_from(params, &c, kind))
}

/// Price and greeks in one pass, sharing the d1/d2 terms.
pub fn quote(params: &PricingParams, kind: OptionKind) -> AnalyticsResult<OptionQuote> {
    params.validate()?;
    let c = core(params);
    Ok(OptionQuote {
        price: price_from(params, &c, kind),
        greeks: greeks_from(params, &c, kind),
    })
}

/// Model price and raw dPrice/dSigma for the root finder. The raw
/// sensitivity is NOT the display vega (no per-point rescale); Newton steps
/// sized with the display convention would overshoot by two orders of
/// magnitude. Callers guarantee the params are already valid.
pub(crate) fn price_and_raw_vega(params: &PricingParams, kind: OptionKind) -> (f64, f64) {
    let c = core(params);
    let raw_vega = params.spot * c.df_q * normal::pdf(c.d1) * c.sqrt_t;
    (price_from(params, &c, kind), raw_vega)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> Vec<PricingParams> {
        let mut out = Vec::new();
        for spot in [80.0, 100.0, 120.0] {
            for strike in [90.0, 100.0, 110.0] {
                for t in [30.0 / 365.0, 0.5, 2.0] {
                    for vol in [0.1, 0.2, 0.5] {
                        out.push(PricingParams {
                            spot,
                            strike,
                            time_to_expiry: t,
                            volatility: vol,
                            risk_free_rate: 0.05,
                            dividend_yield: 0.02,
                        });
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_known_value_no_dividend() {
        // Textbook case: S=K=100, T=1, sigma=20%, r=5% -> call 10.4506, put 5.5735.
        let p = PricingParams {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 1.0,
            volatility: 0.2,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
        };
        assert_relative_eq!(price(&p, OptionKind::Call).unwrap(), 10.4506, epsilon = 1e-3);
        assert_relative_eq!(price(&p, OptionKind::Put).unwrap(), 5.5735, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity_across_grid() {
        for p in grid() {
            let call = price(&p, OptionKind::Call).unwrap();
            let put = price(&p, OptionKind::Put).unwrap();
            let df_q = (-p.dividend_yield * p.time_to_expiry).exp();
            let df_r = (-p.risk_free_rate * p.time_to_expiry).exp();
            let forward = p.spot * df_q - p.strike * df_r;
            assert!(
                (call - put - forward).abs() < 1e-6,
                "parity violated for {p:?}: {} vs {}",
                call - put,
                forward
            );
        }
    }

    #[test]
    fn test_delta_difference_is_yield_discount() {
        for p in grid() {
            let call = greeks(&p, OptionKind::Call).unwrap();
            let put = greeks(&p, OptionKind::Put).unwrap();
            let df_q = (-p.dividend_yield * p.time_to_expiry).exp();
            assert!(
                (call.delta - put.delta - df_q).abs() < 1e-12,
                "delta identity violated for {p:?}"
            );
        }
    }

    #[test]
    fn test_greek_signs_and_ranges() {
        for p in grid() {
            let df_q = (-p.dividend_yield * p.time_to_expiry).exp();
            let call = greeks(&p, OptionKind::Call).unwrap();
            let put = greeks(&p, OptionKind::Put).unwrap();
            assert!(call.delta > 0.0 && call.delta < df_q, "call delta {}", call.delta);
            assert!(put.delta < 0.0 && put.delta > -df_q, "put delta {}", put.delta);
            assert!(call.gamma > 0.0 && (call.gamma - put.gamma).abs() < 1e-15);
            assert!(call.vega > 0.0 && (call.vega - put.vega).abs() < 1e-15);
            assert!(call.rho > 0.0 && put.rho < 0.0);
        }
    }

    #[test]
    fn test_near_the_money_call_theta_is_negative() {
        let p = PricingParams {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 0.25,
            volatility: 0.2,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
        };
        let g = greeks(&p, OptionKind::Call).unwrap();
        assert!(g.theta < 0.0, "ATM call should decay, theta = {}", g.theta);
    }

    #[test]
    fn test_greeks_match_finite_differences() {
        let p = PricingParams {
            spot: 100.0,
            strike: 105.0,
            time_to_expiry: 0.75,
            volatility: 0.3,
            risk_free_rate: 0.04,
            dividend_yield: 0.01,
        };
        let eps = 1e-3;
        for kind in [OptionKind::Call, OptionKind::Put] {
            let g = greeks(&p, kind).unwrap();
            let mid = price(&p, kind).unwrap();

            let up = price(&PricingParams { spot: p.spot + eps, ..p }, kind).unwrap();
            let down = price(&PricingParams { spot: p.spot - eps, ..p }, kind).unwrap();
            assert!((g.delta - (up - down) / (2.0 * eps)).abs() < 1e-4, "{kind} delta");
            assert!((g.gamma - (up - 2.0 * mid + down) / (eps * eps)).abs() < 1e-4, "{kind} gamma");

            let vol_up = price(&PricingParams { volatility: p.volatility + eps, ..p }, kind).unwrap();
            let vol_down = price(&PricingParams { volatility: p.volatility - eps, ..p }, kind).unwrap();
            let fd_vega = (vol_up - vol_down) / (2.0 * eps) / 100.0;
            assert!((g.vega - fd_vega).abs() < 1e-4, "{kind} vega");

            let t_up = price(&PricingParams { time_to_expiry: p.time_to_expiry + eps, ..p }, kind).unwrap();
            let t_down = price(&PricingParams { time_to_expiry: p.time_to_expiry - eps, ..p }, kind).unwrap();
            let fd_theta = (t_down - t_up) / (2.0 * eps) / DAYS_PER_YEAR;
            assert!((g.theta - fd_theta).abs() < 1e-4, "{kind} theta");

            let r_up = price(&PricingParams { risk_free_rate: p.risk_free_rate + eps, ..p }, kind).unwrap();
            let r_down = price(&PricingParams { risk_free_rate: p.risk_free_rate - eps, ..p }, kind).unwrap();
            let fd_rho = (r_up - r_down) / (2.0 * eps) / 100.0;
            assert!((g.rho - fd_rho).abs() < 1e-4, "{kind} rho");
        }
    }

    #[test]
    fn test_short_dated_otm_call_stays_inside_bounds() {
        let p = PricingParams {
            spot: 5.67,
            strike: 6.0,
            time_to_expiry: 30.0 / 365.0,
            volatility: 0.2,
            risk_free_rate: 0.05,
            dividend_yield: 0.02,
        };
        let call = price(&p, OptionKind::Call).unwrap();
        assert!(call > 0.0 && call < p.spot, "got {call}");
    }

    #[test]
    fn test_rejects_invalid_params() {
        let p = PricingParams {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 1.0,
            volatility: 0.0,
            risk_free_rate: 0.05,
            dividend_yield: 0.0,
        };
        assert!(price(&p, OptionKind::Call).is_err());
        assert!(greeks(&p, OptionKind::Put).is_err());
    }

    #[test]
    fn test_quote_is_consistent_with_parts() {
        let p = PricingParams {
            spot: 95.0,
            strike: 100.0,
            time_to_expiry: 0.5,
            volatility: 0.25,
            risk_free_rate: 0.03,
            dividend_yield: 0.01,
        };
        let q = quote(&p, OptionKind::Put).unwrap();
        assert_eq!(q.price, price(&p, OptionKind::Put).unwrap());
        assert_eq!(q.greeks, greeks(&p, OptionKind::Put).unwrap());
    }

    #[test]
    fn test_greeks_scale_and_accumulate() {
        let g = Greeks { delta: 0.5, gamma: 0.02, theta: -0.03, vega: 0.12, rho: 0.08 };
        let short_two = g.scaled(-2.0);
        assert_eq!(short_two.delta, -1.0);
        assert_eq!(short_two.theta, 0.06);

        let mut net = Greeks::default();
        net.add(&g.scaled(3.0));
        net.add(&short_two);
        assert_relative_eq!(net.delta, 0.5, epsilon = 1e-12);
        assert_relative_eq!(net.vega, 0.12, epsilon = 1e-12);
    }
}
