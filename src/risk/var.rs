use statrs::distribution::{ContinuousCDF, Normal};

/// Trading days per year for horizon scaling.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Confidence is clamped to this range before taking the quantile; at the
/// lower edge the z-score is zero and VaR collapses to zero.
const MIN_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 0.9999;

/// Parametric (variance-covariance) value at risk: the loss threshold the
/// portfolio stays under with the given confidence over the horizon,
/// assuming normally distributed returns with zero drift.
pub fn value_at_risk(
    portfolio_value: f64,
    annual_volatility: f64,
    confidence: f64,
    horizon_days: f64,
) -> f64 {
    if portfolio_value <= 0.0 || annual_volatility <= 0.0 || horizon_days <= 0.0 {
        return 0.0;
    }
    if !(portfolio_value.is_finite() && annual_volatility.is_finite() && horizon_days.is_finite()) {
        return 0.0;
    }

    let z = z_score(confidence);
    portfolio_value * annual_volatility * (horizon_days / TRADING_DAYS_PER_YEAR).sqrt() * z
}

/// Expected shortfall under the same normal model: the mean loss beyond
/// the VaR threshold. Always at least as large as the matching VaR.
pub fn expected_shortfall(
    portfolio_value: f64,
    annual_volatility: f64,
    confidence: f64,
    horizon_days: f64,
) -> f64 {
    if portfolio_value <= 0.0 || annual_volatility <= 0.0 || horizon_days <= 0.0 {
        return 0.0;
    }
    if !(portfolio_value.is_finite() && annual_volatility.is_finite() && horizon_days.is_finite()) {
        return 0.0;
    }

    let c = clamp_confidence(confidence);
    let z = Normal::standard().inverse_cdf(c);
    let density = (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt();
    let tail_mean = density / (1.0 - c);
    portfolio_value * annual_volatility * (horizon_days / TRADING_DAYS_PER_YEAR).sqrt() * tail_mean
}

#[inline]
fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    } else {
        MIN_CONFIDENCE
    }
}

#[inline]
fn z_score(confidence: f64) -> f64 {
    let c = clamp_confidence(confidence);
    if c <= MIN_CONFIDENCE {
        return 0.0;
    }
    Normal::standard().inverse_cdf(c)
}
