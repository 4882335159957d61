pub mod black_scholes;
pub mod chain;
pub mod implied_vol;
pub mod normal;

pub use black_scholes::{greeks, price, quote, Greeks, OptionQuote};
pub use implied_vol::{implied_quote, implied_volatility};

use crate::errors::{AnalyticsError, AnalyticsResult};
use chrono::{DateTime, Utc};

/// Seconds in the ACT/365 day-count year used for time to expiry.
const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

/// Relative band around the strike classified as at-the-money (0.5%).
const ATM_BAND: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Inputs for the European pricing formulas. Volatility and rates are
/// annualized decimals (0.2 = 20%), time to expiry is in years.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct PricingParams {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry: f64, // years, ACT/365
    pub volatility: f64,     // annualized
    pub risk_free_rate: f64, // continuously compounded
    pub dividend_yield: f64, // continuous yield
}

impl PricingParams {
    /// Reject inputs the closed-form formulas are undefined for. Expired
    /// options (time_to_expiry <= 0) are an error here, not an intrinsic
    /// value fallback.
    pub fn validate(&self) -> AnalyticsResult<()> {
        check_positive_finite("spot", self.spot)?;
        check_positive_finite("strike", self.strike)?;
        check_positive_finite("time_to_expiry", self.time_to_expiry)?;
        check_positive_finite("volatility", self.volatility)?;
        check_finite("risk_free_rate", self.risk_free_rate)?;
        check_finite("dividend_yield", self.dividend_yield)?;
        Ok(())
    }

    pub fn moneyness(&self, kind: OptionKind) -> Moneyness {
        Moneyness::classify(self.spot, self.strike, kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Moneyness {
    Itm,
    Atm,
    Otm,
}

impl Moneyness {
    pub fn classify(spot: f64, strike: f64, kind: OptionKind) -> Self {
        if (spot - strike).abs() <= ATM_BAND * strike {
            return Self::Atm;
        }
        let call_itm = spot > strike;
        match kind {
            OptionKind::Call if call_itm => Self::Itm,
            OptionKind::Put if !call_itm => Self::Itm,
            _ => Self::Otm,
        }
    }
}

impl std::fmt::Display for Moneyness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Itm => write!(f, "itm"),
            Self::Atm => write!(f, "atm"),
            Self::Otm => write!(f, "otm"),
        }
    }
}

/// ACT/365 year fraction between two instants, floored at zero.
#[inline]
pub fn year_fraction(now: DateTime<Utc>, expiry: DateTime<Utc>) -> f64 {
    let secs = (expiry - now).num_seconds() as f64;
    (secs / SECONDS_PER_YEAR).max(0.0)
}

/// Year fraction to an RFC 3339 expiry timestamp.
pub fn expiry_year_fraction(expiry: &str, now: DateTime<Utc>) -> AnalyticsResult<f64> {
    let parsed = DateTime::parse_from_rfc3339(expiry)?.with_timezone(&Utc);
    Ok(year_fraction(now, parsed))
}

fn check_positive_finite(field: &str, value: f64) -> AnalyticsResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "{field} must be positive and finite, got {value}"
        )));
    }
    Ok(())
}

fn check_finite(field: &str, value: f64) -> AnalyticsResult<()> {
    if !value.is_finite() {
        return Err(AnalyticsError::InvalidInput(format!(
            "{field} must be finite, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_params() -> PricingParams {
        PricingParams {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 1.0,
            volatility: 0.2,
            risk_free_rate: 0.05,
            dividend_yield: 0.02,
        }
    }

    #[test]
    fn test_validate_accepts_sane_params() {
        assert!(base_params().validate().is_ok());
    }

    #[test]
    fn test_validate_names_the_offending_field() {
        let cases = [
            ("spot", PricingParams { spot: -1.0, ..base_params() }),
            ("strike", PricingParams { strike: 0.0, ..base_params() }),
            ("time_to_expiry", PricingParams { time_to_expiry: 0.0, ..base_params() }),
            ("volatility", PricingParams { volatility: -0.2, ..base_params() }),
            ("risk_free_rate", PricingParams { risk_free_rate: f64::NAN, ..base_params() }),
            ("dividend_yield", PricingParams { dividend_yield: f64::INFINITY, ..base_params() }),
        ];
        for (field, params) in cases {
            let err = params.validate().unwrap_err();
            assert!(
                err.to_string().contains(field),
                "error for {field} should name it, got: {err}"
            );
        }
    }

    #[test]
    fn test_year_fraction_thirty_days() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let t = year_fraction(now, expiry);
        assert!((t - 30.0 / 365.0).abs() < 1e-12, "got {t}");
    }

    #[test]
    fn test_year_fraction_floors_expired_at_zero() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let expiry = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(year_fraction(now, expiry), 0.0);
    }

    #[test]
    fn test_expiry_year_fraction_rejects_garbage() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(expiry_year_fraction("not-a-date", now).is_err());
        let t = expiry_year_fraction("2024-12-31T00:00:00Z", now).unwrap();
        assert!(t > 0.9 && t < 1.1, "got {t}");
    }

    #[test]
    fn test_moneyness_classification() {
        assert_eq!(Moneyness::classify(110.0, 100.0, OptionKind::Call), Moneyness::Itm);
        assert_eq!(Moneyness::classify(90.0, 100.0, OptionKind::Call), Moneyness::Otm);
        assert_eq!(Moneyness::classify(90.0, 100.0, OptionKind::Put), Moneyness::Itm);
        assert_eq!(Moneyness::classify(110.0, 100.0, OptionKind::Put), Moneyness::Otm);
        // Within 0.5% of the strike counts as at-the-money for both kinds.
        assert_eq!(Moneyness::classify(100.4, 100.0, OptionKind::Call), Moneyness::Atm);
        assert_eq!(Moneyness::classify(99.6, 100.0, OptionKind::Put), Moneyness::Atm);
    }
}
