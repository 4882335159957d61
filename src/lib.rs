//! Options analytics for a trading dashboard: closed-form pricing and
//! greeks, implied volatility, synthetic chains, portfolio aggregation,
//! and the display heuristics (risk score, anomaly flags, sentiment)
//! layered on top of the aggregates.
//!
//! Everything is synchronous and in-process. Market data, persistence and
//! transport belong to the caller; the seams are small traits
//! ([`portfolio::PriceSource`], [`sentiment::SentimentSource`]).
//!
//! ```
//! use voladesk::{price, OptionKind, PricingParams};
//!
//! let params = PricingParams {
//!     spot: 100.0,
//!     strike: 105.0,
//!     time_to_expiry: 0.5,
//!     volatility: 0.25,
//!     risk_free_rate: 0.05,
//!     dividend_yield: 0.0,
//! };
//! let call = price(&params, OptionKind::Call)?;
//! assert!(call > 0.0 && call < params.spot);
//! # Ok::<(), voladesk::AnalyticsError>(())
//! ```

pub mod anomaly;
pub mod config;
pub mod errors;
pub mod portfolio;
pub mod pricing;
pub mod risk;
pub mod sentiment;

pub use anomaly::{Anomaly, AnomalyDetector, AnomalyKind, AnomalySeverity};
pub use config::{AnalyticsConfig, AnomalyConfig, RiskConfig};
pub use errors::{AnalyticsError, AnalyticsResult};
pub use portfolio::{
    mark_positions, mark_positions_with, summarize, EquityCurve, PortfolioPosition,
    PortfolioSummary, PriceSource, RawPosition, Side,
};
pub use pricing::{
    greeks, implied_volatility, price, quote, Greeks, Moneyness, OptionKind, OptionQuote,
    PricingParams,
};
pub use risk::{value_at_risk, RiskAssessment, RiskInputs, RiskLevel, RiskScorer};
pub use sentiment::{
    SentimentAnalyzer, SentimentLabel, SentimentReport, SentimentSample, SentimentSource,
};
