use crate::config::RiskConfig;
use crate::portfolio::PortfolioSummary;

/// Band edges on the 0-100 score.
const MODERATE_EDGE: f64 = 25.0;
const HIGH_EDGE: f64 = 50.0;
const CRITICAL_EDGE: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < MODERATE_EDGE {
            Self::Low
        } else if score < HIGH_EDGE {
            Self::Moderate
        } else if score < CRITICAL_EDGE {
            Self::High
        } else {
            Self::Critical
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Observed risk factors for one portfolio snapshot.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct RiskInputs {
    pub portfolio_value: f64,
    pub annual_volatility: f64,
    pub max_drawdown: f64,   // account currency
    pub value_at_risk: f64,  // account currency, same horizon as display
}

impl RiskInputs {
    /// Wire a summary straight into the scorer. Volatility and VaR are
    /// produced elsewhere; drawdown and value come from the aggregates.
    pub fn from_summary(
        summary: &PortfolioSummary,
        annual_volatility: f64,
        value_at_risk: f64,
    ) -> Self {
        Self {
            portfolio_value: summary.total_market_value,
            annual_volatility,
            max_drawdown: summary.max_drawdown,
            value_at_risk,
        }
    }
}

/// Composite score plus its breakdown. The three components are in score
/// points and sum to the pre-clamp score.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub volatility_component: f64,
    pub drawdown_component: f64,
    pub var_component: f64,
}

/// Weighted normalized-component scorer. Weights are normalized once at
/// construction so callers can pass any positive mix.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    vol_weight: f64,
    drawdown_weight: f64,
    var_weight: f64,
    vol_ceiling: f64,
}

impl RiskScorer {
    pub fn new(config: &RiskConfig) -> Self {
        let sum = config.vol_weight + config.drawdown_weight + config.var_weight;
        if sum.is_finite() && sum > 0.0 {
            Self {
                vol_weight: config.vol_weight / sum,
                drawdown_weight: config.drawdown_weight / sum,
                var_weight: config.var_weight / sum,
                vol_ceiling: config.vol_ceiling.max(f64::MIN_POSITIVE),
            }
        } else {
            // A degenerate weight mix cannot be normalized; use the default split.
            Self::new(&RiskConfig::default())
        }
    }

    pub fn assess(&self, inputs: &RiskInputs) -> RiskAssessment {
        let vol_norm = unit(inputs.annual_volatility / self.vol_ceiling);
        let (dd_norm, var_norm) = if inputs.portfolio_value > 0.0 {
            (
                unit(inputs.max_drawdown / inputs.portfolio_value),
                unit(inputs.value_at_risk / inputs.portfolio_value),
            )
        } else {
            (0.0, 0.0)
        };

        let volatility_component = self.vol_weight * vol_norm * 100.0;
        let drawdown_component = self.drawdown_weight * dd_norm * 100.0;
        let var_component = self.var_weight * var_norm * 100.0;
        let score = (volatility_component + drawdown_component + var_component).clamp(0.0, 100.0);
        let level = RiskLevel::from_score(score);

        tracing::debug!(score, level = %level, "risk assessed");
        RiskAssessment {
            score,
            level,
            volatility_component,
            drawdown_component,
            var_component,
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(&RiskConfig::default())
    }
}

/// Clamp a ratio into [0, 1], folding NaN to zero.
#[inline]
fn unit(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(value: f64, vol: f64, dd: f64, var: f64) -> RiskInputs {
        RiskInputs {
            portfolio_value: value,
            annual_volatility: vol,
            max_drawdown: dd,
            value_at_risk: var,
        }
    }

    #[test]
    fn test_calm_book_scores_low() {
        let scorer = RiskScorer::default();
        let a = scorer.assess(&inputs(100_000.0, 0.0, 0.0, 0.0));
        assert_eq!(a.score, 0.0);
        assert_eq!(a.level, RiskLevel::Low);
    }

    #[test]
    fn test_saturated_factors_hit_the_ceiling() {
        let scorer = RiskScorer::default();
        // Volatility past the ceiling, drawdown and VaR both the whole book.
        let a = scorer.assess(&inputs(50_000.0, 3.0, 50_000.0, 80_000.0));
        assert!((a.score - 100.0).abs() < 1e-9, "got {}", a.score);
        assert_eq!(a.level, RiskLevel::Critical);
    }

    #[test]
    fn test_components_sum_to_score_inside_range() {
        let scorer = RiskScorer::default();
        let a = scorer.assess(&inputs(200_000.0, 0.4, 30_000.0, 10_000.0));
        let total = a.volatility_component + a.drawdown_component + a.var_component;
        assert!((a.score - total).abs() < 1e-12);
        assert!(a.score > 0.0 && a.score < 100.0);
    }

    #[test]
    fn test_weights_are_renormalized() {
        let config = RiskConfig {
            vol_weight: 2.0,
            drawdown_weight: 1.0,
            var_weight: 1.0,
            ..RiskConfig::default()
        };
        let scorer = RiskScorer::new(&config);
        // Only the volatility factor is lit, at full saturation: 2/4 of 100.
        let a = scorer.assess(&inputs(100_000.0, 1.0, 0.0, 0.0));
        assert_eq!(a.score, 50.0);
        assert_eq!(a.level, RiskLevel::High);
    }

    #[test]
    fn test_zero_value_book_only_scores_volatility() {
        let scorer = RiskScorer::default();
        let a = scorer.assess(&inputs(0.0, 0.5, 10_000.0, 5_000.0));
        assert_eq!(a.drawdown_component, 0.0);
        assert_eq!(a.var_component, 0.0);
        assert!(a.volatility_component > 0.0);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(24.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(49.9), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(74.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }

    #[test]
    fn test_nan_factors_do_not_poison_the_score() {
        let scorer = RiskScorer::default();
        let a = scorer.assess(&inputs(100_000.0, f64::NAN, f64::NAN, 5_000.0));
        assert!(a.score.is_finite());
        assert_eq!(a.volatility_component, 0.0);
    }

    #[test]
    fn test_from_summary_wires_value_and_drawdown() {
        let summary = PortfolioSummary {
            total_market_value: 120_000.0,
            max_drawdown: 6_000.0,
            ..PortfolioSummary::default()
        };
        let inputs = RiskInputs::from_summary(&summary, 0.3, 2_400.0);
        assert_eq!(inputs.portfolio_value, 120_000.0);
        assert_eq!(inputs.max_drawdown, 6_000.0);
        assert_eq!(inputs.annual_volatility, 0.3);
        assert_eq!(inputs.value_at_risk, 2_400.0);
    }
}
