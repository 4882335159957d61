use crate::errors::{AnalyticsError, AnalyticsResult};

/// Tunables for the risk scorer and the parametric VaR model.
#[derive(Debug, Clone)]
pub struct RiskConfig {
    pub vol_weight: f64,
    pub drawdown_weight: f64,
    pub var_weight: f64,
    /// Annualized volatility treated as "fully risky" when normalizing.
    pub vol_ceiling: f64,
    pub var_confidence: f64,
    pub var_horizon_days: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            vol_weight: 0.40,
            drawdown_weight: 0.35,
            var_weight: 0.25,
            vol_ceiling: 1.0,
            var_confidence: 0.95,
            var_horizon_days: 1.0,
        }
    }
}

impl RiskConfig {
    pub fn from_env() -> AnalyticsResult<Self> {
        let d = Self::default();
        let cfg = Self {
            vol_weight: env_parse("RISK_VOL_WEIGHT", d.vol_weight)?,
            drawdown_weight: env_parse("RISK_DRAWDOWN_WEIGHT", d.drawdown_weight)?,
            var_weight: env_parse("RISK_VAR_WEIGHT", d.var_weight)?,
            vol_ceiling: env_parse("RISK_VOL_CEILING", d.vol_ceiling)?,
            var_confidence: env_parse("RISK_VAR_CONFIDENCE", d.var_confidence)?,
            var_horizon_days: env_parse("RISK_VAR_HORIZON_DAYS", d.var_horizon_days)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let weights = [self.vol_weight, self.drawdown_weight, self.var_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AnalyticsError::Config(
                "risk weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(AnalyticsError::Config(
                "at least one risk weight must be positive".to_string(),
            ));
        }
        if !self.vol_ceiling.is_finite() || self.vol_ceiling <= 0.0 {
            return Err(AnalyticsError::Config(format!(
                "RISK_VOL_CEILING must be positive, got {}",
                self.vol_ceiling
            )));
        }
        if !(self.var_confidence > 0.5 && self.var_confidence < 1.0) {
            return Err(AnalyticsError::Config(format!(
                "RISK_VAR_CONFIDENCE must be in (0.5, 1.0), got {}",
                self.var_confidence
            )));
        }
        if !self.var_horizon_days.is_finite() || self.var_horizon_days <= 0.0 {
            return Err(AnalyticsError::Config(format!(
                "RISK_VAR_HORIZON_DAYS must be positive, got {}",
                self.var_horizon_days
            )));
        }
        Ok(())
    }
}

/// Tunables for the rolling anomaly detector. Defaults match the display
/// conventions the heuristics were calibrated for: a 5-point window, price
/// deviation tiers at 10/15/20 percent and volume surge tiers at 3x/10x.
#[derive(Debug, Clone)]
pub struct AnomalyConfig {
    pub spike_low: f64,
    pub spike_medium: f64,
    pub spike_high: f64,
    pub surge_ratio: f64,
    pub surge_high_ratio: f64,
    /// Number of observations averaged on each side of the comparison.
    pub window: usize,
    /// Maximum retained observations per series (FIFO eviction beyond this).
    pub history_cap: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            spike_low: 0.10,
            spike_medium: 0.15,
            spike_high: 0.20,
            surge_ratio: 3.0,
            surge_high_ratio: 10.0,
            window: 5,
            history_cap: 100,
        }
    }
}

impl AnomalyConfig {
    pub fn from_env() -> AnalyticsResult<Self> {
        let d = Self::default();
        let cfg = Self {
            spike_low: env_parse("ANOMALY_SPIKE_LOW", d.spike_low)?,
            spike_medium: env_parse("ANOMALY_SPIKE_MEDIUM", d.spike_medium)?,
            spike_high: env_parse("ANOMALY_SPIKE_HIGH", d.spike_high)?,
            surge_ratio: env_parse("ANOMALY_SURGE_RATIO", d.surge_ratio)?,
            surge_high_ratio: env_parse("ANOMALY_SURGE_HIGH_RATIO", d.surge_high_ratio)?,
            window: env_parse("ANOMALY_WINDOW", d.window)?,
            history_cap: env_parse("ANOMALY_HISTORY_CAP", d.history_cap)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let tiers_ordered = self.spike_low > 0.0
            && self.spike_low <= self.spike_medium
            && self.spike_medium <= self.spike_high;
        if !tiers_ordered {
            return Err(AnalyticsError::Config(format!(
                "anomaly spike tiers must satisfy 0 < low <= medium <= high, got {}/{}/{}",
                self.spike_low, self.spike_medium, self.spike_high
            )));
        }
        if !(self.surge_ratio > 1.0 && self.surge_ratio <= self.surge_high_ratio) {
            return Err(AnalyticsError::Config(format!(
                "anomaly surge tiers must satisfy 1 < ratio <= high_ratio, got {}/{}",
                self.surge_ratio, self.surge_high_ratio
            )));
        }
        if self.window < 2 {
            return Err(AnalyticsError::Config(format!(
                "ANOMALY_WINDOW must be at least 2, got {}",
                self.window
            )));
        }
        if self.history_cap < 2 * self.window {
            return Err(AnalyticsError::Config(format!(
                "ANOMALY_HISTORY_CAP must hold two full windows ({}), got {}",
                2 * self.window,
                self.history_cap
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    pub risk: RiskConfig,
    pub anomaly: AnomalyConfig,
}

impl AnalyticsConfig {
    pub fn from_env() -> AnalyticsResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            risk: RiskConfig::from_env()?,
            anomaly: AnomalyConfig::from_env()?,
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> AnalyticsResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| AnalyticsError::Config(format!("{key}: {e}"))),
        Err(_) => Ok(default),
    }
}
