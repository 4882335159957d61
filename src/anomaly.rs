use crate::config::AnomalyConfig;
use chrono::{DateTime, Utc};
use smallvec::SmallVec;
use std::collections::VecDeque;
use uuid::Uuid;

/// Findings produced by one observation. Two slots inline because one
/// tick can flag price and volume at the same time. Serializes as a plain
/// array, which is the payload the notification layer consumes.
pub type Findings = SmallVec<[Anomaly; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Short-window mean moved away from the prior window. Deviation is
    /// signed: negative for a crash-shaped move.
    PriceSpike { deviation: f64 },
    /// Short-window mean volume is a multiple of the prior window.
    VolumeSurge { ratio: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Anomaly {
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: AnomalyKind,
    pub severity: AnomalySeverity,
    pub detected_at: DateTime<Utc>,
}

/// Rolling two-window comparator over a single symbol's price and volume
/// stream. Holds its own capped history; feed it one observation per tick
/// and it reports findings for that tick only.
pub struct AnomalyDetector {
    config: AnomalyConfig,
    prices: VecDeque<f64>,
    volumes: VecDeque<f64>,
}

impl AnomalyDetector {
    /// Build a detector over the given thresholds. A config that fails
    /// `validate()` is replaced by the defaults.
    pub fn new(config: AnomalyConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!(%err, "invalid anomaly config, using defaults");
                AnomalyConfig::default()
            }
        };
        let cap = config.history_cap;
        Self {
            config,
            prices: VecDeque::with_capacity(cap),
            volumes: VecDeque::with_capacity(cap),
        }
    }

    /// Observations seen so far (after eviction).
    #[inline]
    pub fn observations(&self) -> usize {
        self.prices.len()
    }

    /// True once both comparison windows are filled.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.prices.len() >= 2 * self.config.window
    }

    /// Record one tick and report whatever it triggers. Non-finite or
    /// negative inputs are dropped without advancing the windows.
    pub fn record(&mut self, price: f64, volume: f64) -> Findings {
        let mut findings = Findings::new();

        if !price.is_finite() || price <= 0.0 || !volume.is_finite() || volume < 0.0 {
            tracing::warn!(price, volume, "dropping malformed market observation");
            return findings;
        }

        push_capped(&mut self.prices, price, self.config.history_cap);
        push_capped(&mut self.volumes, volume, self.config.history_cap);

        if !self.is_ready() {
            return findings;
        }

        if let Some(anomaly) = self.check_price_spike() {
            findings.push(anomaly);
        }
        if let Some(anomaly) = self.check_volume_surge() {
            findings.push(anomaly);
        }
        findings
    }

    fn check_price_spike(&self) -> Option<Anomaly> {
        let window = self.config.window;
        let recent = mean_of_last(&self.prices, window, 0);
        let prior = mean_of_last(&self.prices, window, window);
        if prior.abs() <= f64::EPSILON {
            return None;
        }

        let deviation = (recent - prior) / prior;
        if deviation.abs() < self.config.spike_low {
            return None;
        }

        let severity = if deviation.abs() >= self.config.spike_high {
            AnomalySeverity::High
        } else if deviation.abs() >= self.config.spike_medium {
            AnomalySeverity::Medium
        } else {
            AnomalySeverity::Low
        };
        tracing::debug!(deviation, severity = %severity, "price spike detected");
        Some(Anomaly {
            id: Uuid::new_v4(),
            kind: AnomalyKind::PriceSpike { deviation },
            severity,
            detected_at: Utc::now(),
        })
    }

    fn check_volume_surge(&self) -> Option<Anomaly> {
        let window = self.config.window;
        let recent = mean_of_last(&self.volumes, window, 0);
        let prior = mean_of_last(&self.volumes, window, window);
        if prior <= f64::EPSILON {
            return None;
        }

        let ratio = recent / prior;
        if ratio <= self.config.surge_ratio {
            return None;
        }

        let severity = if ratio > self.config.surge_high_ratio {
            AnomalySeverity::High
        } else {
            AnomalySeverity::Medium
        };
        tracing::debug!(ratio, severity = %severity, "volume surge detected");
        Some(Anomaly {
            id: Uuid::new_v4(),
            kind: AnomalyKind::VolumeSurge { ratio },
            severity,
            detected_at: Utc::now(),
        })
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(AnomalyConfig::default())
    }
}

fn push_capped(buf: &mut VecDeque<f64>, value: f64, cap: usize) {
    if buf.len() >= cap {
        buf.pop_front();
    }
    buf.push_back(value);
}

/// Mean of `len` elements ending `offset` from the back. No allocation.
#[inline]
fn mean_of_last(data: &VecDeque<f64>, len: usize, offset: usize) -> f64 {
    let end = data.len() - offset;
    let start = end - len;
    let mut sum: f64 = 0.0;
    for i in start..end {
        sum += data[i];
    }
    sum / len as f64
}
