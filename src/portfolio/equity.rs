use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Default number of retained equity observations (FIFO beyond this).
const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Time-ordered account equity history. Drawdown is computed over this
/// series in observation order; computing it over a position list would
/// make the result depend on display order, which is meaningless.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EquityCurve {
    points: VecDeque<EquityPoint>,
    #[serde(skip)]
    capacity: usize,
}

impl EquityCurve {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity.max(2)),
            capacity: capacity.max(2),
        }
    }

    /// Append an observation stamped now.
    pub fn record(&mut self, value: f64) {
        self.record_at(Utc::now(), value);
    }

    /// Append an observation with an explicit timestamp. Non-finite values
    /// are dropped; one bad tick must not poison every later drawdown.
    pub fn record_at(&mut self, timestamp: DateTime<Utc>, value: f64) {
        if !value.is_finite() {
            tracing::warn!(value, "dropping non-finite equity observation");
            return;
        }
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(EquityPoint { timestamp, value });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn latest(&self) -> Option<&EquityPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquityPoint> {
        self.points.iter()
    }

    /// Largest peak-to-trough decline in account currency. Zero for empty
    /// or monotonically rising curves.
    pub fn max_drawdown(&self) -> f64 {
        let mut peak = f64::NEG_INFINITY;
        let mut worst: f64 = 0.0;
        for point in &self.points {
            if point.value > peak {
                peak = point.value;
            }
            let dd = peak - point.value;
            if dd > worst {
                worst = dd;
            }
        }
        worst
    }

    /// Largest peak-relative decline, as a percentage of the peak at the
    /// time. Only positive peaks contribute.
    pub fn max_drawdown_percent(&self) -> f64 {
        let mut peak = f64::NEG_INFINITY;
        let mut worst: f64 = 0.0;
        for point in &self.points {
            if point.value > peak {
                peak = point.value;
            }
            if peak > 0.0 {
                let dd = (peak - point.value) / peak * 100.0;
                if dd > worst {
                    worst = dd;
                }
            }
        }
        worst
    }
}

impl Default for EquityCurve {
    fn default() -> Self {
        Self::new()
    }
}
