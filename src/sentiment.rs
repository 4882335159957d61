use crate::errors::AnalyticsResult;

/// Scores at or beyond these edges get a directional label.
const BULLISH_EDGE: f64 = 0.2;
const BEARISH_EDGE: f64 = -0.2;

/// One scored observation from a sentiment feed. Score is in [-1, 1],
/// weight is the source's relative trust.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SentimentSample {
    pub score: f64,
    pub weight: f64,
    pub origin: String,
}

/// Where sentiment observations come from. The analyzer never invents
/// data; a deployment without a real feed simply passes an empty source
/// and gets a neutral read.
pub trait SentimentSource: Send + Sync {
    fn samples(&self, symbol: &str) -> AnalyticsResult<Vec<SentimentSample>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Bearish,
    Neutral,
    Bullish,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= BULLISH_EDGE {
            Self::Bullish
        } else if score <= BEARISH_EDGE {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
            Self::Bullish => write!(f, "bullish"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SentimentReport {
    pub symbol: String,
    pub score: f64,
    pub label: SentimentLabel,
    /// Samples that actually contributed, after filtering.
    pub sample_count: usize,
}

/// Weighted-mean scorer over injected samples. Stateless; construct one
/// and reuse it across symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Pull samples for a symbol and reduce them to one score and label.
    /// Malformed samples are skipped; no usable samples means neutral.
    pub fn analyze(
        &self,
        symbol: &str,
        source: &dyn SentimentSource,
    ) -> AnalyticsResult<SentimentReport> {
        let samples = source.samples(symbol)?;

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        let mut used = 0usize;
        for sample in &samples {
            if !sample.score.is_finite()
                || !sample.weight.is_finite()
                || sample.weight <= 0.0
                || sample.score.abs() > 1.0
            {
                tracing::warn!(
                    origin = %sample.origin,
                    score = sample.score,
                    weight = sample.weight,
                    "skipping malformed sentiment sample"
                );
                continue;
            }
            weighted_sum += sample.score * sample.weight;
            weight_total += sample.weight;
            used += 1;
        }

        let score = if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        };
        let report = SentimentReport {
            symbol: symbol.to_string(),
            score,
            label: SentimentLabel::from_score(score),
            sample_count: used,
        };
        tracing::debug!(symbol, score, label = %report.label, "sentiment analyzed");
        Ok(report)
    }
}
