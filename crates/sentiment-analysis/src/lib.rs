use analysis_core::{Bar, Dimension, ScoringInput, SubScore, SubScorer};

/// Bars needed for the weekly performance proxy.
pub const WEEK_LOOKBACK: usize = 7;

const STRONG_GAIN_PCT: f64 = 3.0;
const WEAKNESS_PCT: f64 = -3.0;

/// Percent change of `current_price` against the close seven bars back
/// (`history[n - 7]`).
///
/// `None` with fewer than seven bars or a reference close that is not a
/// positive finite number.
pub fn weekly_change_pct(current_price: f64, history: &[Bar]) -> Option<f64> {
    if history.len() < WEEK_LOOKBACK {
        return None;
    }
    let week_ago = history[history.len() - WEEK_LOOKBACK].close;
    if !week_ago.is_finite() || week_ago <= 0.0 || !current_price.is_finite() {
        return None;
    }
    Some((current_price - week_ago) / week_ago * 100.0)
}

/// Market sentiment proxy from recent price performance.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentimentAnalysisEngine;

impl SentimentAnalysisEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SubScorer for SentimentAnalysisEngine {
    fn dimension(&self) -> Dimension {
        Dimension::Sentiment
    }

    fn score(&self, input: &ScoringInput<'_>) -> SubScore {
        let Some(change) = weekly_change_pct(input.quote.current_price, input.history) else {
            return SubScore::new(Dimension::Sentiment, SubScore::NEUTRAL, Vec::new());
        };

        let (score, reason) = if change > STRONG_GAIN_PCT {
            (7.0, "Recent performance shows strong gains")
        } else if change < WEAKNESS_PCT {
            (3.0, "Recent performance shows weakness")
        } else {
            (5.0, "Recent performance appears stable")
        };

        SubScore::new(Dimension::Sentiment, score, vec![reason.to_string()])
    }
}
