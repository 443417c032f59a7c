use analysis_core::{stats, Bar, Dimension, IndicatorBundle, ScoringInput, SubScore, SubScorer};

use crate::indicators::*;

/// SMA window used for the trend component.
pub const TREND_SMA_PERIOD: usize = 20;
/// RSI window used for the momentum component.
pub const MOMENTUM_RSI_PERIOD: usize = 14;

const OVERSOLD_RSI: f64 = 35.0;
const OVERBOUGHT_RSI: f64 = 65.0;
const TREND_BAND: f64 = 0.02;

/// Build the indicators the sub-score calculators consume from daily bars.
pub fn build_indicator_bundle(bars: &[Bar]) -> IndicatorBundle {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    IndicatorBundle {
        sma: sma(&closes, TREND_SMA_PERIOD),
        sma_period: TREND_SMA_PERIOD,
        rsi: rsi(&closes, MOMENTUM_RSI_PERIOD),
        rsi_period: MOMENTUM_RSI_PERIOD,
    }
}

/// Technical dimension: RSI momentum and price position against the SMA.
#[derive(Debug, Default, Clone, Copy)]
pub struct TechnicalAnalysisEngine;

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SubScorer for TechnicalAnalysisEngine {
    fn dimension(&self) -> Dimension {
        Dimension::Technical
    }

    fn score(&self, input: &ScoringInput<'_>) -> SubScore {
        let mut components: Vec<f64> = Vec::new();
        let mut reasoning: Vec<String> = Vec::new();

        if let Some(current_rsi) = last_value(&input.indicators.rsi) {
            if current_rsi < OVERSOLD_RSI {
                components.push(8.0);
                reasoning.push("Market momentum shows oversold conditions".to_string());
            } else if current_rsi > OVERBOUGHT_RSI {
                components.push(2.0);
                reasoning.push("Market momentum shows overbought conditions".to_string());
            } else {
                components.push(5.0);
                reasoning.push("Market momentum appears neutral".to_string());
            }
        }

        let current_price = input.quote.current_price;
        if current_price > 0.0 {
            if let Some(current_sma) = last_value(&input.indicators.sma) {
                if current_sma != 0.0 && current_price > current_sma * (1.0 + TREND_BAND) {
                    components.push(7.0);
                    reasoning.push("Price trend shows strong upward momentum".to_string());
                } else if current_sma != 0.0 && current_price < current_sma * (1.0 - TREND_BAND) {
                    components.push(3.0);
                    reasoning.push("Price trend shows downward pressure".to_string());
                } else {
                    components.push(5.0);
                    reasoning.push("Price trend appears stable".to_string());
                }
            }
        }

        let score = if components.is_empty() {
            SubScore::NEUTRAL
        } else {
            stats::mean(&components)
        };
        reasoning.truncate(2);

        SubScore::new(Dimension::Technical, score, reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::StockQuote;
    use chrono::{Duration, Utc};

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let start = Utc::now() - Duration::days(closes.len() as i64);
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000_000.0,
            })
            .collect()
    }

    fn quote(price: f64) -> StockQuote {
        StockQuote {
            symbol: "TEST".to_string(),
            current_price: price,
            ..Default::default()
        }
    }

    fn score_with(price: f64, indicators: &IndicatorBundle) -> SubScore {
        let q = quote(price);
        TechnicalAnalysisEngine::new().score(&ScoringInput {
            quote: &q,
            history: &[],
            indicators,
        })
    }

    #[test]
    fn test_bundle_is_aligned_with_bars() {
        let bars = bars_from_closes(&[100.0; 50]);
        let bundle = build_indicator_bundle(&bars);

        assert_eq!(bundle.sma.len(), 50);
        assert_eq!(bundle.rsi.len(), 50);
        assert_eq!(bundle.sma_period, 20);
        assert_eq!(bundle.rsi_period, 14);
    }

    #[test]
    fn test_oversold_and_above_trend() {
        let indicators = IndicatorBundle {
            sma: vec![None, Some(95.0)],
            rsi: vec![Some(20.0), None],
            ..Default::default()
        };
        let result = score_with(100.0, &indicators);

        assert!((result.score - 7.5).abs() < 1e-9);
        assert_eq!(
            result.reasoning,
            vec![
                "Market momentum shows oversold conditions".to_string(),
                "Price trend shows strong upward momentum".to_string(),
            ]
        );
        assert_eq!(result.weight, 0.40);
    }

    #[test]
    fn test_overbought_and_below_trend() {
        let indicators = IndicatorBundle {
            sma: vec![Some(110.0)],
            rsi: vec![Some(80.0)],
            ..Default::default()
        };
        let result = score_with(100.0, &indicators);

        assert!((result.score - 2.5).abs() < 1e-9);
        assert_eq!(result.reasoning[0], "Market momentum shows overbought conditions");
        assert_eq!(result.reasoning[1], "Price trend shows downward pressure");
    }

    #[test]
    fn test_missing_components_are_excluded() {
        let indicators = IndicatorBundle {
            sma: vec![None, None],
            rsi: vec![Some(20.0), None],
            ..Default::default()
        };
        let result = score_with(100.0, &indicators);

        // Only the RSI component is present, not averaged with a zero
        assert!((result.score - 8.0).abs() < 1e-9);
        assert_eq!(result.reasoning.len(), 1);
    }

    #[test]
    fn test_no_indicators_is_neutral() {
        let result = score_with(100.0, &IndicatorBundle::default());

        assert_eq!(result.score, 5.0);
        assert!(result.reasoning.is_empty());
    }

    #[test]
    fn test_trend_needs_positive_price() {
        let indicators = IndicatorBundle {
            sma: vec![Some(100.0)],
            rsi: vec![],
            ..Default::default()
        };
        let result = score_with(0.0, &indicators);

        assert_eq!(result.score, 5.0);
        assert!(result.reasoning.is_empty());
    }

    #[test]
    fn test_flat_history_scores_neutral() {
        let bars = bars_from_closes(&[100.0; 50]);
        let bundle = build_indicator_bundle(&bars);
        let result = score_with(100.0, &bundle);

        assert_eq!(result.score, 5.0);
        assert_eq!(result.reasoning, vec!["Price trend appears stable".to_string()]);
    }
}
