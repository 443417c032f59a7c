use analysis_core::{
    stats, AnalysisError, Bar, IndicatorBundle, Recommendation, ScoringInput, StockQuote, SubScore,
    SubScorer,
};
use chrono::Utc;
use fundamental_analysis::FundamentalAnalysisEngine;
use sentiment_analysis::SentimentAnalysisEngine;
use technical_analysis::{build_indicator_bundle, TechnicalAnalysisEngine};

use crate::detail::{detailed_indicators, indicator_explanations};
use crate::reasoning::select_reasons;
use crate::recommendation::{
    assess_risk, composite_score, confidence, decide, fallback_recommendation, price_target,
};

/// The three sub-scores behind a recommendation.
#[derive(Debug, Clone)]
pub struct ScoreSet {
    pub technical: SubScore,
    pub fundamental: SubScore,
    pub sentiment: SubScore,
}

impl ScoreSet {
    pub fn composite(&self) -> f64 {
        composite_score(&self.technical, &self.fundamental, &self.sentiment)
    }
}

/// Synchronous pipeline from price bars to a rendered recommendation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecommendationEngine {
    technical: TechnicalAnalysisEngine,
    fundamental: FundamentalAnalysisEngine,
    sentiment: SentimentAnalysisEngine,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate(quote: &StockQuote, history: &[Bar]) -> Result<(), AnalysisError> {
        if history.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "No price history available".to_string(),
            ));
        }
        // A zero or negative price is scored; the components guard it themselves
        if !quote.current_price.is_finite() {
            return Err(AnalysisError::InvalidData(format!(
                "Invalid current price {}",
                quote.current_price
            )));
        }
        if history.iter().any(|b| !b.close.is_finite()) {
            return Err(AnalysisError::InvalidData(
                "Price history contains non-finite closes".to_string(),
            ));
        }
        Ok(())
    }

    pub fn score(&self, quote: &StockQuote, history: &[Bar]) -> ScoreSet {
        self.score_with(quote, history, &build_indicator_bundle(history))
    }

    fn score_with(&self, quote: &StockQuote, history: &[Bar], indicators: &IndicatorBundle) -> ScoreSet {
        let input = ScoringInput {
            quote,
            history,
            indicators,
        };
        ScoreSet {
            technical: self.technical.score(&input),
            fundamental: self.fundamental.score(&input),
            sentiment: self.sentiment.score(&input),
        }
    }

    pub fn compute_recommendation(
        &self,
        symbol: &str,
        quote: &StockQuote,
        history: &[Bar],
    ) -> Result<Recommendation, AnalysisError> {
        Self::validate(quote, history)?;

        let indicators = build_indicator_bundle(history);
        let scores = self.score_with(quote, history, &indicators);

        let composite = scores.composite();
        if !composite.is_finite() {
            return Err(AnalysisError::CalculationError(format!(
                "Composite score for {} is not finite",
                symbol
            )));
        }

        let (action, stars, color) = decide(composite);
        let reasoning = select_reasons(
            action,
            &[&scores.technical, &scores.fundamental, &scores.sentiment],
        );

        tracing::debug!(
            "{}: technical={:.2} fundamental={:.2} sentiment={:.2} composite={:.3} -> {}",
            symbol,
            scores.technical.score,
            scores.fundamental.score,
            scores.sentiment.score,
            composite,
            action
        );

        Ok(Recommendation {
            symbol: symbol.to_uppercase(),
            action,
            stars,
            confidence: confidence(&[
                scores.technical.score,
                scores.fundamental.score,
                scores.sentiment.score,
            ]),
            color,
            reasoning,
            indicators: detailed_indicators(quote, history, &indicators),
            indicator_explanations: indicator_explanations(),
            price_target: price_target(quote.current_price, composite),
            risk_level: assess_risk(quote, history),
            overall_score: stats::round_to(composite, 1),
            timestamp: Utc::now(),
        })
    }

    /// Like `compute_recommendation`, but any failure yields the neutral
    /// fallback.
    pub fn recommend(&self, symbol: &str, quote: &StockQuote, history: &[Bar]) -> Recommendation {
        match self.compute_recommendation(symbol, quote, history) {
            Ok(rec) => rec,
            Err(e) => {
                tracing::warn!("Recommendation for {} failed: {}. Returning fallback", symbol, e);
                fallback_recommendation(symbol)
            }
        }
    }
}
