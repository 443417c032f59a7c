use async_trait::async_trait;
use crate::{AnalysisError, Bar, ChartPeriod, Dimension, IndicatorBundle, StockQuote, SubScore};

/// Everything a sub-score calculator may look at for one symbol.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub quote: &'a StockQuote,
    pub history: &'a [Bar],
    pub indicators: &'a IndicatorBundle,
}

/// A single scoring dimension. Implementations never fail: missing or
/// degenerate inputs degrade to the neutral prior.
pub trait SubScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    fn score(&self, input: &ScoringInput<'_>) -> SubScore;
}

/// Upstream market data source (quote, daily history, chart windows).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, AnalysisError>;

    /// Most recent `days` daily bars, oldest first.
    async fn get_history(&self, symbol: &str, days: usize) -> Result<Vec<Bar>, AnalysisError>;

    /// Bars for a chart window; the interval is chosen by the provider.
    async fn get_chart(&self, symbol: &str, period: ChartPeriod) -> Result<Vec<Bar>, AnalysisError>;
}
