use analysis_core::{
    AnalysisError, Bar, ChartPeriod, MarketDataProvider, NewsPayload, Recommendation, StockQuote,
};
use chrono::Duration;
use market_data::NewsService;
use std::sync::Arc;
use technical_analysis::{analyze_stock, technical_chart, StockAnalysis, TechnicalChart};

pub mod cache;
pub mod detail;
pub mod engine;
pub mod reasoning;
pub mod recommendation;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use engine::{RecommendationEngine, ScoreSet};
pub use recommendation::{fallback_recommendation, ScoreBreakdown, TradingSignals};

/// Days of history behind the basic analysis view.
pub const ANALYSIS_DAYS: usize = 100;
/// Days of history behind a recommendation.
pub const RECOMMENDATION_DAYS: usize = 50;

#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub news_ttl: Duration,
    pub market_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            news_ttl: Duration::minutes(30),
            market_ttl: Duration::minutes(5),
        }
    }
}

/// Fetches market data through the provider, caches it per symbol and runs
/// the scoring engine over it.
pub struct AnalysisOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
    engine: RecommendationEngine,
    news_service: NewsService,
    quote_cache: TtlCache<StockQuote>,
    /// Keyed by symbol and day count
    history_cache: TtlCache<Vec<Bar>>,
    /// Keyed by symbol and period
    chart_cache: TtlCache<Vec<Bar>>,
    news_cache: TtlCache<NewsPayload>,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn MarketDataProvider>, settings: CacheSettings) -> Self {
        Self::with_clock(provider, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(
        provider: Arc<dyn MarketDataProvider>,
        settings: CacheSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            engine: RecommendationEngine::new(),
            news_service: NewsService::new(),
            quote_cache: TtlCache::new(settings.market_ttl, clock.clone()),
            history_cache: TtlCache::new(settings.market_ttl, clock.clone()),
            chart_cache: TtlCache::new(settings.market_ttl, clock.clone()),
            news_cache: TtlCache::new(settings.news_ttl, clock),
        }
    }

    pub async fn get_quote(&self, symbol: &str) -> Result<StockQuote, AnalysisError> {
        if let Some(quote) = self.quote_cache.get(symbol) {
            tracing::debug!("Quote cache hit for {}", symbol);
            return Ok(quote);
        }
        let quote = self.provider.get_quote(symbol).await?;
        self.quote_cache.insert(symbol, quote.clone());
        Ok(quote)
    }

    pub async fn get_history(&self, symbol: &str, days: usize) -> Result<Vec<Bar>, AnalysisError> {
        let key = format!("{}:{}", symbol, days);
        if let Some(bars) = self.history_cache.get(&key) {
            tracing::debug!("History cache hit for {} ({} days)", symbol, days);
            return Ok(bars);
        }
        let bars = self.provider.get_history(symbol, days).await?;
        self.history_cache.insert(&key, bars.clone());
        Ok(bars)
    }

    pub async fn get_chart(&self, symbol: &str, period: ChartPeriod) -> Result<Vec<Bar>, AnalysisError> {
        let key = format!("{}:{}", symbol, period);
        if let Some(bars) = self.chart_cache.get(&key) {
            tracing::debug!("Chart cache hit for {} ({})", symbol, period);
            return Ok(bars);
        }
        let bars = self.provider.get_chart(symbol, period).await?;
        self.chart_cache.insert(&key, bars.clone());
        Ok(bars)
    }

    /// Period-based bars, falling back to day-based history for the same span
    /// when the chart fetch fails.
    pub async fn get_period_history(&self, symbol: &str, period: ChartPeriod) -> Result<Vec<Bar>, AnalysisError> {
        match self.get_chart(symbol, period).await {
            Ok(bars) => Ok(bars),
            Err(e) => {
                tracing::warn!("Chart fetch for {} ({}) failed: {}. Using daily history", symbol, period, e);
                self.get_history(symbol, period.days()).await
            }
        }
    }

    pub fn get_news(&self, symbol: &str) -> NewsPayload {
        if let Some(payload) = self.news_cache.get(symbol) {
            return payload;
        }
        let payload = self.news_service.get_stock_news(symbol);
        self.news_cache.insert(symbol, payload.clone());
        payload
    }

    pub async fn analyze_stock(&self, symbol: &str) -> Result<StockAnalysis, AnalysisError> {
        let bars = self.get_history(symbol, ANALYSIS_DAYS).await?;
        analyze_stock(symbol, &bars)
    }

    pub async fn technical_chart(&self, symbol: &str, period: ChartPeriod) -> Result<TechnicalChart, AnalysisError> {
        let bars = self.get_period_history(symbol, period).await?;
        if bars.is_empty() {
            return Err(AnalysisError::InsufficientData(format!(
                "No chart data available for {}",
                symbol.to_uppercase()
            )));
        }
        Ok(technical_chart(symbol, period, &bars))
    }

    /// Never fails: missing data degrades to the neutral fallback.
    pub async fn get_recommendation(&self, symbol: &str) -> Recommendation {
        tracing::info!("Computing recommendation for {}", symbol);

        let (quote, history) = tokio::join!(
            self.get_quote(symbol),
            self.get_history(symbol, RECOMMENDATION_DAYS),
        );

        match (quote, history) {
            (Ok(quote), Ok(history)) => self.engine.recommend(symbol, &quote, &history),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Market data for {} unavailable: {}. Returning fallback", symbol, e);
                fallback_recommendation(symbol)
            }
        }
    }

    pub async fn get_signals(&self, symbol: &str) -> TradingSignals {
        TradingSignals::from(&self.get_recommendation(symbol).await)
    }

    pub async fn get_score_breakdown(&self, symbol: &str) -> ScoreBreakdown {
        ScoreBreakdown::from(&self.get_recommendation(symbol).await)
    }
}
