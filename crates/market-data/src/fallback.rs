//! Synthetic market data served when the upstream provider fails.

use analysis_core::{stats, AnalysisError, Bar, ChartPeriod, MarketDataProvider, StockQuote};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::chart_window;

struct KnownQuote {
    symbol: &'static str,
    name: &'static str,
    current_price: f64,
    previous_close: f64,
    market_cap: f64,
    pe_ratio: f64,
    dividend_yield: f64,
    fifty_two_week_high: f64,
    fifty_two_week_low: f64,
}

const KNOWN_QUOTES: &[KnownQuote] = &[
    KnownQuote {
        symbol: "AAPL",
        name: "Apple Inc.",
        current_price: 203.92,
        previous_close: 200.63,
        market_cap: 3_045_708_267_520.0,
        pe_ratio: 25.5,
        dividend_yield: 0.0065,
        fifty_two_week_high: 250.0,
        fifty_two_week_low: 164.0,
    },
    KnownQuote {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        current_price: 470.38,
        previous_close: 467.68,
        market_cap: 3_500_000_000_000.0,
        pe_ratio: 28.2,
        dividend_yield: 0.0072,
        fifty_two_week_high: 490.0,
        fifty_two_week_low: 362.0,
    },
    KnownQuote {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        current_price: 173.68,
        previous_close: 168.21,
        market_cap: 2_114_328_199_168.0,
        pe_ratio: 22.8,
        dividend_yield: 0.0,
        fifty_two_week_high: 193.0,
        fifty_two_week_low: 129.0,
    },
    KnownQuote {
        symbol: "AMZN",
        name: "Amazon.com, Inc.",
        current_price: 213.57,
        previous_close: 207.91,
        market_cap: 2_267_344_535_552.0,
        pe_ratio: 45.2,
        dividend_yield: 0.0,
        fifty_two_week_high: 230.0,
        fifty_two_week_low: 139.0,
    },
    KnownQuote {
        symbol: "TSLA",
        name: "Tesla, Inc.",
        current_price: 295.14,
        previous_close: 284.70,
        market_cap: 950_634_151_936.0,
        pe_ratio: 85.4,
        dividend_yield: 0.0,
        fifty_two_week_high: 488.0,
        fifty_two_week_low: 138.0,
    },
];

const GENERIC_BASE_PRICE: f64 = 100.0;

fn known(symbol: &str) -> Option<&'static KnownQuote> {
    let symbol = symbol.to_uppercase();
    KNOWN_QUOTES.iter().find(|q| q.symbol == symbol)
}

/// Starting price of the synthetic walk for `symbol`.
pub fn base_price(symbol: &str) -> f64 {
    known(symbol).map_or(GENERIC_BASE_PRICE, |q| q.current_price)
}

/// Quote from the known-symbol table, or a generic mid-size profile.
pub fn fallback_quote(symbol: &str) -> StockQuote {
    let upper = symbol.to_uppercase();
    match known(&upper) {
        Some(q) => StockQuote {
            symbol: upper,
            name: q.name.to_string(),
            current_price: q.current_price,
            previous_close: q.previous_close,
            currency: "USD".to_string(),
            market_cap: q.market_cap,
            pe_ratio: q.pe_ratio,
            dividend_yield: q.dividend_yield,
            fifty_two_week_high: q.fifty_two_week_high,
            fifty_two_week_low: q.fifty_two_week_low,
        },
        None => StockQuote {
            name: format!("{} Corporation", upper),
            symbol: upper,
            current_price: GENERIC_BASE_PRICE,
            previous_close: 99.5,
            currency: "USD".to_string(),
            market_cap: 1_000_000_000.0,
            pe_ratio: 20.0,
            dividend_yield: 0.02,
            fifty_two_week_high: 110.0,
            fifty_two_week_low: 90.0,
        },
    }
}

/// Daily random walk of `days` bars with moves of up to 5% per day, ending
/// today.
pub fn synthetic_history<R: Rng + ?Sized>(symbol: &str, days: usize, rng: &mut R) -> Vec<Bar> {
    let start = Utc::now() - Duration::days(days as i64);
    let mut price = base_price(symbol);

    (0..days)
        .map(|i| {
            price *= 1.0 + rng.gen_range(-0.05..=0.05);
            Bar {
                timestamp: start + Duration::days(i as i64),
                open: stats::round_to(price * 0.995, 2),
                high: stats::round_to(price * 1.02, 2),
                low: stats::round_to(price * 0.98, 2),
                close: stats::round_to(price, 2),
                volume: rng.gen_range(1_000_000..=10_000_000) as f64,
            }
        })
        .collect()
}

/// Random OHLC walk shaped for a chart period: 5-minute bars from the open for
/// one day, hourly bars for one week, daily bars otherwise.
pub fn synthetic_chart<R: Rng + ?Sized>(symbol: &str, period: ChartPeriod, rng: &mut R) -> Vec<Bar> {
    let points = chart_window(period).synthetic_points;
    let now = Utc::now();

    let (start, step, volatility) = match period {
        ChartPeriod::OneDay => {
            let open = now
                .date_naive()
                .and_hms_opt(9, 30, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or(now);
            (open, Duration::minutes(5), 0.02)
        }
        ChartPeriod::OneWeek => (now - Duration::days(7), Duration::hours(1), 0.02),
        _ => (now - Duration::days(points as i64), Duration::days(1), 0.05),
    };

    let mut price = base_price(symbol);
    let mut bars = Vec::with_capacity(points);
    for i in 0..points {
        price *= 1.0 + rng.gen_range(-volatility..=volatility);

        let open = price;
        let high = open * (1.0 + rng.gen_range(0.0..=volatility / 2.0));
        let low = open * (1.0 - rng.gen_range(0.0..=volatility / 2.0));
        let close = rng.gen_range(low..=high);

        bars.push(Bar {
            timestamp: start + step * i as i32,
            open: stats::round_to(open, 2),
            high: stats::round_to(high, 2),
            low: stats::round_to(low, 2),
            close: stats::round_to(close, 2),
            volume: rng.gen_range(100_000..=5_000_000) as f64,
        });
        price = close;
    }
    bars
}

fn history_fallback(symbol: &str, days: usize) -> Vec<Bar> {
    synthetic_history(symbol, days, &mut rand::thread_rng())
}

fn chart_fallback(symbol: &str, period: ChartPeriod) -> Vec<Bar> {
    synthetic_chart(symbol, period, &mut rand::thread_rng())
}

/// Wraps a primary provider and substitutes synthetic data for any failure.
pub struct FallbackProvider<P> {
    primary: P,
}

impl<P: MarketDataProvider> FallbackProvider<P> {
    pub fn new(primary: P) -> Self {
        Self { primary }
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for FallbackProvider<P> {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, AnalysisError> {
        match self.primary.get_quote(symbol).await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                tracing::warn!("Quote fetch failed for {}: {}. Using fallback data", symbol, e);
                Ok(fallback_quote(symbol))
            }
        }
    }

    async fn get_history(&self, symbol: &str, days: usize) -> Result<Vec<Bar>, AnalysisError> {
        match self.primary.get_history(symbol, days).await {
            Ok(bars) if !bars.is_empty() => Ok(bars),
            Ok(_) => {
                tracing::warn!("Empty history for {}. Using fallback data", symbol);
                Ok(history_fallback(symbol, days))
            }
            Err(e) => {
                tracing::warn!("History fetch failed for {}: {}. Using fallback data", symbol, e);
                Ok(history_fallback(symbol, days))
            }
        }
    }

    async fn get_chart(&self, symbol: &str, period: ChartPeriod) -> Result<Vec<Bar>, AnalysisError> {
        match self.primary.get_chart(symbol, period).await {
            Ok(bars) if !bars.is_empty() => Ok(bars),
            Ok(_) => {
                tracing::warn!("Empty {} chart for {}. Using fallback data", period, symbol);
                Ok(chart_fallback(symbol, period))
            }
            Err(e) => {
                tracing::warn!("Chart fetch failed for {} ({}): {}. Using fallback data", symbol, period, e);
                Ok(chart_fallback(symbol, period))
            }
        }
    }
}
