//! Market data collaborators: the Yahoo Finance client, the synthetic
//! fallback provider and the news payload generator.

use analysis_core::ChartPeriod;

pub mod fallback;
pub mod news;
pub mod yahoo;

pub use fallback::{fallback_quote, synthetic_chart, synthetic_history, FallbackProvider};
pub use news::NewsService;
pub use yahoo::{YahooFinanceClient, DEFAULT_BASE_URL};

/// Upstream request parameters for a chart period, plus the number of points
/// the synthetic generator produces for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartWindow {
    pub range: &'static str,
    pub interval: &'static str,
    pub synthetic_points: usize,
}

pub fn chart_window(period: ChartPeriod) -> ChartWindow {
    let (range, interval, synthetic_points) = match period {
        ChartPeriod::OneDay => ("1d", "5m", 78),
        ChartPeriod::OneWeek => ("5d", "1h", 35),
        ChartPeriod::OneMonth => ("1mo", "1d", 30),
        ChartPeriod::ThreeMonths => ("3mo", "1d", 90),
        ChartPeriod::SixMonths => ("6mo", "1d", 180),
        ChartPeriod::OneYear => ("1y", "1d", 365),
        ChartPeriod::FiveYears => ("5y", "1d", 1825),
    };
    ChartWindow {
        range,
        interval,
        synthetic_points,
    }
}

/// Smallest upstream range covering `days` daily bars.
pub fn history_range(days: usize) -> &'static str {
    match days {
        0..=7 => "5d",
        8..=30 => "1mo",
        31..=90 => "3mo",
        _ => "1y",
    }
}
