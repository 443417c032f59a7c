use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Quote snapshot as normalized from the upstream provider.
///
/// Numeric fields the provider does not report are 0.0. A `pe_ratio` of zero or
/// below means "not available".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub currency: String,
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
}

/// A named numeric series aligned 1:1 with the price sequence. `None` marks
/// positions inside the warm-up window.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Indicators consumed by the sub-score calculators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub sma: IndicatorSeries,
    pub sma_period: usize,
    pub rsi: IndicatorSeries,
    pub rsi_period: usize,
}

/// Scoring dimension. Weights are fixed and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Technical,
    Fundamental,
    Sentiment,
}

impl Dimension {
    pub fn weight(&self) -> f64 {
        match self {
            Dimension::Technical => 0.40,
            Dimension::Fundamental => 0.35,
            Dimension::Sentiment => 0.25,
        }
    }
}

/// Score for one dimension, 0–10, with its reasons in computed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub dimension: Dimension,
    pub score: f64,
    pub reasoning: Vec<String>,
    pub weight: f64,
}

impl SubScore {
    /// Neutral prior used when a dimension has nothing to go on.
    pub const NEUTRAL: f64 = 5.0;

    pub fn new(dimension: Dimension, score: f64, reasoning: Vec<String>) -> Self {
        Self {
            dimension,
            score,
            reasoning,
            weight: dimension.weight(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color token the frontend maps to its palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalColor {
    Green,
    Red,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// One indicator card shown next to the recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCard {
    pub name: String,
    pub value: String,
    pub status: String,
    pub color: SignalColor,
}

/// Simplified recommendation returned to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    pub action: Action,
    pub stars: u8,
    pub confidence: u8,
    pub color: SignalColor,
    pub reasoning: Vec<String>,
    pub indicators: Vec<IndicatorCard>,
    pub indicator_explanations: BTreeMap<String, String>,
    pub price_target: f64,
    pub risk_level: RiskLevel,
    pub overall_score: f64,
    pub timestamp: DateTime<Utc>,
}

/// Chart window accepted by the history and chart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl ChartPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::OneDay => "1d",
            ChartPeriod::OneWeek => "1w",
            ChartPeriod::OneMonth => "1m",
            ChartPeriod::ThreeMonths => "3m",
            ChartPeriod::SixMonths => "6m",
            ChartPeriod::OneYear => "1y",
            ChartPeriod::FiveYears => "5y",
        }
    }

    /// Calendar days covered, used when falling back to day-based history.
    pub fn days(&self) -> usize {
        match self {
            ChartPeriod::OneDay => 1,
            ChartPeriod::OneWeek => 7,
            ChartPeriod::OneMonth => 30,
            ChartPeriod::ThreeMonths => 90,
            ChartPeriod::SixMonths => 180,
            ChartPeriod::OneYear => 365,
            ChartPeriod::FiveYears => 1825,
        }
    }
}

impl Default for ChartPeriod {
    fn default() -> Self {
        ChartPeriod::OneMonth
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(ChartPeriod::OneDay),
            "1w" => Ok(ChartPeriod::OneWeek),
            "1m" => Ok(ChartPeriod::OneMonth),
            "3m" => Ok(ChartPeriod::ThreeMonths),
            "6m" => Ok(ChartPeriod::SixMonths),
            "1y" => Ok(ChartPeriod::OneYear),
            "5y" => Ok(ChartPeriod::FiveYears),
            other => Err(format!("Unsupported period '{}'", other)),
        }
    }
}

/// Bar interval accepted by the chart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl ChartInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::OneMinute => "1m",
            ChartInterval::FiveMinutes => "5m",
            ChartInterval::FifteenMinutes => "15m",
            ChartInterval::OneHour => "1h",
            ChartInterval::OneDay => "1d",
        }
    }
}

impl Default for ChartInterval {
    fn default() -> Self {
        ChartInterval::OneDay
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(ChartInterval::OneMinute),
            "5m" => Ok(ChartInterval::FiveMinutes),
            "15m" => Ok(ChartInterval::FifteenMinutes),
            "1h" => Ok(ChartInterval::OneHour),
            "1d" => Ok(ChartInterval::OneDay),
            other => Err(format!("Unsupported interval '{}'", other)),
        }
    }
}

/// Single news item in the news payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub source: String,
    pub published: DateTime<Utc>,
    pub summary: String,
    pub url: String,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsPayload {
    pub symbol: String,
    pub company_name: String,
    pub news_count: usize,
    pub news: Vec<NewsItem>,
    pub last_updated: DateTime<Utc>,
    pub source: String,
}
