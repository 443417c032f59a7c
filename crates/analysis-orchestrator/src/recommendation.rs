use analysis_core::{
    stats, Action, Bar, Dimension, Recommendation, RiskLevel, SignalColor, StockQuote, SubScore,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Composite score at or above which the action is BUY.
pub const BUY_THRESHOLD: f64 = 6.0;

const STAR_SCALE: f64 = 1.25;
const SMALL_CAP_LIMIT: f64 = 2_000_000_000.0;
const VOLATILITY_WINDOW: usize = 10;
const VOLATILITY_LIMIT: f64 = 0.15;

/// Weighted composite of the three sub-scores, kept at full precision.
pub fn composite_score(technical: &SubScore, fundamental: &SubScore, sentiment: &SubScore) -> f64 {
    technical.score * Dimension::Technical.weight()
        + fundamental.score * Dimension::Fundamental.weight()
        + sentiment.score * Dimension::Sentiment.weight()
}

/// BUY at or above the threshold, SELL below. Stars truncate toward zero and
/// are clamped to 1..=5.
pub fn decide(score: f64) -> (Action, u8, SignalColor) {
    let (action, raw, color) = if score >= BUY_THRESHOLD {
        (Action::Buy, (score - 5.0) * STAR_SCALE, SignalColor::Green)
    } else {
        (Action::Sell, (BUY_THRESHOLD - score) * STAR_SCALE, SignalColor::Red)
    };
    let stars = (raw.trunc() as i64).clamp(1, 5) as u8;
    (action, stars, color)
}

/// Confidence from how closely the sub-scores agree.
pub fn confidence(scores: &[f64]) -> u8 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;

    if range < 1.5 {
        95
    } else if range < 2.5 {
        85
    } else if range < 3.5 {
        75
    } else {
        65
    }
}

pub fn price_target(current_price: f64, score: f64) -> f64 {
    let multiplier = if score >= 8.0 {
        1.15
    } else if score >= 6.0 {
        1.075
    } else if score >= 4.0 {
        1.0
    } else {
        0.925
    };
    stats::round_to(current_price * multiplier, 2)
}

/// One risk factor for a small company and one for a wide trailing range.
pub fn assess_risk(quote: &StockQuote, history: &[Bar]) -> RiskLevel {
    let mut factors = 0;

    if quote.market_cap < SMALL_CAP_LIMIT {
        factors += 1;
    }

    if history.len() >= VOLATILITY_WINDOW {
        let closes: Vec<f64> = history[history.len() - VOLATILITY_WINDOW..]
            .iter()
            .map(|b| b.close)
            .collect();
        if stats::relative_range(&closes).is_some_and(|r| r > VOLATILITY_LIMIT) {
            factors += 1;
        }
    }

    match factors {
        0 => RiskLevel::Low,
        1 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

pub const FALLBACK_REASONS: [&str; 3] = [
    "Insufficient data for analysis",
    "Market conditions unclear",
    "Consider waiting for more information",
];

/// Neutral HOLD returned when a recommendation cannot be computed.
pub fn fallback_recommendation(symbol: &str) -> Recommendation {
    Recommendation {
        symbol: symbol.to_uppercase(),
        action: Action::Hold,
        stars: 3,
        confidence: 60,
        color: SignalColor::Yellow,
        reasoning: FALLBACK_REASONS.iter().map(|r| r.to_string()).collect(),
        indicators: Vec::new(),
        indicator_explanations: BTreeMap::new(),
        price_target: 100.0,
        risk_level: RiskLevel::Medium,
        overall_score: 5.0,
        timestamp: Utc::now(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimarySignal {
    pub action: Action,
    pub color: SignalColor,
    pub icon: String,
}

/// Compact signal view of a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignals {
    pub symbol: String,
    pub primary_signal: PrimarySignal,
    pub score: f64,
    pub confidence: u8,
    pub risk_level: RiskLevel,
    pub stars: u8,
    pub reasoning: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&Recommendation> for TradingSignals {
    fn from(rec: &Recommendation) -> Self {
        let icon = if rec.action == Action::Buy { "🟢" } else { "🔴" };
        Self {
            symbol: rec.symbol.clone(),
            primary_signal: PrimarySignal {
                action: rec.action,
                color: rec.color,
                icon: icon.to_string(),
            },
            score: rec.overall_score,
            confidence: rec.confidence,
            risk_level: rec.risk_level,
            stars: rec.stars,
            reasoning: rec.reasoning.clone(),
            timestamp: rec.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Methodology {
    pub scoring_scale: String,
    pub decision_threshold: String,
    pub confidence_factors: String,
}

impl Default for Methodology {
    fn default() -> Self {
        Self {
            scoring_scale: "Simplified 1-5 star rating".to_string(),
            decision_threshold: "6.0+ = BUY, <6.0 = SELL".to_string(),
            confidence_factors: "Signal agreement and data quality".to_string(),
        }
    }
}

/// Score breakdown view of a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub symbol: String,
    pub overall_score: f64,
    pub action: Action,
    pub stars: u8,
    pub confidence: u8,
    pub simplified_reasoning: Vec<String>,
    pub price_target: f64,
    pub risk_level: RiskLevel,
    pub methodology: Methodology,
    pub timestamp: DateTime<Utc>,
}

impl From<&Recommendation> for ScoreBreakdown {
    fn from(rec: &Recommendation) -> Self {
        Self {
            symbol: rec.symbol.clone(),
            overall_score: rec.overall_score,
            action: rec.action,
            stars: rec.stars,
            confidence: rec.confidence,
            simplified_reasoning: rec.reasoning.clone(),
            price_target: rec.price_target,
            risk_level: rec.risk_level,
            methodology: Methodology::default(),
            timestamp: rec.timestamp,
        }
    }
}
