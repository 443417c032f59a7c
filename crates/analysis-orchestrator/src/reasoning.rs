//! Picks the three reasons shown with a recommendation.
//!
//! Reasons from the three sub-scores are tagged with a topic category and a
//! polarity. Reasons agreeing with the action are preferred, strongest source
//! score first, and no two selected reasons share a category. Gaps are filled
//! with disagreeing reasons and finally with fixed phrases for the action.

use analysis_core::{Action, Dimension, SubScore};
use std::cmp::Ordering;

pub const REASON_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("momentum", &["rsi", "momentum", "oversold", "overbought"]),
    ("trend", &["sma", "trend", "price trend", "moving average"]),
    ("valuation", &["p/e", "valuation", "ratio"]),
    ("company_size", &["market cap", "company", "stability", "size"]),
    ("performance", &["performance", "gain", "change", "week"]),
    ("volume", &["volume", "trading"]),
];

const GENERAL_CATEGORY: &str = "general";

const TECHNICAL_POLARITY: &[(Polarity, &[&str])] = &[
    (Polarity::Positive, &["strong", "positive", "bullish", "oversold", "above"]),
    (Polarity::Negative, &["weak", "negative", "bearish", "overbought", "below"]),
];

const FUNDAMENTAL_POLARITY: &[(Polarity, &[&str])] = &[
    (Polarity::Positive, &["undervaluation", "reasonable", "large cap", "attractive"]),
    (Polarity::Negative, &["overvaluation", "elevated", "stretched", "risk"]),
];

const SENTIMENT_POLARITY: &[(Polarity, &[&str])] = &[
    (Polarity::Positive, &["gain", "positive", "stability", "strong"]),
    (Polarity::Negative, &["weak", "negative", "uncertainty", "weakness"]),
];

const JARGON: &[(&str, &str)] = &[
    ("RSI at", "Market momentum shows"),
    ("P/E ratio of", "Stock valuation at"),
    ("SMA", "price trend"),
    ("indicates oversold conditions", "suggests buying opportunity"),
    ("indicates overbought conditions", "suggests selling opportunity"),
    ("suggests undervaluation", "appears undervalued"),
    ("suggests overvaluation", "appears overvalued"),
    ("bullish trend", "upward trend"),
    ("bearish trend", "downward trend"),
];

const BUY_FALLBACK: [&str; REASON_COUNT] = [
    "Technical indicators suggest potential upside",
    "Market fundamentals appear favorable",
    "Recent price action shows strength",
];

const SELL_FALLBACK: [&str; REASON_COUNT] = [
    "Market conditions indicate caution advised",
    "Technical signals suggest downside risk",
    "Valuation metrics appear stretched",
];

pub fn categorize(reason: &str) -> &'static str {
    let lower = reason.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(GENERAL_CATEGORY, |(category, _)| *category)
}

/// Polarity of a reason under its source dimension's keyword table. Positive
/// keywords win when both match.
pub fn polarity(dimension: Dimension, reason: &str) -> Option<Polarity> {
    let table = match dimension {
        Dimension::Technical => TECHNICAL_POLARITY,
        Dimension::Fundamental => FUNDAMENTAL_POLARITY,
        Dimension::Sentiment => SENTIMENT_POLARITY,
    };
    let lower = reason.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(polarity, _)| *polarity)
}

/// Replace analyst jargon with plain wording and capitalize the first letter.
pub fn simplify(reason: &str) -> String {
    let replaced = JARGON
        .iter()
        .fold(reason.to_string(), |text, (from, to)| text.replace(from, to));

    let mut chars = replaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

struct Candidate<'a> {
    text: &'a str,
    polarity: Polarity,
    source_score: f64,
    category: &'static str,
}

fn fallback_phrases(action: Action) -> &'static [&'static str] {
    match action {
        Action::Sell => &SELL_FALLBACK,
        Action::Buy | Action::Hold => &BUY_FALLBACK,
    }
}

/// Greedy pass over `pool`, skipping used categories and repeated text.
fn take_distinct(pool: &[&Candidate<'_>], used: &mut Vec<&'static str>, selected: &mut Vec<String>) {
    for candidate in pool {
        if selected.len() >= REASON_COUNT {
            break;
        }
        if used.contains(&candidate.category) {
            continue;
        }
        let simplified = simplify(candidate.text);
        if simplified.is_empty() || selected.contains(&simplified) {
            continue;
        }
        selected.push(simplified);
        used.push(candidate.category);
    }
}

/// Exactly three reasons for `action`, drawn from the sub-scores in the order
/// given (technical, fundamental, sentiment).
pub fn select_reasons(action: Action, sub_scores: &[&SubScore]) -> Vec<String> {
    let candidates: Vec<Candidate<'_>> = sub_scores
        .iter()
        .flat_map(|sub| {
            sub.reasoning.iter().filter_map(move |text| {
                polarity(sub.dimension, text).map(|polarity| Candidate {
                    text,
                    polarity,
                    source_score: sub.score,
                    category: categorize(text),
                })
            })
        })
        .collect();

    let target = if action == Action::Sell {
        Polarity::Negative
    } else {
        Polarity::Positive
    };
    let descending = |a: &&Candidate<'_>, b: &&Candidate<'_>| {
        b.source_score.partial_cmp(&a.source_score).unwrap_or(Ordering::Equal)
    };
    let ascending = |a: &&Candidate<'_>, b: &&Candidate<'_>| {
        a.source_score.partial_cmp(&b.source_score).unwrap_or(Ordering::Equal)
    };

    let (mut matching, mut others): (Vec<&Candidate<'_>>, Vec<&Candidate<'_>>) =
        candidates.iter().partition(|c| c.polarity == target);

    // sort_by is stable, so ties keep collection order
    if target == Polarity::Positive {
        matching.sort_by(descending);
        others.sort_by(ascending);
    } else {
        matching.sort_by(ascending);
        others.sort_by(descending);
    }

    let mut used: Vec<&'static str> = Vec::new();
    let mut selected: Vec<String> = Vec::with_capacity(REASON_COUNT);
    take_distinct(&matching, &mut used, &mut selected);
    take_distinct(&others, &mut used, &mut selected);

    for phrase in fallback_phrases(action) {
        if selected.len() >= REASON_COUNT {
            break;
        }
        if !selected.iter().any(|s| s == phrase) {
            selected.push(phrase.to_string());
        }
    }

    selected
}
