use analysis_core::{Bar, IndicatorBundle, IndicatorCard, SignalColor, StockQuote};
use sentiment_analysis::weekly_change_pct;
use std::collections::BTreeMap;
use technical_analysis::last_value;

const EXPLANATIONS: &[(&str, &str)] = &[
    ("RSI", "Relative Strength Index measures if a stock is overbought (>70) or oversold (<30)"),
    ("Moving Average", "Compares current price to 20-day average to identify trends"),
    ("Volume", "Trading volume indicates investor interest and conviction"),
    ("Price Momentum", "Recent price movement direction shows market sentiment"),
    ("Volatility", "Price stability assessment helps gauge investment risk"),
    ("Market Cap", "Company size classification (Large/Mid/Small cap) affects stability"),
    ("P/E Ratio", "Price-to-Earnings ratio shows if stock is fairly valued"),
    ("52-Week Position", "Current price vs yearly range shows relative performance"),
    ("Dividend Yield", "Annual dividend payment as percentage of stock price"),
    ("Price Target", "Analyst estimate of fair value based on fundamentals"),
];

pub fn indicator_explanations() -> BTreeMap<String, String> {
    EXPLANATIONS
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect()
}

fn card(name: &str, value: String, status: &str, color: SignalColor) -> IndicatorCard {
    IndicatorCard {
        name: name.to_string(),
        value,
        status: status.to_string(),
        color,
    }
}

fn rsi_card(indicators: &IndicatorBundle) -> Option<IndicatorCard> {
    let rsi = last_value(&indicators.rsi)?;
    let (status, color) = if rsi < 30.0 {
        ("Oversold", SignalColor::Green)
    } else if rsi > 70.0 {
        ("Overbought", SignalColor::Red)
    } else {
        ("Neutral", SignalColor::Yellow)
    };
    Some(card("RSI", format!("{:.1}", rsi), status, color))
}

fn moving_average_card(price: f64, indicators: &IndicatorBundle) -> Option<IndicatorCard> {
    if price <= 0.0 {
        return None;
    }
    let sma = last_value(&indicators.sma).filter(|v| *v != 0.0)?;
    let diff = (price - sma) / sma * 100.0;
    let (status, color) = if diff > 2.0 {
        ("Above Trend", SignalColor::Green)
    } else if diff < -2.0 {
        ("Below Trend", SignalColor::Red)
    } else {
        ("On Trend", SignalColor::Yellow)
    };
    Some(card("Moving Average", format!("{:+.1}%", diff), status, color))
}

fn momentum_card(price: f64, history: &[Bar]) -> Option<IndicatorCard> {
    let change = weekly_change_pct(price, history)?;
    let status = if change > 5.0 {
        "Strong Up"
    } else if change < -5.0 {
        "Strong Down"
    } else if change > 0.0 {
        "Moderate Up"
    } else if change < 0.0 {
        "Moderate Down"
    } else {
        "Flat"
    };
    let color = if change > 0.0 {
        SignalColor::Green
    } else if change < 0.0 {
        SignalColor::Red
    } else {
        SignalColor::Yellow
    };
    Some(card("Price Momentum", format!("{:+.1}%", change), status, color))
}

fn market_cap_card(market_cap: f64) -> IndicatorCard {
    let (status, color) = if market_cap > 10_000_000_000.0 {
        ("Large Cap", SignalColor::Green)
    } else if market_cap > 2_000_000_000.0 {
        ("Mid Cap", SignalColor::Yellow)
    } else {
        ("Small Cap", SignalColor::Red)
    };
    card("Market Cap", format!("${:.1}B", market_cap / 1e9), status, color)
}

fn pe_card(pe_ratio: f64) -> Option<IndicatorCard> {
    if pe_ratio.is_nan() || pe_ratio <= 0.0 {
        return None;
    }
    let (status, color) = if pe_ratio < 15.0 {
        ("Undervalued", SignalColor::Green)
    } else if pe_ratio > 25.0 {
        ("Overvalued", SignalColor::Red)
    } else {
        ("Fair Value", SignalColor::Yellow)
    };
    Some(card("P/E Ratio", format!("{:.1}", pe_ratio), status, color))
}

fn range_position_card(quote: &StockQuote) -> Option<IndicatorCard> {
    let (price, high, low) = (
        quote.current_price,
        quote.fifty_two_week_high,
        quote.fifty_two_week_low,
    );
    if price <= 0.0 || high <= 0.0 || low <= 0.0 || high <= low {
        return None;
    }
    let position = (price - low) / (high - low) * 100.0;
    let status = if position > 80.0 {
        "Near High"
    } else if position < 20.0 {
        "Near Low"
    } else {
        "Mid Range"
    };
    let color = if (40.0..=80.0).contains(&position) {
        SignalColor::Green
    } else if position > 80.0 {
        SignalColor::Yellow
    } else {
        SignalColor::Red
    };
    Some(card("52-Week Position", format!("{:.0}%", position), status, color))
}

/// Last volume against the mean of bars `[n-10, n-5)`.
fn volume_card(history: &[Bar]) -> Option<IndicatorCard> {
    let n = history.len();
    if n < 10 {
        return None;
    }
    let baseline = history[n - 10..n - 5].iter().map(|b| b.volume).sum::<f64>() / 5.0;
    let current = history[n - 1].volume;
    let ratio = if baseline > 0.0 { current / baseline } else { 1.0 };

    let status = if ratio > 1.5 {
        "High Volume"
    } else if ratio < 0.5 {
        "Low Volume"
    } else {
        "Normal Volume"
    };
    let color = if ratio > 1.2 {
        SignalColor::Green
    } else if ratio < 0.8 {
        SignalColor::Red
    } else {
        SignalColor::Yellow
    };
    Some(card("Volume", format!("{:.1}x", ratio), status, color))
}

/// Indicator cards in display order. Cards whose inputs are missing are left
/// out; the market cap card is always present.
pub fn detailed_indicators(
    quote: &StockQuote,
    history: &[Bar],
    indicators: &IndicatorBundle,
) -> Vec<IndicatorCard> {
    let price = quote.current_price;
    let mut cards = Vec::with_capacity(7);

    cards.extend(rsi_card(indicators));
    cards.extend(moving_average_card(price, indicators));
    cards.extend(momentum_card(price, history));
    cards.push(market_cap_card(quote.market_cap));
    cards.extend(pe_card(quote.pe_ratio));
    cards.extend(range_position_card(quote));
    cards.extend(volume_card(history));

    cards
}
