//! Indicator library over closing prices.
//!
//! Every function returns a series of the same length as its input, with `None`
//! inside the warm-up window. Inputs shorter than the period (or a zero period)
//! produce an all-`None` series.

use analysis_core::{stats, IndicatorSeries};

/// Signal line period applied to the MACD line.
pub const MACD_SIGNAL_PERIOD: usize = 9;

fn empty_series(len: usize) -> IndicatorSeries {
    vec![None; len]
}

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || data.len() < period {
        return empty_series(data.len());
    }

    let mut result = empty_series(data.len());
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result[i] = Some(sum / period as f64);
    }
    result
}

/// Exponential Moving Average, seeded with the SMA of the first `period` values.
pub fn ema(data: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || data.len() < period {
        return empty_series(data.len());
    }

    let mut result = empty_series(data.len());
    let multiplier = 2.0 / (period as f64 + 1.0);

    let seed = data[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(seed);

    let mut prev = seed;
    for i in period..data.len() {
        let value = data[i] * multiplier + prev * (1.0 - multiplier);
        result[i] = Some(value);
        prev = value;
    }

    result
}

/// Relative Strength Index from rolling means of gains and losses.
///
/// The first delta has no prior price and counts as zero, so values start at
/// index `period - 1`. A window with losses of zero saturates at 100; a window
/// with no movement at all has no defined RSI and yields `None`.
pub fn rsi(data: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 || data.len() < period + 1 {
        return empty_series(data.len());
    }

    let mut gains = Vec::with_capacity(data.len());
    let mut losses = Vec::with_capacity(data.len());
    gains.push(0.0);
    losses.push(0.0);

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let mut result = empty_series(data.len());
    for i in period - 1..data.len() {
        let window = i + 1 - period..=i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;

        result[i] = if avg_loss == 0.0 {
            if avg_gain > 0.0 {
                Some(100.0)
            } else {
                None
            }
        } else {
            let rs = avg_gain / avg_loss;
            Some(100.0 - (100.0 / (1.0 + rs)))
        };
    }

    result
}

/// MACD (Moving Average Convergence Divergence)
#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub macd_line: IndicatorSeries,
    pub signal_line: IndicatorSeries,
}

/// MACD line from precomputed fast and slow EMAs.
///
/// The signal line is the EMA of the defined MACD values only, left-padded with
/// `None` so it stays aligned with the price sequence.
pub fn macd(ema_fast: &[Option<f64>], ema_slow: &[Option<f64>]) -> MacdResult {
    let macd_line: IndicatorSeries = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(fast, slow)| match (fast, slow) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let compact: Vec<f64> = macd_line.iter().flatten().copied().collect();
    let compact_signal = ema(&compact, MACD_SIGNAL_PERIOD);

    let mut signal_line = empty_series(macd_line.len() - compact_signal.len());
    signal_line.extend(compact_signal);

    MacdResult {
        macd_line,
        signal_line,
    }
}

/// Bollinger Bands
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

/// Bands at `std_dev` population standard deviations around the SMA.
pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let middle = sma(data, period);
    let mut upper = empty_series(data.len());
    let mut lower = empty_series(data.len());

    for (i, mean) in middle.iter().enumerate() {
        let Some(mean) = *mean else { continue };
        let std = stats::population_std_dev(&data[i + 1 - period..=i]);

        upper[i] = Some(mean + std_dev * std);
        lower[i] = Some(mean - std_dev * std);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Most recent defined value of a series.
pub fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}
