//! Indicator series packaged for the dashboard charts.

use analysis_core::{AnalysisError, Bar, ChartPeriod, IndicatorSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::{MOMENTUM_RSI_PERIOD, TREND_SMA_PERIOD};
use crate::indicators::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSeries {
    pub values: IndicatorSeries,
    pub period: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisIndicators {
    pub sma: PeriodSeries,
    pub rsi: PeriodSeries,
}

/// Basic analysis: closing prices with SMA-20 and RSI-14.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
    pub indicators: AnalysisIndicators,
}

pub fn analyze_stock(symbol: &str, bars: &[Bar]) -> Result<StockAnalysis, AnalysisError> {
    if bars.is_empty() {
        return Err(AnalysisError::InsufficientData(format!(
            "No data available for analysis of {}",
            symbol.to_uppercase()
        )));
    }

    let prices: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let dates = bars
        .iter()
        .map(|b| b.timestamp.format("%Y-%m-%d").to_string())
        .collect();

    Ok(StockAnalysis {
        symbol: symbol.to_uppercase(),
        dates,
        indicators: AnalysisIndicators {
            sma: PeriodSeries {
                values: sma(&prices, TREND_SMA_PERIOD),
                period: TREND_SMA_PERIOD,
            },
            rsi: PeriodSeries {
                values: rsi(&prices, MOMENTUM_RSI_PERIOD),
                period: MOMENTUM_RSI_PERIOD,
            },
        },
        prices,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub sma_20: IndicatorSeries,
    pub sma_50: IndicatorSeries,
    pub sma_200: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub ema_12: IndicatorSeries,
    pub ema_26: IndicatorSeries,
    pub macd_line: IndicatorSeries,
    pub macd_signal: IndicatorSeries,
    pub bollinger_upper: IndicatorSeries,
    pub bollinger_middle: IndicatorSeries,
    pub bollinger_lower: IndicatorSeries,
}

/// Secondary chart: every indicator series aligned with the price line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalChart {
    pub symbol: String,
    pub period: ChartPeriod,
    pub dates: Vec<DateTime<Utc>>,
    pub price: Vec<f64>,
    pub indicators: TechnicalIndicators,
    pub last_updated: DateTime<Utc>,
}

pub fn technical_chart(symbol: &str, period: ChartPeriod, bars: &[Bar]) -> TechnicalChart {
    let price: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let dates = bars.iter().map(|b| b.timestamp).collect();

    let ema_12 = ema(&price, 12);
    let ema_26 = ema(&price, 26);
    let macd_result = macd(&ema_12, &ema_26);
    let bb = bollinger_bands(&price, 20, 2.0);

    let indicators = TechnicalIndicators {
        sma_20: sma(&price, 20),
        sma_50: sma(&price, 50),
        sma_200: sma(&price, 200),
        rsi: rsi(&price, 14),
        ema_12,
        ema_26,
        macd_line: macd_result.macd_line,
        macd_signal: macd_result.signal_line,
        bollinger_upper: bb.upper,
        bollinger_middle: bb.middle,
        bollinger_lower: bb.lower,
    };

    TechnicalChart {
        symbol: symbol.to_uppercase(),
        period,
        dates,
        price,
        indicators,
        last_updated: Utc::now(),
    }
}
