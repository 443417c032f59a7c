//! Stock data and analysis routes under `/stocks/:symbol`.

use analysis_core::{Bar, ChartInterval, ChartPeriod, NewsPayload, Recommendation, StockQuote};
use analysis_orchestrator::{ScoreBreakdown, TradingSignals};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use technical_analysis::{StockAnalysis, TechnicalChart};

use crate::validation::{parse_interval, parse_period, validate_days, validate_symbol};
use crate::{AppError, AppState};

const DEFAULT_HISTORY_DAYS: usize = 30;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub period: Option<String>,
    pub interval: Option<String>,
}

/// Daily price bar as served by the history endpoint.
#[derive(Debug, Serialize)]
pub struct PriceBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&Bar> for PriceBar {
    fn from(bar: &Bar) -> Self {
        Self {
            date: bar.timestamp.format("%Y-%m-%d").to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: whole_volume(bar.volume),
        }
    }
}

fn whole_volume(volume: f64) -> u64 {
    volume.max(0.0).round() as u64
}

/// One OHLCV point in the short-key form chart widgets consume.
#[derive(Debug, Serialize)]
pub struct ChartPoint {
    pub x: DateTime<Utc>,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    pub v: u64,
}

impl From<&Bar> for ChartPoint {
    fn from(bar: &Bar) -> Self {
        Self {
            x: bar.timestamp,
            o: bar.open,
            h: bar.high,
            l: bar.low,
            c: bar.close,
            v: whole_volume(bar.volume),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChartData {
    pub symbol: String,
    pub period: ChartPeriod,
    pub interval: ChartInterval,
    pub data: Vec<ChartPoint>,
    pub data_points: usize,
    pub last_updated: DateTime<Utc>,
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/stocks/:symbol", get(get_quote))
        .route("/stocks/:symbol/history", get(get_history))
        .route("/stocks/:symbol/chart-data", get(get_chart_data))
        .route("/stocks/:symbol/news", get(get_news))
        .route("/stocks/:symbol/analysis", get(get_analysis))
        .route("/stocks/:symbol/recommendation", get(get_recommendation))
        .route("/stocks/:symbol/technical-chart", get(get_technical_chart))
        .route("/stocks/:symbol/signals", get(get_signals))
        .route("/stocks/:symbol/score-breakdown", get(get_score_breakdown))
}

fn not_found(e: impl std::fmt::Display) -> AppError {
    AppError::with_status(StatusCode::NOT_FOUND, anyhow::anyhow!(e.to_string()))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockQuote>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    let quote = state.orchestrator.get_quote(&symbol).await.map_err(not_found)?;
    Ok(Json(quote))
}

/// Day-based history unless a non-default period or interval was asked for.
async fn get_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<PriceBar>>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    let days = match query.days.as_deref() {
        None => DEFAULT_HISTORY_DAYS,
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            AppError::with_status(
                StatusCode::BAD_REQUEST,
                anyhow::anyhow!("days must be a whole number, got '{}'", raw),
            )
        })?,
    };
    let days = validate_days(days)?;
    let period = parse_period(query.period.as_deref())?;
    let interval = parse_interval(query.interval.as_deref())?;

    let bars = if period != ChartPeriod::default() || interval != ChartInterval::default() {
        tracing::debug!("History for {} by period {} ({})", symbol, period, interval);
        state.orchestrator.get_period_history(&symbol, period).await
    } else {
        state.orchestrator.get_history(&symbol, days).await
    }
    .map_err(not_found)?;

    Ok(Json(bars.iter().map(PriceBar::from).collect()))
}

async fn get_chart_data(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartData>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    let period = parse_period(query.period.as_deref())?;
    let interval = parse_interval(query.interval.as_deref())?;

    let bars = state
        .orchestrator
        .get_period_history(&symbol, period)
        .await
        .map_err(not_found)?;
    let data: Vec<ChartPoint> = bars.iter().map(ChartPoint::from).collect();

    Ok(Json(ChartData {
        symbol,
        period,
        interval,
        data_points: data.len(),
        data,
        last_updated: Utc::now(),
    }))
}

async fn get_news(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<NewsPayload>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    Ok(Json(state.orchestrator.get_news(&symbol)))
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockAnalysis>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    let analysis = state.orchestrator.analyze_stock(&symbol).await.map_err(not_found)?;
    Ok(Json(analysis))
}

async fn get_recommendation(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Recommendation>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    Ok(Json(state.orchestrator.get_recommendation(&symbol).await))
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

async fn get_technical_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<TechnicalChart>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    let period = parse_period(query.period.as_deref())?;
    let chart = state
        .orchestrator
        .technical_chart(&symbol, period)
        .await
        .map_err(not_found)?;
    Ok(Json(chart))
}

async fn get_signals(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<TradingSignals>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    Ok(Json(state.orchestrator.get_signals(&symbol).await))
}

async fn get_score_breakdown(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ScoreBreakdown>, AppError> {
    let symbol = validate_symbol(&symbol)?;
    Ok(Json(state.orchestrator.get_score_breakdown(&symbol).await))
}
