use analysis_core::{AnalysisError, Bar, ChartPeriod, MarketDataProvider, StockQuote};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::{chart_window, history_range};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

const MAX_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send a request, retrying when Yahoo answers 429.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, AnalysisError> {
        let request = builder.build().map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        for attempt in 0..MAX_ATTEMPTS {
            let req_clone = request
                .try_clone()
                .ok_or_else(|| AnalysisError::ApiError("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 2u64.pow(attempt);
            tracing::warn!(
                "Yahoo 429 rate limited, waiting {}s before retry {}/{}",
                wait_secs,
                attempt + 1,
                MAX_ATTEMPTS
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(AnalysisError::ApiError(format!(
            "Rate limited by Yahoo after {} retries",
            MAX_ATTEMPTS
        )))
    }

    async fn get_json(&self, builder: reqwest::RequestBuilder) -> Result<Value, AnalysisError> {
        let response = self.send_request(builder).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::ApiError(format!("Yahoo returned HTTP {}", status)));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))
    }

    pub async fn fetch_chart(&self, symbol: &str, range: &str, interval: &str) -> Result<Vec<Bar>, AnalysisError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        tracing::debug!("Fetching Yahoo chart for {} (range={}, interval={})", symbol, range, interval);

        let json = self
            .get_json(self.client.get(&url).query(&[("range", range), ("interval", interval)]))
            .await?;
        let bars = parse_chart(&json)?;
        if bars.is_empty() {
            return Err(AnalysisError::ApiError(format!("No chart data found for {}", symbol)));
        }
        Ok(bars)
    }
}

/// Normalize a `/v7/finance/quote` response. The price falls back to the
/// previous close when the market price is missing.
pub fn parse_quote(symbol: &str, json: &Value) -> Result<StockQuote, AnalysisError> {
    let data = json
        .get("quoteResponse")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| AnalysisError::ApiError(format!("No quote data found for {}", symbol)))?;

    let number = |key: &str| data.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0);
    let text = |key: &str| data.get(key).and_then(|v| v.as_str()).map(str::to_string);

    let previous_close = number("regularMarketPreviousClose");
    let mut current_price = number("regularMarketPrice");
    if current_price == 0.0 {
        current_price = previous_close;
    }
    if current_price <= 0.0 {
        return Err(AnalysisError::ApiError(format!("No price available for {}", symbol)));
    }

    Ok(StockQuote {
        symbol: symbol.to_uppercase(),
        name: text("longName")
            .or_else(|| text("shortName"))
            .unwrap_or_else(|| symbol.to_uppercase()),
        current_price,
        previous_close,
        currency: text("currency").unwrap_or_else(|| "USD".to_string()),
        market_cap: number("marketCap"),
        pe_ratio: number("trailingPE"),
        dividend_yield: number("trailingAnnualDividendYield"),
        fifty_two_week_high: number("fiftyTwoWeekHigh"),
        fifty_two_week_low: number("fiftyTwoWeekLow"),
    })
}

/// Bars from a `/v8/finance/chart` response. Rows with any missing field are
/// skipped.
pub fn parse_chart(json: &Value) -> Result<Vec<Bar>, AnalysisError> {
    let chart = json
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| AnalysisError::ApiError("No chart data found".to_string()))?;

    let Some(timestamps) = chart.get("timestamp").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    let quotes = chart
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| AnalysisError::ApiError("No quote data in chart".to_string()))?;

    let column = |key: &str| -> Result<&Vec<Value>, AnalysisError> {
        quotes
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or_else(|| AnalysisError::ApiError(format!("Chart is missing '{}'", key)))
    };
    let (opens, highs, lows, closes, volumes) = (
        column("open")?,
        column("high")?,
        column("low")?,
        column("close")?,
        column("volume")?,
    );

    let value_at = |col: &Vec<Value>, i: usize| col.get(i).and_then(|v| v.as_f64());

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        if let (Some(ts), Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            ts.as_i64(),
            value_at(opens, i),
            value_at(highs, i),
            value_at(lows, i),
            value_at(closes, i),
            value_at(volumes, i),
        ) {
            let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
                continue;
            };
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }
    }

    Ok(bars)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn get_quote(&self, symbol: &str) -> Result<StockQuote, AnalysisError> {
        let url = format!("{}/v7/finance/quote", self.base_url);
        let json = self.get_json(self.client.get(&url).query(&[("symbols", symbol)])).await?;
        parse_quote(symbol, &json)
    }

    async fn get_history(&self, symbol: &str, days: usize) -> Result<Vec<Bar>, AnalysisError> {
        let mut bars = self.fetch_chart(symbol, history_range(days), "1d").await?;
        if bars.len() > days {
            let excess = bars.len() - days;
            bars.drain(..excess);
        }
        Ok(bars)
    }

    async fn get_chart(&self, symbol: &str, period: ChartPeriod) -> Result<Vec<Bar>, AnalysisError> {
        let window = chart_window(period);
        self.fetch_chart(symbol, window.range, window.interval).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_quote_full() {
        let body = json!({
            "quoteResponse": {
                "result": [{
                    "symbol": "AAPL",
                    "longName": "Apple Inc.",
                    "regularMarketPrice": 203.92,
                    "regularMarketPreviousClose": 200.63,
                    "currency": "USD",
                    "marketCap": 3.0e12,
                    "trailingPE": 25.5,
                    "trailingAnnualDividendYield": 0.0065,
                    "fiftyTwoWeekHigh": 250.0,
                    "fiftyTwoWeekLow": 164.0
                }]
            }
        });

        let quote = parse_quote("aapl", &body).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.name, "Apple Inc.");
        assert_eq!(quote.current_price, 203.92);
        assert_eq!(quote.pe_ratio, 25.5);
        assert_eq!(quote.fifty_two_week_low, 164.0);
    }

    #[test]
    fn test_parse_quote_price_falls_back_to_previous_close() {
        let body = json!({
            "quoteResponse": {
                "result": [{ "shortName": "Test Co", "regularMarketPreviousClose": 42.0 }]
            }
        });

        let quote = parse_quote("TEST", &body).unwrap();
        assert_eq!(quote.current_price, 42.0);
        assert_eq!(quote.name, "Test Co");
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.pe_ratio, 0.0);
    }

    #[test]
    fn test_parse_quote_rejects_empty_result() {
        let body = json!({ "quoteResponse": { "result": [] } });
        assert!(parse_quote("NOPE", &body).is_err());

        let no_price = json!({ "quoteResponse": { "result": [{ "symbol": "NOPE" }] } });
        assert!(parse_quote("NOPE", &no_price).is_err());
    }

    #[test]
    fn test_parse_chart_skips_null_rows() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {
                        "quote": [{
                            "open": [10.0, null, 12.0],
                            "high": [11.0, 12.0, 13.0],
                            "low": [9.0, 10.0, 11.0],
                            "close": [10.5, 11.5, 12.5],
                            "volume": [1000, 2000, 3000]
                        }]
                    }
                }]
            }
        });

        let bars = parse_chart(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 10.5);
        assert_eq!(bars[1].volume, 3000.0);
        assert_eq!(bars[1].timestamp.timestamp(), 1700172800);
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty() {
        let body = json!({ "chart": { "result": [{ "indicators": { "quote": [{}] } }] } });
        assert!(parse_chart(&body).unwrap().is_empty());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = YahooFinanceClient::new("http://localhost:9999/", Duration::from_secs(1));
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
