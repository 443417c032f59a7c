use analysis_core::{ChartInterval, ChartPeriod};
use axum::http::StatusCode;

use crate::AppError;

pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_HISTORY_DAYS: usize = 365;

fn bad_request(message: String) -> AppError {
    AppError::with_status(StatusCode::BAD_REQUEST, anyhow::anyhow!(message))
}

/// Accepts 1 to 10 characters from `[A-Za-z0-9.-]` and returns the symbol
/// upper-cased.
pub fn validate_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(bad_request("Symbol must not be empty".to_string()));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(bad_request(format!(
            "Symbol '{}' is longer than {} characters",
            symbol, MAX_SYMBOL_LEN
        )));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(bad_request(format!("Symbol '{}' contains invalid characters", symbol)));
    }
    Ok(symbol.to_uppercase())
}

pub fn parse_period(raw: Option<&str>) -> Result<ChartPeriod, AppError> {
    match raw {
        None => Ok(ChartPeriod::default()),
        Some(s) => s.parse().map_err(bad_request),
    }
}

pub fn parse_interval(raw: Option<&str>) -> Result<ChartInterval, AppError> {
    match raw {
        None => Ok(ChartInterval::default()),
        Some(s) => s.parse().map_err(bad_request),
    }
}

pub fn validate_days(days: usize) -> Result<usize, AppError> {
    if (1..=MAX_HISTORY_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(bad_request(format!(
            "days must be between 1 and {}, got {}",
            MAX_HISTORY_DAYS, days
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(validate_symbol("aapl").unwrap(), "AAPL");
        assert_eq!(validate_symbol("brk.b").unwrap(), "BRK.B");
        assert_eq!(validate_symbol("RDS-A").unwrap(), "RDS-A");
        assert_eq!(validate_symbol("ABCDEFGHIJ").unwrap(), "ABCDEFGHIJ");

        for bad in ["", "   ", "ABCDEFGHIJK", "AA PL", "AAPL$", "ÄPFEL"] {
            let err = validate_symbol(bad).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "{}", bad);
        }
    }

    #[test]
    fn test_period_and_interval() {
        assert_eq!(parse_period(None).unwrap(), ChartPeriod::OneMonth);
        assert_eq!(parse_period(Some("1y")).unwrap(), ChartPeriod::OneYear);
        assert!(parse_period(Some("10y")).is_err());

        assert_eq!(parse_interval(None).unwrap(), ChartInterval::OneDay);
        assert_eq!(parse_interval(Some("1h")).unwrap(), ChartInterval::OneHour);
        assert!(parse_interval(Some("2h")).is_err());
    }

    #[test]
    fn test_days_bounds() {
        assert_eq!(validate_days(1).unwrap(), 1);
        assert_eq!(validate_days(365).unwrap(), 365);
        assert!(validate_days(0).is_err());
        assert!(validate_days(366).is_err());
    }
}
