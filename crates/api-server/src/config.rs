use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub news_cache_ttl: Duration,
    pub market_cache_ttl: Duration,
    pub yahoo_base_url: String,
    pub market_data_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8004,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            news_cache_ttl: Duration::from_secs(1800),
            market_cache_ttl: Duration::from_secs(300),
            yahoo_base_url: market_data::DEFAULT_BASE_URL.to_string(),
            market_data_timeout: Duration::from_secs(30),
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parse `key` from the lookup if present, otherwise use `default`.
fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        _ => Ok(default),
    }
}

impl ServerConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) if !raw.trim().is_empty() => split_origins(&raw),
            _ => defaults.cors_origins,
        };

        Ok(Self {
            host: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            cors_origins,
            news_cache_ttl: Duration::from_secs(parse_var(
                &lookup,
                "NEWS_CACHE_TTL_SECS",
                defaults.news_cache_ttl.as_secs(),
            )?),
            market_cache_ttl: Duration::from_secs(parse_var(
                &lookup,
                "MARKET_CACHE_TTL_SECS",
                defaults.market_cache_ttl.as_secs(),
            )?),
            yahoo_base_url: lookup("YAHOO_BASE_URL")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.yahoo_base_url),
            market_data_timeout: Duration::from_secs(parse_var(
                &lookup,
                "MARKET_DATA_TIMEOUT_SECS",
                defaults.market_data_timeout.as_secs(),
            )?),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn cache_settings(&self) -> Result<analysis_orchestrator::CacheSettings> {
        Ok(analysis_orchestrator::CacheSettings {
            news_ttl: chrono::Duration::from_std(self.news_cache_ttl)
                .context("NEWS_CACHE_TTL_SECS out of range")?,
            market_ttl: chrono::Duration::from_std(self.market_cache_ttl)
                .context("MARKET_CACHE_TTL_SECS out of range")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8004);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173".to_string(), "http://localhost:3000".to_string()]
        );
        assert_eq!(config.news_cache_ttl, Duration::from_secs(1800));
        assert_eq!(config.market_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.yahoo_base_url, "https://query2.finance.yahoo.com");
        assert_eq!(config.market_data_timeout, Duration::from_secs(30));
        assert_eq!(config.socket_addr().unwrap().port(), 8004);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("NEWS_CACHE_TTL_SECS", "60"),
            ("YAHOO_BASE_URL", "http://localhost:1234"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9000");
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[1], "https://b.example");
        assert_eq!(config.news_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.yahoo_base_url, "http://localhost:1234");

        let settings = config.cache_settings().unwrap();
        assert_eq!(settings.news_ttl, chrono::Duration::seconds(60));
        assert_eq!(settings.market_ttl, chrono::Duration::seconds(300));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
