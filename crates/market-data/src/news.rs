use analysis_core::{NewsItem, NewsPayload};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Source tag on payloads produced by the template generator.
pub const FALLBACK_SOURCE: &str = "fallback_data";

const ITEMS_PER_PAYLOAD: usize = 4;

const COMPANY_NAMES: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("META", "Meta Platforms Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("NFLX", "Netflix Inc."),
];

const COMPANY: &str = "{company}";

struct Template {
    source: &'static str,
    headline: &'static str,
    summary: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        source: "Reuters",
        headline: "{company} Reports Strong Quarterly Earnings",
        summary: "{company} exceeded analyst expectations with robust revenue growth and improved profit margins.",
    },
    Template {
        source: "Bloomberg",
        headline: "{company} Announces New Product Innovation",
        summary: "The company unveiled its latest technology advancement, positioning for future market expansion.",
    },
    Template {
        source: "MarketWatch",
        headline: "Analysts Upgrade {company} Price Target",
        summary: "Wall Street analysts raised their price targets citing strong fundamentals and market position.",
    },
    Template {
        source: "CNBC",
        headline: "{company} Expands Market Presence",
        summary: "The company announced strategic initiatives to strengthen its competitive position in key markets.",
    },
    Template {
        source: "Financial Times",
        headline: "Institutional Investors Increase {company} Holdings",
        summary: "Major institutional investors have increased their positions, showing confidence in the company's outlook.",
    },
];

pub fn company_name(symbol: &str) -> String {
    let upper = symbol.to_uppercase();
    COMPANY_NAMES
        .iter()
        .find(|(s, _)| *s == upper)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("{} Corporation", upper))
}

fn article_url(source: &str, symbol: &str) -> String {
    match source {
        "MarketWatch" => format!("https://www.marketwatch.com/investing/stock/{}", symbol.to_lowercase()),
        "CNBC" => format!("https://www.cnbc.com/quotes/{}", symbol.to_uppercase()),
        _ => format!("https://finance.yahoo.com/quote/{}/news", symbol.to_uppercase()),
    }
}

/// News for a symbol. No live news feed is wired, so every payload comes from
/// the template generator.
#[derive(Debug, Default, Clone)]
pub struct NewsService;

impl NewsService {
    pub fn new() -> Self {
        Self
    }

    pub fn get_stock_news(&self, symbol: &str) -> NewsPayload {
        tracing::debug!("Generating template news for {}", symbol);
        generate_news(symbol, Utc::now(), &mut rand::thread_rng())
    }
}

/// Four of the five templates, published within the last seven days, newest
/// first.
pub fn generate_news<R: Rng + ?Sized>(symbol: &str, now: DateTime<Utc>, rng: &mut R) -> NewsPayload {
    let company = company_name(symbol);

    let mut news: Vec<NewsItem> = TEMPLATES
        .choose_multiple(rng, ITEMS_PER_PAYLOAD)
        .collect::<Vec<_>>()
        .into_iter()
        .map(|template| {
            let age = Duration::days(rng.gen_range(0..=7)) + Duration::hours(rng.gen_range(0..=23));
            NewsItem {
                headline: template.headline.replace(COMPANY, &company),
                source: template.source.to_string(),
                published: now - age,
                summary: template.summary.replace(COMPANY, &company),
                url: article_url(template.source, symbol),
                relevance_score: rng.gen_range(0.7..0.95),
            }
        })
        .collect();

    news.sort_by(|a, b| b.published.cmp(&a.published));

    NewsPayload {
        symbol: symbol.to_uppercase(),
        company_name: company,
        news_count: news.len(),
        news,
        last_updated: now,
        source: FALLBACK_SOURCE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_company_names() {
        assert_eq!(company_name("nvda"), "NVIDIA Corporation");
        assert_eq!(company_name("xyz"), "XYZ Corporation");
    }

    #[test]
    fn test_generated_payload_shape() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(3);
        let payload = generate_news("aapl", now, &mut rng);

        assert_eq!(payload.symbol, "AAPL");
        assert_eq!(payload.company_name, "Apple Inc.");
        assert_eq!(payload.news_count, 4);
        assert_eq!(payload.news.len(), 4);
        assert_eq!(payload.source, FALLBACK_SOURCE);

        for pair in payload.news.windows(2) {
            assert!(pair[0].published >= pair[1].published);
        }
        for item in &payload.news {
            assert!(item.published <= now);
            assert!(now - item.published <= Duration::days(8));
            assert!((0.7..0.95).contains(&item.relevance_score));
            assert!(item.url.starts_with("https://"));
        }
    }

    #[test]
    fn test_sources_are_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        let payload = generate_news("MSFT", Utc::now(), &mut rng);

        let mut sources: Vec<&str> = payload.news.iter().map(|n| n.source.as_str()).collect();
        sources.sort();
        sources.dedup();
        assert_eq!(sources.len(), 4);
    }

    #[test]
    fn test_marketwatch_url_is_lowercase() {
        assert_eq!(
            article_url("MarketWatch", "AAPL"),
            "https://www.marketwatch.com/investing/stock/aapl"
        );
        assert_eq!(article_url("Reuters", "aapl"), "https://finance.yahoo.com/quote/AAPL/news");
    }
}
