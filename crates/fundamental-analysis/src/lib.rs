use analysis_core::{stats, Dimension, ScoringInput, SubScore, SubScorer};

/// Market cap above which a company counts as large-cap.
pub const LARGE_CAP: f64 = 10_000_000_000.0;
/// Market cap above which a company counts as mid-cap.
pub const MID_CAP: f64 = 2_000_000_000.0;

const ATTRACTIVE_PE: f64 = 18.0;
const STRETCHED_PE: f64 = 30.0;

/// Fundamental dimension: valuation (P/E) and company size (market cap).
#[derive(Debug, Default, Clone, Copy)]
pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    fn valuation(&self, pe_ratio: f64) -> Option<(f64, &'static str)> {
        if pe_ratio.is_nan() || pe_ratio <= 0.0 {
            return None;
        }
        Some(if pe_ratio < ATTRACTIVE_PE {
            (7.0, "Stock valuation appears attractive")
        } else if pe_ratio > STRETCHED_PE {
            (3.0, "Stock valuation appears stretched")
        } else {
            (5.0, "Stock valuation appears fair")
        })
    }

    fn company_size(&self, market_cap: f64) -> (f64, &'static str) {
        if market_cap > LARGE_CAP {
            (6.0, "Large company provides stability")
        } else if market_cap > MID_CAP {
            (5.0, "Mid-size company offers balance")
        } else {
            (4.0, "Smaller company carries higher risk")
        }
    }
}

impl SubScorer for FundamentalAnalysisEngine {
    fn dimension(&self) -> Dimension {
        Dimension::Fundamental
    }

    fn score(&self, input: &ScoringInput<'_>) -> SubScore {
        let mut components: Vec<f64> = Vec::new();
        let mut reasoning: Vec<String> = Vec::new();

        if let Some((score, reason)) = self.valuation(input.quote.pe_ratio) {
            components.push(score);
            reasoning.push(reason.to_string());
        }

        let (score, reason) = self.company_size(input.quote.market_cap);
        components.push(score);
        reasoning.push(reason.to_string());

        // Market cap is always present, so the mean is never over an empty set
        let score = stats::mean(&components);
        reasoning.truncate(2);

        SubScore::new(Dimension::Fundamental, score, reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{IndicatorBundle, StockQuote};

    fn score(pe_ratio: f64, market_cap: f64) -> SubScore {
        let quote = StockQuote {
            symbol: "TEST".to_string(),
            current_price: 100.0,
            pe_ratio,
            market_cap,
            ..Default::default()
        };
        let indicators = IndicatorBundle::default();
        FundamentalAnalysisEngine::new().score(&ScoringInput {
            quote: &quote,
            history: &[],
            indicators: &indicators,
        })
    }

    #[test]
    fn test_attractive_large_cap() {
        let result = score(12.0, 15e9);

        assert!((result.score - 6.5).abs() < 1e-9);
        assert_eq!(
            result.reasoning,
            vec![
                "Stock valuation appears attractive".to_string(),
                "Large company provides stability".to_string(),
            ]
        );
        assert_eq!(result.weight, 0.35);
    }

    #[test]
    fn test_fair_mid_cap_is_neutral() {
        let result = score(20.0, 5e9);

        assert!((result.score - 5.0).abs() < 1e-9);
        assert_eq!(result.reasoning[0], "Stock valuation appears fair");
        assert_eq!(result.reasoning[1], "Mid-size company offers balance");
    }

    #[test]
    fn test_stretched_small_cap() {
        let result = score(45.0, 1e9);

        assert!((result.score - 3.5).abs() < 1e-9);
        assert_eq!(result.reasoning[0], "Stock valuation appears stretched");
        assert_eq!(result.reasoning[1], "Smaller company carries higher risk");
    }

    #[test]
    fn test_missing_pe_excluded() {
        for pe in [0.0, -3.0, f64::NAN] {
            let result = score(pe, 15e9);
            assert!((result.score - 6.0).abs() < 1e-9);
            assert_eq!(result.reasoning, vec!["Large company provides stability".to_string()]);
        }
    }

    #[test]
    fn test_boundaries() {
        // Thresholds are strict on both sides
        assert!((score(18.0, 5e9).score - 5.0).abs() < 1e-9);
        assert!((score(30.0, 5e9).score - 5.0).abs() < 1e-9);
        assert!((score(20.0, 10e9).score - 5.0).abs() < 1e-9);
        assert!((score(20.0, 2e9).score - 4.5).abs() < 1e-9);
    }
}
