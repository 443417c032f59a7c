#[cfg(test)]
mod tests {
    use super::super::indicators::*;

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    fn rising_prices(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert!((result[2].unwrap() - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[3].unwrap() - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[4].unwrap() - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        let result = sma(&data, 5);

        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_real_prices() {
        let prices = sample_prices();
        let result = sma(&prices, 5);

        let expected_first = (44.34 + 44.09 + 44.15 + 43.61 + 44.33) / 5.0;
        assert!((result[4].unwrap() - expected_first).abs() < 0.01);
    }

    #[test]
    fn test_ema_seed_and_recurrence() {
        let data = vec![22.0, 24.0, 23.0, 25.0, 26.0];
        let result = ema(&data, 3);

        assert_eq!(result.len(), data.len());
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        // Seed is the SMA of the first three prices, k = 0.5
        assert!((result[2].unwrap() - 23.0).abs() < 1e-9);
        assert!((result[3].unwrap() - 24.0).abs() < 1e-9);
        assert!((result[4].unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_ema_empty_data() {
        let data: Vec<f64> = vec![];
        let result = ema(&data, 5);

        assert!(result.is_empty());
    }

    #[test]
    fn test_ema_increases_with_uptrend() {
        let data = rising_prices(10);
        let values: Vec<f64> = ema(&data, 3).into_iter().flatten().collect();

        assert_eq!(values.len(), 8);
        for i in 1..values.len() {
            assert!(values[i] > values[i - 1]);
        }
    }

    #[test]
    fn test_rsi_bounds() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        assert_eq!(result.len(), prices.len());
        let defined: Vec<f64> = result.iter().flatten().copied().collect();
        assert!(!defined.is_empty());
        for value in defined {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_rolling_window_values() {
        // deltas: [0, +1, -1]
        let result = rsi(&[1.0, 2.0, 1.0], 2);

        assert_eq!(result[0], None);
        assert_eq!(result[1], Some(100.0));
        assert!((result[2].unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_saturates_without_losses() {
        let result = rsi(&rising_prices(20), 14);

        assert!(result[..13].iter().all(|v| v.is_none()));
        assert!(result[13..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_zero_without_gains() {
        let falling: Vec<f64> = (1..=20).rev().map(|i| i as f64).collect();
        let result = rsi(&falling, 14);

        assert_eq!(result.last().copied().flatten(), Some(0.0));
    }

    #[test]
    fn test_rsi_flat_window_is_undefined() {
        let flat = vec![100.0; 30];
        let result = rsi(&flat, 14);

        assert_eq!(result.len(), 30);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let result = rsi(&rising_prices(14), 14);

        assert_eq!(result, vec![None; 14]);
    }

    #[test]
    fn test_macd_alignment() {
        let prices = rising_prices(40);
        let fast = ema(&prices, 12);
        let slow = ema(&prices, 26);
        let result = macd(&fast, &slow);

        assert_eq!(result.macd_line.len(), 40);
        assert_eq!(result.signal_line.len(), 40);
        assert!(result.macd_line[..25].iter().all(|v| v.is_none()));
        assert!(result.macd_line[25..].iter().all(|v| v.is_some()));
        // 15 defined MACD values, signal needs 9 of them
        assert!(result.signal_line[..33].iter().all(|v| v.is_none()));
        assert!(result.signal_line[33..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_macd_line_is_difference() {
        let fast = vec![None, Some(5.0), Some(6.0)];
        let slow = vec![None, None, Some(4.0)];
        let result = macd(&fast, &slow);

        assert_eq!(result.macd_line, vec![None, None, Some(2.0)]);
        assert_eq!(result.signal_line, vec![None, None, None]);
    }

    #[test]
    fn test_bollinger_population_std() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let bb = bollinger_bands(&data, 5, 2.0);

        let std = 2.0_f64.sqrt();
        assert_eq!(bb.middle[4], Some(3.0));
        assert!((bb.upper[4].unwrap() - (3.0 + 2.0 * std)).abs() < 1e-9);
        assert!((bb.lower[4].unwrap() - (3.0 - 2.0 * std)).abs() < 1e-9);
        assert!(bb.upper[..4].iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_bollinger_bands_contain_middle() {
        let prices = sample_prices();
        let bb = bollinger_bands(&prices, 10, 2.0);

        for i in 9..prices.len() {
            let (u, m, l) = (bb.upper[i].unwrap(), bb.middle[i].unwrap(), bb.lower[i].unwrap());
            assert!(u >= m && m >= l);
        }
    }

    #[test]
    fn test_short_input_yields_all_none_everywhere() {
        for n in 0..5 {
            let data = rising_prices(n);
            assert_eq!(sma(&data, 5), vec![None; n]);
            assert_eq!(ema(&data, 5), vec![None; n]);
            assert_eq!(rsi(&data, 5), vec![None; n]);
            let bb = bollinger_bands(&data, 5, 2.0);
            assert_eq!(bb.upper, vec![None; n]);
            assert_eq!(bb.middle, vec![None; n]);
            assert_eq!(bb.lower, vec![None; n]);
        }
    }

    #[test]
    fn test_zero_period_does_not_panic() {
        let data = rising_prices(5);
        assert_eq!(sma(&data, 0), vec![None; 5]);
        assert_eq!(ema(&data, 0), vec![None; 5]);
        assert_eq!(rsi(&data, 0), vec![None; 5]);
        assert_eq!(bollinger_bands(&data, 0, 2.0).middle, vec![None; 5]);
    }

    #[test]
    fn test_last_value_skips_trailing_none() {
        assert_eq!(last_value(&[Some(1.0), Some(2.0), None]), Some(2.0));
        assert_eq!(last_value(&[None, None]), None);
        assert_eq!(last_value(&[]), None);
    }
}
