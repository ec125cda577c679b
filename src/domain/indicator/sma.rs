//! Simple Moving Average.
//!
//! SMA(n) = mean of the last n prices.
//! Fewer than n prices: the last available price, or 0.0 for an empty slice.

pub fn sma(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return prices.last().copied().unwrap_or(0.0);
    }

    let window = &prices[prices.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty() {
        assert_eq!(sma(&[], 5), 0.0);
    }

    #[test]
    fn sma_short_series_falls_back_to_last() {
        assert_eq!(sma(&[5.0], 3), 5.0);
        assert_eq!(sma(&[1.0, 2.0], 3), 2.0);
    }

    #[test]
    fn sma_uses_most_recent_window() {
        let prices = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((sma(&prices, 3) - 4.0).abs() < f64::EPSILON);
        assert!((sma(&prices, 5) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_period_1_is_last_price() {
        assert_eq!(sma(&[10.0, 20.0, 30.0], 1), 30.0);
    }

    #[test]
    fn sma_period_0_is_last_price() {
        assert_eq!(sma(&[10.0, 20.0], 0), 20.0);
    }

    #[test]
    fn sma_rising_series_short_above_long() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        assert!(sma(&prices, 20) >= sma(&prices, 50));
    }
}
