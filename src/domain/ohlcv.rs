//! OHLCV bar representation and price/return series extraction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Order bars oldest first. Provider feeds may arrive newest first; every
/// downstream computation (returns, EMA seeding) assumes ascending time.
pub fn sort_chronological(bars: &mut [OhlcvBar]) {
    bars.sort_by_key(|b| b.date);
}

/// Close prices in slice order.
pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Simple period returns: (p[i] - p[i-1]) / p[i-1].
///
/// Length is `prices.len() - 1`; fewer than two prices yields an empty series.
/// A zero previous price contributes a 0.0 return.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            let prev = w[0];
            if prev != 0.0 { (w[1] - prev) / prev } else { 0.0 }
        })
        .collect()
}
