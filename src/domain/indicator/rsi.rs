//! RSI (Relative Strength Index).
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//! Fewer than period + 1 prices (or period 0): neutral 50.
//!
//! Two averaging modes:
//! - `Simple`: plain mean of gains/losses over the first `period` changes of
//!   the slice. Later prices do not contribute.
//! - `Wilder`: the simple mean seeds the averages, then every later change is
//!   folded in with avg = (prev_avg * (n-1) + current) / n.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_RSI_PERIOD: usize = 14;
const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSmoothing {
    #[default]
    Simple,
    Wilder,
}

impl FromStr for RsiSmoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(RsiSmoothing::Simple),
            "wilder" => Ok(RsiSmoothing::Wilder),
            other => Err(format!("unknown RSI smoothing '{other}' (expected simple or wilder)")),
        }
    }
}

pub fn rsi(prices: &[f64], period: usize) -> f64 {
    rsi_with_smoothing(prices, period, RsiSmoothing::Simple)
}

pub fn rsi_with_smoothing(prices: &[f64], period: usize, smoothing: RsiSmoothing) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 { (change, 0.0) } else { (0.0, -change) }
        })
        .unzip();

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;

    if smoothing == RsiSmoothing::Wilder {
        for (gain, loss) in gains[period..].iter().zip(&losses[period..]) {
            avg_gain = (avg_gain * (n - 1.0) + gain) / n;
            avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        }
    }

    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
