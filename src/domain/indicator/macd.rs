//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(12) - EMA(26)
//! Histogram = MACD Line - Signal Line
//!
//! The signal line has two modes, see [`MacdSignalLine`]. In `Compat` mode the
//! signal is the EMA of the single current MACD value, which is that value
//! itself, so the histogram is always 0 and the downstream read is always
//! bearish. `Rolling` is the conventional 9-period EMA over the MACD history.

use super::ema::{ema, ema_series};
use super::IndicatorSignal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdSignalLine {
    /// Signal = EMA of the one-element series [macd]; histogram is always 0.
    #[default]
    Compat,
    /// Signal = EMA(9) of the MACD line computed at every bar.
    Rolling,
}

impl FromStr for MacdSignalLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compat" => Ok(MacdSignalLine::Compat),
            "rolling" => Ok(MacdSignalLine::Rolling),
            other => Err(format!(
                "unknown MACD signal line '{other}' (expected compat or rolling)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdValue {
    /// Histogram above zero reads bullish; zero or below reads bearish.
    pub fn signal_read(&self) -> IndicatorSignal {
        if self.histogram > 0.0 {
            IndicatorSignal::Bullish
        } else {
            IndicatorSignal::Bearish
        }
    }
}

pub fn macd(prices: &[f64]) -> MacdValue {
    macd_with_signal_line(prices, MacdSignalLine::Compat)
}

pub fn macd_with_signal_line(prices: &[f64], mode: MacdSignalLine) -> MacdValue {
    let line = ema(prices, DEFAULT_FAST) - ema(prices, DEFAULT_SLOW);

    let signal = match mode {
        MacdSignalLine::Compat => ema(&[line], DEFAULT_SIGNAL),
        MacdSignalLine::Rolling => {
            let fast = ema_series(prices, DEFAULT_FAST);
            let slow = ema_series(prices, DEFAULT_SLOW);
            let history: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
            ema(&history, DEFAULT_SIGNAL)
        }
    };

    MacdValue {
        macd: line,
        signal,
        histogram: line - signal,
    }
}
