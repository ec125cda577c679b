//! Technical indicator implementations.
//!
//! Every calculator takes a chronologically ascending slice of prices and
//! returns a single value for the latest point. They are total: short or
//! degenerate input yields a documented fallback rather than an error.
//!
//! - [`sma`] / [`ema`]: moving-average primitives
//! - [`rsi`]: Relative Strength Index
//! - [`macd`]: Moving Average Convergence Divergence
//!
//! [`TechnicalIndicator`] is the named snapshot handed to signal synthesis.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::ema;
pub use macd::{macd, macd_with_signal_line, MacdSignalLine, MacdValue};
pub use rsi::{rsi, rsi_with_smoothing, RsiSmoothing, DEFAULT_RSI_PERIOD};
pub use sma::sma;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative read of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorSignal {
    Bullish,
    Bearish,
    Neutral,
}

/// A named indicator value with its qualitative signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicator {
    pub name: String,
    pub value: f64,
    pub signal: IndicatorSignal,
    pub description: String,
}

impl TechnicalIndicator {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        signal: IndicatorSignal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            signal,
            description: description.into(),
        }
    }
}

impl fmt::Display for IndicatorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorSignal::Bullish => write!(f, "bullish"),
            IndicatorSignal::Bearish => write!(f, "bearish"),
            IndicatorSignal::Neutral => write!(f, "neutral"),
        }
    }
}
