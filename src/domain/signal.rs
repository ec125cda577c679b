//! Rule-based signal synthesis.
//!
//! Three votes are cast from a fixed indicator set:
//! - RSI < 30 bullish, RSI > 70 bearish, otherwise no vote
//! - MACD qualitative signal (neutral casts no vote)
//! - SMA20 > SMA50 bullish, otherwise bearish
//!
//! More bullish votes → BUY, more bearish → SELL, tie → HOLD.
//! Confidence = min(0.9, 0.5 + 0.1 * |bullish - bearish|), 0.5 on a tie.

use super::indicator::{IndicatorSignal, TechnicalIndicator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_STEP: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.9;
const MIXED_REASONING: &str = "Mixed signals from technical indicators.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "BUY"),
            Recommendation::Sell => write!(f, "SELL"),
            Recommendation::Hold => write!(f, "HOLD"),
        }
    }
}

/// The four indicators a signal is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub rsi: TechnicalIndicator,
    pub macd: TechnicalIndicator,
    pub sma20: TechnicalIndicator,
    pub sma50: TechnicalIndicator,
}

impl IndicatorSet {
    /// Rebuild from a name-keyed list ("RSI", "MACD", "SMA20", "SMA50").
    /// `None` if any of the four is absent.
    pub fn from_named(indicators: &[TechnicalIndicator]) -> Option<Self> {
        let find = |name: &str| indicators.iter().find(|i| i.name == name).cloned();
        Some(IndicatorSet {
            rsi: find("RSI")?,
            macd: find("MACD")?,
            sma20: find("SMA20")?,
            sma50: find("SMA50")?,
        })
    }

    pub fn to_vec(&self) -> Vec<TechnicalIndicator> {
        vec![
            self.rsi.clone(),
            self.macd.clone(),
            self.sma20.clone(),
            self.sma50.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSignal {
    pub symbol: String,
    pub recommendation: Recommendation,
    pub confidence: f64,
    pub reasoning: String,
    pub technical_indicators: Vec<TechnicalIndicator>,
    pub timestamp: DateTime<Utc>,
}

pub fn generate_signal(symbol: &str, indicators: &IndicatorSet) -> AiSignal {
    generate_signal_at(symbol, indicators, Utc::now())
}

/// Same as [`generate_signal`] with an explicit generation time.
pub fn generate_signal_at(
    symbol: &str,
    indicators: &IndicatorSet,
    timestamp: DateTime<Utc>,
) -> AiSignal {
    let mut bullish = 0u32;
    let mut bearish = 0u32;
    let mut fragments: Vec<&str> = Vec::with_capacity(3);

    if indicators.rsi.value < RSI_OVERSOLD {
        bullish += 1;
        fragments.push("RSI indicates oversold conditions.");
    } else if indicators.rsi.value > RSI_OVERBOUGHT {
        bearish += 1;
        fragments.push("RSI indicates overbought conditions.");
    }

    match indicators.macd.signal {
        IndicatorSignal::Bullish => {
            bullish += 1;
            fragments.push("MACD shows bullish momentum.");
        }
        IndicatorSignal::Bearish => {
            bearish += 1;
            fragments.push("MACD shows bearish momentum.");
        }
        IndicatorSignal::Neutral => {}
    }

    if indicators.sma20.value > indicators.sma50.value {
        bullish += 1;
        fragments.push("Short-term trend is above long-term trend.");
    } else {
        bearish += 1;
        fragments.push("Short-term trend is below long-term trend.");
    }

    let (recommendation, confidence) = score(bullish, bearish);
    let reasoning = if fragments.is_empty() {
        MIXED_REASONING.to_string()
    } else {
        fragments.join(" ")
    };

    AiSignal {
        symbol: symbol.to_string(),
        recommendation,
        confidence,
        reasoning,
        technical_indicators: indicators.to_vec(),
        timestamp,
    }
}

/// Name-keyed entry point. A missing indicator degrades to HOLD at 0.5.
pub fn generate_signal_from_named(symbol: &str, indicators: &[TechnicalIndicator]) -> AiSignal {
    match IndicatorSet::from_named(indicators) {
        Some(set) => generate_signal(symbol, &set),
        None => AiSignal {
            symbol: symbol.to_string(),
            recommendation: Recommendation::Hold,
            confidence: BASE_CONFIDENCE,
            reasoning: MIXED_REASONING.to_string(),
            technical_indicators: indicators.to_vec(),
            timestamp: Utc::now(),
        },
    }
}

fn score(bullish: u32, bearish: u32) -> (Recommendation, f64) {
    let margin = bullish.abs_diff(bearish);
    let confidence = (BASE_CONFIDENCE + CONFIDENCE_STEP * margin as f64).min(MAX_CONFIDENCE);

    if bullish > bearish {
        (Recommendation::Buy, confidence)
    } else if bearish > bullish {
        (Recommendation::Sell, confidence)
    } else {
        (Recommendation::Hold, BASE_CONFIDENCE)
    }
}
