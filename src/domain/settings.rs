//! Analytics settings, read and validated from the `[analytics]` section.

use crate::domain::error::QuantdashError;
use crate::domain::indicator::{MacdSignalLine, RsiSmoothing, DEFAULT_RSI_PERIOD};
use crate::domain::risk::{DEFAULT_CONFIDENCE, DEFAULT_RISK_FREE_RATE};
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "analytics";

pub const DEFAULT_BENCHMARK: &str = "^GSPC";
pub const DEFAULT_SIGNAL_LOOKBACK_DAYS: i64 = 60;
pub const DEFAULT_RISK_LOOKBACK_DAYS: i64 = 365;
pub const DEFAULT_MARKET_LOOKBACK_DAYS: i64 = 30;
/// Upper bound for every `*_lookback_days` key (100 years).
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSettings {
    pub risk_free_rate: f64,
    pub confidence: f64,
    pub rsi_period: usize,
    pub rsi_smoothing: RsiSmoothing,
    pub macd_signal_line: MacdSignalLine,
    /// `None` disables beta (reported as 1).
    pub benchmark: Option<String>,
    pub signal_lookback_days: i64,
    pub risk_lookback_days: i64,
    pub market_lookback_days: i64,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            confidence: DEFAULT_CONFIDENCE,
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_smoothing: RsiSmoothing::Simple,
            macd_signal_line: MacdSignalLine::Compat,
            benchmark: Some(DEFAULT_BENCHMARK.to_string()),
            signal_lookback_days: DEFAULT_SIGNAL_LOOKBACK_DAYS,
            risk_lookback_days: DEFAULT_RISK_LOOKBACK_DAYS,
            market_lookback_days: DEFAULT_MARKET_LOOKBACK_DAYS,
        }
    }
}

impl AnalyticsSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, QuantdashError> {
        let risk_free_rate = config.get_double(SECTION, "risk_free_rate", DEFAULT_RISK_FREE_RATE);
        if !(0.0..1.0).contains(&risk_free_rate) {
            return Err(QuantdashError::invalid(
                SECTION,
                "risk_free_rate",
                "risk_free_rate must be between 0 and 1",
            ));
        }

        let confidence = config.get_double(SECTION, "confidence", DEFAULT_CONFIDENCE);
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(QuantdashError::invalid(
                SECTION,
                "confidence",
                "confidence must be strictly between 0 and 1",
            ));
        }

        let rsi_period = config.get_int(SECTION, "rsi_period", DEFAULT_RSI_PERIOD as i64);
        if rsi_period < 1 {
            return Err(QuantdashError::invalid(
                SECTION,
                "rsi_period",
                "rsi_period must be at least 1",
            ));
        }

        let rsi_smoothing = match config.get_string(SECTION, "rsi_smoothing") {
            Some(s) => s
                .parse::<RsiSmoothing>()
                .map_err(|reason| QuantdashError::invalid(SECTION, "rsi_smoothing", reason))?,
            None => RsiSmoothing::default(),
        };

        let macd_signal_line = match config.get_string(SECTION, "macd_signal_line") {
            Some(s) => s
                .parse::<MacdSignalLine>()
                .map_err(|reason| QuantdashError::invalid(SECTION, "macd_signal_line", reason))?,
            None => MacdSignalLine::default(),
        };

        let benchmark = match config.get_string(SECTION, "benchmark") {
            Some(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("none") => None,
            Some(s) => Some(s.trim().to_uppercase()),
            None => Some(DEFAULT_BENCHMARK.to_string()),
        };

        let signal_lookback_days =
            positive_days(config, "signal_lookback_days", DEFAULT_SIGNAL_LOOKBACK_DAYS)?;
        let risk_lookback_days =
            positive_days(config, "risk_lookback_days", DEFAULT_RISK_LOOKBACK_DAYS)?;
        let market_lookback_days =
            positive_days(config, "market_lookback_days", DEFAULT_MARKET_LOOKBACK_DAYS)?;

        Ok(Self {
            risk_free_rate,
            confidence,
            rsi_period: rsi_period as usize,
            rsi_smoothing,
            macd_signal_line,
            benchmark,
            signal_lookback_days,
            risk_lookback_days,
            market_lookback_days,
        })
    }
}

fn positive_days(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, QuantdashError> {
    let days = config.get_int(SECTION, key, default);
    if !(1..=MAX_LOOKBACK_DAYS).contains(&days) {
        return Err(QuantdashError::invalid(
            SECTION,
            key,
            format!("{key} must be between 1 and {MAX_LOOKBACK_DAYS}"),
        ));
    }
    Ok(days)
}
