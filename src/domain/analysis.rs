//! Bars in, dashboard records out.
//!
//! Orders the provider bars, derives the close series and hands it to the
//! indicator, risk and signal engines.

use super::error::QuantdashError;
use super::indicator::{
    macd_with_signal_line, rsi_with_smoothing, sma, IndicatorSignal, TechnicalIndicator,
};
use super::ohlcv::{closes, sort_chronological, OhlcvBar};
use super::risk::{RiskMetrics, RiskReport};
use super::settings::AnalyticsSettings;
use super::signal::{generate_signal, AiSignal, IndicatorSet, RSI_OVERBOUGHT, RSI_OVERSOLD};
use std::collections::HashMap;

pub const SHORT_SMA_PERIOD: usize = 20;
pub const LONG_SMA_PERIOD: usize = 50;

/// RSI, MACD, SMA20 and SMA50 for an oldest-first close series.
pub fn indicator_snapshot(prices: &[f64], settings: &AnalyticsSettings) -> IndicatorSet {
    let current = prices.last().copied().unwrap_or(0.0);

    let rsi = rsi_with_smoothing(prices, settings.rsi_period, settings.rsi_smoothing);
    let (rsi_signal, rsi_label) = if rsi < RSI_OVERSOLD {
        (IndicatorSignal::Bullish, "Oversold")
    } else if rsi > RSI_OVERBOUGHT {
        (IndicatorSignal::Bearish, "Overbought")
    } else {
        (IndicatorSignal::Neutral, "Neutral")
    };

    let macd = macd_with_signal_line(prices, settings.macd_signal_line);

    IndicatorSet {
        rsi: TechnicalIndicator::new(
            "RSI",
            rsi,
            rsi_signal,
            format!("RSI: {rsi:.2} - {rsi_label}"),
        ),
        macd: TechnicalIndicator::new(
            "MACD",
            macd.macd,
            macd.signal_read(),
            format!("MACD: {:.4}, Signal: {:.4}", macd.macd, macd.signal),
        ),
        sma20: sma_indicator(prices, SHORT_SMA_PERIOD, current),
        sma50: sma_indicator(prices, LONG_SMA_PERIOD, current),
    }
}

fn sma_indicator(prices: &[f64], period: usize, current: f64) -> TechnicalIndicator {
    let value = sma(prices, period);
    let signal = if current > value {
        IndicatorSignal::Bullish
    } else {
        IndicatorSignal::Bearish
    };
    TechnicalIndicator::new(
        format!("SMA{period}"),
        value,
        signal,
        format!("{period}-day SMA: ${value:.2}"),
    )
}

/// Signal for `symbol` from its bars, in any order.
pub fn analyze_signal(
    symbol: &str,
    bars: &[OhlcvBar],
    settings: &AnalyticsSettings,
) -> Result<AiSignal, QuantdashError> {
    if bars.is_empty() {
        return Err(QuantdashError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let mut ordered = bars.to_vec();
    sort_chronological(&mut ordered);
    let prices = closes(&ordered);

    Ok(generate_signal(symbol, &indicator_snapshot(&prices, settings)))
}

/// Percent-scaled risk report for `symbol`. With a benchmark, beta is taken
/// over the dates both series share.
pub fn analyze_risk(
    symbol: &str,
    bars: &[OhlcvBar],
    benchmark: Option<&[OhlcvBar]>,
    settings: &AnalyticsSettings,
) -> Result<RiskReport, QuantdashError> {
    if bars.is_empty() {
        return Err(QuantdashError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let mut ordered = bars.to_vec();
    sort_chronological(&mut ordered);
    let prices = closes(&ordered);

    let base = RiskMetrics::compute(&prices, None, settings.risk_free_rate, settings.confidence);
    let beta = match benchmark {
        Some(bench) if !bench.is_empty() => {
            let (asset, market) = align_closes(&ordered, bench);
            RiskMetrics::compute(&asset, Some(&market), settings.risk_free_rate, settings.confidence)
                .beta
        }
        _ => base.beta,
    };

    Ok(RiskMetrics { beta, ..base }.as_percent())
}

/// Close pairs on the dates present in both series, oldest first.
fn align_closes(asset: &[OhlcvBar], market: &[OhlcvBar]) -> (Vec<f64>, Vec<f64>) {
    let market_by_date: HashMap<_, f64> = market.iter().map(|b| (b.date, b.close)).collect();
    asset
        .iter()
        .filter_map(|b| market_by_date.get(&b.date).map(|&m| (b.close, m)))
        .unzip()
}
