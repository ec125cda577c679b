//! Risk metrics over price and return series.
//!
//! All calculators return fractions; [`RiskMetrics::as_percent`] does the
//! ×100 scaling for presentation. Each is total over its input: short series,
//! zero variance and empty tails fall back to a fixed value.

use super::ohlcv::simple_returns;
use serde::{Deserialize, Serialize};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Annualized sample standard deviation of returns. Fewer than 2 returns: 0.
pub fn volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let m = mean(returns);
    let variance =
        returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}

/// (annualized mean return - risk_free_rate) / annualized volatility.
/// Fewer than 2 returns or zero volatility: 0.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let vol = volatility(returns);
    if vol == 0.0 {
        return 0.0;
    }
    (mean(returns) * TRADING_DAYS_PER_YEAR - risk_free_rate) / vol
}

/// Largest peak-to-trough decline of a price series, as a positive fraction.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }

    let mut peak = prices[0];
    let mut max_dd = 0.0_f64;

    for &price in &prices[1..] {
        if price > peak {
            peak = price;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - price) / peak);
        }
    }
    max_dd
}

/// cov(asset, market) / var(market). Mismatched lengths, fewer than 2 points
/// or a flat market: 1.
pub fn beta(asset_returns: &[f64], market_returns: &[f64]) -> f64 {
    if asset_returns.len() != market_returns.len() || asset_returns.len() < 2 {
        return 1.0;
    }

    let asset_mean = mean(asset_returns);
    let market_mean = mean(market_returns);

    let (covariance, market_variance) = asset_returns.iter().zip(market_returns).fold(
        (0.0, 0.0),
        |(cov, var), (a, m)| {
            let market_diff = m - market_mean;
            (cov + (a - asset_mean) * market_diff, var + market_diff * market_diff)
        },
    );

    if market_variance == 0.0 {
        1.0
    } else {
        covariance / market_variance
    }
}

/// Historical-simulation VaR: the return at index floor((1 - confidence) * n)
/// of the ascending sort. Empty input or an out-of-range index: 0.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let raw_index = ((1.0 - confidence) * sorted.len() as f64).floor();
    if raw_index < 0.0 {
        return 0.0;
    }
    sorted.get(raw_index as usize).copied().unwrap_or(0.0)
}

/// Mean of the returns at or below VaR; VaR itself when nothing qualifies.
pub fn conditional_var(returns: &[f64], confidence: f64) -> f64 {
    let var = value_at_risk(returns, confidence);
    let tail: Vec<f64> = returns.iter().copied().filter(|&r| r <= var).collect();

    if tail.is_empty() {
        return var;
    }
    mean(&tail)
}

/// The full set of risk measures for one asset, as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub beta: f64,
    pub var95: f64,
    pub cvar95: f64,
}

impl RiskMetrics {
    /// `asset_prices` and `benchmark_prices` must be oldest first. Without a
    /// benchmark, beta is 1.
    pub fn compute(
        asset_prices: &[f64],
        benchmark_prices: Option<&[f64]>,
        risk_free_rate: f64,
        confidence: f64,
    ) -> Self {
        let returns = simple_returns(asset_prices);
        let beta = match benchmark_prices {
            Some(prices) if prices.len() >= 2 => beta(&returns, &simple_returns(prices)),
            _ => 1.0,
        };

        RiskMetrics {
            volatility: volatility(&returns),
            sharpe_ratio: sharpe_ratio(&returns, risk_free_rate),
            max_drawdown: max_drawdown(asset_prices),
            beta,
            var95: value_at_risk(&returns, confidence),
            cvar95: conditional_var(&returns, confidence),
        }
    }

    pub fn as_percent(&self) -> RiskReport {
        let volatility = self.volatility * 100.0;
        RiskReport {
            volatility,
            sharpe_ratio: self.sharpe_ratio,
            max_drawdown: self.max_drawdown * 100.0,
            beta: self.beta,
            var95: self.var95 * 100.0,
            cvar95: self.cvar95 * 100.0,
            risk_level: RiskLevel::from_volatility_pct(volatility),
            risk_adjusted_return: ReturnQuality::from_sharpe(self.sharpe_ratio),
            market_correlation: MarketCorrelation::from_beta(self.beta),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_volatility_pct(volatility_pct: f64) -> Self {
        if volatility_pct > 30.0 {
            RiskLevel::High
        } else if volatility_pct > 15.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnQuality {
    Good,
    Fair,
    Poor,
}

impl ReturnQuality {
    pub fn from_sharpe(sharpe: f64) -> Self {
        if sharpe > 1.0 {
            ReturnQuality::Good
        } else if sharpe > 0.0 {
            ReturnQuality::Fair
        } else {
            ReturnQuality::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketCorrelation {
    #[serde(rename = "High correlation")]
    High,
    #[serde(rename = "Moderate correlation")]
    Moderate,
    #[serde(rename = "Low correlation")]
    Low,
}

impl MarketCorrelation {
    pub fn from_beta(beta: f64) -> Self {
        let b = beta.abs();
        if b > 1.2 {
            MarketCorrelation::High
        } else if b < 0.8 {
            MarketCorrelation::Low
        } else {
            MarketCorrelation::Moderate
        }
    }
}

/// Presentation form: volatility, drawdown, VaR and CVaR in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub beta: f64,
    pub var95: f64,
    pub cvar95: f64,
    pub risk_level: RiskLevel,
    pub risk_adjusted_return: ReturnQuality,
    pub market_correlation: MarketCorrelation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TAIL: [f64; 5] = [-0.05, -0.02, 0.0, 0.01, 0.03];

    #[test]
    fn volatility_short_series() {
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(volatility(&[0.01]), 0.0);
    }

    #[test]
    fn volatility_is_annualized_sample_stddev() {
        // mean 0, squared deviations 0.0002, n-1 = 1 → stddev 0.01414...
        let vol = volatility(&[0.01, -0.01]);
        assert_relative_eq!(vol, 0.0002_f64.sqrt() * 252.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn volatility_constant_returns_is_zero() {
        assert_eq!(volatility(&[0.25; 8]), 0.0);
    }

    #[test]
    fn sharpe_zero_for_flat_or_short() {
        assert_eq!(sharpe_ratio(&[0.01], 0.02), 0.0);
        assert_eq!(sharpe_ratio(&[0.25; 8], 0.02), 0.0);
    }

    #[test]
    fn sharpe_known_value() {
        let returns = [0.01, -0.005, 0.02, 0.0];
        let expected = (0.00625 * 252.0 - 0.02) / volatility(&returns);
        assert_relative_eq!(sharpe_ratio(&returns, 0.02), expected, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_known_value() {
        assert_relative_eq!(max_drawdown(&[100.0, 90.0, 80.0, 95.0]), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_uses_running_peak() {
        let dd = max_drawdown(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        assert_relative_eq!(dd, (110.0 - 80.0) / 110.0, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_monotonic_rise_is_zero() {
        assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(max_drawdown(&[5.0]), 0.0);
    }

    #[test]
    fn beta_identical_series_is_one() {
        let x = [0.01, -0.02, 0.015, 0.003];
        assert_relative_eq!(beta(&x, &x), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn beta_double_exposure_is_two() {
        let market = [0.01, -0.02, 0.015, 0.003];
        let asset: Vec<f64> = market.iter().map(|r| r * 2.0).collect();
        assert_relative_eq!(beta(&asset, &market), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn beta_degenerate_defaults_to_one() {
        assert_eq!(beta(&[0.01, 0.02], &[0.01]), 1.0);
        assert_eq!(beta(&[0.01], &[0.01]), 1.0);
        assert_eq!(beta(&[0.01, 0.02, 0.03], &[0.25, 0.25, 0.25]), 1.0);
    }

    #[test]
    fn var_historical_index() {
        assert_eq!(value_at_risk(&TAIL, 0.95), -0.05);
        assert_eq!(value_at_risk(&[], 0.95), 0.0);
    }

    #[test]
    fn var_sorts_unordered_input() {
        let returns = [0.03, 0.0, -0.05, 0.01, -0.02];
        assert_eq!(value_at_risk(&returns, 0.95), -0.05);
        // floor(0.4 * 5) = 2 → third smallest
        assert_eq!(value_at_risk(&returns, 0.6), 0.0);
    }

    #[test]
    fn var_out_of_range_confidence() {
        assert_eq!(value_at_risk(&TAIL, 0.0), 0.0);
        assert_eq!(value_at_risk(&TAIL, 1.5), 0.0);
    }

    #[test]
    fn cvar_single_tail_value() {
        assert_eq!(conditional_var(&TAIL, 0.95), -0.05);
    }

    #[test]
    fn cvar_averages_tail() {
        // floor(0.6 * 5) = 3 → VaR = 0.01; tail = [-0.05, -0.02, 0.0, 0.01]
        assert_relative_eq!(conditional_var(&TAIL, 0.4), -0.015, epsilon = 1e-12);
    }

    #[test]
    fn cvar_falls_back_to_var() {
        assert_eq!(conditional_var(&[], 0.95), 0.0);
        // confidence 0 puts the index past the end: VaR 0.0, nothing at or below it
        assert_eq!(conditional_var(&[0.01, 0.02], 0.0), 0.0);
    }

    #[test]
    fn compute_without_benchmark_has_unit_beta() {
        let prices = [100.0, 102.0, 99.0, 101.0, 98.0];
        let metrics = RiskMetrics::compute(&prices, None, 0.02, 0.95);
        assert_eq!(metrics.beta, 1.0);
        assert!(metrics.volatility > 0.0);
        assert_relative_eq!(metrics.max_drawdown, (102.0 - 98.0) / 102.0, epsilon = 1e-12);
    }

    #[test]
    fn compute_against_itself_has_unit_beta() {
        let prices = [100.0, 102.0, 99.0, 101.0, 98.0];
        let metrics = RiskMetrics::compute(&prices, Some(&prices), 0.02, 0.95);
        assert_relative_eq!(metrics.beta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn as_percent_scales_fraction_fields() {
        let metrics = RiskMetrics {
            volatility: 0.322,
            sharpe_ratio: -0.28,
            max_drawdown: 0.329,
            beta: 1.28,
            var95: -0.0247,
            cvar95: -0.0448,
        };
        let report = metrics.as_percent();
        assert_relative_eq!(report.volatility, 32.2, epsilon = 1e-9);
        assert_relative_eq!(report.max_drawdown, 32.9, epsilon = 1e-9);
        assert_relative_eq!(report.var95, -2.47, epsilon = 1e-9);
        assert_relative_eq!(report.cvar95, -4.48, epsilon = 1e-9);
        assert_eq!(report.sharpe_ratio, -0.28);
        assert_eq!(report.beta, 1.28);
        assert_eq!(report.risk_level, RiskLevel::High);
        assert_eq!(report.risk_adjusted_return, ReturnQuality::Poor);
        assert_eq!(report.market_correlation, MarketCorrelation::High);
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = RiskMetrics::compute(&[100.0, 101.0], None, 0.02, 0.95).as_percent();
        let json = serde_json::to_value(report).unwrap();
        assert!(json.get("sharpeRatio").is_some());
        assert!(json.get("maxDrawdown").is_some());
        assert_eq!(json["marketCorrelation"], "Moderate correlation");
        assert_eq!(json["riskLevel"], "Low");
    }

    #[test]
    fn labels_thresholds() {
        assert_eq!(RiskLevel::from_volatility_pct(20.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility_pct(10.0), RiskLevel::Low);
        assert_eq!(ReturnQuality::from_sharpe(1.5), ReturnQuality::Good);
        assert_eq!(ReturnQuality::from_sharpe(0.5), ReturnQuality::Fair);
        assert_eq!(MarketCorrelation::from_beta(0.5), MarketCorrelation::Low);
        assert_eq!(MarketCorrelation::from_beta(1.0), MarketCorrelation::Moderate);
    }
}
