//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first (oldest) price unsmoothed, then
//! EMA = P[i]*k + EMA*(1-k). The slice must be oldest first.

pub fn ema(prices: &[f64], period: usize) -> f64 {
    let Some((&seed, rest)) = prices.split_first() else {
        return 0.0;
    };

    let k = smoothing_factor(period);
    rest.iter().fold(seed, |ema, &price| price * k + ema * (1.0 - k))
}

/// EMA value after every price, same length as `prices`.
pub(crate) fn ema_series(prices: &[f64], period: usize) -> Vec<f64> {
    let k = smoothing_factor(period);
    let mut out = Vec::with_capacity(prices.len());
    let mut ema = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        ema = if i == 0 { price } else { price * k + ema * (1.0 - k) };
        out.push(ema);
    }
    out
}

fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}
