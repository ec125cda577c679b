//! Latest-quote summary derived from daily bars.

use super::error::QuantdashError;
use super::ohlcv::{sort_chronological, OhlcvBar};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub symbol: String,
    pub name: String,
    /// Latest close.
    pub price: f64,
    /// Latest close minus the previous close; 0 with a single bar.
    pub change: f64,
    pub change_percent: f64,
    pub volume: i64,
    /// The bars the quote was taken from, oldest first.
    pub data: Vec<OhlcvBar>,
}

/// Quote for `symbol` from its bars, in any order.
pub fn market_quote(symbol: &str, bars: &[OhlcvBar]) -> Result<MarketData, QuantdashError> {
    let mut data = bars.to_vec();
    sort_chronological(&mut data);

    let Some(last) = data.last() else {
        return Err(QuantdashError::NoData {
            symbol: symbol.to_string(),
        });
    };

    let previous = data.len().checked_sub(2).map(|i| data[i].close);
    let change = previous.map_or(0.0, |prev| last.close - prev);
    let change_percent = match previous {
        Some(prev) if prev != 0.0 => change / prev * 100.0,
        _ => 0.0,
    };

    Ok(MarketData {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        price: last.close,
        change,
        change_percent,
        volume: last.volume,
        data,
    })
}
