//! Mock portfolio positions and their valuation against current quotes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_price: f64,
    pub value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

impl Position {
    /// A freshly opened position, marked at its entry price.
    pub fn open(symbol: &str, quantity: f64, price: f64) -> Self {
        let symbol = symbol.trim().to_uppercase();
        Self {
            name: symbol.clone(),
            symbol,
            quantity,
            avg_price: price,
            current_price: price,
            value: quantity * price,
            pnl: 0.0,
            pnl_percent: 0.0,
        }
    }

    pub fn cost(&self) -> f64 {
        self.quantity * self.avg_price
    }

    /// Re-mark at `price`.
    pub fn mark(&mut self, price: f64) {
        let cost = self.cost();
        self.current_price = price;
        self.value = self.quantity * price;
        self.pnl = self.value - cost;
        self.pnl_percent = if cost != 0.0 {
            self.pnl / cost * 100.0
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub total_value: f64,
    pub total_pnl: f64,
    pub total_pnl_percent: f64,
    pub positions: Vec<Position>,
    pub watchlist: Vec<String>,
}

impl Portfolio {
    pub fn new(positions: Vec<Position>, watchlist: Vec<String>) -> Self {
        let mut portfolio = Self {
            positions,
            watchlist,
            ..Self::default()
        };
        portfolio.recompute_totals();
        portfolio
    }

    /// Re-mark every position with `quote`. A symbol without a quote is marked
    /// at its average price.
    pub fn revalue<F>(&mut self, mut quote: F)
    where
        F: FnMut(&str) -> Option<f64>,
    {
        for position in &mut self.positions {
            let price = quote(&position.symbol).unwrap_or(position.avg_price);
            position.mark(price);
        }
        self.recompute_totals();
    }

    pub fn recompute_totals(&mut self) {
        let total_cost: f64 = self.positions.iter().map(Position::cost).sum();
        self.total_value = self.positions.iter().map(|p| p.value).sum();
        self.total_pnl = self.total_value - total_cost;
        self.total_pnl_percent = if total_cost > 0.0 {
            self.total_pnl / total_cost * 100.0
        } else {
            0.0
        };
    }
}

/// Parse `AAPL:10:150, TSLA:5:200` into opened positions.
pub fn parse_positions(raw: &str) -> Result<Vec<Position>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [symbol, quantity, price] = parts.as_slice() else {
                return Err(format!("'{entry}' is not SYMBOL:QUANTITY:PRICE"));
            };
            if symbol.is_empty() {
                return Err(format!("'{entry}' has an empty symbol"));
            }
            let quantity: f64 = quantity
                .parse()
                .map_err(|_| format!("'{entry}' has an invalid quantity"))?;
            let price: f64 = price
                .parse()
                .map_err(|_| format!("'{entry}' has an invalid price"))?;
            Ok(Position::open(symbol, quantity, price))
        })
        .collect()
}

/// Parse a comma-separated watchlist, upper-casing and dropping duplicates.
pub fn parse_watchlist(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()) {
        if !symbol.is_empty() && !out.contains(&symbol) {
            out.push(symbol);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Portfolio {
        Portfolio::new(
            vec![
                Position::open("AAPL", 10.0, 150.0),
                Position::open("TSLA", 5.0, 200.0),
                Position::open("MSFT", 8.0, 300.0),
            ],
            vec!["AAPL".into(), "TSLA".into()],
        )
    }

    #[test]
    fn open_position_is_flat() {
        let p = Position::open("aapl", 10.0, 150.0);
        assert_eq!(p.symbol, "AAPL");
        assert_eq!(p.name, "AAPL");
        assert_eq!(p.value, 1500.0);
        assert_eq!(p.pnl, 0.0);
    }

    #[test]
    fn revalue_marks_positions_and_totals() {
        let mut portfolio = sample();
        portfolio.revalue(|symbol| match symbol {
            "AAPL" => Some(256.87),
            "TSLA" => Some(423.39),
            "MSFT" => Some(507.03),
            _ => None,
        });

        let aapl = &portfolio.positions[0];
        assert_relative_eq!(aapl.value, 2568.7, epsilon = 1e-9);
        assert_relative_eq!(aapl.pnl, 1068.7, epsilon = 1e-9);
        assert_relative_eq!(aapl.pnl_percent, 71.246_666_666, epsilon = 1e-6);

        assert_relative_eq!(portfolio.total_value, 2568.7 + 2116.95 + 4056.24, epsilon = 1e-9);
        assert_relative_eq!(
            portfolio.total_pnl,
            portfolio.total_value - 4900.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            portfolio.total_pnl_percent,
            portfolio.total_pnl / 4900.0 * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn missing_quote_marks_at_cost() {
        let mut portfolio = sample();
        portfolio.revalue(|symbol| (symbol == "AAPL").then_some(160.0));

        assert_eq!(portfolio.positions[1].current_price, 200.0);
        assert_eq!(portfolio.positions[1].pnl, 0.0);
        assert_relative_eq!(portfolio.total_pnl, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_cost_position_has_zero_percent() {
        let mut p = Position::open("FREE", 10.0, 0.0);
        p.mark(5.0);
        assert_eq!(p.pnl, 50.0);
        assert_eq!(p.pnl_percent, 0.0);

        let portfolio = Portfolio::new(vec![p], vec![]);
        assert_eq!(portfolio.total_pnl_percent, 0.0);
    }

    #[test]
    fn parse_positions_list() {
        let positions = parse_positions("AAPL:10:150, tsla:5:200").unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1].symbol, "TSLA");
        assert_eq!(positions[1].avg_price, 200.0);
        assert!(parse_positions("").unwrap().is_empty());
    }

    #[test]
    fn parse_positions_rejects_malformed() {
        assert!(parse_positions("AAPL:10").is_err());
        assert!(parse_positions("AAPL:ten:150").is_err());
        assert!(parse_positions(":10:150").is_err());
    }

    #[test]
    fn parse_watchlist_dedups() {
        assert_eq!(
            parse_watchlist("aapl, TSLA,,AAPL"),
            vec!["AAPL".to_string(), "TSLA".to_string()]
        );
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("totalPnlPercent").is_some());
        assert!(json["positions"][0].get("avgPrice").is_some());
    }
}
