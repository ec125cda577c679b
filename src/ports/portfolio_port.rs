//! Portfolio storage port trait.
//!
//! Implementations own their concurrency control; callers only see snapshots.

use crate::domain::error::QuantdashError;
use crate::domain::portfolio::Portfolio;

pub trait PortfolioPort {
    fn snapshot(&self) -> Result<Portfolio, QuantdashError>;

    /// Open a position marked at `price`; returns the updated portfolio.
    fn add_position(
        &self,
        symbol: &str,
        quantity: f64,
        price: f64,
    ) -> Result<Portfolio, QuantdashError>;

    /// Add `symbol` to the watchlist if not already present.
    fn add_to_watchlist(&self, symbol: &str) -> Result<Portfolio, QuantdashError>;
}
