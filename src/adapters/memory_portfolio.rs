//! In-memory portfolio store guarded by a mutex.

use crate::domain::error::QuantdashError;
use crate::domain::portfolio::{Portfolio, Position};
use crate::ports::portfolio_port::PortfolioPort;
use std::sync::{Mutex, MutexGuard};

pub struct InMemoryPortfolioStore {
    inner: Mutex<Portfolio>,
}

impl InMemoryPortfolioStore {
    pub fn new(portfolio: Portfolio) -> Self {
        Self {
            inner: Mutex::new(portfolio),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Portfolio>, QuantdashError> {
        self.inner.lock().map_err(|_| QuantdashError::Data {
            reason: "portfolio store lock poisoned".into(),
        })
    }
}

impl PortfolioPort for InMemoryPortfolioStore {
    fn snapshot(&self) -> Result<Portfolio, QuantdashError> {
        Ok(self.lock()?.clone())
    }

    fn add_position(
        &self,
        symbol: &str,
        quantity: f64,
        price: f64,
    ) -> Result<Portfolio, QuantdashError> {
        let mut portfolio = self.lock()?;
        portfolio.positions.push(Position::open(symbol, quantity, price));
        portfolio.recompute_totals();
        Ok(portfolio.clone())
    }

    fn add_to_watchlist(&self, symbol: &str) -> Result<Portfolio, QuantdashError> {
        let symbol = symbol.trim().to_uppercase();
        let mut portfolio = self.lock()?;
        if !symbol.is_empty() && !portfolio.watchlist.contains(&symbol) {
            portfolio.watchlist.push(symbol);
        }
        Ok(portfolio.clone())
    }
}
