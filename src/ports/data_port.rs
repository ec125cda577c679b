//! Price data access port trait.

use crate::domain::error::QuantdashError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` within `[start_date, end_date]`, oldest first.
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, QuantdashError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantdashError>;
}
