//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row of
//! `date,open,high,low,close,volume`. Rows may be in any order.

use crate::domain::error::QuantdashError;
use crate::domain::ohlcv::{sort_chronological, OhlcvBar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// `<base>/<symbol>.csv`. Symbols that could name a file outside the
    /// data directory are rejected.
    fn csv_path(&self, symbol: &str) -> Result<PathBuf, QuantdashError> {
        if symbol.is_empty() || symbol.contains(['/', '\\']) || symbol.contains("..") {
            return Err(QuantdashError::Data {
                reason: format!("invalid symbol '{}'", symbol),
            });
        }
        Ok(self.base_path.join(format!("{}.csv", symbol)))
    }
}

fn field<T: FromStr>(record: &StringRecord, index: usize, name: &str) -> Result<T, QuantdashError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| QuantdashError::Data {
        reason: format!("missing {} column", name),
    })?;
    raw.trim().parse().map_err(|e| QuantdashError::Data {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, QuantdashError> {
        let path = self.csv_path(symbol)?;
        let content = fs::read_to_string(&path).map_err(|e| QuantdashError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantdashError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date: NaiveDate = field(&record, 0, "date")?;
            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: field(&record, 1, "open")?,
                high: field(&record, 2, "high")?,
                low: field(&record, 3, "low")?,
                close: field(&record, 4, "close")?,
                volume: field(&record, 5, "volume")?,
            });
        }

        sort_chronological(&mut bars);
        tracing::debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantdashError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuantdashError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| QuantdashError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
