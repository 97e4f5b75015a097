// fund_report_core/src/data_handler.rs

//! Market data access.
//! `DataHandler` is the seam to the historical price store; `CsvDataHandler`
//! reads one `<symbol>.csv` file per symbol from a data directory.

use chrono::NaiveDate;

use crate::error::DataFetchError;
use crate::series::{TimeSeries, ValueSeries};

pub trait DataHandler {
    /// Returns one series per symbol, on exactly the requested dates.
    /// Dates without data are gaps.
    fn get_data(
        &self,
        dates: &[NaiveDate],
        symbols: &[String],
        field: &str,
    ) -> Result<Vec<TimeSeries>, DataFetchError>;

    /// Fetches a single symbol and forward-fills it.
    fn get_filled(
        &self,
        dates: &[NaiveDate],
        symbol: &str,
        field: &str,
    ) -> Result<ValueSeries, DataFetchError> {
        let (Some(start), Some(end)) = (dates.first(), dates.last()) else {
            return Err(DataFetchError::EmptyRange);
        };

        let no_data = || DataFetchError::NoData {
            symbol: symbol.to_string(),
            field: field.to_string(),
            start: *start,
            end: *end,
        };

        let series = self
            .get_data(dates, &[symbol.to_string()], field)?
            .into_iter()
            .next()
            .ok_or_else(no_data)?;

        series.forward_fill().map_err(|_| no_data())
    }
}

pub struct CsvDataHandler {
    data_path: std::path::PathBuf,
}

impl CsvDataHandler {
    pub fn new<P: AsRef<std::path::Path>>(data_path: P) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
        }
    }

    fn symbol_path(&self, symbol: &str) -> std::path::PathBuf {
        self.data_path.join(format!("{}.csv", symbol))
    }

    /// Reads the `field` column of a symbol file keyed by date.
    fn read_symbol(
        &self,
        symbol: &str,
        field: &str,
    ) -> Result<std::collections::BTreeMap<NaiveDate, f64>, DataFetchError> {
        let path = self.symbol_path(symbol);
        if !path.exists() {
            return Err(DataFetchError::MissingSymbol {
                symbol: symbol.to_string(),
                path: path.display().to_string(),
            });
        }

        let read_error = |e: csv::Error| DataFetchError::Read {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        };

        let mut reader = csv::Reader::from_path(&path).map_err(read_error)?;
        let headers = reader.headers().map_err(read_error)?.clone();

        let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let date_idx = column("date").ok_or_else(|| DataFetchError::MissingField {
            symbol: symbol.to_string(),
            field: "date".to_string(),
        })?;
        let field_idx = column(field).ok_or_else(|| DataFetchError::MissingField {
            symbol: symbol.to_string(),
            field: field.to_string(),
        })?;

        let mut prices = std::collections::BTreeMap::new();
        for record in reader.records() {
            let record = record.map_err(read_error)?;

            let raw_date = record.get(date_idx).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| DataFetchError::Read {
                symbol: symbol.to_string(),
                reason: format!("invalid date '{}': {}", raw_date, e),
            })?;

            let raw_value = record.get(field_idx).unwrap_or_default().trim();
            if raw_value.is_empty() {
                continue;
            }
            let value: f64 = raw_value.parse().map_err(|e| DataFetchError::Read {
                symbol: symbol.to_string(),
                reason: format!("invalid {} '{}' on {}: {}", field, raw_value, date, e),
            })?;

            prices.insert(date, value);
        }

        Ok(prices)
    }
}

impl DataHandler for CsvDataHandler {
    fn get_data(
        &self,
        dates: &[NaiveDate],
        symbols: &[String],
        field: &str,
    ) -> Result<Vec<TimeSeries>, DataFetchError> {
        let (Some(start), Some(end)) = (dates.first(), dates.last()) else {
            return Err(DataFetchError::EmptyRange);
        };

        let mut result = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let prices = self.read_symbol(symbol, field)?;
            let values: Vec<Option<f64>> = dates.iter().map(|date| prices.get(date).copied()).collect();

            if values.iter().all(Option::is_none) {
                return Err(DataFetchError::NoData {
                    symbol: symbol.clone(),
                    field: field.to_string(),
                    start: *start,
                    end: *end,
                });
            }

            tracing::debug!(symbol = %symbol, field, points = values.len(), "Loaded market data");

            let series = TimeSeries::new(dates.to_vec(), values).map_err(|e| DataFetchError::Read {
                symbol: symbol.clone(),
                reason: e.to_string(),
            })?;
            result.push(series);
        }

        Ok(result)
    }
}
