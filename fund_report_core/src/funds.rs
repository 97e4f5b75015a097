// fund_report_core/src/funds.rs

//! Fund input files.
//! A fund is stored as JSON, CSV or a bincode-encoded `FundFile` (.bin, memory-mapped).
//! Robust mode reads a `FundMatrix`: one shared date index and many value columns.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::InputError;
use crate::series::{TimeSeries, ValueSeries};

/// Serialized form of a fund (.json and .bin).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FundFile {
    #[serde(default)]
    pub name: Option<String>,
    pub values: Vec<(NaiveDate, Option<f64>)>,
    #[serde(default)]
    pub leverage: Option<Vec<(NaiveDate, Option<f64>)>>,
    #[serde(default)]
    pub commissions: f64,
    #[serde(default)]
    pub slippage: f64,
}

/// One row of a fund CSV file: `date,value[,leverage]`.
#[derive(Debug, serde::Deserialize)]
struct FundCsvRow {
    date: NaiveDate,
    value: Option<f64>,
    #[serde(default)]
    leverage: Option<f64>,
}

/// A loaded fund, ready for reporting.
#[derive(Debug, Clone)]
pub struct FundRecord {
    pub name: String,
    pub series: TimeSeries,
    pub leverage: Option<TimeSeries>,
    pub commissions: f64,
    pub slippage: f64,
}

impl FundRecord {
    pub fn new(name: &str, series: TimeSeries) -> Self {
        Self {
            name: name.to_string(),
            series,
            leverage: None,
            commissions: 0.0,
            slippage: 0.0,
        }
    }

    pub fn with_leverage(mut self, leverage: TimeSeries) -> Self {
        self.leverage = Some(leverage);
        self
    }

    pub fn with_costs(mut self, commissions: f64, slippage: f64) -> Self {
        self.commissions = commissions;
        self.slippage = slippage;
        self
    }

    fn from_file(file: FundFile, fallback_name: &str) -> Result<Self, InputError> {
        let name = file.name.as_deref().unwrap_or(fallback_name);
        let mut record = Self::new(name, TimeSeries::from_pairs(file.values)?)
            .with_costs(file.commissions, file.slippage);

        if let Some(leverage) = file.leverage {
            record = record.with_leverage(TimeSeries::from_pairs(leverage)?);
        }

        Ok(record)
    }
}

/// Loads a fund file, choosing the decoder by extension.
pub fn load_fund<P: AsRef<Path>>(path: P) -> Result<FundRecord, InputError> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let record = match extension(path).as_str() {
        "json" => FundRecord::from_file(read_json(path)?, &stem)?,
        "bin" => FundRecord::from_file(read_bincode(path)?, &stem)?,
        "csv" => read_fund_csv(path, &stem)?,
        _ => return Err(InputError::UnsupportedFormat(path.display().to_string())),
    };

    tracing::debug!(fund = %record.name, points = record.series.len(), "Loaded fund");
    Ok(record)
}

fn read_fund_csv(path: &Path, name: &str) -> Result<FundRecord, InputError> {
    let malformed = |e: csv::Error| InputError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let mut reader = csv::Reader::from_path(path).map_err(malformed)?;
    let mut values = Vec::new();
    let mut leverage = Vec::new();

    for row in reader.deserialize::<FundCsvRow>() {
        let row = row.map_err(malformed)?;
        values.push((row.date, row.value));
        leverage.push((row.date, row.leverage));
    }

    let series = TimeSeries::from_pairs(values)?;
    let mut record = FundRecord::new(name, series);
    if leverage.iter().any(|(_, v)| v.is_some()) {
        record = record.with_leverage(TimeSeries::from_pairs(leverage)?);
    }

    Ok(record)
}

/// Value columns sharing one date index, e.g. the paths of a batch backtest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FundMatrix {
    pub dates: Vec<NaiveDate>,
    pub funds: Vec<Vec<f64>>,
}

impl FundMatrix {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.dates.is_empty() || self.funds.is_empty() {
            return Err(InputError::Empty);
        }

        for (column, values) in self.funds.iter().enumerate() {
            if values.len() != self.dates.len() {
                return Err(InputError::MatrixShape {
                    column,
                    values: values.len(),
                    dates: self.dates.len(),
                });
            }
        }

        Ok(())
    }

    pub fn columns(&self) -> Result<Vec<ValueSeries>, InputError> {
        self.funds
            .iter()
            .map(|values| ValueSeries::new(self.dates.clone(), values.clone()))
            .collect()
    }

    /// Average value across all columns on each date.
    pub fn mean_path(&self) -> Result<ValueSeries, InputError> {
        self.validate()?;

        let n = self.funds.len() as f64;
        let values = (0..self.dates.len())
            .map(|i| self.funds.iter().map(|column| column[i]).sum::<f64>() / n)
            .collect();

        ValueSeries::new(self.dates.clone(), values)
    }

    /// Total return of each column, first to last value.
    pub fn total_returns(&self) -> Vec<f64> {
        self.funds
            .iter()
            .filter_map(|column| match (column.first(), column.last()) {
                (Some(first), Some(last)) if *first != 0.0 => Some(last / first - 1.0),
                _ => None,
            })
            .collect()
    }
}

/// Loads a fund matrix from `.json` or `.bin`.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<FundMatrix, InputError> {
    let path = path.as_ref();
    let matrix: FundMatrix = match extension(path).as_str() {
        "json" => read_json(path)?,
        "bin" => read_bincode(path)?,
        _ => return Err(InputError::UnsupportedFormat(path.display().to_string())),
    };

    matrix.validate()?;
    tracing::debug!(columns = matrix.funds.len(), points = matrix.dates.len(), "Loaded fund matrix");
    Ok(matrix)
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|e| InputError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn read_bincode<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let read_error = |source: std::io::Error| InputError::Read {
        path: path.display().to_string(),
        source,
    };

    let file = std::fs::File::open(path).map_err(read_error)?;
    // The mapping is read-only and lives only for this call.
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(read_error)?;

    bincode::deserialize(&mmap).map_err(|e| InputError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_json_fund() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("momentum.json");
        std::fs::write(
            &path,
            r#"{ "values": [["2020-01-03", 101.0], ["2020-01-02", 100.0], ["2020-01-06", null]], "commissions": 12.5 }"#,
        )
        .unwrap();

        let fund = load_fund(&path).unwrap();
        assert_eq!(fund.name, "momentum");
        assert_eq!(fund.series.dates()[0], date(2020, 1, 2));
        assert_eq!(fund.series.values(), &[Some(100.0), Some(101.0), None]);
        assert_eq!(fund.commissions, 12.5);
        assert!(fund.leverage.is_none());
    }

    #[test]
    fn test_load_csv_fund_with_leverage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,value,leverage").unwrap();
        writeln!(file, "2020-01-02,100,1.5").unwrap();
        writeln!(file, "2020-01-03,,1.7").unwrap();
        drop(file);

        let fund = load_fund(&path).unwrap();
        assert_eq!(fund.name, "pairs");
        assert_eq!(fund.series.values(), &[Some(100.0), None]);
        let leverage = fund.leverage.unwrap();
        assert_eq!(leverage.values(), &[Some(1.5), Some(1.7)]);
    }

    #[test]
    fn test_load_bincode_fund() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fund.bin");
        let file = FundFile {
            name: Some("Carry".to_string()),
            values: vec![(date(2020, 1, 2), Some(1.0)), (date(2020, 1, 3), Some(1.1))],
            leverage: None,
            commissions: 0.0,
            slippage: 3.0,
        };
        std::fs::write(&path, bincode::serialize(&file).unwrap()).unwrap();

        let fund = load_fund(&path).unwrap();
        assert_eq!(fund.name, "Carry");
        assert_eq!(fund.series.len(), 2);
        assert_eq!(fund.slippage, 3.0);
    }

    #[test]
    fn test_load_fund_errors() {
        let dir = tempfile::tempdir().unwrap();

        let unsupported = dir.path().join("fund.pkl");
        std::fs::write(&unsupported, "x").unwrap();
        assert!(matches!(load_fund(&unsupported), Err(InputError::UnsupportedFormat(_))));

        let malformed = dir.path().join("fund.json");
        std::fs::write(&malformed, "{ not json").unwrap();
        assert!(matches!(load_fund(&malformed), Err(InputError::Malformed { .. })));

        assert!(matches!(load_fund(dir.path().join("missing.json")), Err(InputError::Read { .. })));
    }

    #[test]
    fn test_matrix_mean_path_and_total_returns() {
        let matrix = FundMatrix {
            dates: vec![date(2020, 1, 2), date(2020, 1, 3)],
            funds: vec![vec![100.0, 110.0], vec![100.0, 90.0], vec![100.0, 130.0]],
        };

        let mean = matrix.mean_path().unwrap();
        assert_eq!(mean.values(), &[100.0, 110.0]);

        let totals = matrix.total_returns();
        assert_eq!(totals.len(), 3);
        assert_relative_eq!(totals[1], -0.1, max_relative = 1e-12);
        assert_eq!(matrix.columns().unwrap().len(), 3);
    }

    #[test]
    fn test_load_matrix_rejects_ragged_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.json");
        std::fs::write(&path, r#"{ "dates": ["2020-01-02", "2020-01-03"], "funds": [[1.0, 2.0], [1.0]] }"#).unwrap();

        assert!(matches!(
            load_matrix(&path),
            Err(InputError::MatrixShape { column: 1, values: 1, dates: 2 })
        ));
    }
}
