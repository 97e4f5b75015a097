// fund_report_core/src/error.rs

//! Error taxonomy for report generation.
//! Every failure is fatal to the report being generated, never to the whole batch.

use thiserror::Error;

/// Malformed or missing fund input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("time series is empty")]
    Empty,

    #[error("time series length mismatch: {dates} dates vs {values} values")]
    LengthMismatch { dates: usize, values: usize },

    #[error("duplicate date {0} in time series")]
    DuplicateDate(chrono::NaiveDate),

    #[error("time series has no known values")]
    NoValues,

    #[error("series share no common dates")]
    NoOverlap,

    #[error("unsupported fund file '{0}': expected .json, .csv or .bin")]
    UnsupportedFormat(String),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("fund matrix column {column} has {values} values for {dates} dates")]
    MatrixShape { column: usize, values: usize, dates: usize },
}

/// Benchmark or sector data unavailable for the requested dates.
#[derive(Error, Debug)]
pub enum DataFetchError {
    #[error("no trading days requested")]
    EmptyRange,

    #[error("no data file for symbol '{symbol}' at {path}")]
    MissingSymbol { symbol: String, path: String },

    #[error("field '{field}' not found in data for '{symbol}'")]
    MissingField { symbol: String, field: String },

    #[error("failed to read market data for '{symbol}': {reason}")]
    Read { symbol: String, reason: String },

    #[error("no '{field}' data for '{symbol}' between {start} and {end}")]
    NoData {
        symbol: String,
        field: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// A metric could not be computed from the given values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("not enough data points ({points}) to compute the metric")]
    EmptyPeriod { points: usize },

    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("series are not aligned to the same dates")]
    Misaligned,

    #[error("series has zero variance or a zero base value")]
    DegenerateSeries,

    #[error("input data unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    DataFetch(#[from] DataFetchError),

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error("failed to write report output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write chart: {0}")]
    Chart(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
