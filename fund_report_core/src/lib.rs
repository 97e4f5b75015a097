// fund_report_core/src/lib.rs

pub mod html;
pub mod plot;
pub mod error;
pub mod funds;
pub mod report;
pub mod series;
pub mod returns;
pub mod metrics;
pub mod calendar;
pub mod settings;
pub mod formatter;
pub mod data_handler;

pub use error::{ReportError, Result};
