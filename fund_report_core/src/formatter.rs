// fund_report_core/src/formatter.rs

//! Fixed-width performance summary.
//! Produces the plain-text block that the HTML writer wraps in `<pre>`.

use std::io::Write;

use crate::calendar;
use crate::metrics::{self, MetricTable, MetricValue, YearlyMetric};
use crate::returns;
use crate::series::ValueSeries;
use crate::settings::{ReportSettings, SectorIndex};

const DATE_FORMAT: &str = "%m/%d/%Y";
const SECTORS_PER_LINE: usize = 3;

/// Everything `print_stats` needs for one fund.
/// `fund` and `benchmark` must already be aligned to the same dates.
#[derive(Debug, Clone)]
pub struct FundStats<'a> {
    pub name: &'a str,
    pub fund: &'a ValueSeries,
    pub benchmark: &'a ValueSeries,
    pub benchmark_symbol: &'a str,
    pub commissions: f64,
    pub slippage: f64,
    pub sector_correlations: &'a [(SectorIndex, MetricValue)],
}

/// Writes the performance summary of one fund.
/// # Arguments
/// * `stats` - Fund, benchmark and precomputed sector correlations.
/// * `settings` - Notional and periods per year.
/// * `out` - Destination stream.
/// # Returns
/// * `std::io::Result<()>`. Metrics that cannot be computed are printed as `n/a`.
pub fn print_stats<W: Write>(stats: &FundStats<'_>, settings: &ReportSettings, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Performance Summary for {} Backtest", stats.name)?;
    writeln!(
        out,
        "For the dates {} to {}\n",
        stats.fund.start_date().format(DATE_FORMAT),
        stats.fund.end_date().format(DATE_FORMAT),
    )?;

    write_fund_values(stats, settings.stats_notional, out)?;

    writeln!(out, "Yearly Performance Metrics ")?;
    let years = stats.fund.years();
    write!(out, "\n{:28}", "")?;
    for year in &years {
        write!(out, "      {}", year)?;
    }
    writeln!(out)?;

    let ppy = settings.periods_per_year();
    for (i, metric) in YearlyMetric::ALL.iter().enumerate() {
        if i > 0 {
            writeln!(out, "\n")?;
        }

        let label = format!("{}:", metric.label());
        let fund_table = MetricTable::over_years(stats.fund, &years, |values| metric.compute(values, ppy));
        let bench_table = MetricTable::over_years(stats.benchmark, &years, |values| metric.compute(values, ppy));

        write!(out, "Fund {:<24}", label)?;
        write_yearly_row(out, &fund_table, *metric, stats.name)?;
        write!(out, "\n{:<4} {:<24}", stats.benchmark_symbol, label)?;
        write_yearly_row(out, &bench_table, *metric, stats.benchmark_symbol)?;
    }

    let std_label = "Std Dev of Returns:";
    write!(out, "\n\nFund {:<24}", std_label)?;
    write!(out, "  {} bps ", ratio(&metrics::std_dev_bps(stats.fund.values()), stats.name, std_label))?;
    write!(out, "\n{:<4} {:<24}", stats.benchmark_symbol, std_label)?;
    write!(
        out,
        "  {} bps ",
        ratio(&metrics::std_dev_bps(stats.benchmark.values()), stats.benchmark_symbol, std_label)
    )?;

    if !stats.sector_correlations.is_empty() {
        write!(out, "\n\nCorrelation with Sector Indices")?;
        for (i, (sector, value)) in stats.sector_correlations.iter().enumerate() {
            if i % SECTORS_PER_LINE == 0 {
                writeln!(out)?;
            }
            write!(
                out,
                "{:>10}({}):{}   ",
                sector.label,
                sector.symbol,
                ratio(value, stats.name, &sector.symbol),
            )?;
        }
    }

    let correlation = metrics::correlation(stats.fund, stats.benchmark);
    let beta = metrics::beta(stats.fund, stats.benchmark);
    write!(
        out,
        "\n\n{:<4} Correlation:   {}",
        stats.benchmark_symbol,
        ratio(&correlation, stats.name, "correlation"),
    )?;
    writeln!(
        out,
        "\n{:<4} Beta:          {}",
        stats.benchmark_symbol,
        ratio(&beta, stats.name, "beta"),
    )?;

    writeln!(out, "\n\nMonthly Returns %")?;
    MonthlyGrid::from_series(stats.fund).write(out)?;

    Ok(())
}

fn write_fund_values<W: Write>(stats: &FundStats<'_>, notional: f64, out: &mut W) -> std::io::Result<()> {
    let (initial, ending) = match stats.fund.normalized(notional) {
        Ok(values) => (
            dollars(values.first().copied().unwrap_or(notional)),
            dollars(values.last().copied().unwrap_or(notional)),
        ),
        Err(e) => {
            tracing::warn!(fund = %stats.name, error = %e, "Cannot normalise fund values");
            ("n/a".to_string(), "n/a".to_string())
        }
    };

    writeln!(out, "Initial Fund Value: {:>10}", initial)?;
    writeln!(out, "Ending Fund Value:  {:>10}\n", ending)?;
    writeln!(out, "Transaction Costs\n")?;
    writeln!(out, "Total Commissions:  {:>10}", dollars(stats.commissions))?;
    writeln!(out, "Total Slippage:     {:>10}\n", dollars(stats.slippage))?;
    Ok(())
}

fn write_yearly_row<W: Write>(
    out: &mut W,
    table: &MetricTable,
    metric: YearlyMetric,
    series_name: &str,
) -> std::io::Result<()> {
    for (year, value) in table.rows() {
        match value {
            Ok(v) if metric.is_percent() => write!(out, "   {:+6.2}%", v)?,
            Ok(v) => write!(out, "   {:+6.2} ", v)?,
            Err(e) => {
                tracing::warn!(series = %series_name, metric = metric.label(), year, error = %e, "Metric rendered as n/a");
                write!(out, "   {:>6} ", "n/a")?;
            }
        }
    }
    Ok(())
}

/// A signed six-wide value, or a right-aligned `n/a`.
fn ratio(value: &MetricValue, series_name: &str, metric: &str) -> String {
    match value {
        Ok(v) => format!("{:+6.2}", v),
        Err(e) => {
            tracing::warn!(series = %series_name, metric, error = %e, "Metric rendered as n/a");
            format!("{:>6}", "n/a")
        }
    }
}

fn dollars(value: f64) -> String {
    format!("${}", value.round() as i64)
}

/// Monthly returns laid out one row per year and one column per month.
/// Months without data, including those before the series starts, are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyGrid {
    rows: Vec<(i32, [Option<f64>; 12])>,
}

impl MonthlyGrid {
    pub fn from_series(series: &ValueSeries) -> Self {
        let monthly = returns::monthly_returns(series);
        let rows = calendar::years(series.dates())
            .into_iter()
            .map(|year| {
                let mut cells = [None; 12];
                for month in calendar::months_in_year(series.dates(), year) {
                    cells[(month - 1) as usize] = monthly
                        .iter()
                        .find(|m| m.year == year && m.month == month)
                        .map(|m| m.value);
                }
                (year, cells)
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[(i32, [Option<f64>; 12])] {
        &self.rows
    }

    /// Writes the month header and one line per year, values in percent.
    /// Empty cells before the last known month are padded so columns line up.
    pub fn write<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "    ")?;
        for name in calendar::month_names() {
            write!(out, "    {}", name)?;
        }
        writeln!(out)?;

        for (year, cells) in &self.rows {
            write!(out, "{}", year)?;
            let last = cells.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
            for cell in &cells[..last] {
                match cell {
                    Some(value) => write!(out, " {:+6.2}", value * 100.0)?,
                    None => write!(out, "       ")?,
                }
            }
            writeln!(out)?;
        }

        Ok(())
    }
}
