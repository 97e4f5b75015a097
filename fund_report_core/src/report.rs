// fund_report_core/src/report.rs

//! Report driver.
//! Fetches benchmark and sector data, renders charts and assembles the
//! HTML reports. Each fund is rendered into its own buffer first, so one
//! failing fund never leaves a half-written section behind.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::calendar;
use crate::data_handler::DataHandler;
use crate::error::{ComputationError, ReportError, Result};
use crate::formatter::{self, FundStats};
use crate::funds::{FundMatrix, FundRecord};
use crate::html;
use crate::metrics::{self, MetricValue};
use crate::plot::{self, Figure};
use crate::series::{self, ValueSeries};
use crate::settings::{ReportSettings, SectorIndex};

const COMPARISON_CHART: &str = "funds.png";
const ANALYSIS_CHART: &str = "analysis.png";
const COMPARISON_WIDTH: u32 = 400;
const FUND_CHART_WIDTH: u32 = 450;
const HISTOGRAM_BINS: usize = 20;
const ROBUST_NAME: &str = "robust funds";

/// Outcome of a batch report.
#[derive(Debug)]
pub struct ReportSummary {
    pub report_path: PathBuf,
    pub written: usize,
    pub failed: Vec<(String, ReportError)>,
}

impl ReportSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Hands out file-name stems that are unique within one batch of funds.
///
/// Names are compared case-insensitively; a repeated stem gets `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct FileNames {
    used: HashSet<String>,
}

impl FileNames {
    pub fn claim(&mut self, name: &str) -> String {
        let base = safe_file_name(name);
        let mut stem = base.clone();
        let mut n = 1;
        while !self.used.insert(stem.to_ascii_lowercase()) {
            n += 1;
            stem = format!("{}-{}", base, n);
        }
        stem
    }
}

/// Fund values and benchmark restricted to their common dates.
struct Comparison {
    fund: ValueSeries,
    benchmark: ValueSeries,
}

/// Writes the multi-fund report.
/// # Arguments
/// * `funds` - Funds to report, in output order.
/// * `data` - Source of benchmark and sector index prices.
/// * `settings` - Output location, benchmark and chart settings.
/// # Returns
/// * `Result<ReportSummary>`. Per-fund failures are collected in the summary;
///   only failures to write the report itself are returned as errors.
pub fn generate_report<D: DataHandler + ?Sized>(
    funds: &[FundRecord],
    data: &D,
    settings: &ReportSettings,
) -> Result<ReportSummary> {
    let out_dir = Path::new(&settings.output_dir);
    std::fs::create_dir_all(out_dir)?;

    write_comparison_chart(funds, data, settings, &out_dir.join(COMPARISON_CHART))?;

    let mut document = Vec::new();
    html::write_header(&mut document, &settings.report_file)?;
    html::write_image(&mut document, COMPARISON_CHART, Some(COMPARISON_WIDTH))?;
    html::write_break(&mut document)?;

    let mut names = FileNames::default();
    let mut written = 0;
    let mut failed = Vec::new();

    for fund in funds {
        let stem = names.claim(&fund.name);
        match fund_section(fund, &stem, data, settings, out_dir) {
            Ok(section) => {
                document.extend_from_slice(section.as_bytes());
                written += 1;
            }
            Err(e) => {
                tracing::error!(fund = %fund.name, error = %e, "Fund report failed");
                html::write_preformatted(&mut document, &format!("Report for {} failed: {}\n", fund.name, e))?;
                failed.push((fund.name.clone(), e));
            }
        }
    }

    html::write_footer(&mut document)?;

    let report_path = settings.report_path();
    std::fs::write(&report_path, &document)?;
    tracing::info!(report = %report_path.display(), written, failed = failed.len(), "Report written");

    Ok(ReportSummary {
        report_path,
        written,
        failed,
    })
}

/// Writes `report-<stem>.html` for one fund into `dir`, creating it if needed.
/// The stem is claimed from `names`, so funds sharing a name within one run
/// keep separate files.
pub fn write_fund_report<D: DataHandler + ?Sized>(
    fund: &FundRecord,
    names: &mut FileNames,
    data: &D,
    settings: &ReportSettings,
    dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let stem = names.claim(&fund.name);
    let section = fund_section(fund, &stem, data, settings, dir)?;

    let file_name = format!("report-{}.html", stem);
    let mut document = Vec::new();
    html::write_header(&mut document, &file_name)?;
    document.write_all(section.as_bytes())?;
    html::write_footer(&mut document)?;

    let path = dir.join(file_name);
    std::fs::write(&path, &document)?;
    tracing::info!(fund = %fund.name, report = %path.display(), "Fund report written");

    Ok(path)
}

/// Writes the robust-mode report: every matrix column on one chart, a
/// histogram of total returns, and the stats of the mean path.
pub fn generate_robust_report<D: DataHandler + ?Sized>(
    matrix: &FundMatrix,
    data: &D,
    settings: &ReportSettings,
) -> Result<PathBuf> {
    matrix.validate()?;

    let out_dir = Path::new(&settings.output_dir);
    std::fs::create_dir_all(out_dir)?;

    let mut figure = Figure::new(settings.chart.width, settings.chart.height);
    for (i, column) in matrix.columns()?.iter().enumerate() {
        if let Err(e) = figure.add_normalized(None, column, settings.comparison_notional) {
            tracing::warn!(column = i, error = %e, "Skipping fund column in chart");
        }
    }
    figure.save(out_dir.join(COMPARISON_CHART))?;

    let total_returns = matrix.total_returns();
    let (width, height) = (settings.chart.width, settings.chart.height);
    plot::save_chart(
        out_dir.join(ANALYSIS_CHART),
        &plot::render_histogram_png(&total_returns, HISTOGRAM_BINS, width, height),
        &plot::render_histogram(&total_returns, HISTOGRAM_BINS, width, height, "Total Return Distribution"),
    )?;

    let mean = matrix.mean_path()?;
    let comparison = compare_with_benchmark(&mean, data, settings)?;
    let text = stats_text(ROBUST_NAME, &comparison, 0.0, 0.0, data, settings)?;

    let mut document = Vec::new();
    html::write_header(&mut document, &settings.report_file)?;
    html::write_heading(&mut document, &settings.report_file)?;
    html::write_image(&mut document, COMPARISON_CHART, None)?;
    html::write_image(&mut document, ANALYSIS_CHART, None)?;
    html::write_break(&mut document)?;
    html::write_preformatted(&mut document, &text)?;
    html::write_footer(&mut document)?;

    let path = settings.report_path();
    std::fs::write(&path, &document)?;
    tracing::info!(report = %path.display(), columns = matrix.funds.len(), "Robust report written");

    Ok(path)
}

/// Renders the chart of every fund plus the benchmark, normalised to the
/// comparison notional over the union of the fund date ranges.
fn write_comparison_chart<D: DataHandler + ?Sized>(
    funds: &[FundRecord],
    data: &D,
    settings: &ReportSettings,
    path: &Path,
) -> Result<()> {
    let mut figure = Figure::new(settings.chart.width, settings.chart.height);
    let mut range: Option<(chrono::NaiveDate, chrono::NaiveDate)> = None;

    for fund in funds {
        let added = fund
            .series
            .forward_fill()
            .map_err(ReportError::from)
            .and_then(|values| {
                figure.add_normalized(Some(&fund.name), &values, settings.comparison_notional)?;
                Ok(values)
            });

        match added {
            Ok(values) => {
                let (start, end) = (values.start_date(), values.end_date());
                range = Some(range.map_or((start, end), |(s, e)| (s.min(start), e.max(end))));
            }
            Err(e) => tracing::warn!(fund = %fund.name, error = %e, "Fund left out of comparison chart"),
        }
    }

    if let Some((start, end)) = range {
        let dates = calendar::weekdays_between(start, end);
        match data.get_filled(&dates, &settings.benchmark, &settings.price_field) {
            Ok(benchmark) => {
                if let Err(e) = figure.add_normalized(Some(&settings.benchmark), &benchmark, settings.comparison_notional) {
                    tracing::warn!(symbol = %settings.benchmark, error = %e, "Benchmark left out of comparison chart");
                }
            }
            Err(e) => tracing::warn!(symbol = %settings.benchmark, error = %e, "Benchmark left out of comparison chart"),
        }
    }

    tracing::debug!(series = figure.series_count(), path = %path.display(), "Saving comparison chart");
    figure.save(path)?;
    Ok(())
}

/// HTML for one fund: its chart followed by the preformatted stats.
fn fund_section<D: DataHandler + ?Sized>(
    fund: &FundRecord,
    stem: &str,
    data: &D,
    settings: &ReportSettings,
    dir: &Path,
) -> Result<String> {
    let values = fund.series.forward_fill()?;
    let comparison = compare_with_benchmark(&values, data, settings)?;

    let mut figure = Figure::new(settings.chart.width, settings.chart.height).with_title(&fund.name);
    figure.add_normalized(Some(&fund.name), &comparison.fund, settings.stats_notional)?;
    figure.add_normalized(Some(&settings.benchmark), &comparison.benchmark, settings.stats_notional)?;

    if let Some(leverage) = &fund.leverage {
        match leverage.forward_fill() {
            Ok(leverage) => {
                figure.set_leverage(&fund.name, &leverage);
            }
            Err(e) => tracing::warn!(fund = %fund.name, error = %e, "Ignoring leverage series"),
        }
    }

    let chart = format!("plot-{}.png", stem);
    figure.save(dir.join(&chart))?;

    let text = stats_text(&fund.name, &comparison, fund.commissions, fund.slippage, data, settings)?;

    let mut section = Vec::new();
    html::write_image(&mut section, &chart, Some(FUND_CHART_WIDTH))?;
    html::write_preformatted(&mut section, &text)?;

    Ok(String::from_utf8_lossy(&section).into_owned())
}

/// Fetches the benchmark on the fund's own dates and aligns both series.
fn compare_with_benchmark<D: DataHandler + ?Sized>(
    values: &ValueSeries,
    data: &D,
    settings: &ReportSettings,
) -> Result<Comparison> {
    let benchmark = data.get_filled(values.dates(), &settings.benchmark, &settings.price_field)?;
    let (fund, benchmark) = series::align(values, &benchmark)?;

    if fund.len() < values.len() {
        tracing::debug!(
            symbol = %settings.benchmark,
            dropped = values.len() - fund.len(),
            "Dates without benchmark data dropped"
        );
    }

    Ok(Comparison { fund, benchmark })
}

fn sector_correlations<D: DataHandler + ?Sized>(
    fund: &ValueSeries,
    data: &D,
    settings: &ReportSettings,
) -> Vec<(SectorIndex, MetricValue)> {
    settings
        .sector_indices
        .iter()
        .map(|sector| {
            let value = data
                .get_filled(fund.dates(), &sector.symbol, &settings.price_field)
                .map_err(|e| e.to_string())
                .and_then(|index| series::align(fund, &index).map_err(|e| e.to_string()))
                .map_err(|reason| {
                    tracing::warn!(symbol = %sector.symbol, reason = %reason, "Sector index unavailable");
                    ComputationError::Unavailable(reason)
                })
                .and_then(|(fund, index)| metrics::correlation(&fund, &index));

            (sector.clone(), value)
        })
        .collect()
}

fn stats_text<D: DataHandler + ?Sized>(
    name: &str,
    comparison: &Comparison,
    commissions: f64,
    slippage: f64,
    data: &D,
    settings: &ReportSettings,
) -> Result<String> {
    let sectors = sector_correlations(&comparison.fund, data, settings);
    let stats = FundStats {
        name,
        fund: &comparison.fund,
        benchmark: &comparison.benchmark,
        benchmark_symbol: &settings.benchmark,
        commissions,
        slippage,
        sector_correlations: &sectors,
    };

    let mut buffer = Vec::new();
    formatter::print_stats(&stats, settings, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// File-system safe form of a fund name.
pub fn safe_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();

    if safe.is_empty() { "fund".to_string() } else { safe }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataFetchError;
    use crate::series::TimeSeries;
    use chrono::NaiveDate;
    use std::collections::{BTreeMap, HashMap};

    /// In-memory prices keyed by symbol.
    struct StaticSource {
        prices: HashMap<String, BTreeMap<NaiveDate, f64>>,
    }

    impl DataHandler for StaticSource {
        fn get_data(
            &self,
            dates: &[NaiveDate],
            symbols: &[String],
            _field: &str,
        ) -> std::result::Result<Vec<TimeSeries>, DataFetchError> {
            symbols
                .iter()
                .map(|symbol| {
                    let prices = self.prices.get(symbol).ok_or_else(|| DataFetchError::MissingSymbol {
                        symbol: symbol.clone(),
                        path: "memory".to_string(),
                    })?;
                    let values = dates.iter().map(|d| prices.get(d).copied()).collect();
                    Ok(TimeSeries::new(dates.to_vec(), values).unwrap())
                })
                .collect()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_years() -> Vec<NaiveDate> {
        calendar::weekdays_between(date(2010, 1, 4), date(2011, 12, 30))
    }

    fn source() -> StaticSource {
        let dates = calendar::weekdays_between(date(2009, 12, 1), date(2012, 1, 31));
        let flat: BTreeMap<NaiveDate, f64> = dates.iter().map(|d| (*d, 1000.0)).collect();
        let sector: BTreeMap<NaiveDate, f64> = dates.iter().enumerate().map(|(i, d)| (*d, 50.0 + (i % 7) as f64)).collect();

        let mut prices = HashMap::new();
        prices.insert("$SPX".to_string(), flat);
        prices.insert("$DJUSTC".to_string(), sector);
        StaticSource { prices }
    }

    fn rising_fund(name: &str) -> FundRecord {
        let dates = two_years();
        let values = (0..dates.len()).map(|i| Some(100.0 + 0.1 * i as f64)).collect();
        FundRecord::new(name, TimeSeries::new(dates, values).unwrap()).with_costs(250.0, 75.0)
    }

    fn settings(dir: &Path) -> ReportSettings {
        ReportSettings {
            output_dir: dir.display().to_string(),
            sector_indices: vec![
                SectorIndex { symbol: "$DJUSTC".to_string(), label: "Technology".to_string() },
                SectorIndex { symbol: "$DJUSBM".to_string(), label: "Materials".to_string() },
            ],
            ..ReportSettings::default()
        }
    }

    #[test]
    fn test_two_year_report() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        let summary = generate_report(&[rising_fund("trend")], &source(), &settings).unwrap();
        assert_eq!(summary.written, 1);
        assert!(!summary.has_failures());
        for chart in ["funds.png", "funds.svg", "plot-trend.png", "plot-trend.svg"] {
            assert!(dir.path().join(chart).exists(), "{}", chart);
        }

        let html = std::fs::read_to_string(&summary.report_path).unwrap();
        assert!(html.contains("<IMG SRC='./funds.png' width=400/>"));
        assert!(html.contains("<IMG SRC='./plot-trend.png' width=450/>"));

        let header = html.lines().find(|l| l.starts_with(&" ".repeat(28))).unwrap();
        assert_eq!(header.trim(), "2010      2011");

        for prefix in ["Fund Annualized Return:      ", "$SPX Annualized Return:      "] {
            let row = html.lines().find(|l| l.starts_with(prefix)).unwrap();
            assert_eq!(row.matches('%').count(), 2, "{}", row);
        }

        let spx = html.lines().find(|l| l.starts_with("$SPX Annualized Return:")).unwrap();
        assert_eq!(spx.matches("+0.00%").count(), 2);

        assert!(html.contains("Technology($DJUSTC):"));
        assert!(html.contains(" Materials($DJUSBM):   n/a"));
        assert!(html.contains("$SPX Correlation:      n/a"));
        assert!(html.ends_with("</HTML>"));
    }

    #[test]
    fn test_failed_fund_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        let empty = FundRecord::new("empty", TimeSeries::new(two_years(), vec![None; two_years().len()]).unwrap());
        let summary = generate_report(&[empty, rising_fund("trend")], &source(), &settings).unwrap();

        assert_eq!(summary.written, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "empty");
        assert!(matches!(summary.failed[0].1, ReportError::Input(_)));

        let html = std::fs::read_to_string(&summary.report_path).unwrap();
        assert!(html.contains("Report for empty failed:"));
        assert!(html.contains("Performance Summary for trend Backtest"));
    }

    #[test]
    fn test_missing_benchmark_fails_fund() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReportSettings {
            benchmark: "$DJI".to_string(),
            ..settings(dir.path())
        };

        let summary = generate_report(&[rising_fund("trend")], &source(), &settings).unwrap();
        assert!(matches!(summary.failed[0].1, ReportError::DataFetch(DataFetchError::MissingSymbol { .. })));
        assert!(dir.path().join("funds.png").exists());
    }

    #[test]
    fn test_write_fund_report_with_leverage() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("single");
        let settings = settings(dir.path());

        let dates = two_years();
        let leverage = TimeSeries::new(dates.clone(), vec![Some(1.5); dates.len()]).unwrap();
        let fund = rising_fund("carry fund").with_leverage(leverage);

        let path = write_fund_report(&fund, &mut FileNames::default(), &source(), &settings, &out).unwrap();
        assert_eq!(path, out.join("report-carry_fund.html"));

        let chart = std::fs::read_to_string(out.join("plot-carry_fund.svg")).unwrap();
        assert!(chart.contains(">carry fund Leverage<"));
        assert!(out.join("plot-carry_fund.png").exists());

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<IMG SRC='./plot-carry_fund.png' width=450/>"));
        assert!(html.contains("Total Commissions:        $250"));
    }

    #[test]
    fn test_robust_report() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let dates = two_years();
        let matrix = FundMatrix {
            funds: vec![
                (0..dates.len()).map(|i| 100.0 + 0.1 * i as f64).collect(),
                (0..dates.len()).map(|i| 100.0 + 0.05 * i as f64).collect(),
                (0..dates.len()).map(|i| 100.0 - 0.01 * i as f64).collect(),
            ],
            dates,
        };

        let path = generate_robust_report(&matrix, &source(), &settings).unwrap();
        assert_eq!(path, settings.report_path());
        assert!(dir.path().join("funds.png").exists());
        assert!(dir.path().join("analysis.png").exists());
        assert!(std::fs::read_to_string(dir.path().join("analysis.svg")).unwrap().contains("Total Return"));

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<H2>Fund Performance Report:report.html</H2>"));
        assert!(html.contains("<IMG SRC='./funds.png'/>"));
        assert!(html.contains("<IMG SRC='./analysis.png'/>"));
        assert!(html.contains("Performance Summary for robust funds Backtest"));
    }

    #[test]
    fn test_same_named_funds_keep_separate_charts() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());

        let dates = two_years();
        let falling = (0..dates.len()).map(|i| Some(300.0 - 0.1 * i as f64)).collect();
        let falling = FundRecord::new("trend", TimeSeries::new(dates, falling).unwrap());

        let summary = generate_report(&[rising_fund("trend"), falling], &source(), &settings).unwrap();
        assert_eq!(summary.written, 2);

        let html = std::fs::read_to_string(&summary.report_path).unwrap();
        assert!(html.contains("<IMG SRC='./plot-trend.png' width=450/>"));
        assert!(html.contains("<IMG SRC='./plot-trend-2.png' width=450/>"));

        let first = std::fs::read(dir.path().join("plot-trend.png")).unwrap();
        let second = std::fs::read(dir.path().join("plot-trend-2.png")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_separate_reports_for_same_named_funds() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let mut names = FileNames::default();

        let first = write_fund_report(&rising_fund("My Fund"), &mut names, &source(), &settings, dir.path()).unwrap();
        let second = write_fund_report(&rising_fund("My_Fund"), &mut names, &source(), &settings, dir.path()).unwrap();

        assert_eq!(first, dir.path().join("report-My_Fund.html"));
        assert_eq!(second, dir.path().join("report-My_Fund-2.html"));
        assert!(dir.path().join("plot-My_Fund-2.png").exists());
    }

    #[test]
    fn test_file_names_are_unique_per_batch() {
        let mut names = FileNames::default();
        assert_eq!(names.claim("trend"), "trend");
        assert_eq!(names.claim("trend"), "trend-2");
        assert_eq!(names.claim("Trend"), "Trend-3");
        assert_eq!(names.claim("trend-2"), "trend-2-2");
        assert_eq!(names.claim("a/b"), "a_b");
        assert_eq!(names.claim("a b"), "a_b-2");
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("My Fund/2010"), "My_Fund_2010");
        assert_eq!(safe_file_name("trend-1.v2"), "trend-1.v2");
        assert_eq!(safe_file_name(""), "fund");
    }
}
