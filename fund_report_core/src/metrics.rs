// fund_report_core/src/metrics.rs

//! Performance metric calculators.
//!
//! Per-year metrics share one loop: [`MetricTable::over_years`] partitions a
//! series by calendar year and applies a calculator to every requested year.
//! Degenerate inputs surface as [`ComputationError`] instead of NaN.

use crate::error::ComputationError;
use crate::returns;
use crate::series::ValueSeries;

pub type MetricValue = Result<f64, ComputationError>;

/// Metrics reported once per calendar year, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearlyMetric {
    AnnualReturn,
    WinningDays,
    MaxDrawdown,
    DailySharpe,
    DailySortino,
}

impl YearlyMetric {
    pub const ALL: [YearlyMetric; 5] = [
        YearlyMetric::AnnualReturn,
        YearlyMetric::WinningDays,
        YearlyMetric::MaxDrawdown,
        YearlyMetric::DailySharpe,
        YearlyMetric::DailySortino,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            YearlyMetric::AnnualReturn => "Annualized Return",
            YearlyMetric::WinningDays => "Winning Days",
            YearlyMetric::MaxDrawdown => "Max Draw Down",
            YearlyMetric::DailySharpe => "Daily Sharpe Ratio",
            YearlyMetric::DailySortino => "Daily Sortino Ratio",
        }
    }

    /// Percent metrics are printed with a trailing `%`.
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            YearlyMetric::AnnualReturn | YearlyMetric::WinningDays | YearlyMetric::MaxDrawdown
        )
    }

    /// Computes the metric for one year's values, scaled for display.
    pub fn compute(&self, values: &[f64], periods_per_year: f64) -> MetricValue {
        match self {
            YearlyMetric::AnnualReturn => annual_return(values, periods_per_year).map(|r| r * 100.0),
            YearlyMetric::WinningDays => winning_days(values),
            YearlyMetric::MaxDrawdown => max_drawdown(values).map(|dd| dd * 100.0),
            YearlyMetric::DailySharpe => sharpe_ratio(values, periods_per_year),
            YearlyMetric::DailySortino => sortino_ratio(values, periods_per_year),
        }
    }
}

/// One metric evaluated for each year of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    rows: Vec<(i32, MetricValue)>,
}

impl MetricTable {
    pub fn over_years<F>(series: &ValueSeries, years: &[i32], calculator: F) -> Self
    where
        F: Fn(&[f64]) -> MetricValue,
    {
        let partition = series.partition_by_year();
        let rows = years
            .iter()
            .map(|year| (*year, calculator(partition.get(*year))))
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[(i32, MetricValue)] {
        &self.rows
    }

    pub fn get(&self, year: i32) -> Option<&MetricValue> {
        self.rows.iter().find(|(y, _)| *y == year).map(|(_, value)| value)
    }
}

/// Annualised compounded return. The leading placeholder and the last
/// (partial-period) daily return are trimmed before compounding.
/// A series whose compounded growth is not positive (its value crossed or
/// touched zero) has no annualised return.
pub fn annual_return(values: &[f64], periods_per_year: f64) -> MetricValue {
    let daily = returns::daily_returns(values);
    if daily.len() < 3 {
        return Err(ComputationError::EmptyPeriod { points: values.len() });
    }

    let trimmed = &daily[1..daily.len() - 1];
    let growth = returns::compound(trimmed);
    if !(growth > 0.0 && growth.is_finite()) {
        return Err(ComputationError::DegenerateSeries);
    }

    let annual = returns::annualize(growth, trimmed.len(), periods_per_year);
    if annual.is_finite() { Ok(annual) } else { Err(ComputationError::DegenerateSeries) }
}

/// Percentage of daily returns that are strictly positive.
pub fn winning_days(values: &[f64]) -> MetricValue {
    let daily = returns::period_returns(values);
    if daily.is_empty() {
        return Err(ComputationError::EmptyPeriod { points: values.len() });
    }

    let wins = daily.iter().filter(|r| **r > 0.0).count();
    Ok(wins as f64 / daily.len() as f64 * 100.0)
}

/// Largest peak-to-trough decline as a non-positive fraction.
pub fn max_drawdown(values: &[f64]) -> MetricValue {
    let first = *values
        .first()
        .ok_or(ComputationError::EmptyPeriod { points: 0 })?;

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for value in values {
        peak = peak.max(*value);
        let dd = if peak > 0.0 { (value / peak) - 1.0 } else { 0.0 };
        max_dd = max_dd.min(dd);
    }

    Ok(max_dd)
}

/// Mean over population std of the daily returns, annualised.
/// With zero std the ratio follows the sign of the mean, as [`sortino_ratio`] does.
pub fn sharpe_ratio(values: &[f64], periods_per_year: f64) -> MetricValue {
    let daily = returns::period_returns(values);
    if daily.len() < 2 {
        return Err(ComputationError::EmptyPeriod { points: values.len() });
    }

    let mean_return = mean(&daily);
    let std = population_std(&daily);
    if std == 0.0 {
        return Ok(signed_unbounded(mean_return));
    }

    Ok(mean_return / std * periods_per_year.sqrt())
}

/// Like Sharpe, but divides by the downside deviation `sqrt(sum(min(r, 0)^2) / n)`.
/// With no downside the ratio is `+inf`, `-inf` or `0.0` following the sign of the mean.
pub fn sortino_ratio(values: &[f64], periods_per_year: f64) -> MetricValue {
    let daily = returns::period_returns(values);
    if daily.len() < 2 {
        return Err(ComputationError::EmptyPeriod { points: values.len() });
    }

    let mean_return = mean(&daily);
    let downside = (daily.iter().map(|r| r.min(0.0).powi(2)).sum::<f64>() / daily.len() as f64).sqrt();

    if downside == 0.0 {
        return Ok(signed_unbounded(mean_return));
    }

    Ok(mean_return / downside * periods_per_year.sqrt())
}

/// Ratio value for a zero denominator.
fn signed_unbounded(mean_return: f64) -> f64 {
    match mean_return.partial_cmp(&0.0) {
        Some(std::cmp::Ordering::Greater) => f64::INFINITY,
        Some(std::cmp::Ordering::Less) => f64::NEG_INFINITY,
        _ => 0.0,
    }
}

/// Standard deviation of the daily returns, in basis points.
pub fn std_dev_bps(values: &[f64]) -> MetricValue {
    let daily = returns::period_returns(values);
    if daily.is_empty() {
        return Err(ComputationError::EmptyPeriod { points: values.len() });
    }

    Ok(population_std(&daily) * 10_000.0)
}

/// Pearson correlation of daily returns.
pub fn correlation(fund: &ValueSeries, benchmark: &ValueSeries) -> MetricValue {
    let (f, b) = paired_returns(fund, benchmark)?;

    let (mean_f, mean_b) = (mean(&f), mean(&b));
    let cov = covariance(&f, mean_f, &b, mean_b);
    let var_f = covariance(&f, mean_f, &f, mean_f);
    let var_b = covariance(&b, mean_b, &b, mean_b);

    if var_f == 0.0 || var_b == 0.0 {
        return Err(ComputationError::DegenerateSeries);
    }

    Ok((cov / (var_f.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

/// Least-squares slope of fund daily returns regressed on benchmark daily returns.
pub fn beta(fund: &ValueSeries, benchmark: &ValueSeries) -> MetricValue {
    let (f, b) = paired_returns(fund, benchmark)?;

    let (mean_f, mean_b) = (mean(&f), mean(&b));
    let var_b = covariance(&b, mean_b, &b, mean_b);
    if var_b == 0.0 {
        return Err(ComputationError::DegenerateSeries);
    }

    Ok(covariance(&f, mean_f, &b, mean_b) / var_b)
}

fn paired_returns(fund: &ValueSeries, benchmark: &ValueSeries) -> Result<(Vec<f64>, Vec<f64>), ComputationError> {
    if fund.len() != benchmark.len() {
        return Err(ComputationError::LengthMismatch {
            left: fund.len(),
            right: benchmark.len(),
        });
    }
    if fund.dates() != benchmark.dates() {
        return Err(ComputationError::Misaligned);
    }
    if fund.len() < 3 {
        return Err(ComputationError::EmptyPeriod { points: fund.len() });
    }

    Ok((
        returns::period_returns(fund.values()),
        returns::period_returns(benchmark.values()),
    ))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

fn covariance(a: &[f64], mean_a: f64, b: &[f64], mean_b: f64) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    const PERIODS: f64 = 252.0;

    fn series(values: Vec<f64>) -> ValueSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let dates = (0..values.len() as u64).map(|i| start + chrono::Days::new(i)).collect();
        ValueSeries::new(dates, values).unwrap()
    }

    #[test]
    fn test_constant_series() {
        let values = vec![100.0; 30];
        assert_eq!(annual_return(&values, PERIODS).unwrap(), 0.0);
        assert_eq!(std_dev_bps(&values).unwrap(), 0.0);
        assert_eq!(max_drawdown(&values).unwrap(), 0.0);
        assert_eq!(winning_days(&values).unwrap(), 0.0);
        assert_eq!(sharpe_ratio(&values, PERIODS).unwrap(), 0.0);
        assert_eq!(sortino_ratio(&values, PERIODS).unwrap(), 0.0);
    }

    #[test]
    fn test_increasing_series() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert_eq!(max_drawdown(&values).unwrap(), 0.0);
        assert_eq!(winning_days(&values).unwrap(), 100.0);
        assert!(annual_return(&values, PERIODS).unwrap() > 0.0);
        assert_eq!(sortino_ratio(&values, PERIODS).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_max_drawdown() {
        let values = [100.0, 120.0, 90.0, 110.0, 60.0, 130.0];
        assert_relative_eq!(max_drawdown(&values).unwrap(), 60.0 / 120.0 - 1.0);
        assert_eq!(max_drawdown(&[]), Err(ComputationError::EmptyPeriod { points: 0 }));
    }

    #[test]
    fn test_winning_days() {
        let values = [100.0, 101.0, 100.0, 100.0, 102.0];
        assert_relative_eq!(winning_days(&values).unwrap(), 50.0);
        assert_eq!(winning_days(&[100.0]), Err(ComputationError::EmptyPeriod { points: 1 }));
    }

    #[test]
    fn test_annual_return_trims_edges() {
        // The final 102.01 -> 50 step is dropped.
        let values = [100.0, 101.0, 102.01, 50.0];
        let expected = 1.01_f64.powf(PERIODS) - 1.0;
        assert_relative_eq!(annual_return(&values, PERIODS).unwrap(), expected, max_relative = 1e-9);
        assert!(annual_return(&[1.0, 2.0], PERIODS).is_err());
    }

    #[test]
    fn test_annual_return_of_series_crossing_zero() {
        let values = [100.0, 10.0, -5.0, -6.0, -7.0, -8.0, -9.0];
        assert_eq!(annual_return(&values, PERIODS), Err(ComputationError::DegenerateSeries));

        let through_zero = [100.0, 50.0, 0.0, 10.0, 20.0];
        assert_eq!(annual_return(&through_zero, PERIODS), Err(ComputationError::DegenerateSeries));
    }

    #[test]
    fn test_zero_variance_ratios_agree() {
        // Every daily return is exactly +100%.
        let doubling = [1.0, 2.0, 4.0, 8.0, 16.0];
        assert_eq!(sharpe_ratio(&doubling, PERIODS).unwrap(), f64::INFINITY);
        assert_eq!(sortino_ratio(&doubling, PERIODS).unwrap(), f64::INFINITY);

        let flat = [100.0; 5];
        assert_eq!(sharpe_ratio(&flat, PERIODS).unwrap(), 0.0);
        assert_eq!(sortino_ratio(&flat, PERIODS).unwrap(), 0.0);
    }

    #[test]
    fn test_sharpe_ratio() {
        let values = [100.0, 101.0, 100.0, 102.0, 101.0];
        let rets = returns::period_returns(&values);
        let expected = mean(&rets) / population_std(&rets) * PERIODS.sqrt();
        assert_relative_eq!(sharpe_ratio(&values, PERIODS).unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_sortino_ratio_uses_downside_only() {
        let values = [100.0, 102.0, 101.0, 104.0];
        let rets = returns::period_returns(&values);
        let downside = (rets[1].powi(2) / 3.0).sqrt();
        let expected = mean(&rets) / downside * PERIODS.sqrt();
        assert_relative_eq!(sortino_ratio(&values, PERIODS).unwrap(), expected, max_relative = 1e-12);

        let flat = [100.0, 100.0, 100.0];
        assert_eq!(sortino_ratio(&flat, PERIODS).unwrap(), 0.0);
    }

    #[test]
    fn test_self_correlation_and_beta() {
        let fund = series(vec![100.0, 101.0, 99.5, 102.0, 103.5, 101.0, 104.0]);
        assert_relative_eq!(correlation(&fund, &fund).unwrap(), 1.0, max_relative = 1e-12);
        assert_relative_eq!(beta(&fund, &fund).unwrap(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_beta_of_levered_series() {
        let bench = series(vec![100.0, 101.0, 99.5, 102.0, 103.5]);
        let bench_rets = returns::period_returns(bench.values());
        let mut fund_values = vec![100.0];
        for r in &bench_rets {
            let last = *fund_values.last().unwrap();
            fund_values.push(last * (1.0 + 2.0 * r));
        }
        let fund = series(fund_values);

        assert_relative_eq!(beta(&fund, &bench).unwrap(), 2.0, max_relative = 1e-9);
        assert_relative_eq!(correlation(&fund, &bench).unwrap(), 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_degenerate_benchmark() {
        let fund = series(vec![100.0, 101.0, 102.0, 101.0]);
        let flat = series(vec![50.0; 4]);
        assert_eq!(correlation(&fund, &flat), Err(ComputationError::DegenerateSeries));
        assert_eq!(beta(&fund, &flat), Err(ComputationError::DegenerateSeries));
    }

    #[test]
    fn test_misaligned_inputs() {
        let fund = series(vec![100.0, 101.0, 102.0, 101.0]);
        let shorter = series(vec![100.0, 101.0, 102.0]);
        assert_eq!(
            correlation(&fund, &shorter),
            Err(ComputationError::LengthMismatch { left: 4, right: 3 })
        );
    }

    #[test]
    fn test_metric_table_over_years() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let series = ValueSeries::new(
            vec![date(2010, 12, 29), date(2010, 12, 30), date(2010, 12, 31), date(2011, 1, 3)],
            vec![100.0, 101.0, 102.0, 103.0],
        )
        .unwrap();

        let table = MetricTable::over_years(&series, &[2010, 2011, 2012], winning_days);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.get(2010), Some(&Ok(100.0)));
        assert_eq!(table.get(2011), Some(&Err(ComputationError::EmptyPeriod { points: 1 })));
        assert_eq!(table.get(2012), Some(&Err(ComputationError::EmptyPeriod { points: 0 })));
    }

    #[test]
    fn test_yearly_metric_scaling() {
        let values = [100.0, 120.0, 90.0];
        assert_relative_eq!(YearlyMetric::MaxDrawdown.compute(&values, PERIODS).unwrap(), -25.0);
        assert!(YearlyMetric::MaxDrawdown.is_percent());
        assert!(!YearlyMetric::DailySharpe.is_percent());
    }
}
