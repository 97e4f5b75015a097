// fund_report_core/src/returns.rs

//! Return derivation from value series.
//! Uses SIMD for the daily return kernel.

use chrono::Datelike;
use itertools::Itertools;

use crate::series::ValueSeries;

/// Compounded return of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    pub value: f64,
}

/// Simple daily returns `v[i] / v[i-1] - 1` with a leading `0.0` placeholder,
/// so the output has the same length as `values`.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut returns = vec![0.0; n];
    if n < 2 {
        return returns;
    }

    let chunks = (n - 1) / 4;
    for i in 0..chunks {
        let start = i * 4 + 1;

        let prev_values = wide::f64x4::from([
            values[start - 1],
            values[start],
            values[start + 1],
            values[start + 2],
        ]);

        let curr_values = wide::f64x4::from([
            values[start],
            values[start + 1],
            values[start + 2],
            values[start + 3],
        ]);

        let ret_values = (curr_values / prev_values) - wide::f64x4::splat(1.0);

        let result_array: [f64; 4] = ret_values.into();
        returns[start..start + 4].copy_from_slice(&result_array);
    }

    let processed_elements = chunks * 4 + 1;

    // Vector lanes divided by zero without a guard.
    for i in 1..processed_elements {
        if values[i - 1] == 0.0 {
            returns[i] = 0.0;
        }
    }

    for i in processed_elements..n {
        returns[i] = simple_return(values[i - 1], values[i]);
    }

    returns
}

/// Daily returns without the leading placeholder.
pub fn period_returns(values: &[f64]) -> Vec<f64> {
    daily_returns(values).into_iter().skip(1).collect()
}

fn simple_return(prev: f64, curr: f64) -> f64 {
    if prev != 0.0 { (curr / prev) - 1.0 } else { 0.0 }
}

/// Total growth factor `(1 + r1)(1 + r2)...`.
pub fn compound(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r))
}

/// Converts a growth factor over `periods` into an annual rate.
pub fn annualize(growth: f64, periods: usize, periods_per_year: f64) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    growth.powf(periods_per_year / periods as f64) - 1.0
}

/// One return per (year, month) present in the series, measured from the
/// previous month's last value (the first value for the first month) to
/// this month's last value.
pub fn monthly_returns(series: &ValueSeries) -> Vec<MonthlyReturn> {
    let mut result = Vec::new();
    let mut base = series.first_value();

    let chunks = series
        .dates()
        .iter()
        .zip(series.values())
        .chunk_by(|(date, _)| (date.year(), date.month()));

    for ((year, month), chunk) in &chunks {
        if let Some((_, last)) = chunk.last() {
            result.push(MonthlyReturn {
                year,
                month,
                value: simple_return(base, *last),
            });
            base = *last;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    #[test]
    fn test_daily_returns_matches_scalar_path() {
        let values: Vec<f64> = (0..23).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let returns = daily_returns(&values);

        assert_eq!(returns.len(), values.len());
        assert_eq!(returns[0], 0.0);
        for i in 1..values.len() {
            assert_relative_eq!(returns[i], values[i] / values[i - 1] - 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_daily_returns_zero_base_in_simd_lane() {
        let values = [1.0, 0.0, 2.0, 4.0, 4.0, 2.0];
        let returns = daily_returns(&values);
        assert_eq!(returns, vec![0.0, -1.0, 0.0, 1.0, 0.0, -0.5]);
    }

    #[test]
    fn test_daily_returns_short_inputs() {
        assert!(daily_returns(&[]).is_empty());
        assert_eq!(daily_returns(&[5.0]), vec![0.0]);
        assert!(period_returns(&[5.0]).is_empty());
    }

    #[test]
    fn test_compound_and_annualize() {
        assert_relative_eq!(compound(&[0.1, -0.1]), 0.99, max_relative = 1e-12);
        // 126 half-year periods growing 5% annualize to 1.05^2 - 1
        assert_relative_eq!(annualize(1.05, 126, 252.0), 0.1025, max_relative = 1e-12);
        assert_eq!(annualize(1.05, 0, 252.0), 0.0);
    }

    #[test]
    fn test_monthly_returns() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let series = ValueSeries::new(
            vec![date(2010, 11, 1), date(2010, 11, 30), date(2010, 12, 1), date(2010, 12, 31), date(2011, 1, 3)],
            vec![100.0, 110.0, 100.0, 99.0, 108.9],
        )
        .unwrap();

        let monthly = monthly_returns(&series);
        assert_eq!(monthly.len(), 3);
        assert_eq!((monthly[0].year, monthly[0].month), (2010, 11));
        assert_relative_eq!(monthly[0].value, 0.1, max_relative = 1e-12);
        assert_relative_eq!(monthly[1].value, -0.1, max_relative = 1e-12);
        assert_eq!((monthly[2].year, monthly[2].month), (2011, 1));
        assert_relative_eq!(monthly[2].value, 0.1, max_relative = 1e-12);
    }
}
