// fund_report_core/src/series.rs

//! Dated value series.
//! `TimeSeries` may contain gaps. `ValueSeries` is forward-filled and is the only
//! shape the metric calculators accept.

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;

use crate::calendar;
use crate::error::{ComputationError, InputError};

/// Dated values in strictly increasing date order. `None` marks a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Result<Self, InputError> {
        if dates.is_empty() || values.is_empty() {
            return Err(InputError::Empty);
        }

        if dates.len() != values.len() {
            return Err(InputError::LengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }

        Self::from_pairs(dates.into_iter().zip(values).collect())
    }

    /// Builds a series from unordered pairs. Non-finite values become gaps.
    pub fn from_pairs(mut pairs: Vec<(NaiveDate, Option<f64>)>) -> Result<Self, InputError> {
        if pairs.is_empty() {
            return Err(InputError::Empty);
        }

        pairs.sort_by_key(|(date, _)| *date);

        if let Some((first, _)) = pairs.iter().tuple_windows().find(|(a, b)| a.0 == b.0) {
            return Err(InputError::DuplicateDate(first.0));
        }

        let (dates, values) = pairs
            .into_iter()
            .map(|(date, value)| (date, value.filter(|v| v.is_finite())))
            .unzip();

        Ok(Self { dates, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Propagates the last known value into gaps.
    /// Dates before the first known value are dropped.
    pub fn forward_fill(&self) -> Result<ValueSeries, InputError> {
        let mut last = None;
        let mut dates = Vec::with_capacity(self.len());
        let mut values = Vec::with_capacity(self.len());

        for (date, value) in self.dates.iter().zip(&self.values) {
            if value.is_some() {
                last = *value;
            }
            if let Some(v) = last {
                dates.push(*date);
                values.push(v);
            }
        }

        if values.is_empty() {
            return Err(InputError::NoValues);
        }

        Ok(ValueSeries { dates, values })
    }
}

/// A gap-free, non-empty dated series.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ValueSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, InputError> {
        TimeSeries::new(dates, values.into_iter().map(Some).collect())?.forward_fill()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn end_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn first_value(&self) -> f64 {
        self.values[0]
    }

    pub fn years(&self) -> Vec<i32> {
        calendar::years(&self.dates)
    }

    /// Groups the values by calendar year.
    pub fn partition_by_year(&self) -> YearPartition<'_> {
        let mut groups = Vec::new();
        let mut offset = 0;

        for (year, chunk) in &self.dates.iter().chunk_by(|date| date.year()) {
            let count = chunk.count();
            groups.push((year, &self.values[offset..offset + count]));
            offset += count;
        }

        YearPartition { groups }
    }

    pub fn normalized(&self, notional: f64) -> Result<Vec<f64>, ComputationError> {
        normalize(&self.values, notional)
    }
}

/// Values of one series grouped by calendar year, years ascending.
#[derive(Debug)]
pub struct YearPartition<'a> {
    groups: Vec<(i32, &'a [f64])>,
}

impl<'a> YearPartition<'a> {
    pub fn years(&self) -> Vec<i32> {
        self.groups.iter().map(|(year, _)| *year).collect()
    }

    /// Values for `year`, empty when the series has none.
    pub fn get(&self, year: i32) -> &'a [f64] {
        self.groups
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, values)| *values)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Scales `values` so that the first one equals `notional`.
pub fn normalize(values: &[f64], notional: f64) -> Result<Vec<f64>, ComputationError> {
    let first = *values.first().ok_or(ComputationError::EmptyPeriod { points: 0 })?;
    if first == 0.0 {
        return Err(ComputationError::DegenerateSeries);
    }

    let mult = notional / first;
    Ok(values.iter().map(|v| v * mult).collect())
}

/// Restricts both series to the dates they share.
pub fn align(left: &ValueSeries, right: &ValueSeries) -> Result<(ValueSeries, ValueSeries), InputError> {
    if left.dates == right.dates {
        return Ok((left.clone(), right.clone()));
    }

    let mut dates = Vec::new();
    let mut left_values = Vec::new();
    let mut right_values = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match left.dates[i].cmp(&right.dates[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dates.push(left.dates[i]);
                left_values.push(left.values[i]);
                right_values.push(right.values[j]);
                i += 1;
                j += 1;
            }
        }
    }

    if dates.is_empty() {
        return Err(InputError::NoOverlap);
    }

    Ok((
        ValueSeries { dates: dates.clone(), values: left_values },
        ValueSeries { dates, values: right_values },
    ))
}
