//! In-memory representation of the historical daily observation table.

use crate::history::error::HistoryError;
use chrono::{Datelike, NaiveDate};

/// Column-name prefix for per-station minimum-temperature targets.
pub const TARGET_PREFIX: &str = "tmin_";
/// Column-name prefix for precipitation covariates.
pub const PRECIPITATION_PREFIX: &str = "prec_";
/// Column-name prefix for maximum-temperature covariates.
pub const MAX_TEMP_PREFIX: &str = "tmax_";

/// A read-only daily observation table: one strictly increasing date axis plus
/// named numeric columns. Missing values are `NaN`.
///
/// The table is loaded once at startup and never mutated; the gap filler
/// produces extended copies instead.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<f64>)>,
}

impl HistoricalSeries {
    /// Builds a series, validating the date axis and column lengths.
    ///
    /// Dates must be strictly increasing (unique and sorted); every column
    /// must match the date axis in length.
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, HistoryError> {
        for window in dates.windows(2) {
            if window[1] <= window[0] {
                return Err(HistoryError::UnorderedDates {
                    previous: window[0],
                    next: window[1],
                });
            }
        }
        for (name, values) in &columns {
            if values.len() != dates.len() {
                return Err(HistoryError::ColumnLengthMismatch {
                    column: name.clone(),
                    expected: dates.len(),
                    found: values.len(),
                });
            }
        }
        Ok(Self { dates, columns })
    }

    /// Constructor for internally derived tables whose invariants already hold.
    pub(crate) fn from_validated_parts(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Self {
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(columns.iter().all(|(_, v)| v.len() == dates.len()));
        Self { dates, columns }
    }

    /// Number of rows (days) in the table.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The date axis, oldest first.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Most recent observed date, if the table is non-empty.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Iterates `(name, values)` pairs in load order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Looks a column up by exact name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// All columns whose name starts with `prefix`, in load order.
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<(&str, &[f64])> {
        self.columns()
            .filter(|(name, _)| name.starts_with(prefix))
            .collect()
    }

    /// The per-station target columns as `(station_code, column_name)` pairs.
    ///
    /// A column `tmin_21205880` yields the code `21205880`.
    pub fn target_columns(&self) -> Vec<(String, String)> {
        self.columns()
            .filter_map(|(name, _)| {
                name.strip_prefix(TARGET_PREFIX)
                    .map(|code| (code.to_string(), name.to_string()))
            })
            .collect()
    }

    /// Copies the table truncated to rows with `date <= cutoff`.
    pub fn up_to(&self, cutoff: NaiveDate) -> HistoricalSeries {
        let keep = self.dates.partition_point(|d| *d <= cutoff);
        let dates = self.dates[..keep].to_vec();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values[..keep].to_vec()))
            .collect();
        HistoricalSeries::from_validated_parts(dates, columns)
    }

    /// Column mean grouped by the calendar `(month, day)` of each row,
    /// ignoring missing values. `None` when the group has no finite value.
    pub fn calendar_day_mean(&self, values: &[f64], month: u32, day: u32) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (date, v) in self.dates.iter().zip(values) {
            if date.month() == month && date.day() == day && v.is_finite() {
                sum += v;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Column mean over all rows falling in `month`, ignoring missing values.
    pub fn month_mean(&self, values: &[f64], month: u32) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (date, v) in self.dates.iter().zip(values) {
            if date.month() == month && v.is_finite() {
                sum += v;
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_unsorted_dates() {
        let err = HistoricalSeries::new(
            vec![date(2024, 1, 2), date(2024, 1, 1)],
            vec![("tmin_a".into(), vec![1.0, 2.0])],
        )
        .unwrap_err();
        assert!(matches!(err, HistoryError::UnorderedDates { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = HistoricalSeries::new(
            vec![date(2024, 1, 1), date(2024, 1, 1)],
            vec![("tmin_a".into(), vec![1.0, 2.0])],
        )
        .unwrap_err();
        assert!(matches!(err, HistoryError::UnorderedDates { .. }));
    }

    #[test]
    fn rejects_short_column() {
        let err = HistoricalSeries::new(
            vec![date(2024, 1, 1), date(2024, 1, 2)],
            vec![("tmin_a".into(), vec![1.0])],
        )
        .unwrap_err();
        assert!(matches!(err, HistoryError::ColumnLengthMismatch { .. }));
    }

    #[test]
    fn target_columns_extract_station_codes() {
        let series = HistoricalSeries::new(
            vec![date(2024, 1, 1)],
            vec![
                ("tmin_21205880".into(), vec![4.0]),
                ("prec_a".into(), vec![0.0]),
                ("tmin_21206060".into(), vec![5.0]),
            ],
        )
        .unwrap();
        let targets = series.target_columns();
        assert_eq!(
            targets,
            vec![
                ("21205880".to_string(), "tmin_21205880".to_string()),
                ("21206060".to_string(), "tmin_21206060".to_string()),
            ]
        );
    }

    #[test]
    fn up_to_truncates_inclusively() {
        let series = HistoricalSeries::new(
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)],
            vec![("tmin_a".into(), vec![1.0, 2.0, 3.0])],
        )
        .unwrap();
        let cut = series.up_to(date(2024, 1, 2));
        assert_eq!(cut.len(), 2);
        assert_eq!(cut.column("tmin_a").unwrap(), &[1.0, 2.0]);
        // Original untouched.
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn calendar_means_skip_missing_values() {
        let series = HistoricalSeries::new(
            vec![date(2022, 3, 5), date(2023, 3, 5), date(2023, 3, 6)],
            vec![("tmin_a".into(), vec![2.0, f64::NAN, 8.0])],
        )
        .unwrap();
        let col = series.column("tmin_a").unwrap().to_vec();
        assert_eq!(series.calendar_day_mean(&col, 3, 5), Some(2.0));
        assert_eq!(series.calendar_day_mean(&col, 3, 7), None);
        assert_eq!(series.month_mean(&col, 3), Some(5.0));
        assert_eq!(series.month_mean(&col, 4), None);
    }
}
