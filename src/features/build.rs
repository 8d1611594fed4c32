//! Deterministic time-series feature construction.
//!
//! The models in the registry were trained against exactly these layouts, so
//! the window shapes and missing-value semantics here are load-bearing:
//! rolling statistics require a full window of present values (a `NaN` inside
//! the window poisons the result), standard deviations are sample (n-1)
//! statistics, and quantiles interpolate linearly.

use crate::features::table::FeatureTable;
use chrono::{Datelike, NaiveDate};
use std::f64::consts::TAU;

/// Which feature layout to build.
///
/// Dedicated per-station models use the full layout; the shared "unified"
/// model was trained without the quarter and percentile features and with a
/// slimmer covariate block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSet {
    Full,
    Reduced,
}

const LAGS: [usize; 7] = [1, 2, 3, 7, 14, 21, 30];
const ROLLING_WINDOWS: [usize; 4] = [3, 7, 14, 30];
const TREND_WINDOWS: [usize; 3] = [7, 14, 30];
const DIFF_OFFSETS: [usize; 3] = [1, 7, 30];
const COVARIATE_LAGS: [usize; 3] = [2, 3, 7];
const COVARIATE_WINDOWS: [usize; 3] = [3, 7, 14];

/// Minimum points for a rolling trend fit; shorter windows yield slope 0.
const TREND_MIN_POINTS: usize = 5;

/// Builds the temperature feature table (target-only layout).
///
/// `dates` and `target` must be equal-length and row-aligned; rows with a
/// missing target should already have been dropped by the caller.
pub fn temperature_features(
    dates: &[NaiveDate],
    target: &[f64],
    set: FeatureSet,
) -> FeatureTable {
    debug_assert_eq!(dates.len(), target.len());
    let mut table = FeatureTable::new(dates.len());
    push_calendar(&mut table, dates, set);
    push_target_block(&mut table, target, set);
    table
}

/// Builds the frost feature table: the temperature layout plus features
/// derived from the precipitation and maximum-temperature covariate columns.
///
/// Every covariate column contributes its own 1-day lag (`{name}_lag_1`)
/// alongside the cross-column aggregates. Raw covariate values never appear
/// in the output, only derived columns.
pub fn frost_features(
    dates: &[NaiveDate],
    target: &[f64],
    prec: &[(String, Vec<f64>)],
    tmax: &[(String, Vec<f64>)],
    set: FeatureSet,
) -> FeatureTable {
    let mut table = temperature_features(dates, target, set);
    let tmin_lag_1 = shift(target, 1);
    match set {
        FeatureSet::Full => push_covariates_full(&mut table, &tmin_lag_1, prec, tmax),
        FeatureSet::Reduced => push_covariates_reduced(&mut table, &tmin_lag_1, prec, tmax),
    }
    table
}

fn push_calendar(table: &mut FeatureTable, dates: &[NaiveDate], set: FeatureSet) {
    let month: Vec<f64> = dates.iter().map(|d| d.month() as f64).collect();
    let doy: Vec<f64> = dates.iter().map(|d| d.ordinal() as f64).collect();
    let dow: Vec<f64> = dates
        .iter()
        .map(|d| d.weekday().num_days_from_monday() as f64)
        .collect();
    let week: Vec<f64> = dates.iter().map(|d| d.iso_week().week() as f64).collect();

    table.push("month", month.clone());
    table.push("day_of_year", doy.clone());
    if set == FeatureSet::Full {
        table.push(
            "quarter",
            dates.iter().map(|d| ((d.month() - 1) / 3 + 1) as f64).collect(),
        );
    }
    table.push("day_of_week", dow.clone());
    table.push("week", week.clone());

    table.push("month_sin", cyclic(&month, 12.0, f64::sin));
    table.push("month_cos", cyclic(&month, 12.0, f64::cos));
    table.push("doy_sin", cyclic(&doy, 365.0, f64::sin));
    table.push("doy_cos", cyclic(&doy, 365.0, f64::cos));
    table.push("week_sin", cyclic(&week, 52.0, f64::sin));
    table.push("week_cos", cyclic(&week, 52.0, f64::cos));
    table.push("dow_sin", cyclic(&dow, 7.0, f64::sin));
    table.push("dow_cos", cyclic(&dow, 7.0, f64::cos));
}

fn push_target_block(table: &mut FeatureTable, target: &[f64], set: FeatureSet) {
    for lag in LAGS {
        table.push(format!("tmin_lag_{lag}"), shift(target, lag));
    }

    // Rolling windows run over the one-day-shifted series so the row being
    // predicted never leaks into its own statistics.
    let shifted = shift(target, 1);
    let mut rolling_min = Vec::new();
    let mut rolling_max = Vec::new();
    for w in ROLLING_WINDOWS {
        let mn = rolling(&shifted, w, slice_min);
        let mx = rolling(&shifted, w, slice_max);
        table.push(format!("tmin_ma_{w}"), rolling(&shifted, w, slice_mean));
        table.push(format!("tmin_std_{w}"), rolling(&shifted, w, sample_std));
        table.push(format!("tmin_min_{w}"), mn.clone());
        table.push(format!("tmin_max_{w}"), mx.clone());
        if TREND_WINDOWS.contains(&w) {
            rolling_min.push(mn);
            rolling_max.push(mx);
        }
    }

    let diff_1 = diff(target, 1);
    for offset in DIFF_OFFSETS {
        table.push(format!("tmin_diff_{offset}"), diff(target, offset));
    }

    for w in TREND_WINDOWS {
        table.push(format!("tmin_trend_{w}"), rolling_trend(&shifted, w));
    }

    for (idx, w) in TREND_WINDOWS.iter().enumerate() {
        let range = rolling_max[idx]
            .iter()
            .zip(&rolling_min[idx])
            .map(|(hi, lo)| hi - lo)
            .collect();
        table.push(format!("tmin_range_{w}"), range);
    }

    if set == FeatureSet::Full {
        for w in TREND_WINDOWS {
            table.push(
                format!("tmin_q25_{w}"),
                rolling(&shifted, w, |s| quantile(s, 0.25)),
            );
            table.push(
                format!("tmin_q75_{w}"),
                rolling(&shifted, w, |s| quantile(s, 0.75)),
            );
        }
    }

    table.push("tmin_accel", diff(&diff_1, 1));
}

fn push_covariates_full(
    table: &mut FeatureTable,
    tmin_lag_1: &[f64],
    prec: &[(String, Vec<f64>)],
    tmax: &[(String, Vec<f64>)],
) {
    let n = tmin_lag_1.len();

    let prec_lagged = push_column_lags(table, prec);
    let prec_avg = if prec_lagged.is_empty() {
        None
    } else {
        let avg: Vec<f64> = (0..n).map(|i| row_mean(&prec_lagged, i)).collect();
        table.push("prec_avg", avg.clone());
        table.push("prec_max", (0..n).map(|i| row_max(&prec_lagged, i)).collect());
        table.push("prec_std", (0..n).map(|i| row_std(&prec_lagged, i)).collect());
        for lag in COVARIATE_LAGS {
            table.push(format!("prec_avg_lag_{lag}"), shift(&avg, lag));
        }
        let avg_shifted = shift(&avg, 1);
        for w in COVARIATE_WINDOWS {
            table.push(format!("prec_sum_{w}"), rolling(&avg_shifted, w, slice_sum));
        }
        Some(avg)
    };

    let tmax_lagged = push_column_lags(table, tmax);
    let tmax_avg = if tmax_lagged.is_empty() {
        None
    } else {
        let avg: Vec<f64> = (0..n).map(|i| row_mean(&tmax_lagged, i)).collect();
        table.push("tmax_avg", avg.clone());
        table.push("tmax_std", (0..n).map(|i| row_std(&tmax_lagged, i)).collect());
        table.push(
            "thermal_range_lag_1",
            avg.iter().zip(tmin_lag_1).map(|(hi, lo)| hi - lo).collect(),
        );
        let avg_shifted = shift(&avg, 1);
        for w in COVARIATE_WINDOWS {
            table.push(format!("tmax_ma_{w}"), rolling(&avg_shifted, w, slice_mean));
        }
        table.push("tmax_diff_1", diff(&avg, 1));
        Some(avg)
    };

    if let Some(tmax_avg) = &tmax_avg {
        table.push(
            "tmax_tmin_ratio",
            tmax_avg
                .iter()
                .zip(tmin_lag_1)
                .map(|(hi, lo)| hi / (lo.abs() + 1.0))
                .collect(),
        );
    }
    if let Some(prec_avg) = &prec_avg {
        table.push("prec_any", prec_avg.iter().map(|v| rained(*v)).collect());
    }
}

fn push_covariates_reduced(
    table: &mut FeatureTable,
    tmin_lag_1: &[f64],
    prec: &[(String, Vec<f64>)],
    tmax: &[(String, Vec<f64>)],
) {
    let n = tmin_lag_1.len();

    let prec_lagged = push_column_lags(table, prec);
    if !prec_lagged.is_empty() {
        let avg: Vec<f64> = (0..n).map(|i| row_mean(&prec_lagged, i)).collect();
        table.push("prec_any", avg.iter().map(|v| rained(*v)).collect());
        table.push("prec_avg", avg);
    }
    let tmax_lagged = push_column_lags(table, tmax);
    if !tmax_lagged.is_empty() {
        let avg: Vec<f64> = (0..n).map(|i| row_mean(&tmax_lagged, i)).collect();
        table.push(
            "thermal_range_lag_1",
            avg.iter().zip(tmin_lag_1).map(|(hi, lo)| hi - lo).collect(),
        );
        table.push("tmax_avg", avg);
    }
}

/// Pushes the 1-day lag of every covariate column as `{name}_lag_1` and
/// returns the lagged values for the cross-column aggregates.
fn push_column_lags(table: &mut FeatureTable, cols: &[(String, Vec<f64>)]) -> Vec<Vec<f64>> {
    cols.iter()
        .map(|(name, values)| {
            let lagged = shift(values, 1);
            table.push(format!("{name}_lag_1"), lagged.clone());
            lagged
        })
        .collect()
}

fn rained(prec_avg: f64) -> f64 {
    // NaN compares false, matching the upstream "no data means no rain" flag.
    if prec_avg > 0.0 {
        1.0
    } else {
        0.0
    }
}

fn cyclic(values: &[f64], period: f64, f: impl Fn(f64) -> f64) -> Vec<f64> {
    values.iter().map(|v| f(TAU * v / period)).collect()
}

// --- series kernels (NaN = missing) ---

fn shift(xs: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in n..xs.len() {
        out[i] = xs[i - n];
    }
    out
}

fn diff(xs: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in n..xs.len() {
        out[i] = xs[i] - xs[i - n];
    }
    out
}

/// Trailing-window statistic: `out[i] = f(xs[i-w+1..=i])`, requiring a full
/// window of present values; anything else stays missing.
fn rolling(xs: &[f64], w: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    if w == 0 {
        return out;
    }
    for i in (w - 1)..xs.len() {
        let window = &xs[i + 1 - w..=i];
        if window.iter().all(|v| v.is_finite()) {
            out[i] = f(window);
        }
    }
    out
}

/// Rolling least-squares slope of value against window index.
///
/// Partial leading windows shorter than [`TREND_MIN_POINTS`] and all-missing
/// windows yield 0; a partially missing full window stays missing like every
/// other rolling statistic.
fn rolling_trend(xs: &[f64], w: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in 0..xs.len() {
        let start = (i + 1).saturating_sub(w);
        let window = &xs[start..=i];
        if window.len() < TREND_MIN_POINTS || window.iter().all(|v| v.is_nan()) {
            out[i] = 0.0;
        } else if window.len() == w && window.iter().all(|v| v.is_finite()) {
            out[i] = slope(window);
        }
    }
    out
}

fn slope(window: &[f64]) -> f64 {
    let x_mean = (window.len() - 1) as f64 / 2.0;
    let y_mean = slice_mean(window);
    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in window.iter().enumerate() {
        let dx = x as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

fn slice_sum(xs: &[f64]) -> f64 {
    xs.iter().sum()
}

fn slice_mean(xs: &[f64]) -> f64 {
    slice_sum(xs) / xs.len() as f64
}

/// Sample standard deviation (n-1 denominator); fewer than two values is
/// undefined.
fn sample_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let mean = slice_mean(xs);
    let ss: f64 = xs.iter().map(|v| (v - mean) * (v - mean)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}

fn slice_min(xs: &[f64]) -> f64 {
    xs.iter().copied().fold(f64::INFINITY, f64::min)
}

fn slice_max(xs: &[f64]) -> f64 {
    xs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Linearly interpolated quantile, `q` in `[0, 1]`.
fn quantile(xs: &[f64], q: f64) -> f64 {
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Mean across covariate columns at one row, skipping missing values.
fn row_mean(cols: &[Vec<f64>], row: usize) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for col in cols {
        if col[row].is_finite() {
            sum += col[row];
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

fn row_max(cols: &[Vec<f64>], row: usize) -> f64 {
    let mut best = f64::NAN;
    for col in cols {
        if col[row].is_finite() && !(best >= col[row]) {
            best = col[row];
        }
    }
    best
}

/// Sample standard deviation across covariate columns at one row.
fn row_std(cols: &[Vec<f64>], row: usize) -> f64 {
    let present: Vec<f64> = cols
        .iter()
        .map(|col| col[row])
        .filter(|v| v.is_finite())
        .collect();
    sample_std(&present)
}
