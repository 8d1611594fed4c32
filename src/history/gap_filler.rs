//! Extends a historical series up to a requested date with synthetic rows.
//!
//! Missing days are filled with climatological means: the per-column average
//! of the same calendar `(month, day)` across all recorded years, falling back
//! to the month-wide mean when the exact day never occurred (Feb 29). Target
//! columns get a small Gaussian perturbation so the synthetic tail does not
//! feed perfectly flat values into the lag and rolling features.

use crate::history::series::{HistoricalSeries, TARGET_PREFIX};
use chrono::{Datelike, NaiveDate};
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Fills gaps between a series' last observed date and a requested end date.
#[derive(Debug, Clone, Copy)]
pub struct GapFiller {
    noise_sigma_c: f64,
}

impl GapFiller {
    /// `noise_sigma_c` is the standard deviation (°C) of the noise applied to
    /// synthetic target values; zero disables the perturbation.
    pub fn new(noise_sigma_c: f64) -> Self {
        Self { noise_sigma_c }
    }

    /// Returns a copy of `series` extended day by day up to `end_date`.
    ///
    /// When `end_date` does not exceed the last observed date the copy is
    /// returned unchanged. The result is always contiguous daily and sorted;
    /// the input series is never mutated.
    pub fn fill<R: Rng + ?Sized>(
        &self,
        series: &HistoricalSeries,
        end_date: NaiveDate,
        rng: &mut R,
    ) -> HistoricalSeries {
        let last = match series.last_date() {
            Some(last) if last < end_date => last,
            _ => return series.clone(),
        };

        let mut missing = Vec::new();
        let mut day = last;
        while let Some(next) = day.succ_opt() {
            if next > end_date {
                break;
            }
            missing.push(next);
            day = next;
        }
        debug!(
            "Gap-filling {} synthetic days from {} to {}",
            missing.len(),
            last,
            end_date
        );

        let noise = Normal::new(0.0, self.noise_sigma_c).ok();

        let mut dates = series.dates().to_vec();
        dates.extend_from_slice(&missing);

        let mut columns = Vec::new();
        for (name, values) in series.columns() {
            let is_target = name.starts_with(TARGET_PREFIX);
            let mut extended = values.to_vec();
            for date in &missing {
                let mut value = series
                    .calendar_day_mean(values, date.month(), date.day())
                    .or_else(|| series.month_mean(values, date.month()))
                    .unwrap_or(f64::NAN);
                if is_target && value.is_finite() {
                    if let Some(noise) = &noise {
                        value += noise.sample(rng);
                    }
                }
                extended.push(value);
            }
            columns.push((name.to_string(), extended));
        }

        HistoricalSeries::from_validated_parts(dates, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_series(start: NaiveDate, tmin: Vec<f64>) -> HistoricalSeries {
        let dates = (0..tmin.len() as i64)
            .map(|i| start + chrono::Duration::days(i))
            .collect();
        HistoricalSeries::new(dates, vec![("tmin_a".into(), tmin)]).unwrap()
    }

    #[test]
    fn produces_exactly_the_missing_days() {
        // History ends 2024-01-10; a request for 2024-01-13 adds 01-11..01-13.
        let series = daily_series(date(2024, 1, 1), vec![5.0; 10]);
        let filler = GapFiller::new(0.0);
        let mut rng = StdRng::seed_from_u64(7);

        let filled = filler.fill(&series, date(2024, 1, 13), &mut rng);
        assert_eq!(filled.len(), 13);
        assert_eq!(filled.last_date(), Some(date(2024, 1, 13)));
        for w in filled.dates().windows(2) {
            assert_eq!(w[1] - w[0], chrono::Duration::days(1));
        }
    }

    #[test]
    fn end_date_not_after_last_returns_series_unchanged() {
        let series = daily_series(date(2024, 1, 1), vec![5.0, 6.0, 7.0]);
        let filler = GapFiller::new(0.5);
        let mut rng = StdRng::seed_from_u64(7);

        let same = filler.fill(&series, date(2024, 1, 3), &mut rng);
        assert_eq!(same, series);
        let earlier = filler.fill(&series, date(2023, 12, 1), &mut rng);
        assert_eq!(earlier, series);
    }

    #[test]
    fn synthetic_values_use_calendar_day_means() {
        // Two years of Jan 5 values: 2.0 and 4.0; the synthetic Jan 5 of the
        // next year should be their mean (noise disabled).
        let series = HistoricalSeries::new(
            vec![date(2022, 1, 5), date(2023, 1, 5), date(2024, 1, 4)],
            vec![("tmin_a".into(), vec![2.0, 4.0, 9.0])],
        )
        .unwrap();
        let filler = GapFiller::new(0.0);
        let mut rng = StdRng::seed_from_u64(7);

        let filled = filler.fill(&series, date(2024, 1, 5), &mut rng);
        let tmin = filled.column("tmin_a").unwrap();
        assert_eq!(tmin[tmin.len() - 1], 3.0);
    }

    #[test]
    fn falls_back_to_month_mean_for_unseen_calendar_days() {
        // No Feb 29 in history; the fill lands on the month-wide mean.
        let series = HistoricalSeries::new(
            vec![date(2023, 2, 27), date(2023, 2, 28), date(2024, 2, 28)],
            vec![("tmin_a".into(), vec![1.0, 2.0, 6.0])],
        )
        .unwrap();
        let filler = GapFiller::new(0.0);
        let mut rng = StdRng::seed_from_u64(7);

        let filled = filler.fill(&series, date(2024, 2, 29), &mut rng);
        let tmin = filled.column("tmin_a").unwrap();
        assert_eq!(tmin[tmin.len() - 1], 3.0);
    }

    #[test]
    fn noise_only_touches_target_columns() {
        let dates: Vec<NaiveDate> = (0..5)
            .map(|i| date(2024, 1, 1) + chrono::Duration::days(i))
            .collect();
        let series = HistoricalSeries::new(
            dates,
            vec![
                ("tmin_a".into(), vec![5.0; 5]),
                ("prec_x".into(), vec![1.0; 5]),
            ],
        )
        .unwrap();
        let filler = GapFiller::new(0.5);
        let mut rng = StdRng::seed_from_u64(7);

        let filled = filler.fill(&series, date(2024, 1, 8), &mut rng);
        let prec = filled.column("prec_x").unwrap();
        // Covariates reproduce the calendar mean exactly.
        assert_eq!(&prec[5..], &[1.0, 1.0, 1.0]);
        let tmin = filled.column("tmin_a").unwrap();
        // Targets are perturbed around the mean but still finite.
        assert!(tmin[5..].iter().all(|v| v.is_finite()));
    }
}
