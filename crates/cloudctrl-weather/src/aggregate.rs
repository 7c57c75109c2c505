//! Reshapes forecast samples into hourly and daily views.
//!
//! Both views are pure functions of the series.

use chrono::DateTime;

use crate::types::{DailyAggregate, ForecastSample, ForecastSeries};

/// Number of samples in the hourly strip.
pub const HOURLY_SAMPLES: usize = 8;
/// Number of days in the daily view.
pub const DAILY_BUCKETS: usize = 5;

const DAY_LABEL_FORMAT: &str = "%a, %d %b";

/// The first [`HOURLY_SAMPLES`] samples in arrival order.
///
/// This is a count, not a time window: with the provider's 3-hour cadence it
/// covers 24 hours, with another cadence it does not.
pub fn hourly_view(series: &ForecastSeries) -> &[ForecastSample] {
    let end = series.samples.len().min(HOURLY_SAMPLES);
    &series.samples[..end]
}

/// Location-local calendar day label for a UTC timestamp, e.g. `"Tue, 14 Nov"`.
pub fn day_label(timestamp: i64, timezone_offset: i64) -> Option<String> {
    let local = timestamp.checked_add(timezone_offset)?;
    let date = DateTime::from_timestamp(local, 0)?;
    Some(date.format(DAY_LABEL_FORMAT).to_string())
}

/// Group samples by local calendar day, in order of first appearance, and
/// summarize up to [`DAILY_BUCKETS`] days.
///
/// Per day: the minimum temperature rounded down, the maximum rounded to the
/// nearest integer, and the condition of the day's first sample.
pub fn daily_view(series: &ForecastSeries) -> Vec<DailyAggregate> {
    let mut buckets: Vec<(String, Vec<&ForecastSample>)> = Vec::new();

    for sample in &series.samples {
        let Some(label) = day_label(sample.timestamp, series.timezone_offset) else {
            tracing::debug!("Skipping forecast sample with unrepresentable time {}", sample.timestamp);
            continue;
        };

        match buckets.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, samples)) => samples.push(sample),
            None => buckets.push((label, vec![sample])),
        }
    }

    buckets
        .into_iter()
        .take(DAILY_BUCKETS)
        .map(|(label, samples)| summarize_day(label, &samples))
        .collect()
}

fn summarize_day(label: String, samples: &[&ForecastSample]) -> DailyAggregate {
    let min = samples
        .iter()
        .map(|s| s.temperature)
        .fold(f64::INFINITY, f64::min);
    let max = samples
        .iter()
        .map(|s| s.temperature)
        .fold(f64::NEG_INFINITY, f64::max);

    DailyAggregate {
        label,
        min_temp: min.floor(),
        max_temp: round_half_up(max),
        condition: samples.first().and_then(|s| s.condition.clone()),
    }
}

/// Round to the nearest integer, with halves going toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-11-13T00:00:00Z, a Monday
    const MONDAY_MIDNIGHT: i64 = 1_699_833_600;
    const THREE_HOURS: i64 = 3 * 3600;

    fn series_of(count: usize, offset: i64) -> ForecastSeries {
        let samples = (0..count)
            .map(|i| {
                let condition = if i % 8 == 0 { "Rain" } else { "Clouds" };
                ForecastSample::new(
                    MONDAY_MIDNIGHT + i as i64 * THREE_HOURS,
                    10.0 + (i % 8) as f64 * 0.7,
                    Some(condition),
                )
            })
            .collect();
        ForecastSeries::new(samples, offset)
    }

    #[test]
    fn test_empty_series() {
        let series = ForecastSeries::new(Vec::new(), 0);
        assert!(hourly_view(&series).is_empty());
        assert!(daily_view(&series).is_empty());
    }

    #[test]
    fn test_hourly_view_takes_first_eight() {
        let series = series_of(40, 0);
        let hourly = hourly_view(&series);
        assert_eq!(hourly.len(), 8);
        assert_eq!(hourly, &series.samples[..8]);
    }

    #[test]
    fn test_hourly_view_short_series() {
        for n in 0..8 {
            let series = series_of(n, 0);
            assert_eq!(hourly_view(&series).len(), n);
        }
    }

    #[test]
    fn test_hourly_view_ignores_elapsed_time() {
        // Daily cadence: eight samples span eight days, still all returned.
        let samples = (0..10)
            .map(|i| ForecastSample::new(MONDAY_MIDNIGHT + i * 86_400, 1.0, None))
            .collect();
        let series = ForecastSeries::new(samples, 0);
        assert_eq!(hourly_view(&series).len(), 8);
    }

    #[test]
    fn test_daily_view_five_days() {
        let series = series_of(40, 0);
        let daily = daily_view(&series);

        assert_eq!(daily.len(), 5);
        assert_eq!(daily[0].label, "Mon, 13 Nov");
        assert_eq!(daily[4].label, "Fri, 17 Nov");

        for (day, chunk) in daily.iter().zip(series.samples.chunks(8)) {
            let true_min = chunk.iter().map(|s| s.temperature).fold(f64::INFINITY, f64::min);
            let true_max = chunk
                .iter()
                .map(|s| s.temperature)
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(day.min_temp, true_min.floor());
            assert_eq!(day.max_temp, true_max.round());
            assert_eq!(day.condition, chunk[0].condition);
        }

        // 10.0 .. 14.9
        assert_eq!(daily[0].min_temp, 10.0);
        assert_eq!(daily[0].max_temp, 15.0);
        assert_eq!(daily[0].condition.as_deref(), Some("Rain"));
    }

    #[test]
    fn test_daily_view_truncates_to_five_days() {
        let series = series_of(56, 0);
        let daily = daily_view(&series);
        assert_eq!(daily.len(), 5);
        assert_eq!(daily[4].label, "Fri, 17 Nov");
    }

    #[test]
    fn test_daily_view_uses_local_date() {
        // 22:00Z Monday is already Tuesday at UTC+3.
        let samples = vec![
            ForecastSample::new(MONDAY_MIDNIGHT + 19 * 3600, 5.0, Some("Clear")),
            ForecastSample::new(MONDAY_MIDNIGHT + 22 * 3600, 3.0, Some("Snow")),
        ];

        let utc = daily_view(&ForecastSeries::new(samples.clone(), 0));
        assert_eq!(utc.len(), 1);
        assert_eq!(utc[0].label, "Mon, 13 Nov");

        let local = daily_view(&ForecastSeries::new(samples, 3 * 3600));
        assert_eq!(local.len(), 2);
        assert_eq!(local[0].label, "Mon, 13 Nov");
        assert_eq!(local[1].label, "Tue, 14 Nov");
        assert_eq!(local[1].condition.as_deref(), Some("Snow"));
    }

    #[test]
    fn test_daily_view_negative_offset() {
        // 02:00Z Monday is still Sunday at UTC-5.
        let samples = vec![ForecastSample::new(MONDAY_MIDNIGHT + 2 * 3600, 0.0, None)];
        let daily = daily_view(&ForecastSeries::new(samples, -5 * 3600));
        assert_eq!(daily[0].label, "Sun, 12 Nov");
    }

    #[test]
    fn test_daily_view_first_sample_condition_not_majority() {
        let samples = vec![
            ForecastSample::new(MONDAY_MIDNIGHT, 1.0, Some("Clear")),
            ForecastSample::new(MONDAY_MIDNIGHT + THREE_HOURS, 1.0, Some("Rain")),
            ForecastSample::new(MONDAY_MIDNIGHT + 2 * THREE_HOURS, 1.0, Some("Rain")),
        ];
        let daily = daily_view(&ForecastSeries::new(samples, 0));
        assert_eq!(daily[0].condition.as_deref(), Some("Clear"));
    }

    #[test]
    fn test_daily_view_regroups_non_consecutive_samples() {
        let samples = vec![
            ForecastSample::new(MONDAY_MIDNIGHT, 4.0, Some("Clear")),
            ForecastSample::new(MONDAY_MIDNIGHT + 86_400, 9.0, Some("Rain")),
            ForecastSample::new(MONDAY_MIDNIGHT + 3600, -2.0, Some("Snow")),
        ];
        let daily = daily_view(&ForecastSeries::new(samples, 0));
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].label, "Mon, 13 Nov");
        assert_eq!(daily[0].min_temp, -2.0);
        assert_eq!(daily[0].max_temp, 4.0);
        assert_eq!(daily[1].label, "Tue, 14 Nov");
    }

    #[test]
    fn test_rounding_rules() {
        let samples = vec![
            ForecastSample::new(MONDAY_MIDNIGHT, -3.2, None),
            ForecastSample::new(MONDAY_MIDNIGHT + 3600, 7.5, None),
        ];
        let daily = daily_view(&ForecastSeries::new(samples, 0));
        assert_eq!(daily[0].min_temp, -4.0);
        assert_eq!(daily[0].max_temp, 8.0);

        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn test_day_label_out_of_range() {
        assert_eq!(day_label(i64::MAX, 1), None);
        assert_eq!(day_label(MONDAY_MIDNIGHT, 0).as_deref(), Some("Mon, 13 Nov"));
    }
}
