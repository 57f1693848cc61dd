//! Post-meal windows: the samples surrounding each meal event.

use chrono::{Duration, NaiveDateTime};

use crate::analyzers::meals::extract_meals;
use crate::analyzers::types::WindowRow;
use crate::records::{ParticipantSeries, TimeSeriesSample};

/// Minutes before a meal included in its window.
pub const MINUTES_BEFORE: i64 = 15;
/// Minutes after a meal included in its window.
pub const MINUTES_AFTER: i64 = 180;

/// Signed offset of `ts` from `meal_time` in minutes.
pub fn minutes_between(meal_time: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    (ts - meal_time).num_milliseconds() as f64 / 60_000.0
}

/// Builds the window rows of every meal in `series`.
///
/// Windows are concatenated in meal order. A sample close to two meals
/// appears once in each window.
pub fn build_windows(series: &ParticipantSeries) -> Vec<WindowRow> {
    extract_meals(series)
        .into_iter()
        .flat_map(|meal| window_for(series, meal))
        .collect()
}

/// Rows for one meal. Requires `series.samples` sorted by timestamp.
pub fn window_for(series: &ParticipantSeries, meal: &TimeSeriesSample) -> Vec<WindowRow> {
    let start = meal.timestamp - Duration::minutes(MINUTES_BEFORE);
    let end = meal.timestamp + Duration::minutes(MINUTES_AFTER);

    let first = series.samples.partition_point(|s| s.timestamp < start);

    series.samples[first..]
        .iter()
        .take_while(|s| s.timestamp <= end)
        .map(|s| WindowRow {
            participant_id: series.participant_id,
            timestamp: s.timestamp,
            libre_glucose: s.libre_glucose,
            dexcom_glucose: s.dexcom_glucose,
            heart_rate: s.heart_rate,
            sample_macros: s.macros,
            minutes_since_meal: minutes_between(meal.timestamp, s.timestamp),
            meal: meal.macros,
            meal_type: meal.meal_type.clone(),
            meal_time: meal.timestamp,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Macros;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample(ts: NaiveDateTime, libre: f64, carbs: Option<f64>) -> TimeSeriesSample {
        TimeSeriesSample {
            timestamp: ts,
            libre_glucose: Some(libre),
            dexcom_glucose: None,
            heart_rate: None,
            macros: Macros {
                carbs,
                ..Default::default()
            },
            meal_type: carbs.map(|_| "Lunch".to_string()),
        }
    }

    #[test]
    fn test_meal_at_noon_sample_at_half_past() {
        let series = ParticipantSeries::new(
            4,
            vec![sample(at(12, 0), 110.0, Some(50.0)), sample(at(12, 30), 140.0, None)],
        );
        let rows = build_windows(&series);
        assert_eq!(rows.len(), 2);

        let later = &rows[1];
        assert_eq!(later.minutes_since_meal, 30.0);
        assert_eq!(later.meal.carbs, Some(50.0));
        assert_eq!(later.libre_glucose, Some(140.0));
        assert_eq!(later.meal_type.as_deref(), Some("Lunch"));
        assert_eq!(later.meal_time, at(12, 0));
        assert_eq!(later.participant_id, 4);
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let series = ParticipantSeries::new(
            1,
            vec![
                sample(at(11, 44), 1.0, None),
                sample(at(11, 45), 2.0, None),
                sample(at(12, 0), 3.0, Some(20.0)),
                sample(at(15, 0), 4.0, None),
                sample(at(15, 1), 5.0, None),
            ],
        );
        let rows = build_windows(&series);
        let offsets: Vec<f64> = rows.iter().map(|r| r.minutes_since_meal).collect();
        assert_eq!(offsets, vec![-15.0, 0.0, 180.0]);

        for row in &rows {
            assert!((-15.0..=180.0).contains(&row.minutes_since_meal));
            assert_eq!(row.minutes_since_meal, minutes_between(row.meal_time, row.timestamp));
        }
    }

    #[test]
    fn test_overlapping_windows_replicate_samples() {
        let series = ParticipantSeries::new(
            1,
            vec![
                sample(at(12, 0), 100.0, Some(30.0)),
                sample(at(12, 20), 120.0, None),
                sample(at(12, 30), 130.0, Some(10.0)),
            ],
        );
        let rows = build_windows(&series);

        // The 12:20 sample belongs to both meals' windows.
        let shared: Vec<_> = rows.iter().filter(|r| r.timestamp == at(12, 20)).collect();
        assert_eq!(shared.len(), 2);
        assert_eq!(shared[0].minutes_since_meal, 20.0);
        assert_eq!(shared[1].minutes_since_meal, -10.0);
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_fractional_offsets() {
        let meal = at(12, 0);
        let ts = meal + Duration::seconds(90);
        assert_eq!(minutes_between(meal, ts), 1.5);
        assert_eq!(minutes_between(ts, meal), -1.5);
    }
}
