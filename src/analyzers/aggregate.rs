use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::types::{EnrichedRow, HealthGroup, SummaryRow};
use crate::analyzers::utility::{capitalize, mean_std};
use crate::error::{CurveError, Result};

/// Health group labels that survive into the summary.
static REPORTED_GROUPS: &[&str] = &["Healthy", "Type 2 diabetic"];

/// Minute offset used as an exact grouping key.
#[derive(Debug, Clone, Copy)]
struct MinuteKey(f64);

impl MinuteKey {
    fn new(minutes: f64) -> Self {
        // folds -0.0 into 0.0
        Self(minutes + 0.0)
    }
}

impl PartialEq for MinuteKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MinuteKey {}

impl PartialOrd for MinuteKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MinuteKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Default)]
struct ChannelSeries {
    libre: Vec<f64>,
    dexcom: Vec<f64>,
}

/// Normalizes a health group label: trimmed, hyphens as spaces, capitalized.
pub fn normalize_health_group(label: &str) -> String {
    capitalize(&label.trim().replace('-', " "))
}

/// Normalizes a meal type label: trimmed and capitalized.
pub fn normalize_meal_type(label: &str) -> String {
    capitalize(label)
}

/// Aggregates enriched rows into glucose response curves.
///
/// Rows are grouped by (meal type, health group, exact minutes since meal);
/// rows lacking a meal type or health group are not grouped. Each group gets
/// the mean and sample standard deviation of both glucose channels over the
/// readings present. Output is ordered by meal type, health group, then
/// minutes, and only healthy and type 2 diabetic rows are reported.
///
/// Meal types group on the raw logged text, so `" breakfast"` and
/// `"breakfast"` stay separate rows even though both print as `Breakfast`.
///
/// # Errors
///
/// Returns [`CurveError::EmptyResult`] when no rows remain.
pub fn aggregate_curves(rows: &[EnrichedRow<'_>]) -> Result<Vec<SummaryRow>> {
    let mut groups: BTreeMap<(&str, HealthGroup, MinuteKey), ChannelSeries> = BTreeMap::new();

    for row in rows {
        let (Some(meal_type), Some(group)) = (row.meal_type.as_deref(), row.health_group) else {
            continue;
        };

        let series = groups
            .entry((meal_type, group, MinuteKey::new(row.minutes_since_meal)))
            .or_default();

        if let Some(v) = row.libre_glucose {
            series.libre.push(v);
        }
        if let Some(v) = row.dexcom_glucose {
            series.dexcom.push(v);
        }
    }

    let group_count = groups.len();

    let summary: Vec<SummaryRow> = groups
        .into_iter()
        .map(|((meal_type, group, minutes), series)| {
            let (libre_mean, libre_std) = mean_std(&series.libre);
            let (dexcom_mean, dexcom_std) = mean_std(&series.dexcom);

            SummaryRow {
                meal_type: normalize_meal_type(meal_type),
                health_group: normalize_health_group(group.label()),
                minutes_since_meal: minutes.0,
                libre_mean,
                libre_std,
                dexcom_mean,
                dexcom_std,
            }
        })
        .filter(|row| REPORTED_GROUPS.contains(&row.health_group.as_str()))
        .collect();

    debug!(group_count, reported = summary.len(), "Curves aggregated");

    if summary.is_empty() {
        return Err(CurveError::EmptyResult);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Macros;
    use chrono::{NaiveDate, NaiveDateTime};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn row(
        meal_type: &str,
        group: HealthGroup,
        minutes: f64,
        libre: f64,
        dexcom: Option<f64>,
    ) -> EnrichedRow<'static> {
        EnrichedRow {
            participant_id: 1,
            timestamp: noon(),
            minutes_since_meal: minutes,
            meal: Macros::default(),
            meal_type: Some(meal_type.to_string()),
            meal_time: noon(),
            libre_glucose: Some(libre),
            dexcom_glucose: dexcom,
            heart_rate: None,
            biometrics: None,
            health_group: Some(group),
        }
    }

    #[test]
    fn test_groups_by_exact_minutes() {
        let rows = vec![
            row("breakfast", HealthGroup::Healthy, 15.0, 100.0, Some(90.0)),
            row("breakfast", HealthGroup::Healthy, 15.0, 120.0, Some(110.0)),
            row("breakfast", HealthGroup::Healthy, 15.5, 130.0, None),
        ];
        let summary = aggregate_curves(&rows).unwrap();
        assert_eq!(summary.len(), 2);

        let first = &summary[0];
        assert_eq!(first.meal_type, "Breakfast");
        assert_eq!(first.health_group, "Healthy");
        assert_eq!(first.minutes_since_meal, 15.0);
        assert_eq!(first.libre_mean, Some(110.0));
        assert!((first.libre_std.unwrap() - 200f64.sqrt()).abs() < 1e-9);
        assert_eq!(first.dexcom_mean, Some(100.0));

        let singleton = &summary[1];
        assert_eq!(singleton.minutes_since_meal, 15.5);
        assert_eq!(singleton.libre_std, None);
        assert_eq!(singleton.dexcom_mean, None);
    }

    #[test]
    fn test_ordering_and_group_labels() {
        let rows = vec![
            row("lunch", HealthGroup::Type2Diabetic, 0.0, 150.0, None),
            row("Dinner", HealthGroup::Type2Diabetic, 5.0, 140.0, None),
            row("Dinner", HealthGroup::Healthy, 5.0, 100.0, None),
        ];
        let summary = aggregate_curves(&rows).unwrap();
        let keys: Vec<_> = summary
            .iter()
            .map(|r| (r.meal_type.as_str(), r.health_group.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Dinner", "Healthy"),
                ("Dinner", "Type 2 diabetic"),
                ("Lunch", "Type 2 diabetic"),
            ]
        );
    }

    #[test]
    fn test_pre_diabetic_never_reported() {
        let rows = vec![
            row("Lunch", HealthGroup::PreDiabetic, 0.0, 150.0, None),
            row("Lunch", HealthGroup::Healthy, 0.0, 100.0, None),
        ];
        let summary = aggregate_curves(&rows).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].health_group, "Healthy");
    }

    #[test]
    fn test_rows_without_meal_type_skipped() {
        let mut untyped = row("Lunch", HealthGroup::Healthy, 0.0, 100.0, None);
        untyped.meal_type = None;
        let err = aggregate_curves(&[untyped]).unwrap_err();
        assert!(matches!(err, CurveError::EmptyResult));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(aggregate_curves(&[]), Err(CurveError::EmptyResult)));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let rows = vec![
            row("snack", HealthGroup::Healthy, 10.0, 100.0, Some(101.0)),
            row("snack", HealthGroup::Healthy, 10.0, 104.0, Some(99.0)),
            row("lunch", HealthGroup::Type2Diabetic, 30.0, 180.0, None),
        ];
        assert_eq!(aggregate_curves(&rows).unwrap(), aggregate_curves(&rows).unwrap());
    }

    #[test]
    fn test_negative_zero_joins_zero() {
        let rows = vec![
            row("Lunch", HealthGroup::Healthy, 0.0, 100.0, None),
            row("Lunch", HealthGroup::Healthy, -0.0, 110.0, None),
        ];
        let summary = aggregate_curves(&rows).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].libre_mean, Some(105.0));
    }

    #[test]
    fn test_meal_type_variants_stay_separate() {
        let rows = vec![
            row(" breakfast", HealthGroup::Healthy, 0.0, 100.0, None),
            row("breakfast", HealthGroup::Healthy, 0.0, 120.0, None),
        ];
        let summary = aggregate_curves(&rows).unwrap();
        assert_eq!(summary.len(), 2);
        assert!(summary.iter().all(|r| r.meal_type == "Breakfast"));
        assert_eq!(summary[0].libre_mean, Some(100.0));
        assert_eq!(summary[1].libre_mean, Some(120.0));
    }

    #[test]
    fn test_normalize_labels() {
        assert_eq!(normalize_meal_type(" breakfast"), "Breakfast");
        assert_eq!(normalize_health_group("Type 2 Diabetic "), "Type 2 diabetic");
        assert_eq!(normalize_health_group("Pre-diabetic"), "Pre diabetic");
    }
}
