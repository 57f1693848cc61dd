use crate::records::{ParticipantSeries, TimeSeriesSample};

/// Returns the samples of `series` that are logged meals.
///
/// A sample qualifies when any of its five macro fields is present; missing
/// fields on a qualifying sample stay missing.
pub fn extract_meals(series: &ParticipantSeries) -> Vec<&TimeSeriesSample> {
    series.samples.iter().filter(|s| s.is_meal()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Macros;
    use chrono::NaiveDate;

    fn sample(minute: u32, macros: Macros) -> TimeSeriesSample {
        TimeSeriesSample {
            timestamp: NaiveDate::from_ymd_opt(2020, 5, 1)
                .unwrap()
                .and_hms_opt(12, minute, 0)
                .unwrap(),
            libre_glucose: Some(100.0),
            dexcom_glucose: None,
            heart_rate: None,
            macros,
            meal_type: None,
        }
    }

    #[test]
    fn test_all_missing_is_not_a_meal() {
        let series = ParticipantSeries::new(1, vec![sample(0, Macros::default())]);
        assert!(extract_meals(&series).is_empty());
    }

    #[test]
    fn test_single_macro_is_a_meal() {
        let carbs_only = Macros {
            carbs: Some(50.0),
            ..Default::default()
        };
        let series = ParticipantSeries::new(
            1,
            vec![sample(0, Macros::default()), sample(1, carbs_only)],
        );
        let meals = extract_meals(&series);
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].macros.carbs, Some(50.0));
        assert_eq!(meals[0].macros.protein, None);
    }
}
