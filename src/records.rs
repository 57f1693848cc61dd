//! Tables as loaded from disk: biometrics and per-participant time series.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

pub type ParticipantId = i64;

/// The five nutrition fields logged with a meal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Macros {
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
}

impl Macros {
    /// Builds from values in calories, carbs, protein, fat, fiber order.
    pub fn from_array([calories, carbs, protein, fat, fiber]: [Option<f64>; 5]) -> Self {
        Self {
            calories,
            carbs,
            protein,
            fat,
            fiber,
        }
    }

    pub fn any_present(&self) -> bool {
        [
            self.calories,
            self.carbs,
            self.protein,
            self.fat,
            self.fiber,
        ]
        .iter()
        .any(Option::is_some)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiometricRecord {
    pub participant_id: ParticipantId,
    /// Lab A1c.
    pub glycemic_marker: Option<f64>,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesSample {
    pub timestamp: NaiveDateTime,
    pub libre_glucose: Option<f64>,
    pub dexcom_glucose: Option<f64>,
    pub heart_rate: Option<f64>,
    pub macros: Macros,
    pub meal_type: Option<String>,
}

impl TimeSeriesSample {
    /// A sample is a meal event iff any macro field is present.
    pub fn is_meal(&self) -> bool {
        self.macros.any_present()
    }
}

/// All samples of one participant, ordered by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantSeries {
    pub participant_id: ParticipantId,
    pub samples: Vec<TimeSeriesSample>,
}

impl ParticipantSeries {
    /// Builds a series and establishes timestamp order. The sort is stable,
    /// so samples sharing a timestamp keep their file order.
    pub fn new(participant_id: ParticipantId, mut samples: Vec<TimeSeriesSample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self {
            participant_id,
            samples,
        }
    }
}

/// Everything read from the input archive.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub biometrics: Vec<BiometricRecord>,
    pub series: Vec<ParticipantSeries>,
}

impl Dataset {
    /// Index of biometric records by participant. The first record wins when
    /// an id is repeated.
    pub fn biometric_index(&self) -> HashMap<ParticipantId, &BiometricRecord> {
        let mut index = HashMap::with_capacity(self.biometrics.len());
        for record in &self.biometrics {
            if index.contains_key(&record.participant_id) {
                warn!(
                    participant_id = record.participant_id,
                    "Duplicate biometric record ignored"
                );
                continue;
            }
            index.insert(record.participant_id, record);
        }
        index
    }

    pub fn sample_count(&self) -> usize {
        self.series.iter().map(|s| s.samples.len()).sum()
    }
}
