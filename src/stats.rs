use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::Dataset;

/// Row counts at each stage of one pipeline run.
#[derive(Debug, Default, Serialize)]
pub struct RunStats {
    pub timestamp: DateTime<Utc>,

    // input
    pub participants: usize,
    pub biometric_records: usize,
    pub samples: usize,
    pub unmatched_participants: usize,

    // pipeline stages
    pub meal_events: usize,
    pub window_rows: usize,
    pub enriched_rows: usize,
    pub summary_rows: usize,
    pub macro_summary_rows: usize,
}

impl RunStats {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let index = dataset.biometric_index();
        let unmatched_participants = dataset
            .series
            .iter()
            .filter(|s| !index.contains_key(&s.participant_id))
            .count();

        RunStats {
            timestamp: Utc::now(),
            participants: dataset.series.len(),
            biometric_records: dataset.biometrics.len(),
            samples: dataset.sample_count(),
            unmatched_participants,
            ..Default::default()
        }
    }

    /// Share of window rows that survived enrichment, in percent.
    pub fn enriched_pct(&self) -> f64 {
        Self::pct(self.enriched_rows, self.window_rows)
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }
}
