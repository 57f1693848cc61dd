//! Column naming for the bio and participant tables.
//!
//! Every column the pipeline reads is named here and resolved against a CSV
//! header once per file. Defaults match the CGMacros dataset layout; a JSON
//! file can override any subset of names:
//! ```json
//! {
//!   "glycemic_marker": "HbA1c",
//!   "meal_type": "Meal"
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CurveError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub bio_file: String,
    pub series_prefix: String,
    pub series_extension: String,

    pub participant_id: String,
    pub glycemic_marker: String,

    pub timestamp: String,
    pub libre_glucose: String,
    pub dexcom_glucose: String,
    pub heart_rate: String,
    pub calories: String,
    pub carbs: String,
    pub protein: String,
    pub fat: String,
    pub fiber: String,
    pub meal_type: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            bio_file: "bio.csv".into(),
            series_prefix: "CGMacros-".into(),
            series_extension: ".csv".into(),
            participant_id: "ParticipantID".into(),
            glycemic_marker: "A1c PDL (Lab)".into(),
            timestamp: "Timestamp".into(),
            libre_glucose: "Libre GL".into(),
            dexcom_glucose: "Dexcom GL".into(),
            heart_rate: "HR".into(),
            calories: "Calories".into(),
            carbs: "Carbs".into(),
            protein: "Protein".into(),
            fat: "Fat".into(),
            fiber: "Fiber".into(),
            meal_type: "Meal Type".into(),
        }
    }
}

/// Header positions for `bio.csv`.
#[derive(Debug, Clone)]
pub struct BioColumns {
    pub participant_id: usize,
    pub glycemic_marker: usize,
    /// Every other column, kept as a static attribute.
    pub attributes: Vec<(usize, String)>,
}

/// Header positions for a participant time series.
#[derive(Debug, Clone)]
pub struct SeriesColumns {
    pub timestamp: usize,
    pub libre_glucose: usize,
    pub dexcom_glucose: usize,
    pub heart_rate: usize,
    /// Calories, carbs, protein, fat, fiber in that order.
    pub macros: [usize; 5],
    pub meal_type: usize,
}

impl Schema {
    /// Loads a schema from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let schema: Schema = serde_json::from_str(&content)?;
        debug!(path, "Loaded column schema");
        Ok(schema)
    }

    /// Macro column names in the fixed calories, carbs, protein, fat, fiber order.
    pub fn macro_names(&self) -> [&str; 5] {
        [
            self.calories.as_str(),
            self.carbs.as_str(),
            self.protein.as_str(),
            self.fat.as_str(),
            self.fiber.as_str(),
        ]
    }

    pub fn resolve_bio(&self, headers: &csv::StringRecord, file: &str) -> Result<BioColumns> {
        let participant_id = find(headers, &self.participant_id, file)?;
        let glycemic_marker = find(headers, &self.glycemic_marker, file)?;

        let attributes = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != participant_id && *i != glycemic_marker)
            .map(|(i, name)| (i, name.trim().to_string()))
            .collect();

        Ok(BioColumns {
            participant_id,
            glycemic_marker,
            attributes,
        })
    }

    pub fn resolve_series(&self, headers: &csv::StringRecord, file: &str) -> Result<SeriesColumns> {
        let [calories, carbs, protein, fat, fiber] = self.macro_names();

        Ok(SeriesColumns {
            timestamp: find(headers, &self.timestamp, file)?,
            libre_glucose: find(headers, &self.libre_glucose, file)?,
            dexcom_glucose: find(headers, &self.dexcom_glucose, file)?,
            heart_rate: find(headers, &self.heart_rate, file)?,
            macros: [
                find(headers, calories, file)?,
                find(headers, carbs, file)?,
                find(headers, protein, file)?,
                find(headers, fat, file)?,
                find(headers, fiber, file)?,
            ],
            meal_type: find(headers, &self.meal_type, file)?,
        })
    }

    /// Whether `name` follows the participant file convention (`CGMacros-<id>.csv`).
    pub fn is_series_file(&self, name: &str) -> bool {
        name.starts_with(&self.series_prefix) && name.ends_with(&self.series_extension)
    }
}

/// Header names are compared after trimming surrounding whitespace.
fn find(headers: &csv::StringRecord, column: &str, file: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column.trim())
        .ok_or_else(|| CurveError::schema_mismatch(file, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_headers() -> csv::StringRecord {
        csv::StringRecord::from(vec![
            "",
            "Timestamp",
            "Libre GL",
            "Dexcom GL",
            "HR",
            "Calories",
            "Carbs",
            "Protein",
            "Fat",
            "Fiber",
            "Meal Type",
        ])
    }

    #[test]
    fn test_resolve_series_positions() {
        let cols = Schema::default()
            .resolve_series(&series_headers(), "CGMacros-1.csv")
            .unwrap();
        assert_eq!(cols.timestamp, 1);
        assert_eq!(cols.macros, [5, 6, 7, 8, 9]);
        assert_eq!(cols.meal_type, 10);
    }

    #[test]
    fn test_resolve_series_missing_column() {
        let headers = csv::StringRecord::from(vec!["Libre GL", "Dexcom GL"]);
        let err = Schema::default()
            .resolve_series(&headers, "CGMacros-1.csv")
            .unwrap_err();
        match err {
            CurveError::SchemaMismatch { file, column } => {
                assert_eq!(file, "CGMacros-1.csv");
                assert_eq!(column, "Timestamp");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_bio_keeps_other_attributes() {
        let headers = csv::StringRecord::from(vec!["ParticipantID", " Age", "A1c PDL (Lab)", "BMI"]);
        let cols = Schema::default().resolve_bio(&headers, "bio.csv").unwrap();
        assert_eq!(cols.participant_id, 0);
        assert_eq!(cols.glycemic_marker, 2);
        assert_eq!(
            cols.attributes,
            vec![(1, "Age".to_string()), (3, "BMI".to_string())]
        );
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let schema: Schema = serde_json::from_str(r#"{ "meal_type": "Meal" }"#).unwrap();
        assert_eq!(schema.meal_type, "Meal");
        assert_eq!(schema.timestamp, "Timestamp");
    }

    #[test]
    fn test_is_series_file() {
        let schema = Schema::default();
        assert!(schema.is_series_file("CGMacros-03.csv"));
        assert!(!schema.is_series_file("bio.csv"));
        assert!(!schema.is_series_file("CGMacros-03.txt"));
    }
}
