//! Data types used by the window, enrichment, and aggregation stages.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

use crate::records::{BiometricRecord, Macros, ParticipantId};

/// Categorical bucket derived from the lab glycemic marker.
///
/// Variant order is the output order of the summary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HealthGroup {
    Healthy,
    PreDiabetic,
    Type2Diabetic,
}

impl HealthGroup {
    pub fn label(self) -> &'static str {
        match self {
            HealthGroup::Healthy => "Healthy",
            HealthGroup::PreDiabetic => "Pre-diabetic",
            HealthGroup::Type2Diabetic => "Type 2 diabetic",
        }
    }
}

impl fmt::Display for HealthGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dominant macronutrient of a meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NutrientFocus {
    HighCarb,
    HighProtein,
    HighFat,
}

impl NutrientFocus {
    pub fn label(self) -> &'static str {
        match self {
            NutrientFocus::HighCarb => "High-Carb",
            NutrientFocus::HighProtein => "High-Protein",
            NutrientFocus::HighFat => "High-Fat",
        }
    }
}

/// One sample inside the window of one meal.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRow {
    pub participant_id: ParticipantId,
    pub timestamp: NaiveDateTime,
    pub libre_glucose: Option<f64>,
    pub dexcom_glucose: Option<f64>,
    pub heart_rate: Option<f64>,
    /// Macro fields logged on the sample itself.
    pub sample_macros: Macros,
    /// Signed offset from the meal, in minutes.
    pub minutes_since_meal: f64,
    /// Macro fields of the originating meal (`Calories_Meal`, `Carbs_Meal`, ...).
    pub meal: Macros,
    pub meal_type: Option<String>,
    pub meal_time: NaiveDateTime,
}

/// A window row joined with biometrics and gap-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow<'a> {
    pub participant_id: ParticipantId,
    pub timestamp: NaiveDateTime,
    pub minutes_since_meal: f64,
    pub meal: Macros,
    pub meal_type: Option<String>,
    pub meal_time: NaiveDateTime,
    pub libre_glucose: Option<f64>,
    pub dexcom_glucose: Option<f64>,
    pub heart_rate: Option<f64>,
    /// `None` when the participant has no biometric record.
    pub biometrics: Option<&'a BiometricRecord>,
    pub health_group: Option<HealthGroup>,
}

impl EnrichedRow<'_> {
    pub fn glycemic_marker(&self) -> Option<f64> {
        self.biometrics.and_then(|b| b.glycemic_marker)
    }
}

/// One row of `glucose_curves_summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "MealType")]
    pub meal_type: String,
    #[serde(rename = "HealthGroup")]
    pub health_group: String,
    #[serde(rename = "MinutesSinceMeal")]
    pub minutes_since_meal: f64,
    #[serde(rename = "Libre GL mean")]
    pub libre_mean: Option<f64>,
    #[serde(rename = "Libre GL std")]
    pub libre_std: Option<f64>,
    #[serde(rename = "Dexcom GL mean")]
    pub dexcom_mean: Option<f64>,
    #[serde(rename = "Dexcom GL std")]
    pub dexcom_std: Option<f64>,
}

/// Average macro composition of the meals in one (focus, health group) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroSummaryRow {
    #[serde(rename = "NutrientFocus")]
    pub nutrient_focus: String,
    #[serde(rename = "HealthGroup")]
    pub health_group: String,
    #[serde(rename = "Meals")]
    pub meals: usize,
    #[serde(rename = "Carbs mean")]
    pub carbs_mean: f64,
    #[serde(rename = "Protein mean")]
    pub protein_mean: f64,
    #[serde(rename = "Fat mean")]
    pub fat_mean: f64,
    #[serde(rename = "Estimated calories")]
    pub estimated_calories: f64,
}
