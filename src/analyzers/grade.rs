use crate::analyzers::types::{HealthGroup, NutrientFocus};

/// Upper bound (inclusive) of the healthy A1c bin.
pub const HEALTHY_MAX: f64 = 5.7;
/// Upper bound (inclusive) of the pre-diabetic A1c bin.
pub const PRE_DIABETIC_MAX: f64 = 6.4;

/// Buckets a glycemic marker (A1c) into a health group.
///
/// | Range        | Group           |
/// |--------------|-----------------|
/// | (0, 5.7]     | Healthy         |
/// | (5.7, 6.4]   | Pre-diabetic    |
/// | > 6.4        | Type 2 diabetic |
///
/// Missing, non-positive, or NaN markers are unclassified.
pub fn health_group(marker: Option<f64>) -> Option<HealthGroup> {
    match marker? {
        m if m.is_nan() || m <= 0.0 => None,
        m if m <= HEALTHY_MAX => Some(HealthGroup::Healthy),
        m if m <= PRE_DIABETIC_MAX => Some(HealthGroup::PreDiabetic),
        _ => Some(HealthGroup::Type2Diabetic),
    }
}

/// Classifies a meal by its dominant macronutrient.
///
/// Protein wins only when it beats carbs and at least ties fat; fat wins only
/// when it strictly beats both. Everything else is high-carb.
pub fn nutrient_focus(carbs: Option<f64>, protein: Option<f64>, fat: Option<f64>) -> Option<NutrientFocus> {
    let (carbs, protein, fat) = (carbs?, protein?, fat?);

    Some(match () {
        _ if protein > carbs && protein >= fat => NutrientFocus::HighProtein,
        _ if fat > carbs && fat > protein => NutrientFocus::HighFat,
        _ => NutrientFocus::HighCarb,
    })
}
