//! Macro composition of meals by nutrient focus and health group.

use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::analyzers::grade::{health_group, nutrient_focus};
use crate::analyzers::meals::extract_meals;
use crate::analyzers::types::{HealthGroup, MacroSummaryRow, NutrientFocus};
use crate::analyzers::utility::mean;
use crate::records::{BiometricRecord, Dataset, ParticipantId};

/// Energy per gram of carbs, protein, and fat (kcal).
const KCAL_PER_GRAM: (f64, f64, f64) = (4.0, 4.0, 9.0);

#[derive(Default)]
struct MacroSeries {
    carbs: Vec<f64>,
    protein: Vec<f64>,
    fat: Vec<f64>,
}

/// Summarizes every classifiable meal of `dataset`.
///
/// Meals are skipped when the participant has no usable marker or the meal
/// lacks carbs, protein, or fat. All three health groups are reported.
pub fn profile_meals(
    dataset: &Dataset,
    index: &HashMap<ParticipantId, &BiometricRecord>,
) -> Vec<MacroSummaryRow> {
    let mut cells: BTreeMap<(NutrientFocus, HealthGroup), MacroSeries> = BTreeMap::new();
    let mut skipped = 0usize;

    for series in &dataset.series {
        let marker = index
            .get(&series.participant_id)
            .and_then(|b| b.glycemic_marker);

        for meal in extract_meals(series) {
            let m = &meal.macros;
            let (Some(group), Some(focus)) =
                (health_group(marker), nutrient_focus(m.carbs, m.protein, m.fat))
            else {
                skipped += 1;
                continue;
            };

            let cell = cells.entry((focus, group)).or_default();
            cell.carbs.extend(m.carbs);
            cell.protein.extend(m.protein);
            cell.fat.extend(m.fat);
        }
    }

    debug!(cells = cells.len(), skipped, "Meal macro profile built");

    cells
        .into_iter()
        .map(|((focus, group), cell)| {
            let carbs_mean = mean(&cell.carbs).unwrap_or(0.0);
            let protein_mean = mean(&cell.protein).unwrap_or(0.0);
            let fat_mean = mean(&cell.fat).unwrap_or(0.0);
            let (kc, kp, kf) = KCAL_PER_GRAM;

            MacroSummaryRow {
                nutrient_focus: focus.label().to_string(),
                health_group: group.label().to_string(),
                meals: cell.carbs.len(),
                carbs_mean,
                protein_mean,
                fat_mean,
                estimated_calories: carbs_mean * kc + protein_mean * kp + fat_mean * kf,
            }
        })
        .collect()
}
