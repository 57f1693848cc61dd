//! Joins windows with biometrics, fills sensor gaps, and narrows the rows to
//! the analysis subset.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

use crate::analyzers::grade::health_group;
use crate::analyzers::types::{EnrichedRow, HealthGroup, WindowRow};
use crate::records::{BiometricRecord, ParticipantId};

/// Post-meal minutes kept for the curves.
pub const ANALYSIS_WINDOW: RangeInclusive<f64> = 0.0..=120.0;

/// Left join of window rows onto biometrics. Raw per-sample macros are
/// dropped; only the per-meal fields carry over.
pub fn join_biometrics<'a>(
    rows: Vec<WindowRow>,
    index: &HashMap<ParticipantId, &'a BiometricRecord>,
) -> Vec<EnrichedRow<'a>> {
    rows.into_iter()
        .map(|row| EnrichedRow {
            participant_id: row.participant_id,
            timestamp: row.timestamp,
            minutes_since_meal: row.minutes_since_meal,
            meal: row.meal,
            meal_type: row.meal_type,
            meal_time: row.meal_time,
            libre_glucose: row.libre_glucose,
            dexcom_glucose: row.dexcom_glucose,
            heart_rate: row.heart_rate,
            biometrics: index.get(&row.participant_id).copied(),
            health_group: None,
        })
        .collect()
}

/// Orders rows by participant, then sample timestamp. Stable, so replicated
/// samples from overlapping windows keep their window order.
///
/// Must run before [`forward_fill_glucose`] and [`interpolate_heart_rate`].
pub fn sort_for_fill(rows: &mut [EnrichedRow<'_>]) {
    rows.sort_by_key(|r| (r.participant_id, r.timestamp));
}

/// Carries the last seen reading forward on each glucose channel
/// independently. Fill stops at participant boundaries.
pub fn forward_fill_glucose(rows: &mut [EnrichedRow<'_>]) {
    for chunk in rows.chunk_by_mut(|a, b| a.participant_id == b.participant_id) {
        forward_fill(chunk.iter_mut().map(|r| &mut r.libre_glucose));
        forward_fill(chunk.iter_mut().map(|r| &mut r.dexcom_glucose));
    }
}

/// Linear interpolation of heart rate by row position within a participant.
pub fn interpolate_heart_rate(rows: &mut [EnrichedRow<'_>]) {
    for chunk in rows.chunk_by_mut(|a, b| a.participant_id == b.participant_id) {
        let mut values: Vec<Option<f64>> = chunk.iter().map(|r| r.heart_rate).collect();
        interpolate_linear(&mut values);
        for (row, value) in chunk.iter_mut().zip(values) {
            row.heart_rate = value;
        }
    }
}

/// Assigns the health group of every row from its participant's marker.
pub fn classify(rows: &mut [EnrichedRow<'_>]) {
    for row in rows.iter_mut() {
        row.health_group = health_group(row.glycemic_marker());
    }
}

fn forward_fill<'r>(values: impl Iterator<Item = &'r mut Option<f64>>) {
    let mut last = None;
    for value in values {
        match *value {
            Some(v) => last = Some(v),
            None => *value = last,
        }
    }
}

/// Interior gaps are interpolated, trailing gaps take the last value,
/// leading gaps stay empty.
fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut last: Option<(usize, f64)> = None;

    for i in 0..values.len() {
        let Some(current) = values[i] else {
            continue;
        };
        if let Some((j, previous)) = last {
            let span = (i - j) as f64;
            for k in (j + 1)..i {
                values[k] = Some(previous + (current - previous) * (k - j) as f64 / span);
            }
        }
        last = Some((i, current));
    }

    if let Some((j, previous)) = last {
        for value in values.iter_mut().skip(j + 1) {
            *value = Some(previous);
        }
    }
}

/// Runs the full enrichment: join, fill, classify, then filter to healthy and
/// type 2 diabetic rows inside the analysis window with a primary glucose
/// reading.
#[tracing::instrument(skip_all, fields(window_rows = rows.len()))]
pub fn enrich<'a>(
    rows: Vec<WindowRow>,
    index: &HashMap<ParticipantId, &'a BiometricRecord>,
) -> Vec<EnrichedRow<'a>> {
    let mut rows = join_biometrics(rows, index);

    let unmatched = rows.iter().filter(|r| r.biometrics.is_none()).count();
    if unmatched > 0 {
        warn!(unmatched, "Window rows without a biometric record");
    }

    sort_for_fill(&mut rows);
    forward_fill_glucose(&mut rows);
    interpolate_heart_rate(&mut rows);
    classify(&mut rows);

    let unclassified = rows.iter().filter(|r| r.health_group.is_none()).count();
    rows.retain(|r| {
        matches!(
            r.health_group,
            Some(HealthGroup::Healthy | HealthGroup::Type2Diabetic)
        )
    });
    let in_groups = rows.len();

    rows.retain(|r| ANALYSIS_WINDOW.contains(&r.minutes_since_meal));
    let in_window = rows.len();

    rows.retain(|r| r.libre_glucose.is_some());

    debug!(
        unclassified,
        in_groups,
        in_window,
        kept = rows.len(),
        "Enrichment filters applied"
    );
    rows
}
