use tracing::info;

use crate::analyzers::aggregate::aggregate_curves;
use crate::analyzers::enrich::enrich;
use crate::analyzers::meals::extract_meals;
use crate::analyzers::profile::profile_meals;
use crate::analyzers::types::{MacroSummaryRow, SummaryRow};
use crate::analyzers::window::build_windows;
use crate::error::Result;
use crate::records::Dataset;
use crate::stats::RunStats;

/// Everything a run produces.
#[derive(Debug)]
pub struct Analysis {
    pub summary: Vec<SummaryRow>,
    pub macro_summary: Vec<MacroSummaryRow>,
    pub stats: RunStats,
}

/// Runs windowing, enrichment, and aggregation over a loaded dataset.
#[tracing::instrument(skip_all, fields(participants = dataset.series.len()))]
pub fn analyze(dataset: &Dataset) -> Result<Analysis> {
    let mut stats = RunStats::from_dataset(dataset);
    let index = dataset.biometric_index();

    let mut windows = Vec::new();
    for series in &dataset.series {
        stats.meal_events += extract_meals(series).len();
        windows.extend(build_windows(series));
    }
    stats.window_rows = windows.len();
    info!(
        meal_events = stats.meal_events,
        window_rows = stats.window_rows,
        "Meal windows built"
    );

    let enriched = enrich(windows, &index);
    stats.enriched_rows = enriched.len();
    info!(
        enriched_rows = stats.enriched_rows,
        kept_pct = stats.enriched_pct(),
        "Windows enriched"
    );

    let summary = aggregate_curves(&enriched)?;
    stats.summary_rows = summary.len();

    let macro_summary = profile_meals(dataset, &index);
    stats.macro_summary_rows = macro_summary.len();

    info!(summary_rows = stats.summary_rows, "Analysis complete");
    Ok(Analysis {
        summary,
        macro_summary,
        stats,
    })
}
