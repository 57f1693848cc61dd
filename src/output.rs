//! Output formatting and persistence for summary tables.
//!
//! Supports pretty-printing, JSON previews, CSV writing and gzip copies.

use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::stats::RunStats;

/// Default name of the curve summary file.
pub const SUMMARY_FILE: &str = "glucose_curves_summary.csv";

/// Logs run statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &RunStats) {
    debug!("{:#?}", stats);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs the first `limit` rows as JSON. Nothing is logged for `limit == 0`.
pub fn preview<T: Serialize>(rows: &[T], limit: usize) -> Result<()> {
    if limit == 0 {
        return Ok(());
    }
    print_json(&&rows[..limit.min(rows.len())])
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
///
/// The header row comes from the serialized field names.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

/// Writes a gzip-compressed copy of `path` next to it as `<path>.gz`.
pub fn gzip_copy(path: &Path) -> Result<PathBuf> {
    let contents = fs::read(path)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&contents)?;
    let compressed = encoder.finish()?;

    let mut target = path.as_os_str().to_owned();
    target.push(".gz");
    let target = PathBuf::from(target);
    fs::write(&target, compressed)?;

    debug!(path = %target.display(), "Gzip copy written");
    Ok(target)
}
