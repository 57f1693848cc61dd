//! CSV parsers for the bio table and participant time series.

use chrono::NaiveDateTime;
use csv::StringRecord;
use std::collections::BTreeMap;
use std::io::Read;
use tracing::debug;

use crate::error::{CurveError, Result};
use crate::records::{BiometricRecord, Macros, ParticipantId, ParticipantSeries, TimeSeriesSample};
use crate::schema::Schema;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Extracts the participant id from a file name such as `CGMacros-03.csv`.
///
/// The id is the text after the last `-` up to the first `.`.
///
/// # Errors
///
/// Returns [`CurveError::MalformedFilename`] when that text is not an integer.
pub fn parse_participant_id(file_name: &str) -> Result<ParticipantId> {
    let tail = file_name.rsplit('-').next().unwrap_or(file_name);
    let stem = tail.split('.').next().unwrap_or(tail);

    stem.parse::<ParticipantId>()
        .map_err(|_| CurveError::MalformedFilename(file_name.to_string()))
}

/// Parses `bio.csv` into one record per row.
pub fn parse_bio<R: Read>(reader: R, file: &str, schema: &Schema) -> Result<Vec<BiometricRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let cols = schema.resolve_bio(rdr.headers()?, file)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let cell = Cell::new(&row, file);

        let participant_id = cell.participant_id(cols.participant_id, &schema.participant_id)?;
        let glycemic_marker = cell.number(cols.glycemic_marker, &schema.glycemic_marker)?;
        let attributes = cols
            .attributes
            .iter()
            .filter_map(|(i, name)| row.get(*i).map(|v| (name.clone(), v.trim().to_string())))
            .collect::<BTreeMap<_, _>>();

        records.push(BiometricRecord {
            participant_id,
            glycemic_marker,
            attributes,
        });
    }

    debug!(file, rows = records.len(), "Parsed biometric table");
    Ok(records)
}

/// Parses one participant time series and sorts it by timestamp.
pub fn parse_series<R: Read>(
    reader: R,
    file: &str,
    participant_id: ParticipantId,
    schema: &Schema,
) -> Result<ParticipantSeries> {
    let mut rdr = csv::Reader::from_reader(reader);
    let cols = schema.resolve_series(rdr.headers()?, file)?;
    let macro_names = schema.macro_names();

    let mut samples = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let cell = Cell::new(&row, file);

        let mut macros = [None; 5];
        for (slot, (&idx, name)) in macros.iter_mut().zip(cols.macros.iter().zip(macro_names)) {
            *slot = cell.number(idx, name)?;
        }

        samples.push(TimeSeriesSample {
            timestamp: cell.timestamp(cols.timestamp, &schema.timestamp)?,
            libre_glucose: cell.number(cols.libre_glucose, &schema.libre_glucose)?,
            dexcom_glucose: cell.number(cols.dexcom_glucose, &schema.dexcom_glucose)?,
            heart_rate: cell.number(cols.heart_rate, &schema.heart_rate)?,
            macros: Macros::from_array(macros),
            meal_type: cell.text(cols.meal_type),
        });
    }

    debug!(file, participant_id, rows = samples.len(), "Parsed participant series");
    Ok(ParticipantSeries::new(participant_id, samples))
}

/// Parses a timestamp in one of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Typed access to the cells of one CSV row, reporting the row on failure.
struct Cell<'a> {
    row: &'a StringRecord,
    file: &'a str,
}

impl<'a> Cell<'a> {
    fn new(row: &'a StringRecord, file: &'a str) -> Self {
        Self { row, file }
    }

    fn raw(&self, idx: usize) -> Option<&'a str> {
        self.row
            .get(idx)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn invalid(&self, column: &str, value: &str) -> CurveError {
        CurveError::InvalidValue {
            file: self.file.to_string(),
            row: self.row.position().map(|p| p.line() as usize).unwrap_or(0),
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn text(&self, idx: usize) -> Option<String> {
        self.raw(idx)?;
        self.row.get(idx).map(str::to_string)
    }

    fn number(&self, idx: usize, column: &str) -> Result<Option<f64>> {
        let Some(value) = self.raw(idx) else {
            return Ok(None);
        };
        match value.parse::<f64>() {
            Ok(n) if n.is_nan() => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(_) => Err(self.invalid(column, value)),
        }
    }

    fn participant_id(&self, idx: usize, column: &str) -> Result<ParticipantId> {
        let value = self.raw(idx).ok_or_else(|| self.invalid(column, ""))?;
        if let Ok(id) = value.parse::<ParticipantId>() {
            return Ok(id);
        }
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n.fract() == 0.0 => Ok(n as ParticipantId),
            _ => Err(self.invalid(column, value)),
        }
    }

    fn timestamp(&self, idx: usize, column: &str) -> Result<NaiveDateTime> {
        let value = self.raw(idx).unwrap_or("");
        parse_timestamp(value).ok_or_else(|| self.invalid(column, value))
    }
}
