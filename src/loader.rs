//! Reads `bio.csv` and the participant files from a zip archive or a directory.

use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{CurveError, Result};
use crate::parser::{parse_bio, parse_participant_id, parse_series};
use crate::records::Dataset;
use crate::schema::Schema;

/// A named table inside a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Location inside the source, used to read the entry.
    pub path: String,
    /// Final path component, used for matching.
    pub file_name: String,
}

/// Somewhere the input tables can be listed and read from.
pub trait TableSource {
    fn entries(&self) -> Vec<Entry>;

    fn read(&mut self, entry: &Entry) -> Result<Vec<u8>>;
}

/// Files directly inside a directory.
pub struct DirectorySource {
    root: PathBuf,
    entries: Vec<Entry>,
}

impl DirectorySource {
    pub fn open(root: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(root)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = dir_entry.file_name().to_str() {
                entries.push(Entry {
                    path: name.to_string(),
                    file_name: name.to_string(),
                });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }
}

impl TableSource for DirectorySource {
    fn entries(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    fn read(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        Ok(fs::read(self.root.join(&entry.path))?)
    }
}

/// Members of a zip archive, matched by file name regardless of folder.
pub struct ArchiveSource<R: Read + std::io::Seek> {
    archive: ZipArchive<R>,
}

impl ArchiveSource<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            archive: ZipArchive::new(file)?,
        })
    }
}

impl ArchiveSource<Cursor<Vec<u8>>> {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(Cursor::new(bytes))?,
        })
    }
}

impl<R: Read + std::io::Seek> TableSource for ArchiveSource<R> {
    fn entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(|name| Entry {
                path: name.to_string(),
                file_name: name.rsplit('/').next().unwrap_or(name).to_string(),
            })
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    fn read(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        let mut member = self.archive.by_name(&entry.path)?;
        let mut contents = Vec::new();
        member.read_to_end(&mut contents)?;
        Ok(contents)
    }
}

/// Opens `path` as a directory or zip archive and loads the full dataset.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_dataset(path: &Path, schema: &Schema) -> Result<Dataset> {
    if !path.exists() {
        return Err(CurveError::missing_file(path.display().to_string()));
    }

    if path.is_dir() {
        debug!("Reading tables from directory");
        load_from(&mut DirectorySource::open(path)?, schema)
    } else {
        debug!("Reading tables from zip archive");
        load_from(&mut ArchiveSource::open(path)?, schema)
    }
}

/// Loads the bio table and every participant series from a source.
///
/// Participant series are returned ordered by id.
pub fn load_from<S: TableSource>(source: &mut S, schema: &Schema) -> Result<Dataset> {
    let entries = source.entries();

    let bio_entry = entries
        .iter()
        .find(|e| e.file_name == schema.bio_file)
        .ok_or_else(|| CurveError::missing_file(schema.bio_file.clone()))?;
    let bio_bytes = source.read(bio_entry)?;
    let biometrics = parse_bio(bio_bytes.as_slice(), &bio_entry.path, schema)?;

    let mut participant_entries = entries
        .iter()
        .filter(|e| schema.is_series_file(&e.file_name))
        .map(|e| -> Result<_> { Ok((parse_participant_id(&e.file_name)?, e)) })
        .collect::<Result<Vec<_>>>()?;

    if participant_entries.is_empty() {
        return Err(CurveError::missing_file(format!(
            "{}*{}",
            schema.series_prefix, schema.series_extension
        )));
    }
    participant_entries.sort_by(|(a_id, a), (b_id, b)| a_id.cmp(b_id).then(a.path.cmp(&b.path)));

    let mut series = Vec::with_capacity(participant_entries.len());
    for (participant_id, entry) in participant_entries {
        let bytes = source.read(entry)?;
        series.push(parse_series(bytes.as_slice(), &entry.path, participant_id, schema)?);
    }

    let dataset = Dataset { biometrics, series };
    info!(
        participants = dataset.series.len(),
        biometric_records = dataset.biometrics.len(),
        samples = dataset.sample_count(),
        "Dataset loaded"
    );
    Ok(dataset)
}
