use thiserror::Error;

/// Errors raised while loading, transforming, or writing glucose curve data.
#[derive(Error, Debug)]
pub enum CurveError {
    #[error("Missing file: {0}")]
    MissingFile(String),

    #[error("Malformed participant file name: {0}")]
    MalformedFilename(String),

    #[error("Schema mismatch: column '{column}' not found in {file}")]
    SchemaMismatch { file: String, column: String },

    #[error("Aggregation produced no rows")]
    EmptyResult,

    #[error("Invalid value '{value}' in {file} row {row}, column '{column}'")]
    InvalidValue {
        file: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CurveError>;

impl CurveError {
    /// Create a schema mismatch error for a column absent from a file
    pub fn schema_mismatch(file: impl Into<String>, column: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            file: file.into(),
            column: column.into(),
        }
    }

    /// Create a missing file error from a name or pattern
    pub fn missing_file(name: impl Into<String>) -> Self {
        Self::MissingFile(name.into())
    }
}
