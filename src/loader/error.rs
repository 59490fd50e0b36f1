// ==========================================
// Expo Lead Fusion - Loader Error Types
// ==========================================
// Tool: thiserror derive macros
// ==========================================

use thiserror::Error;

/// Loader error taxonomy.
#[derive(Error, Debug)]
pub enum LoadError {
    // ===== file errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    // ===== format errors =====
    #[error("JSON parse failed: {0}")]
    JsonParseError(String),

    #[error("unexpected JSON shape: {0}")]
    JsonShapeError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::FileReadError(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::JsonParseError(err.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::CsvParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for LoadError {
    fn from(err: calamine::XlsxError) -> Self {
        LoadError::ExcelParseError(err.to_string())
    }
}

/// Result alias for the loader layer.
pub type LoadResult<T> = Result<T, LoadError>;
