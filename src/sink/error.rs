// ==========================================
// Expo Lead Fusion - Sink Error Types
// ==========================================
// Tool: thiserror derive macros
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("nothing to export: table has no rows")]
    EmptyTable,

    #[error("write failed: {0}")]
    WriteError(String),

    #[error("existing sheet unreadable: {0}")]
    SheetReadError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::WriteError(err.to_string())
    }
}

impl From<csv::Error> for SinkError {
    fn from(err: csv::Error) -> Self {
        SinkError::WriteError(err.to_string())
    }
}

pub type SinkResult<T> = Result<T, SinkError>;
