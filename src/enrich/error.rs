// ==========================================
// Expo Lead Fusion - Enrichment Error Types
// ==========================================
// Tool: thiserror derive macros
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    // ===== fetcher-side errors (produced by external collaborators) =====
    #[error("fetch failed for {url}: {message}")]
    FetchError { url: String, message: String },

    // ===== harness errors =====
    #[error("results buffer lock poisoned: {0}")]
    LockError(String),

    #[error("checkpoint flush failed: {0}")]
    FlushError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for EnrichError {
    fn from(err: std::io::Error) -> Self {
        EnrichError::FlushError(err.to_string())
    }
}

impl From<serde_json::Error> for EnrichError {
    fn from(err: serde_json::Error) -> Self {
        EnrichError::FlushError(err.to_string())
    }
}

pub type EnrichResult<T> = Result<T, EnrichError>;
