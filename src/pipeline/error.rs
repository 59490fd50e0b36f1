// ==========================================
// Expo Lead Fusion - Pipeline Error Types
// ==========================================
// Policy: recoverable conditions are absorbed with logged warnings;
// the pipeline fails hard only when no data can be produced at all
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no input data: both the extraction JSON and the sheet source are empty or absent")]
    NoData,

    #[error("internal task failure: {0}")]
    TaskError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
