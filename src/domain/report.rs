// ==========================================
// Expo Lead Fusion - Run Reports
// ==========================================
// Responsibility: diagnostics carried out of the merge engine and
// the pipeline (never semantic input to any stage)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ==========================================
// MergeStats - grouping diagnostics
// ==========================================
// Counts how many final groups originated from one vs several
// records, split by source for the size-1 case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Total identity groups formed.
    pub groups: usize,
    /// Size-1 groups whose record came from the extraction JSON.
    pub extraction_only: usize,
    /// Size-1 groups whose record came from the spreadsheet.
    pub sheet_only: usize,
    /// Groups of size >= 2 folded through the fuser.
    pub merged: usize,
}

// ==========================================
// ExportReport - one sink's outcome
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub sink: String,
    pub path: PathBuf,
    pub rows_written: usize,
    pub columns_written: usize,
}

// ==========================================
// PipelineReport - end-to-end run summary
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,

    pub extraction_records: usize,
    pub sheet_records: usize,
    pub merge_stats: MergeStats,

    pub final_rows: usize,
    pub final_columns: usize,

    pub exports: Vec<ExportReport>,
    /// Sinks that failed; the run itself still counts as (partial)
    /// success when at least the merge produced rows.
    pub export_errors: Vec<String>,
}
