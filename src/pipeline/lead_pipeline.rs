// ==========================================
// Expo Lead Fusion - Lead Pipeline
// ==========================================
// Responsibility: integrate the full run from source files to sinks
// Flow: load A + B (concurrent) -> group & merge -> materialize ->
// column post-process -> export
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::record::LeadRecord;
use crate::domain::{LeadTable, PipelineReport};
use crate::loader::{ExtractionJsonLoader, LoadError, UniversalSheetParser};
use crate::merge::{IdentityExtractor, MergeEngine};
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::postprocess::ColumnProcessor;
use crate::sink::TableSink;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// LeadPipeline trait
// ==========================================
// Implementor: LeadPipelineImpl
#[async_trait::async_trait]
pub trait LeadPipeline: Send + Sync {
    /// Run the full pipeline over one session's source files.
    ///
    /// # Arguments
    /// - extraction_json: Input A path (OCR+QR merged JSON)
    /// - sheet_file: Input B path (.xlsx/.xls/.csv)
    ///
    /// # Returns
    /// - Ok(PipelineReport): run summary with merge stats and exports
    /// - Err(PipelineError::NoData): both sources empty or absent
    async fn run(
        &self,
        extraction_json: &Path,
        sheet_file: &Path,
    ) -> PipelineResult<PipelineReport>;
}

// ==========================================
// LeadPipelineImpl
// ==========================================
pub struct LeadPipelineImpl {
    engine: MergeEngine,
    column_processor: ColumnProcessor,
    sinks: Vec<Box<dyn TableSink>>,
}

impl LeadPipelineImpl {
    pub fn new(config: &PipelineConfig, sinks: Vec<Box<dyn TableSink>>) -> Self {
        let extractor =
            IdentityExtractor::new(config.min_phone_digits, config.min_company_key_len);
        Self {
            engine: MergeEngine::new(extractor),
            column_processor: ColumnProcessor::new(config.sparse_variant_threshold),
            sinks,
        }
    }
}

/// Load one source, absorbing every failure into an empty list with a
/// warning. Only the pipeline-level "both sources empty" check is
/// allowed to fail a run.
fn load_or_empty(
    label: &str,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<Vec<LeadRecord>, LoadError>,
) -> Vec<LeadRecord> {
    match load(path) {
        Ok(records) => records,
        Err(LoadError::FileNotFound(p)) => {
            warn!(source = label, path = %p, "source file missing; continuing without it");
            Vec::new()
        }
        Err(e) => {
            warn!(source = label, path = %path.display(), error = %e, "source unreadable; continuing without it");
            Vec::new()
        }
    }
}

#[async_trait::async_trait]
impl LeadPipeline for LeadPipelineImpl {
    #[instrument(skip(self, extraction_json, sheet_file), fields(run_id))]
    async fn run(
        &self,
        extraction_json: &Path,
        sheet_file: &Path,
    ) -> PipelineResult<PipelineReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());

        info!(
            extraction = %extraction_json.display(),
            sheet = %sheet_file.display(),
            "pipeline run started"
        );

        // === step 1: load both sources concurrently ===
        debug!("step 1: loading sources");
        let json_path: PathBuf = extraction_json.to_path_buf();
        let sheet_path: PathBuf = sheet_file.to_path_buf();

        let (extraction_records, sheet_records) = tokio::try_join!(
            tokio::task::spawn_blocking(move || {
                load_or_empty("extraction", &json_path, |p| ExtractionJsonLoader.load(p))
            }),
            tokio::task::spawn_blocking(move || {
                load_or_empty("sheet", &sheet_path, |p| UniversalSheetParser.parse(p))
            }),
        )
        .map_err(|e| PipelineError::TaskError(e.to_string()))?;

        let loaded_a = extraction_records.len();
        let loaded_b = sheet_records.len();
        info!(extraction = loaded_a, sheet = loaded_b, "sources loaded");

        if loaded_a == 0 && loaded_b == 0 {
            return Err(PipelineError::NoData);
        }

        // === step 2: group & merge ===
        debug!("step 2: grouping and merging");
        let outcome = self.engine.merge_sources(extraction_records, sheet_records);
        let merge_stats = outcome.stats.clone();

        // === step 3: materialize + post-process ===
        debug!("step 3: materializing table");
        let table = LeadTable::from_records(outcome.records);
        let table = self.column_processor.process(table);

        // === step 4: export ===
        debug!("step 4: exporting");
        let mut exports = Vec::new();
        let mut export_errors = Vec::new();
        for sink in &self.sinks {
            match sink.export(&table) {
                Ok(report) => exports.push(report),
                Err(e) => {
                    warn!(sink = sink.name(), error = %e, "sink export failed");
                    export_errors.push(format!("{}: {}", sink.name(), e));
                }
            }
        }

        let report = PipelineReport {
            run_id,
            started_at,
            elapsed_ms: timer.elapsed().as_millis() as u64,
            extraction_records: loaded_a,
            sheet_records: loaded_b,
            merge_stats,
            final_rows: table.n_rows(),
            final_columns: table.n_columns(),
            exports,
            export_errors,
        };

        info!(
            rows = report.final_rows,
            columns = report.final_columns,
            merged_groups = report.merge_stats.merged,
            exports = report.exports.len(),
            elapsed_ms = report.elapsed_ms,
            "pipeline run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_both_sources_absent_is_no_data() {
        let pipeline = LeadPipelineImpl::new(&PipelineConfig::default(), Vec::new());
        let err = pipeline
            .run(Path::new("missing.json"), Path::new("missing.xlsx"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoData));
    }
}
