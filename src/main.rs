// ==========================================
// Expo Lead Fusion - CLI Entry
// ==========================================
// Usage: expo-lead-fusion [extraction.json] [sheet.xlsx|.csv]
// Defaults: well-known file names inside the session directory
// (EXPO_SESSION_DIR or the per-user data dir)
// ==========================================

use expo_lead_fusion::pipeline::{LeadPipeline, LeadPipelineImpl};
use expo_lead_fusion::sink::{CsvExportSink, CumulativeSheetSink, TableSink};
use expo_lead_fusion::{logging, PipelineConfig, SessionPaths};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", expo_lead_fusion::APP_NAME);
    tracing::info!("version: {}", expo_lead_fusion::VERSION);
    tracing::info!("==================================================");

    let session = SessionPaths::resolve()?;
    let config = PipelineConfig::load_or_default(&session.base().join("config.json"));

    let mut args = std::env::args().skip(1);
    let extraction_json: PathBuf = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| session.extraction_json());
    let sheet_file: PathBuf = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| session.sheet_file());

    let sinks: Vec<Box<dyn TableSink>> = vec![
        Box::new(CsvExportSink::new(session.output_dir())),
        Box::new(CumulativeSheetSink::new(session.central_sheet())),
    ];

    let pipeline = LeadPipelineImpl::new(&config, sinks);
    let report = pipeline.run(&extraction_json, &sheet_file).await?;

    tracing::info!("==================================================");
    tracing::info!(
        "input: {} extraction + {} sheet records",
        report.extraction_records,
        report.sheet_records
    );
    tracing::info!(
        "groups: {} ({} merged, {} extraction-only, {} sheet-only)",
        report.merge_stats.groups,
        report.merge_stats.merged,
        report.merge_stats.extraction_only,
        report.merge_stats.sheet_only
    );
    tracing::info!(
        "output: {} rows x {} columns",
        report.final_rows,
        report.final_columns
    );
    for export in &report.exports {
        tracing::info!("exported [{}]: {}", export.sink, export.path.display());
    }
    for error in &report.export_errors {
        tracing::warn!("export failed: {}", error);
    }
    tracing::info!("elapsed: {} ms", report.elapsed_ms);
    tracing::info!("==================================================");

    Ok(())
}
