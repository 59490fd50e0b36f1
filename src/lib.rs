// ==========================================
// Expo Lead Fusion - Core Library
// ==========================================
// Purpose: merge heterogeneous exhibition-lead sources into one
// deduplicated table, one row per company/contact
// Core: record identity resolution + lossless field fusion
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - records, keys, tables, reports
pub mod domain;

// Value normalizer - canonical comparison forms
pub mod normalize;

// Merge core - identity extraction, fusion, grouping
pub mod merge;

// Post-processing - table-level column cleanup
pub mod postprocess;

// Loader layer - external source files
pub mod loader;

// Enrichment harness - worker pool over external producers
pub mod enrich;

// Sink layer - table exports
pub mod sink;

// Pipeline layer - end-to-end orchestration
pub mod pipeline;

// Configuration layer
pub mod config;

// Logging
pub mod logging;

// ==========================================
// Re-export core types
// ==========================================

pub use config::{PipelineConfig, SessionPaths};
pub use domain::{
    IdentityKey, KeyKind, LeadRecord, LeadSource, LeadTable, MergeStats, PipelineReport,
};
pub use enrich::{CompanyFetcher, EnrichmentRunner, ResultsBuffer};
pub use loader::{ExtractionJsonLoader, UniversalSheetParser};
pub use merge::{merge_two, IdentityExtractor, MergeEngine, MergeOutcome};
pub use pipeline::{LeadPipeline, LeadPipelineImpl, PipelineError};
pub use postprocess::ColumnProcessor;
pub use sink::{CsvExportSink, CumulativeSheetSink, TableSink};

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Application name
pub const APP_NAME: &str = "Expo Lead Fusion";
