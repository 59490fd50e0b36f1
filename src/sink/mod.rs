// ==========================================
// Expo Lead Fusion - Sink Layer
// ==========================================
// Responsibility: hand the final table to export targets
// Contract: consumes stable, duplicate-free column names as
// guaranteed by the column post-processor
// ==========================================

pub mod csv_export;
pub mod cumulative_sheet;
pub mod error;

use crate::domain::{ExportReport, LeadTable};

// Re-export core types
pub use csv_export::CsvExportSink;
pub use cumulative_sheet::CumulativeSheetSink;
pub use error::{SinkError, SinkResult};

// ==========================================
// TableSink trait
// ==========================================
// Implementors: CsvExportSink, CumulativeSheetSink
pub trait TableSink: Send + Sync {
    /// Sink name used in reports and logs.
    fn name(&self) -> &'static str;

    /// Write the table out. An empty table is an error - "no data
    /// produced" is the pipeline's only user-visible failure.
    fn export(&self, table: &LeadTable) -> SinkResult<ExportReport>;
}
