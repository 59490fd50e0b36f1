// ==========================================
// Expo Lead Fusion - CSV Export Sink
// ==========================================
// Responsibility: write the final table to a timestamped spreadsheet
// file in the session output directory
// ==========================================

use crate::domain::{ExportReport, LeadTable};
use crate::sink::error::{SinkError, SinkResult};
use crate::sink::TableSink;
use chrono::Local;
use std::path::PathBuf;
use tracing::info;

pub struct CsvExportSink {
    output_dir: PathBuf,
}

impl CsvExportSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn output_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        self.output_dir.join(format!("merged_final_{}.csv", stamp))
    }
}

impl TableSink for CsvExportSink {
    fn name(&self) -> &'static str {
        "csv_export"
    }

    fn export(&self, table: &LeadTable) -> SinkResult<ExportReport> {
        if table.is_empty() {
            return Err(SinkError::EmptyTable);
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path();

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(table.row_cells(row, table.columns()))?;
        }
        writer.flush()?;

        info!(
            path = %path.display(),
            rows = table.n_rows(),
            columns = table.n_columns(),
            "table exported"
        );

        Ok(ExportReport {
            sink: self.name().to_string(),
            path,
            rows_written: table.n_rows(),
            columns_written: table.n_columns(),
        })
    }
}
