// ==========================================
// Expo Lead Fusion - Cumulative Sheet Sink
// ==========================================
// Responsibility: append runs into one central sheet with header
// reconciliation - union of existing and new columns, blank backfill
// of old rows for newly-introduced columns
// Note: local stand-in for the remote-sheet append target; the
// reconciliation contract is the same
// ==========================================

use crate::domain::{ExportReport, LeadTable};
use crate::sink::error::{SinkError, SinkResult};
use crate::sink::TableSink;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct CumulativeSheetSink {
    sheet_path: PathBuf,
}

impl CumulativeSheetSink {
    pub fn new(sheet_path: impl Into<PathBuf>) -> Self {
        Self {
            sheet_path: sheet_path.into(),
        }
    }

    /// Existing header and rows, or empty when the sheet does not
    /// exist yet.
    fn read_existing(&self) -> SinkResult<(Vec<String>, Vec<Vec<String>>)> {
        if !self.sheet_path.exists() {
            return Ok((Vec::new(), Vec::new()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.sheet_path)
            .map_err(|e| SinkError::SheetReadError(e.to_string()))?;

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| SinkError::SheetReadError(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SinkError::SheetReadError(e.to_string()))?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok((header, rows))
    }
}

impl TableSink for CumulativeSheetSink {
    fn name(&self) -> &'static str {
        "cumulative_sheet"
    }

    fn export(&self, table: &LeadTable) -> SinkResult<ExportReport> {
        if table.is_empty() {
            return Err(SinkError::EmptyTable);
        }

        let (existing_header, existing_rows) = self.read_existing()?;

        // union header: existing order first, new columns appended
        let mut header = existing_header.clone();
        for column in table.columns() {
            if !header.iter().any(|c| c == column) {
                header.push(column.clone());
            }
        }
        let new_columns = header.len() - existing_header.len();
        if new_columns > 0 && !existing_header.is_empty() {
            debug!(new_columns, "reconciling header with new columns");
        }

        if let Some(parent) = self.sheet_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // rewrite through a temp file, then swap into place
        let temp_path = self.sheet_path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&temp_path)?;
            writer.write_record(&header)?;

            // old rows, blank-backfilled for newly-introduced columns
            for row in &existing_rows {
                let mut cells: Vec<String> = Vec::with_capacity(header.len());
                cells.extend(row.iter().take(existing_header.len()).cloned());
                cells.resize(header.len(), String::new());
                writer.write_record(&cells)?;
            }

            // new rows projected onto the union header
            for row in table.rows() {
                writer.write_record(table.row_cells(row, &header))?;
            }
            writer.flush()?;
        }
        std::fs::rename(&temp_path, &self.sheet_path)?;

        info!(
            path = %self.sheet_path.display(),
            appended = table.n_rows(),
            total = existing_rows.len() + table.n_rows(),
            columns = header.len(),
            "central sheet updated"
        );

        Ok(ExportReport {
            sink: self.name().to_string(),
            path: self.sheet_path.clone(),
            rows_written: table.n_rows(),
            columns_written: header.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Row;
    use tempfile::tempdir;

    fn table(columns: &[&str], rows: Vec<Vec<(&str, &str)>>) -> LeadTable {
        LeadTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|pairs| {
                    pairs
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<Row>()
                })
                .collect(),
        )
    }

    #[test]
    fn test_first_append_creates_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("central_sheet.csv");
        let sink = CumulativeSheetSink::new(&path);

        let report = sink
            .export(&table(
                &["Website", "Phone1"],
                vec![vec![("Website", "acme.com"), ("Phone1", "0911")]],
            ))
            .unwrap();

        assert_eq!(report.rows_written, 1);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Website,Phone1\n"));
    }

    #[test]
    fn test_new_columns_backfill_old_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("central_sheet.csv");
        let sink = CumulativeSheetSink::new(&path);

        sink.export(&table(
            &["Website"],
            vec![vec![("Website", "acme.com")]],
        ))
        .unwrap();

        sink.export(&table(
            &["Website", "Email"],
            vec![vec![("Website", "beta.ir"), ("Email", "x@beta.ir")]],
        ))
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Website,Email");
        // old row backfilled with a blank for the new column
        assert_eq!(lines[1], "acme.com,");
        assert_eq!(lines[2], "beta.ir,x@beta.ir");
    }

    #[test]
    fn test_existing_header_order_is_preserved_as_prefix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("central_sheet.csv");
        let sink = CumulativeSheetSink::new(&path);

        sink.export(&table(
            &["Phone1", "Website"],
            vec![vec![("Phone1", "0911"), ("Website", "acme.com")]],
        ))
        .unwrap();

        // the second run orders its columns differently
        sink.export(&table(
            &["Website", "Phone1"],
            vec![vec![("Website", "beta.ir"), ("Phone1", "0912")]],
        ))
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Phone1,Website");
        assert_eq!(lines[2], "0912,beta.ir");
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let dir = tempdir().unwrap();
        let sink = CumulativeSheetSink::new(dir.path().join("s.csv"));
        assert!(matches!(
            sink.export(&LeadTable::default()).unwrap_err(),
            SinkError::EmptyTable
        ));
    }
}
