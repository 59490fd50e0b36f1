// ==========================================
// Expo Lead Fusion - Sheet Parser
// ==========================================
// Responsibility: spreadsheet rows into lead records (Input B)
// Supports: Excel (.xlsx/.xls) / CSV (.csv)
// Rule: blank cells are omitted from the record, not kept as empty
// strings, so one-sided fusion behaves correctly downstream
// ==========================================

use crate::domain::record::LeadRecord;
use crate::loader::error::{LoadError, LoadResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::info;

// ==========================================
// SheetParser trait
// ==========================================
// Implementors: CsvSheetParser, ExcelSheetParser
pub trait SheetParser: Send + Sync {
    /// Parse a spreadsheet file into lead records, one per non-empty
    /// row. Duplicate header names keep their first occurrence.
    fn parse_records(&self, file_path: &Path) -> LoadResult<Vec<LeadRecord>>;
}

/// Headers trimmed; later duplicates masked (first column wins).
fn effective_headers(raw: Vec<String>) -> Vec<Option<String>> {
    let mut seen = std::collections::HashSet::new();
    raw.into_iter()
        .map(|h| {
            let trimmed = h.trim().to_string();
            if trimmed.is_empty() || !seen.insert(trimmed.clone()) {
                None
            } else {
                Some(trimmed)
            }
        })
        .collect()
}

/// Zip one row of cells against the headers; blank cells dropped.
fn row_to_record(headers: &[Option<String>], cells: impl Iterator<Item = String>) -> LeadRecord {
    let mut record = LeadRecord::new();
    for (header, value) in headers.iter().zip(cells) {
        if let Some(name) = header {
            record.insert(name.clone(), value);
        }
    }
    record
}

// ==========================================
// CSV parser
// ==========================================
pub struct CsvSheetParser;

impl SheetParser for CsvSheetParser {
    fn parse_records(&self, file_path: &Path) -> LoadResult<Vec<LeadRecord>> {
        if !file_path.exists() {
            return Err(LoadError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // tolerate ragged rows
            .from_reader(file);

        let headers = effective_headers(
            reader
                .headers()?
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let record = row_to_record(&headers, row.iter().map(|v| v.to_string()));
            if !record.is_empty() {
                records.push(record);
            }
        }

        Ok(records)
    }
}

// ==========================================
// Excel parser
// ==========================================
pub struct ExcelSheetParser;

impl SheetParser for ExcelSheetParser {
    fn parse_records(&self, file_path: &Path) -> LoadResult<Vec<LeadRecord>> {
        if !file_path.exists() {
            return Err(LoadError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(LoadError::ExcelParseError(
                "workbook has no sheets".to_string(),
            ));
        }
        let sheet_name = sheet_names[0].clone();
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| LoadError::ExcelParseError("sheet has no header row".to_string()))?;

        let headers = effective_headers(header_row.iter().map(|cell| cell.to_string()).collect());

        let mut records = Vec::new();
        for data_row in rows {
            let record = row_to_record(&headers, data_row.iter().map(|cell| cell.to_string()));
            if !record.is_empty() {
                records.push(record);
            }
        }

        Ok(records)
    }
}

// ==========================================
// Universal parser (extension dispatch)
// ==========================================
pub struct UniversalSheetParser;

impl UniversalSheetParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> LoadResult<Vec<LeadRecord>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let records = match ext.as_str() {
            "csv" => CsvSheetParser.parse_records(path),
            "xlsx" | "xls" => ExcelSheetParser.parse_records(path),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }?;

        info!(path = %path.display(), records = records.len(), "sheet loaded");
        Ok(records)
    }
}
