// ==========================================
// Expo Lead Fusion - Lead Table
// ==========================================
// Responsibility: tabular materialization of merged records
// (one row per record, one column per distinct field name)
// Red line: immutable shape - post-processing builds new tables
// instead of mutating columns in place
// ==========================================

use crate::domain::record::LeadRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row: column name -> cell value. Blank cells are absent.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl LeadTable {
    /// Build a table from explicit parts. Duplicate column names keep
    /// their first occurrence; cells under dropped duplicates are
    /// discarded with the column.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let columns: Vec<String> = columns
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .collect();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.retain(|k, v| seen.contains(k) && !v.trim().is_empty());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Materialize merged records: columns are the union of field names
    /// in first-appearance order, rows keep each record's fields.
    pub fn from_records(records: Vec<LeadRecord>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let fields = record.into_fields();
            for name in fields.keys() {
                if seen.insert(name.clone()) {
                    columns.push(name.clone());
                }
            }
            rows.push(fields);
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column)).map(String::as_str)
    }

    /// Count of rows with a non-blank cell in `column`.
    pub fn non_empty_count(&self, column: &str) -> usize {
        self.rows.iter().filter(|r| r.contains_key(column)).count()
    }

    /// Render a row as cells aligned to a header (blank for absent),
    /// used by the sinks.
    pub fn row_cells(&self, row: &Row, header: &[String]) -> Vec<String> {
        header
            .iter()
            .map(|col| row.get(col).cloned().unwrap_or_default())
            .collect()
    }
}
