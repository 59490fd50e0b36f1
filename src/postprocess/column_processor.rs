// ==========================================
// Expo Lead Fusion - Column Post-Processor
// ==========================================
// Responsibility: drop internal/empty columns, collapse synonyms,
// prune noise variants, split script-ambiguous fields, order columns
// Guarantee: never drops a row; never drops a non-empty column other
// than synonym sources, ambiguous sources and sparse variants
// ==========================================

use crate::domain::record::split_variant;
use crate::domain::table::{LeadTable, Row};
use crate::normalize::is_native_script;
use tracing::{debug, info};

/// Provenance/debug columns produced upstream, removed before export.
const INTERNAL_COLUMNS: &[&str] = &[
    "ocr_text",
    "AddressFA_translated",
    "CompanyNameFA_translated",
    "file_id",
    "file_name",
    "page",
    "DataSource",
];

/// Synonym collapse rules, processed in this order (later rules may
/// reference columns earlier ones created or emptied).
const SYNONYM_RULES: &[(&str, &str)] = &[
    ("urls", "Website"),
    ("phones", "Phone1"),
    ("phones[2]", "Phone2"),
    ("emails", "Email"),
    ("notes", "Description"),
];

/// Script-ambiguous source columns and their typed targets.
const SCRIPT_SPLITS: &[(&str, &str, &str)] = &[
    // (ambiguous source, Latin target, native-script target)
    ("company_names", "CompanyNameEN", "CompanyNameFA"),
    ("addresses", "AddressEN", "AddressFA"),
];

/// Canonical business columns, placed first in exactly this order.
const PRIORITY_COLUMNS: &[&str] = &[
    "CompanyNameEN",
    "CompanyNameFA",
    "Website",
    "Email",
    "Phone1",
    "Phone2",
    "Phone3",
    "Phone4",
    "ContactName",
    "PositionEN",
    "PositionFA",
    "AddressEN",
    "AddressFA",
    "City",
    "Country",
    "Industry",
    "ProductName",
    "ProductCategory",
    "Description",
    "Applications",
    "Brands",
    "Certifications",
    "ClientsPartners",
    "History",
    "Employees",
    "Markets",
];

// ==========================================
// ColumnProcessor
// ==========================================
pub struct ColumnProcessor {
    /// A `field[N]` column empty in more than this fraction of rows is
    /// treated as noise and dropped.
    sparse_variant_threshold: f64,
}

impl Default for ColumnProcessor {
    fn default() -> Self {
        Self {
            sparse_variant_threshold: 0.9,
        }
    }
}

impl ColumnProcessor {
    pub fn new(sparse_variant_threshold: f64) -> Self {
        Self {
            sparse_variant_threshold,
        }
    }

    /// Run the full cleanup chain. Each step consumes and returns a
    /// table; the row count is invariant across the whole chain.
    pub fn process(&self, table: LeadTable) -> LeadTable {
        let rows_in = table.n_rows();
        let cols_in = table.n_columns();

        let table = drop_internal_columns(table);
        let table = drop_empty_columns(table);
        let table = collapse_synonyms(table);
        let table = prune_sparse_variants(table, self.sparse_variant_threshold);
        let table = split_ambiguous_scripts(table);
        let table = order_columns(table);

        debug_assert_eq!(table.n_rows(), rows_in);
        info!(
            rows = table.n_rows(),
            columns_in = cols_in,
            columns_out = table.n_columns(),
            "column post-processing complete"
        );
        table
    }
}

/// Step 0: remove upstream provenance/debug columns.
fn drop_internal_columns(table: LeadTable) -> LeadTable {
    retain_columns(table, |name| !INTERNAL_COLUMNS.contains(&name))
}

/// Step 1: drop columns blank in every row.
fn drop_empty_columns(table: LeadTable) -> LeadTable {
    let empty: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| table.non_empty_count(c) == 0)
        .cloned()
        .collect();
    if !empty.is_empty() {
        debug!(count = empty.len(), "dropping empty columns");
    }
    retain_columns(table, |name| !empty.iter().any(|c| c == name))
}

/// Step 2: sequential synonym collapse. The target column is created
/// if absent, filled from the source wherever it is empty, and the
/// source column is dropped.
fn collapse_synonyms(table: LeadTable) -> LeadTable {
    let mut columns = table.columns().to_vec();
    let mut rows = table.rows().to_vec();

    for (old, new) in SYNONYM_RULES {
        if !columns.iter().any(|c| c == old) {
            continue;
        }
        debug!(from = old, to = new, "collapsing synonym column");

        if !columns.iter().any(|c| c == new) {
            columns.push((*new).to_string());
        }
        for row in &mut rows {
            if !row.contains_key(*new) {
                if let Some(value) = row.remove(*old) {
                    row.insert((*new).to_string(), value);
                }
            }
            row.remove(*old);
        }
        columns.retain(|c| c != old);
    }

    LeadTable::new(columns, rows)
}

/// Step 3: drop `field[N]` variant columns empty in more than
/// `threshold` of rows.
fn prune_sparse_variants(table: LeadTable, threshold: f64) -> LeadTable {
    if table.n_rows() == 0 {
        return table;
    }
    let n_rows = table.n_rows() as f64;
    let sparse: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| split_variant(c).1.is_some())
        .filter(|c| {
            let empty = n_rows - table.non_empty_count(c) as f64;
            empty / n_rows > threshold
        })
        .cloned()
        .collect();
    if !sparse.is_empty() {
        debug!(count = sparse.len(), "pruning sparse variant columns");
    }
    retain_columns(table, |name| !sparse.iter().any(|c| c == name))
}

/// Step 4: route script-ambiguous cells into their typed columns.
/// Native-script content goes to the FA column, Latin to the EN
/// column, filling only empty targets; the source column is dropped.
/// Both targets join the header even when no cell routes to them.
fn split_ambiguous_scripts(table: LeadTable) -> LeadTable {
    let mut columns = table.columns().to_vec();
    let mut rows = table.rows().to_vec();

    for (source, latin, native) in SCRIPT_SPLITS {
        if !columns.iter().any(|c| c == source) {
            continue;
        }
        debug!(column = source, "splitting script-ambiguous column");

        for target in [latin, native] {
            if !columns.iter().any(|c| c == target) {
                columns.push((*target).to_string());
            }
        }
        for row in &mut rows {
            if let Some(value) = row.remove(*source) {
                let target = if is_native_script(&value) { *native } else { *latin };
                row.entry(target.to_string()).or_insert(value);
            }
        }
        columns.retain(|c| c != source);
    }

    LeadTable::new(columns, rows)
}

/// Step 5: priority columns first, everything else alphabetically.
fn order_columns(table: LeadTable) -> LeadTable {
    let mut ordered: Vec<String> = PRIORITY_COLUMNS
        .iter()
        .filter(|p| table.has_column(p))
        .map(|p| (*p).to_string())
        .collect();
    let mut remaining: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| !PRIORITY_COLUMNS.contains(&c.as_str()))
        .cloned()
        .collect();
    remaining.sort();
    ordered.extend(remaining);

    LeadTable::new(ordered, table.rows().to_vec())
}

fn retain_columns(table: LeadTable, keep: impl Fn(&str) -> bool) -> LeadTable {
    let columns: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| keep(c))
        .cloned()
        .collect();
    let rows: Vec<Row> = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .filter(|(k, _)| keep(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .collect();
    LeadTable::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn table(columns: &[&str], rows: Vec<Row>) -> LeadTable {
        LeadTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn test_internal_columns_removed() {
        let t = table(
            &["file_id", "page", "Website", "ocr_text"],
            vec![row(&[
                ("file_id", "f1"),
                ("page", "1"),
                ("Website", "acme.com"),
                ("ocr_text", "noise"),
            ])],
        );
        let out = ColumnProcessor::default().process(t);
        assert_eq!(out.columns(), &["Website".to_string()]);
    }

    #[test]
    fn test_empty_columns_absent_from_output() {
        let t = table(
            &["Website", "Fax"],
            vec![
                row(&[("Website", "acme.com")]),
                row(&[("Website", "beta.ir")]),
            ],
        );
        let out = ColumnProcessor::default().process(t);
        assert!(!out.has_column("Fax"));
        assert_eq!(out.n_rows(), 2);
    }

    #[test]
    fn test_synonym_collapse_fills_only_empty_targets() {
        let t = table(
            &["urls", "Website"],
            vec![
                row(&[("urls", "beta.ir"), ("Website", "acme.com")]),
                row(&[("urls", "gamma.com")]),
            ],
        );
        let out = ColumnProcessor::default().process(t);

        assert!(!out.has_column("urls"));
        assert_eq!(out.cell(0, "Website"), Some("acme.com"));
        assert_eq!(out.cell(1, "Website"), Some("gamma.com"));
    }

    #[test]
    fn test_synonym_collapse_creates_missing_target() {
        let t = table(
            &["phones"],
            vec![row(&[("phones", "0911")]), row(&[("phones", "0912")])],
        );
        let out = ColumnProcessor::default().process(t);

        assert!(!out.has_column("phones"));
        assert_eq!(out.cell(0, "Phone1"), Some("0911"));
        assert_eq!(out.cell(1, "Phone1"), Some("0912"));
    }

    #[test]
    fn test_sparse_variants_pruned() {
        // Phone1[2] filled in 1 of 20 rows (95% empty) -> dropped;
        // Phone1 itself always kept
        let mut rows = vec![row(&[("Phone1", "0911"), ("Phone1[2]", "0912")])];
        for _ in 0..19 {
            rows.push(row(&[("Phone1", "0911")]));
        }
        let t = table(&["Phone1", "Phone1[2]"], rows);
        let out = ColumnProcessor::default().process(t);

        assert!(out.has_column("Phone1"));
        assert!(!out.has_column("Phone1[2]"));
        assert_eq!(out.n_rows(), 20);
    }

    #[test]
    fn test_dense_variants_survive() {
        let rows = vec![
            row(&[("Phone1", "0911"), ("Phone1[2]", "0912")]),
            row(&[("Phone1", "0921"), ("Phone1[2]", "0922")]),
        ];
        let t = table(&["Phone1", "Phone1[2]"], rows);
        let out = ColumnProcessor::default().process(t);
        assert!(out.has_column("Phone1[2]"));
    }

    #[test]
    fn test_script_split_routes_native_and_latin() {
        let t = table(
            &["company_names"],
            vec![
                row(&[("company_names", "شرکت الف")]),
                row(&[("company_names", "Acme Trading")]),
            ],
        );
        let out = ColumnProcessor::default().process(t);

        assert!(!out.has_column("company_names"));
        assert_eq!(out.cell(0, "CompanyNameFA"), Some("شرکت الف"));
        assert_eq!(out.cell(0, "CompanyNameEN"), None);
        assert_eq!(out.cell(1, "CompanyNameEN"), Some("Acme Trading"));
        assert_eq!(out.cell(1, "CompanyNameFA"), None);
    }

    #[test]
    fn test_script_split_never_overwrites_existing_target() {
        let t = table(
            &["company_names", "CompanyNameFA"],
            vec![row(&[
                ("company_names", "شرکت الف"),
                ("CompanyNameFA", "شرکت ب"),
            ])],
        );
        let out = ColumnProcessor::default().process(t);
        assert_eq!(out.cell(0, "CompanyNameFA"), Some("شرکت ب"));
    }

    #[test]
    fn test_column_ordering_priority_then_alphabetical() {
        let t = table(
            &["Zeta", "Website", "Alpha", "CompanyNameEN"],
            vec![row(&[
                ("Zeta", "z"),
                ("Website", "acme.com"),
                ("Alpha", "a"),
                ("CompanyNameEN", "Acme"),
            ])],
        );
        let out = ColumnProcessor::default().process(t);
        assert_eq!(
            out.columns(),
            &[
                "CompanyNameEN".to_string(),
                "Website".to_string(),
                "Alpha".to_string(),
                "Zeta".to_string(),
            ]
        );
    }

    #[test]
    fn test_row_count_invariant() {
        let rows: Vec<Row> = (0..7)
            .map(|i| row(&[("Website", &format!("s{}.com", i)), ("urls", "x.com")]))
            .collect();
        let t = table(&["Website", "urls", "empty_col"], rows);
        let out = ColumnProcessor::default().process(t);
        assert_eq!(out.n_rows(), 7);
    }
}
