// ==========================================
// Expo Lead Fusion - Extraction JSON Loader
// ==========================================
// Responsibility: flatten the OCR+QR merged JSON into one record per
// page (Input A)
// Shape: [{file_id, file_name, result}] where result is a field map
// (single image) or an array of {page, result} (multi-page PDF)
// ==========================================

use crate::domain::record::LeadRecord;
use crate::loader::error::{LoadError, LoadResult};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

pub struct ExtractionJsonLoader;

impl ExtractionJsonLoader {
    /// Load and flatten an extraction JSON file.
    ///
    /// Non-object array entries and malformed page objects are skipped
    /// with a warning - a partially-usable file still yields records.
    pub fn load(&self, path: &Path) -> LoadResult<Vec<LeadRecord>> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;

        let items = value
            .as_array()
            .ok_or_else(|| LoadError::JsonShapeError("top level is not an array".to_string()))?;

        let mut records = Vec::new();
        for (idx, item) in items.iter().enumerate() {
            let Some(obj) = item.as_object() else {
                warn!(index = idx, "skipping non-object extraction entry");
                continue;
            };

            let file_id = scalar_string(obj.get("file_id"));
            let file_name = scalar_string(obj.get("file_name"));

            match obj.get("result") {
                // multi-page PDF case: array of {page, result}
                Some(Value::Array(pages)) => {
                    for page_obj in pages {
                        let Some(page_map) = page_obj.as_object() else {
                            warn!(index = idx, "skipping non-object page entry");
                            continue;
                        };
                        let page = scalar_string(page_map.get("page"));
                        let Some(Value::Object(fields)) = page_map.get("result") else {
                            warn!(index = idx, page = %page, "skipping page without field map");
                            continue;
                        };
                        if let Some(record) =
                            build_record(&file_id, &file_name, &page, fields.iter())
                        {
                            records.push(record);
                        }
                    }
                }
                // single image case: the field map sits directly on the item
                Some(Value::Object(fields)) => {
                    if let Some(record) = build_record(&file_id, &file_name, "1", fields.iter()) {
                        records.push(record);
                    }
                }
                _ => {
                    warn!(index = idx, "skipping entry without usable result");
                }
            }
        }

        info!(path = %path.display(), records = records.len(), "extraction JSON loaded");
        Ok(records)
    }
}

/// Build one page record. List-valued fields explode positionally into
/// `field`, `field[2]`, `field[3]`… Null and blank values are dropped.
/// Returns `None` when nothing beyond the page tags survives.
fn build_record<'a>(
    file_id: &str,
    file_name: &str,
    page: &str,
    fields: impl Iterator<Item = (&'a String, &'a Value)>,
) -> Option<LeadRecord> {
    let mut record = LeadRecord::new();

    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = value_text(item) {
                        record.insert_preserving(key, &text);
                    }
                }
            }
            other => {
                if let Some(text) = value_text(other) {
                    record.insert(key.clone(), text);
                }
            }
        }
    }

    if record.is_empty() {
        return None;
    }

    // page tags: read by the identity fallback key, stripped again by
    // the column post-processor before export
    record.insert("file_id", file_id);
    record.insert("file_name", file_name);
    record.insert("page", page);
    Some(record)
}

/// Scalar JSON value rendered as text; objects/arrays yield `None`.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_string(value: Option<&Value>) -> String {
    value.and_then(value_text).unwrap_or_default()
}
