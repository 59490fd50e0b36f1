// ==========================================
// Expo Lead Fusion - Lead Record
// ==========================================
// Responsibility: schema-less record shape for one page/row of
// extracted or scraped lead data
// Red line: only non-blank values are stored; the source tag is
// diagnostics-only and must never leak into output fields
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which pipeline produced a record. Logging/diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadSource {
    /// OCR + QR extraction JSON (Input A)
    Extraction,
    /// Spreadsheet rows, possibly web-enriched (Input B)
    Sheet,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Extraction => "extraction",
            LeadSource::Sheet => "sheet",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the N-th positional variant name for a base field.
///
/// `variant_name("Phone1", 2)` → `"Phone1[2]"`.
pub fn variant_name(base: &str, n: u32) -> String {
    format!("{}[{}]", base, n)
}

/// Strip every trailing `[N]` suffix: the base field a (possibly
/// chained) variant name ultimately belongs to.
///
/// `"Phone1[2][2]"` → `"Phone1"`.
pub fn root_base(name: &str) -> &str {
    let mut base = name;
    while let (shorter, Some(_)) = split_variant(base) {
        base = shorter;
    }
    base
}

/// Split a field name into its base and trailing variant index.
///
/// `"Phone1[2]"` → `("Phone1", Some(2))`; `"Phone1"` → `("Phone1", None)`.
/// A malformed suffix is treated as part of the base name.
pub fn split_variant(name: &str) -> (&str, Option<u32>) {
    if let Some(stripped) = name.strip_suffix(']') {
        if let Some(open) = stripped.rfind('[') {
            let digits = &stripped[open + 1..];
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(n) = digits.parse::<u32>() {
                    return (&name[..open], Some(n));
                }
            }
        }
    }
    (name, None)
}

// ==========================================
// LeadRecord - one page/row of lead fields
// ==========================================
// The field set is open-ended (AI-extracted fields vary by run), so
// this is an ordered mapping of field name -> value rather than a
// fixed struct. Positional variants are ordinary fields named
// `base[N]` (N >= 2).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    fields: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    source: Option<LeadSource>,
}

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: LeadSource) -> Self {
        Self {
            fields: BTreeMap::new(),
            source: Some(source),
        }
    }

    /// Field value, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Insert a field value. Blank values (empty/whitespace-only) are
    /// dropped so that absent and blank cells behave identically during
    /// fusion. The stored value is trimmed. Returns whether a value was
    /// actually stored.
    pub fn insert(&mut self, name: impl Into<String>, value: impl AsRef<str>) -> bool {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return false;
        }
        self.fields.insert(name.into(), trimmed.to_string());
        true
    }

    /// Insert under the first free slot of `name`, `name[2]`, `name[3]`…
    ///
    /// Used wherever a value must never overwrite an occupied field:
    /// positional explosion of list-valued inputs and conflict placement
    /// during fusion. Returns the field name actually used, or `None`
    /// for a blank value.
    pub fn insert_preserving(&mut self, name: &str, value: impl AsRef<str>) -> Option<String> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        if !self.fields.contains_key(name) {
            self.fields.insert(name.to_string(), trimmed.to_string());
            return Some(name.to_string());
        }
        let mut n = 2u32;
        loop {
            let candidate = variant_name(name, n);
            if !self.fields.contains_key(&candidate) {
                self.fields.insert(candidate.clone(), trimmed.to_string());
                return Some(candidate);
            }
            n += 1;
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All values stored under `base` and its variants (including
    /// chained ones like `base[2][2]`), bare name first, then variants
    /// in key order.
    pub fn values_for_base(&self, base: &str) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(v) = self.get(base) {
            out.push(v);
        }
        for (k, v) in &self.fields {
            if k != base && root_base(k) == base {
                out.push(v.as_str());
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn source(&self) -> Option<LeadSource> {
        self.source
    }

    pub fn set_source(&mut self, source: LeadSource) {
        self.source = Some(source);
    }

    /// Strip the provenance tag before a record crosses the core's
    /// output boundary.
    pub fn clear_source(&mut self) {
        self.source = None;
    }

    /// Consume into the underlying field map (used by materialization).
    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

impl FromIterator<(String, String)> for LeadRecord {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut record = LeadRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}
