// ==========================================
// Expo Lead Fusion - Identity Extractor
// ==========================================
// Responsibility: derive the single (kind, value) key that best
// identifies the entity behind one record
// Rule: first match wins, in strict priority order; an empty or
// whitespace-only candidate never counts as a match
// ==========================================

use crate::domain::record::LeadRecord;
use crate::domain::{IdentityKey, KeyKind};
use crate::normalize::{
    normalize_company_name, normalize_generic, normalize_phone, normalize_website,
};

/// Website-bearing fields, strongest alias first.
const WEBSITE_FIELDS: &[&str] = &["Website", "urls", "url"];

/// Phone-bearing fields, scanned in this exact order.
const PHONE_FIELDS: &[&str] = &[
    "phones", "Phone1", "Phone2", "Phone3", "Phone4", "WhatsApp", "Telegram", "Fax",
];

const EMAIL_FIELDS: &[&str] = &["Email", "emails"];

const COMPANY_FIELDS: &[&str] = &["CompanyNameEN", "CompanyNameFA", "company_names"];

// ==========================================
// IdentityExtractor
// ==========================================
pub struct IdentityExtractor {
    /// Minimum digit count for a phone to count as an identity signal.
    min_phone_digits: usize,
    /// Minimum normalized length for a company name to count
    /// (exclusive floor: normalized length must exceed it).
    min_company_len: usize,
}

impl Default for IdentityExtractor {
    fn default() -> Self {
        Self {
            min_phone_digits: 8,
            min_company_len: 3,
        }
    }
}

impl IdentityExtractor {
    pub fn new(min_phone_digits: usize, min_company_len: usize) -> Self {
        Self {
            min_phone_digits,
            min_company_len,
        }
    }

    /// Extract the strongest identity key a record's own content
    /// supports. Pure function of the record: re-running always yields
    /// the same key.
    ///
    /// Returns `None` when no field carries any signal - the grouping
    /// engine then assigns a per-run sequence key so the record still
    /// lands in exactly one group (see `MergeEngine`).
    pub fn extract(&self, record: &LeadRecord) -> Option<IdentityKey> {
        // 1. Website domain - the strongest cross-source signal
        for field in WEBSITE_FIELDS {
            if let Some(raw) = record.get(field) {
                let site = normalize_website(raw);
                if !site.is_empty() {
                    return Some(IdentityKey::new(KeyKind::Website, site));
                }
            }
        }

        // 2. Phone number with enough digits
        for field in PHONE_FIELDS {
            if let Some(raw) = record.get(field) {
                let phone = normalize_phone(raw);
                if phone.len() >= self.min_phone_digits {
                    return Some(IdentityKey::new(KeyKind::Phone, phone));
                }
            }
        }

        // 3. Email
        for field in EMAIL_FIELDS {
            if let Some(raw) = record.get(field) {
                let email = normalize_generic(raw);
                if email.contains('@') {
                    return Some(IdentityKey::new(KeyKind::Email, email));
                }
            }
        }

        // 4. Normalized company name
        for field in COMPANY_FIELDS {
            if let Some(raw) = record.get(field) {
                let name = normalize_company_name(raw);
                if name.chars().count() > self.min_company_len {
                    return Some(IdentityKey::new(KeyKind::Company, name));
                }
            }
        }

        // 5. File/page provenance as a last content-derived key
        if let (Some(file_id), Some(page)) = (record.get("file_id"), record.get("page")) {
            return Some(IdentityKey::unique(format!("{}_page{}", file_id, page)));
        }

        None
    }
}
