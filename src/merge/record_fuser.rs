// ==========================================
// Expo Lead Fusion - Record Fuser
// ==========================================
// Responsibility: fuse exactly two records field-by-field, keeping
// conflicting values as numbered variants
// Invariant: lossless - every non-blank source value survives under
// the field name or a `field[N]` variant
// ==========================================

use crate::domain::record::{root_base, LeadRecord};
use crate::normalize::{normalize_website, values_equal};
use std::collections::BTreeSet;

/// Fields holding website URLs, where `http://x.com` and `www.x.com/`
/// are the same value for conflict purposes.
const WEBSITE_FIELDS: &[&str] = &["Website", "urls", "url"];

/// Conflict test for one field. Generic loose equality everywhere;
/// website fields additionally collapse when their canonical hosts
/// match, so scheme/`www.` spelling differences never spawn variants.
fn same_value(field: &str, v1: &str, v2: &str) -> bool {
    if values_equal(v1, v2) {
        return true;
    }
    if WEBSITE_FIELDS.contains(&root_base(field)) {
        let w1 = normalize_website(v1);
        if !w1.is_empty() && w1 == normalize_website(v2) {
            return true;
        }
    }
    false
}

/// Merge two records into one.
///
/// Per field (union of both records, sorted order):
/// - both blank: omitted;
/// - one side non-blank: that value;
/// - equal under the generic comparison: `r1`'s value;
/// - genuine conflict: `r1`'s value keeps the field name, `r2`'s value
///   lands on the first free `field[N]` slot (N >= 2).
///
/// Which side keeps the bare name depends on argument order; the value
/// multiset does not. Variant numbering across a left-to-right fold of
/// three or more records is order-dependent - consumers treat
/// `field[2]` and `field[3]` as interchangeable carriers, and tests
/// assert on value sets only.
///
/// Every insert probes for a free slot, so a conflict-allocated
/// variant can never overwrite a real `field[N]` arriving later in the
/// key iteration.
pub fn merge_two(r1: &LeadRecord, r2: &LeadRecord) -> LeadRecord {
    let mut merged = LeadRecord::new();

    let keys: BTreeSet<&str> = r1.field_names().chain(r2.field_names()).collect();

    for key in keys {
        match (r1.get(key), r2.get(key)) {
            (None, None) => {}
            (Some(v), None) | (None, Some(v)) => {
                merged.insert_preserving(key, v);
            }
            (Some(v1), Some(v2)) => {
                if same_value(key, v1, v2) {
                    merged.insert_preserving(key, v1);
                } else {
                    merged.insert_preserving(key, v1);
                    merged.insert_preserving(key, v2);
                }
            }
        }
    }

    merged
}
