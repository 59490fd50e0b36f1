// ==========================================
// Expo Lead Fusion - Grouping & Merge Engine
// ==========================================
// Responsibility: partition records from both sources into identity
// groups and fold each group through the record fuser
// Invariant: every input record lands in exactly one group; the
// source tag never survives into the output
// ==========================================

use crate::domain::record::{LeadRecord, LeadSource};
use crate::domain::{IdentityKey, MergeStats};
use crate::merge::identity_extractor::IdentityExtractor;
use crate::merge::record_fuser::merge_two;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info};

// ==========================================
// MergeOutcome
// ==========================================
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Merged or passed-through records, one per identity group, in
    /// first-appearance group order. Downstream applies its own
    /// ordering; nothing here is contractual.
    pub records: Vec<LeadRecord>,
    pub stats: MergeStats,
}

// ==========================================
// MergeEngine
// ==========================================
pub struct MergeEngine {
    extractor: IdentityExtractor,
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self {
            extractor: IdentityExtractor::default(),
        }
    }
}

impl MergeEngine {
    pub fn new(extractor: IdentityExtractor) -> Self {
        Self { extractor }
    }

    /// Group and fuse records from the two sources.
    ///
    /// Bucketing keeps encounter order: all of source A in its own
    /// order, then all of source B. Within a group the fold runs
    /// left-to-right through `merge_two`, so the earliest-encountered
    /// value wins the bare field name deterministically.
    ///
    /// Records carrying no identity signal at all get a per-run
    /// sequence key (`record#N` by encounter index) instead of a
    /// memory-identity key, so a rerun over the same input reproduces
    /// the same groups.
    pub fn merge_sources(
        &self,
        extraction_records: Vec<LeadRecord>,
        sheet_records: Vec<LeadRecord>,
    ) -> MergeOutcome {
        let total_in = extraction_records.len() + sheet_records.len();

        // bucket index by rendered key, buckets in first-appearance order
        let mut bucket_of: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Vec<LeadRecord>> = Vec::new();

        let tagged = extraction_records
            .into_iter()
            .map(|r| (LeadSource::Extraction, r))
            .chain(sheet_records.into_iter().map(|r| (LeadSource::Sheet, r)));

        for (ordinal, (source, mut record)) in tagged.enumerate() {
            record.set_source(source);

            let key = self
                .extractor
                .extract(&record)
                .unwrap_or_else(|| IdentityKey::unique(format!("record#{}", ordinal)));

            match bucket_of.entry(key.bucket_key()) {
                Entry::Occupied(entry) => {
                    debug!(key = %key, "record joins existing group");
                    groups[*entry.get()].push(record);
                }
                Entry::Vacant(entry) => {
                    entry.insert(groups.len());
                    groups.push(vec![record]);
                }
            }
        }

        debug_assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), total_in);

        let mut stats = MergeStats {
            groups: groups.len(),
            ..MergeStats::default()
        };

        let mut records = Vec::with_capacity(groups.len());
        for group in groups {
            if group.len() == 1 {
                let mut record = group.into_iter().next().expect("group of size 1");
                match record.source() {
                    Some(LeadSource::Extraction) => stats.extraction_only += 1,
                    Some(LeadSource::Sheet) => stats.sheet_only += 1,
                    None => {}
                }
                record.clear_source();
                records.push(record);
            } else {
                stats.merged += 1;
                debug!(size = group.len(), "folding group");

                let mut iter = group.into_iter();
                let mut merged = iter.next().expect("non-empty group");
                merged.clear_source();
                for mut next in iter {
                    next.clear_source();
                    merged = merge_two(&merged, &next);
                }
                records.push(merged);
            }
        }

        info!(
            groups = stats.groups,
            extraction_only = stats.extraction_only,
            sheet_only = stats.sheet_only,
            merged = stats.merged,
            "grouping complete"
        );

        MergeOutcome { records, stats }
    }
}
