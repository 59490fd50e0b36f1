// ==========================================
// Expo Lead Fusion - Company Fetcher Trait
// ==========================================
// Purpose: seam for the external crawl + AI-extraction producers
// Implementors: out-of-crate (HTTP crawler, LLM extractor); tests
// use stub fetchers
// ==========================================

use crate::domain::record::LeadRecord;
use crate::enrich::error::EnrichResult;

/// Produces one enrichment record for a company URL.
///
/// The returned record uses the same open-ended field vocabulary as
/// every other source (CompanyNameEN, Phone1, AddressFA, ...). The
/// harness adds the `url`/`status`/`error` bookkeeping fields itself.
pub trait CompanyFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> EnrichResult<LeadRecord>;
}
