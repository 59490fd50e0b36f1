// ==========================================
// Expo Lead Fusion - Enrichment Harness
// ==========================================
// Responsibility: bounded worker pool driving an injected company
// fetcher, with an explicit results buffer owned by the orchestrator
// Red line: the crawler/AI extractor itself is an external
// collaborator behind the CompanyFetcher seam - no network code here
// ==========================================

pub mod error;
pub mod fetcher;
pub mod results_buffer;
pub mod worker_pool;

// Re-export core types
pub use error::{EnrichError, EnrichResult};
pub use fetcher::CompanyFetcher;
pub use results_buffer::ResultsBuffer;
pub use worker_pool::EnrichmentRunner;
