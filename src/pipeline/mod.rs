// ==========================================
// Expo Lead Fusion - Pipeline Layer
// ==========================================
// Responsibility: end-to-end orchestration, load -> merge ->
// materialize -> post-process -> export
// ==========================================

pub mod error;
pub mod lead_pipeline;

// Re-export core types
pub use error::{PipelineError, PipelineResult};
pub use lead_pipeline::{LeadPipeline, LeadPipelineImpl};
