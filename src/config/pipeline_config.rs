// ==========================================
// Expo Lead Fusion - Pipeline Configuration
// ==========================================
// Responsibility: run tunables with sane defaults; optional JSON
// overrides from the session directory
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Enrichment worker threads.
    pub worker_count: usize,

    /// `field[N]` columns empty in more than this fraction of rows
    /// are dropped as noise.
    pub sparse_variant_threshold: f64,

    /// Checkpoint the enrichment buffer after every N results.
    pub flush_every: usize,

    /// Minimum digits for a phone number to act as an identity key.
    pub min_phone_digits: usize,

    /// Exclusive floor on normalized company-name length for the
    /// company identity key.
    pub min_company_key_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: 5,
            sparse_variant_threshold: 0.9,
            flush_every: 1,
            min_phone_digits: 8,
            min_company_key_len: 3,
        }
    }
}

impl PipelineConfig {
    /// Read overrides from a JSON file; absent or unreadable files
    /// fall back to defaults with a warning, never an error.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
        {
            Ok(config) => {
                info!(path = %path.display(), "pipeline config loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.worker_count, 5);
        assert_eq!(config.min_phone_digits, 8);
        assert!((config.sparse_variant_threshold - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{"worker_count": 8}"#).unwrap();

        let config = PipelineConfig::load_or_default(f.path());
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.flush_every, 1);
    }

    #[test]
    fn test_unreadable_config_falls_back() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"not json").unwrap();

        let config = PipelineConfig::load_or_default(f.path());
        assert_eq!(config.worker_count, 5);
    }
}
