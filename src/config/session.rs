// ==========================================
// Expo Lead Fusion - Session Paths
// ==========================================
// Responsibility: resolve the working directory one run reads from
// and writes into
// Resolution: EXPO_SESSION_DIR env override > per-user data dir >
// current directory fallback
// ==========================================

use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Env var overriding the session base directory (hosted runs set it).
pub const SESSION_DIR_ENV: &str = "EXPO_SESSION_DIR";

// Well-known file names inside a session
const EXTRACTION_JSON: &str = "mix_ocr_qr.json";
const SHEET_FILE: &str = "web_analysis.xlsx";
const SCRAPED_CHECKPOINT: &str = "scraped_data.json";
const CENTRAL_SHEET: &str = "central_sheet.csv";

#[derive(Debug, Clone)]
pub struct SessionPaths {
    base: PathBuf,
}

impl SessionPaths {
    /// Resolve and create the session layout.
    pub fn resolve() -> io::Result<Self> {
        let base = match std::env::var_os(SESSION_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .map(|d| d.join("expo-lead-fusion").join("session_current"))
                .unwrap_or_else(|| PathBuf::from("session_current")),
        };
        Self::at(base)
    }

    /// Use an explicit base directory (tests, embedding callers).
    pub fn at(base: impl Into<PathBuf>) -> io::Result<Self> {
        let base = base.into();
        std::fs::create_dir_all(&base)?;
        std::fs::create_dir_all(base.join("uploads"))?;
        std::fs::create_dir_all(base.join("logs"))?;
        info!(base = %base.display(), "session directory ready");
        Ok(Self { base })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.base.join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base.join("logs")
    }

    /// Output directory for exported tables (the session base itself).
    pub fn output_dir(&self) -> &Path {
        &self.base
    }

    /// Input A: OCR+QR merged extraction JSON.
    pub fn extraction_json(&self) -> PathBuf {
        self.base.join(EXTRACTION_JSON)
    }

    /// Input B: enriched spreadsheet.
    pub fn sheet_file(&self) -> PathBuf {
        self.base.join(SHEET_FILE)
    }

    /// Enrichment worker checkpoint file.
    pub fn scraped_checkpoint(&self) -> PathBuf {
        self.base.join(SCRAPED_CHECKPOINT)
    }

    /// Cumulative central sheet all runs append into.
    pub fn central_sheet(&self) -> PathBuf {
        self.base.join(CENTRAL_SHEET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_at_creates_layout() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("session");

        let session = SessionPaths::at(&base).unwrap();

        assert!(session.uploads_dir().is_dir());
        assert!(session.logs_dir().is_dir());
        assert_eq!(session.extraction_json(), base.join("mix_ocr_qr.json"));
        assert_eq!(session.sheet_file(), base.join("web_analysis.xlsx"));
    }
}
