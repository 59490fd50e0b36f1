// ==========================================
// Expo Lead Fusion - Results Buffer
// ==========================================
// Responsibility: accumulate worker results and checkpoint them to
// disk periodically
// Invariant: one writer lock (held by the caller) guards both the
// append and the flush - workers never interleave partial writes
// ==========================================

use crate::domain::record::LeadRecord;
use crate::enrich::error::EnrichResult;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ResultsBuffer {
    records: Vec<LeadRecord>,
    checkpoint_path: Option<PathBuf>,
    /// Flush after every N appends; 1 = checkpoint on every result
    /// (the original's behavior).
    flush_every: usize,
    appends_since_flush: usize,
}

impl ResultsBuffer {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            checkpoint_path: None,
            flush_every: 1,
            appends_since_flush: 0,
        }
    }

    pub fn with_checkpoint(path: impl AsRef<Path>, flush_every: usize) -> Self {
        Self {
            records: Vec::new(),
            checkpoint_path: Some(path.as_ref().to_path_buf()),
            flush_every: flush_every.max(1),
            appends_since_flush: 0,
        }
    }

    /// Append one result and checkpoint when due.
    pub fn push(&mut self, record: LeadRecord) -> EnrichResult<()> {
        self.records.push(record);
        self.appends_since_flush += 1;
        if self.checkpoint_path.is_some() && self.appends_since_flush >= self.flush_every {
            self.flush()?;
        }
        Ok(())
    }

    /// Write the full accumulated list to the checkpoint file.
    pub fn flush(&mut self) -> EnrichResult<()> {
        if let Some(path) = &self.checkpoint_path {
            let json = serde_json::to_string_pretty(&self.records)?;
            std::fs::write(path, json)?;
            self.appends_since_flush = 0;
            debug!(records = self.records.len(), path = %path.display(), "buffer checkpointed");
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<LeadRecord> {
        self.records
    }
}

impl Default for ResultsBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(url: &str) -> LeadRecord {
        let mut r = LeadRecord::new();
        r.insert("url", url);
        r
    }

    #[test]
    fn test_push_without_checkpoint() {
        let mut buffer = ResultsBuffer::new();
        buffer.push(record("https://acme.com")).unwrap();
        buffer.push(record("https://beta.ir")).unwrap();
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scraped_data.json");

        let mut buffer = ResultsBuffer::with_checkpoint(&path, 1);
        buffer.push(record("https://acme.com")).unwrap();
        buffer.push(record("https://beta.ir")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<LeadRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].get("url"), Some("https://acme.com"));
    }

    #[test]
    fn test_flush_every_batches_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scraped_data.json");

        let mut buffer = ResultsBuffer::with_checkpoint(&path, 3);
        buffer.push(record("a.com")).unwrap();
        buffer.push(record("b.com")).unwrap();
        assert!(!path.exists());

        buffer.push(record("c.com")).unwrap();
        assert!(path.exists());
    }
}
