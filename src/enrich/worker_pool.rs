// ==========================================
// Expo Lead Fusion - Enrichment Worker Pool
// ==========================================
// Responsibility: fan a URL work queue across a fixed number of
// worker threads, funnel results through the shared buffer
// Contract: every queued URL is answered exactly once; a failed fetch
// becomes an error-marked record, never a batch abort
// ==========================================

use crate::domain::record::LeadRecord;
use crate::enrich::error::{EnrichError, EnrichResult};
use crate::enrich::fetcher::CompanyFetcher;
use crate::enrich::results_buffer::ResultsBuffer;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

// ==========================================
// EnrichmentRunner
// ==========================================
pub struct EnrichmentRunner {
    worker_count: usize,
}

impl Default for EnrichmentRunner {
    fn default() -> Self {
        Self { worker_count: 5 }
    }
}

impl EnrichmentRunner {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
        }
    }

    /// Drain `urls` through the fetcher and return the buffer's
    /// records in completion order. The merge engine downstream is
    /// order-independent, so worker interleaving is immaterial.
    pub fn run<F: CompanyFetcher>(
        &self,
        urls: &[String],
        fetcher: &F,
        buffer: ResultsBuffer,
    ) -> EnrichResult<Vec<LeadRecord>> {
        if urls.is_empty() {
            return Ok(buffer.into_records());
        }

        let (tx, rx) = crossbeam_channel::unbounded::<String>();
        for url in urls {
            tx.send(url.clone()).expect("queue open while filling");
        }
        drop(tx);

        let shared = Arc::new(Mutex::new(buffer));
        let workers = self.worker_count.min(urls.len());
        info!(urls = urls.len(), workers, "enrichment started");

        std::thread::scope(|scope| {
            for worker_id in 0..workers {
                let rx = rx.clone();
                let shared = Arc::clone(&shared);
                scope.spawn(move || {
                    while let Ok(url) = rx.recv() {
                        debug!(worker_id, url = %url, "fetching");
                        let record = match fetcher.fetch(&url) {
                            Ok(mut record) => {
                                record.insert("url", &url);
                                record.insert("status", "SUCCESS");
                                record
                            }
                            Err(e) => {
                                warn!(worker_id, url = %url, error = %e, "fetch failed");
                                error_record(&url, &e)
                            }
                        };

                        // one lock guards both the append and any
                        // checkpoint flush it triggers
                        match shared.lock() {
                            Ok(mut guard) => {
                                if let Err(e) = guard.push(record) {
                                    warn!(url = %url, error = %e, "checkpoint flush failed");
                                }
                            }
                            Err(poisoned) => {
                                warn!(url = %url, "buffer lock poisoned; recovering");
                                let _ = poisoned.into_inner().push(error_record(
                                    &url,
                                    &EnrichError::LockError("poisoned".to_string()),
                                ));
                            }
                        }
                    }
                });
            }
        });

        let buffer = Arc::try_unwrap(shared)
            .map_err(|_| EnrichError::LockError("buffer still shared after join".to_string()))?
            .into_inner()
            .map_err(|e| EnrichError::LockError(e.to_string()))?;

        info!(results = buffer.len(), "enrichment finished");
        Ok(buffer.into_records())
    }
}

fn error_record(url: &str, error: &EnrichError) -> LeadRecord {
    let mut record = LeadRecord::new();
    record.insert("url", url);
    record.insert("status", "FAILED");
    record.insert("error", error.to_string());
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        calls: AtomicUsize,
    }

    impl CompanyFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> EnrichResult<LeadRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("down") {
                return Err(EnrichError::FetchError {
                    url: url.to_string(),
                    message: "CONNECTION_ERROR".to_string(),
                });
            }
            let mut r = LeadRecord::new();
            r.insert("Website", url);
            r.insert("Industry", "steel");
            Ok(r)
        }
    }

    #[test]
    fn test_every_url_answered_exactly_once() {
        let urls: Vec<String> = (0..17).map(|i| format!("https://s{}.com", i)).collect();
        let fetcher = StubFetcher {
            calls: AtomicUsize::new(0),
        };

        let results = EnrichmentRunner::new(5)
            .run(&urls, &fetcher, ResultsBuffer::new())
            .unwrap();

        assert_eq!(results.len(), 17);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 17);

        let answered: BTreeSet<&str> = results.iter().filter_map(|r| r.get("url")).collect();
        assert_eq!(answered.len(), 17);
    }

    #[test]
    fn test_failed_fetch_yields_error_record() {
        let urls = vec!["https://down.example".to_string()];
        let fetcher = StubFetcher {
            calls: AtomicUsize::new(0),
        };

        let results = EnrichmentRunner::new(2)
            .run(&urls, &fetcher, ResultsBuffer::new())
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].get("status"), Some("FAILED"));
        assert!(results[0].get("error").unwrap().contains("CONNECTION_ERROR"));
    }

    #[test]
    fn test_empty_url_list() {
        let fetcher = StubFetcher {
            calls: AtomicUsize::new(0),
        };
        let results = EnrichmentRunner::default()
            .run(&[], &fetcher, ResultsBuffer::new())
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_checkpoint_written_during_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scraped_data.json");
        let urls: Vec<String> = (0..4).map(|i| format!("https://s{}.com", i)).collect();
        let fetcher = StubFetcher {
            calls: AtomicUsize::new(0),
        };

        let results = EnrichmentRunner::new(2)
            .run(&urls, &fetcher, ResultsBuffer::with_checkpoint(&path, 1))
            .unwrap();

        assert_eq!(results.len(), 4);
        let parsed: Vec<LeadRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 4);
    }
}
