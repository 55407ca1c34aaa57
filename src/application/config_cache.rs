//! Memoized configuration documents keyed by source URL.
//!
//! Entries never expire; only [`ConfigCache::clear`] drops them. Callers must
//! treat the document behind a URL as immutable for the lifetime of the
//! process, otherwise stale documents will be served.

use crate::error::{AutoabrError, AutoabrResult};
use crate::ports::storage::ContentStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;
use tracing::debug;

type Entry = Arc<OnceCell<Arc<Value>>>;

pub struct ConfigCache {
    store: Arc<dyn ContentStore>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl ConfigCache {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached document for `url`, fetching and parsing it on first use.
    ///
    /// Concurrent callers for the same brand-new URL share a single fetch. A failed
    /// fetch is not cached.
    pub async fn get_or_fetch(&self, url: &str) -> AutoabrResult<Arc<Value>> {
        let entry = self.entries().entry(url.to_string()).or_default().clone();

        if let Some(document) = entry.get() {
            debug!(url, "configuration cache hit");
            return Ok(document.clone());
        }

        let fetched = entry
            .get_or_try_init(|| async {
                debug!(url, "configuration cache miss, fetching");
                let bytes = self
                    .store
                    .fetch(url)
                    .await
                    .map_err(|e| AutoabrError::config_fetch(url, e))?;
                let document: Value = serde_json::from_slice(&bytes)
                    .map_err(|e| AutoabrError::config_fetch(url, format!("invalid JSON: {}", e)))?;
                Ok::<_, AutoabrError>(Arc::new(document))
            })
            .await;

        match fetched {
            Ok(document) => Ok(document.clone()),
            Err(e) => {
                let mut entries = self.entries();
                if entries
                    .get(url)
                    .is_some_and(|current| Arc::ptr_eq(current, &entry) && !current.initialized())
                {
                    entries.remove(url);
                }
                Err(e)
            }
        }
    }

    /// Drop every cached document. Fetches already in flight finish into the
    /// discarded entries and are not visible afterwards.
    pub fn clear(&self) {
        let mut entries = self.entries();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "configuration cache cleared");
    }

    /// Number of documents currently cached.
    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|entry| entry.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
