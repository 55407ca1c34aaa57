use super::fs::FsContentStore;
use crate::ports::storage::ContentStore;
use crate::ports::PortError;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends `s3://` URLs to the object store and everything else to the filesystem.
#[derive(Clone)]
pub struct RoutingContentStore {
    object_store: Option<Arc<dyn ContentStore>>,
    fs: FsContentStore,
}

impl RoutingContentStore {
    pub fn new(object_store: Option<Arc<dyn ContentStore>>) -> Self {
        Self {
            object_store,
            fs: FsContentStore::new(),
        }
    }
}

#[async_trait]
impl ContentStore for RoutingContentStore {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PortError> {
        if url.starts_with("s3://") {
            return match &self.object_store {
                Some(store) => store.fetch(url).await,
                None => Err(format!("no object store configured for {}", url).into()),
            };
        }
        self.fs.fetch(url).await
    }
}
