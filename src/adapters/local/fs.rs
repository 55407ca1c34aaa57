use crate::ports::storage::ContentStore;
use crate::ports::PortError;
use async_trait::async_trait;
use std::path::Path;

/// Reads documents from the local filesystem. Accepts `file://` URLs and bare paths.
#[derive(Clone, Copy, Default)]
pub struct FsContentStore;

impl FsContentStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PortError> {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        Ok(bytes)
    }
}
