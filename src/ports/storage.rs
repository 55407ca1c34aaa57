use super::PortError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the raw bytes of the document identified by `url`.
    /// Fails on missing or forbidden objects.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PortError>;
}
