use super::PortError;
use crate::domain::jobs::WorkerRecord;
use async_trait::async_trait;

/// Write-behind persistence of worker state. Nothing is ever read back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkerStateMirror: Send + Sync {
    /// Store the latest record for a worker, replacing any previous one.
    async fn save_worker(&self, record: &WorkerRecord) -> Result<(), PortError>;
}
