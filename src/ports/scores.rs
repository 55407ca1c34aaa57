use super::PortError;
use crate::domain::jobs::ScoreEntry;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreSource: Send + Sync {
    /// List the scores stored under `location` (e.g. `s3://bucket/results/job/HD/`).
    /// A location with nothing under it yields an empty list, not an error.
    async fn scores(&self, location: &str) -> Result<Vec<ScoreEntry>, PortError>;
}
