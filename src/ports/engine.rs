use super::PortError;
use crate::domain::jobs::JobSpec;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EncodingEngine: Send + Sync {
    /// Run an encoding job to completion.
    /// Resolves once the job settles; nothing is returned on success.
    async fn submit(&self, spec: &JobSpec) -> Result<(), PortError>;
}
