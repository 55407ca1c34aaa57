use crate::domain::jobs::JobSpec;
use crate::ports::engine::EncodingEngine;
use crate::ports::PortError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Submits jobs to a remote encoding engine over HTTP. The job is considered
/// settled when the engine answers the request.
#[derive(Clone)]
pub struct HttpEncodingEngine {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    job: &'a Value,
    pipeline: &'a Value,
    encoding_profile: &'a Value,
}

impl HttpEncodingEngine {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EncodingEngine for HttpEncodingEngine {
    async fn submit(&self, spec: &JobSpec) -> Result<(), PortError> {
        debug!(endpoint = %self.endpoint, "submitting job");
        self.client
            .post(&self.endpoint)
            .json(&SubmitRequest {
                job: &spec.job,
                pipeline: &spec.pipeline,
                encoding_profile: &spec.encoding_profile,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
