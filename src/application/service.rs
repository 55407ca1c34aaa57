use super::config_cache::ConfigCache;
use super::pool::WorkerPool;
use crate::domain::jobs::{CreateJobRequest, JobResult, JobSpec, QualityModel, WorkerSnapshot};
use crate::domain::profiles::{default_encoding_profile, default_pipeline};
use crate::error::{AutoabrError, AutoabrResult};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Entry point for job creation and result queries.
pub struct AutoabrService {
    pool: WorkerPool,
    cache: ConfigCache,
}

impl AutoabrService {
    pub fn new(pool: WorkerPool, cache: ConfigCache) -> Self {
        Self { pool, cache }
    }

    /// Resolve configuration, reserve a worker and start the job without waiting for it.
    ///
    /// Nothing is reserved or started if validation or a configuration fetch fails.
    pub async fn create_job(&self, request: CreateJobRequest) -> AutoabrResult<WorkerSnapshot> {
        let job = match request.job {
            Some(job) if !job.is_null() => job,
            _ => return Err(AutoabrError::validation("Missing job")),
        };

        let pipeline = self
            .resolve_document(request.pipeline_url.as_deref(), default_pipeline)
            .await?;
        let encoding_profile = self
            .resolve_document(request.encoding_settings_url.as_deref(), default_encoding_profile)
            .await?;

        let worker = self.pool.acquire(None)?;
        if let Err(e) = worker.create_job(JobSpec::new(job, pipeline, encoding_profile)) {
            worker.release();
            return Err(e);
        }
        info!(worker = %worker.id(), "job dispatched");
        Ok(worker.snapshot())
    }

    pub fn workers(&self) -> BTreeMap<usize, WorkerSnapshot> {
        self.pool.snapshot()
    }

    pub fn worker(&self, id: &str) -> AutoabrResult<WorkerSnapshot> {
        self.pool
            .get(id)
            .map(|worker| worker.snapshot())
            .ok_or_else(|| AutoabrError::WorkerNotFound(id.to_string()))
    }

    /// Scores for `output`. Runs on the named worker, or on a spare worker that
    /// leaves the pool untouched.
    pub async fn job_result(
        &self,
        output: &str,
        model: Option<QualityModel>,
        worker_id: Option<&str>,
    ) -> AutoabrResult<JobResult> {
        let worker = match worker_id {
            Some(id) => self.pool.acquire(Some(id))?,
            None => self.pool.spare(),
        };
        worker.get_result(Some(output), model).await
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("configuration cache cleared");
    }

    async fn resolve_document(&self, url: Option<&str>, fallback: fn() -> Value) -> AutoabrResult<Value> {
        match url.filter(|url| !url.is_empty()) {
            Some(url) => Ok(Value::clone(&*self.cache.get_or_fetch(url).await?)),
            None => Ok(fallback()),
        }
    }
}
