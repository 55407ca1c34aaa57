//! A single job slot: runs at most one encoding job or one result query at a time.

use crate::domain::jobs::{JobResult, JobSpec, QualityModel, WorkerRecord, WorkerSnapshot, WorkerState};
use crate::error::{AutoabrError, AutoabrResult};
use crate::ports::engine::EncodingEngine;
use crate::ports::repository::WorkerStateMirror;
use crate::ports::scores::ScoreSource;
use futures::future::try_join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Collaborators shared by every worker of a pool.
pub struct WorkerContext {
    pub engine: Arc<dyn EncodingEngine>,
    pub scores: Arc<dyn ScoreSource>,
    pub mirror: Option<Arc<dyn WorkerStateMirror>>,
    /// Base of score locations, e.g. `s3://vmaf-files/results/encoded-files`.
    pub score_root: String,
}

impl WorkerContext {
    /// Location holding the scores of `folder` for `model`.
    pub fn score_location(&self, folder: &str, model: QualityModel) -> String {
        format!(
            "{}/{}/{}/",
            self.score_root.trim_end_matches('/'),
            folder.trim_matches('/'),
            model
        )
    }
}

/// Mutable part of a worker. `job_in_flight` and `query_in_flight` are the two
/// guards that make a worker ACTIVE; either one blocks the other.
#[derive(Debug, Default)]
struct Slot {
    reserved: bool,
    job_in_flight: bool,
    query_in_flight: bool,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    spec: Option<JobSpec>,
    last_output: Option<String>,
}

impl Slot {
    fn state(&self) -> WorkerState {
        if self.job_in_flight || self.query_in_flight {
            WorkerState::Active
        } else if self.reserved {
            WorkerState::Idle
        } else {
            WorkerState::Inactive
        }
    }

    fn elapsed(&self) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        if self.job_in_flight {
            return started_at.elapsed();
        }
        self.finished_at
            .map(|finished_at| finished_at.saturating_duration_since(started_at))
            .unwrap_or(Duration::ZERO)
    }
}

pub struct JobWorker {
    id: String,
    ctx: Arc<WorkerContext>,
    slot: Mutex<Slot>,
}

impl std::fmt::Debug for JobWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobWorker")
            .field("id", &self.id)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl JobWorker {
    pub fn new(ctx: Arc<WorkerContext>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ctx,
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> WorkerState {
        self.slot().state()
    }

    /// Output folder of the most recent job.
    pub fn last_output(&self) -> Option<String> {
        self.slot().last_output.clone()
    }

    /// Reserve an INACTIVE worker for a new job. Returns false, leaving the worker
    /// untouched, if it is reserved or busy.
    pub fn try_reserve(&self) -> bool {
        let mut slot = self.slot();
        if slot.state() != WorkerState::Inactive {
            return false;
        }
        slot.reserved = true;
        true
    }

    /// Give back a reservation that was not used for a job.
    pub fn release(&self) {
        let mut slot = self.slot();
        if !slot.job_in_flight {
            slot.reserved = false;
        }
    }

    /// Wall time of the current job if one is running, else of the last finished one.
    /// Zero if no job ever ran.
    pub fn elapsed(&self) -> Duration {
        self.slot().elapsed()
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        let slot = self.slot();
        WorkerSnapshot {
            id: self.id.clone(),
            status: slot.state(),
            job_output: slot.last_output.clone(),
            running_time: millis(slot.elapsed()),
        }
    }

    /// Start a job on this reserved worker and return without waiting for it.
    ///
    /// The submission runs on a spawned task which marks the worker INACTIVE
    /// again once the engine settles, successfully or not. Failures are logged only.
    /// Mirror writes for the start and the settlement happen on that same task,
    /// in that order.
    pub fn create_job(self: &Arc<Self>, spec: JobSpec) -> AutoabrResult<()> {
        let started = {
            let mut slot = self.slot();
            if !slot.reserved || slot.job_in_flight || slot.query_in_flight {
                return Err(AutoabrError::WorkerBusy(self.id.clone()));
            }
            slot.reserved = false;
            slot.job_in_flight = true;
            slot.started_at = Some(Instant::now());
            slot.last_output = spec.output_location();
            slot.spec = Some(spec.clone());
            self.record_of(&slot)
        };
        info!(worker = %self.id, output = ?self.last_output(), "job started");

        let worker = Arc::clone(self);
        tokio::spawn(async move {
            worker.mirror(started).await;
            let outcome = worker.ctx.engine.submit(&spec).await;
            let (elapsed, settled) = worker.finish_job();
            match outcome {
                Ok(()) => info!(worker = %worker.id, elapsed_ms = millis(elapsed), "job finished"),
                Err(e) => error!(
                    worker = %worker.id,
                    elapsed_ms = millis(elapsed),
                    error = %e,
                    "job failed"
                ),
            }
            worker.mirror(settled).await;
        });

        Ok(())
    }

    /// Collect the scores of `output_folder` (default: the last job's output),
    /// for one model or for every known model.
    ///
    /// Returns an empty result without querying unless the worker is INACTIVE,
    /// or if no folder can be resolved. A reserved worker counts as busy since a
    /// job is about to start on it. The query itself keeps the worker ACTIVE, so
    /// no job can start on it meanwhile.
    pub async fn get_result(
        &self,
        output_folder: Option<&str>,
        model: Option<QualityModel>,
    ) -> AutoabrResult<JobResult> {
        let folder = {
            let mut slot = self.slot();
            if slot.state() != WorkerState::Inactive {
                debug!(worker = %self.id, state = %slot.state(), "worker busy, returning empty result");
                return Ok(JobResult::new());
            }
            let Some(folder) = output_folder
                .map(str::to_owned)
                .or_else(|| slot.last_output.clone())
            else {
                return Ok(JobResult::new());
            };
            slot.query_in_flight = true;
            folder
        };
        let _query = scopeguard::guard((), |_| {
            self.slot().query_in_flight = false;
        });

        let models = match model {
            Some(model) => vec![model],
            None => QualityModel::ALL.to_vec(),
        };

        let lookups = models.into_iter().map(|model| {
            let location = self.ctx.score_location(&folder, model);
            async move {
                debug!(worker = %self.id, %location, "fetching scores");
                self.ctx
                    .scores
                    .scores(&location)
                    .await
                    .map(|entries| (model, entries))
                    .map_err(|e| AutoabrError::score_fetch(location, e))
            }
        });
        let fetched = try_join_all(lookups).await?;

        let mut by_model = BTreeMap::new();
        for (model, entries) in fetched {
            let scores = entries
                .into_iter()
                .map(|entry| (entry.filename, entry.score))
                .collect::<BTreeMap<_, _>>();
            by_model.insert(model.to_string(), scores);
        }

        let mut result = JobResult::new();
        result.insert(folder, by_model);
        Ok(result)
    }

    fn finish_job(&self) -> (Duration, WorkerRecord) {
        let mut slot = self.slot();
        slot.finished_at = Some(Instant::now());
        slot.job_in_flight = false;
        (slot.elapsed(), self.record_of(&slot))
    }

    fn record_of(&self, slot: &Slot) -> WorkerRecord {
        let (job, pipeline, profile) = match &slot.spec {
            Some(spec) => (
                spec.job.clone(),
                spec.pipeline.clone(),
                spec.encoding_profile.clone(),
            ),
            None => (Value::Null, Value::Null, Value::Null),
        };
        WorkerRecord {
            id: self.id.clone(),
            status: slot.state(),
            job_data: job,
            pipeline_data: pipeline,
            encoding_profile_data: profile,
            job_timer: millis(slot.elapsed()),
        }
    }

    /// Write-behind copy of `record`; failures never reach the worker.
    async fn mirror(&self, record: WorkerRecord) {
        let Some(mirror) = self.ctx.mirror.as_ref() else {
            return;
        };
        if let Err(e) = mirror.save_worker(&record).await {
            warn!(worker = %record.id, error = %e, "failed to mirror worker state");
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
