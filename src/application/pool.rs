//! Growable pool of job workers. Workers are never removed.

use super::worker::{JobWorker, WorkerContext};
use crate::domain::jobs::WorkerSnapshot;
use crate::error::{AutoabrError, AutoabrResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

pub struct WorkerPool {
    ctx: Arc<WorkerContext>,
    workers: Mutex<Vec<Arc<JobWorker>>>,
}

impl WorkerPool {
    pub fn new(ctx: Arc<WorkerContext>) -> Self {
        Self {
            ctx,
            workers: Mutex::new(Vec::new()),
        }
    }

    /// With an id, return that worker whatever its state.
    /// Without one, reserve the first INACTIVE worker in creation order, or grow
    /// the pool by one reserved worker if none is available.
    ///
    /// The scan and the reservation happen under the pool lock, so concurrent
    /// callers never receive the same worker.
    pub fn acquire(&self, id: Option<&str>) -> AutoabrResult<Arc<JobWorker>> {
        let mut workers = self.workers();

        if let Some(id) = id {
            return workers
                .iter()
                .find(|worker| worker.id() == id)
                .cloned()
                .ok_or_else(|| AutoabrError::WorkerNotFound(id.to_string()));
        }

        for worker in workers.iter() {
            if worker.try_reserve() {
                return Ok(worker.clone());
            }
        }

        let worker = Arc::new(JobWorker::new(self.ctx.clone()));
        worker.try_reserve();
        workers.push(worker.clone());
        info!(worker = %worker.id(), pool_size = workers.len(), "worker pool grew");
        Ok(worker)
    }

    /// Worker handle that is never added to the pool, for one-off result
    /// queries that must not grow it.
    pub fn spare(&self) -> Arc<JobWorker> {
        Arc::new(JobWorker::new(self.ctx.clone()))
    }

    pub fn get(&self, id: &str) -> Option<Arc<JobWorker>> {
        self.workers()
            .iter()
            .find(|worker| worker.id() == id)
            .cloned()
    }

    /// State of every worker keyed by its position in creation order.
    pub fn snapshot(&self) -> BTreeMap<usize, WorkerSnapshot> {
        let workers = self.workers().clone();
        workers
            .iter()
            .enumerate()
            .map(|(index, worker)| (index, worker.snapshot()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.workers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn workers(&self) -> MutexGuard<'_, Vec<Arc<JobWorker>>> {
        self.workers.lock().unwrap_or_else(|e| e.into_inner())
    }
}
