//! Redis adapter for local deployment.
//!
//! Provides the Redis-backed `WorkerStateMirror`: every worker record is
//! stored as JSON under `autoabr:worker:<id>`.

mod error;
mod mirror;
mod pool;

pub use error::MirrorError;
pub use pool::RedisPool;

/// Redis key constants
const WORKER_KEY_PREFIX: &str = "autoabr:worker:";

fn worker_key(id: &str) -> String {
    format!("{}{}", WORKER_KEY_PREFIX, id)
}
