//! Application layer - Worker pool, configuration cache and job dispatch.

pub mod config_cache;
pub mod pool;
pub mod service;
pub mod worker;

pub use config_cache::ConfigCache;
pub use pool::WorkerPool;
pub use service::AutoabrService;
pub use worker::{JobWorker, WorkerContext};
