//! Redis connection pool.

use super::error::MirrorError;
use deadpool_redis::{Config, Pool, Runtime};

/// Redis-backed adapter for the worker-state mirror.
#[derive(Clone)]
pub struct RedisPool {
    pub(super) pool: Pool,
}

impl RedisPool {
    /// Create a new RedisPool with connection pool. Connections are opened lazily.
    pub fn new(redis_url: &str) -> Result<Self, MirrorError> {
        let cfg = Config::from_url(redis_url);
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }
}
