//! Redis WorkerStateMirror implementation.

use super::error::MirrorError;
use super::pool::RedisPool;
use super::worker_key;
use crate::domain::jobs::WorkerRecord;
use crate::ports::repository::WorkerStateMirror;
use crate::ports::PortError;
use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;

#[async_trait]
impl WorkerStateMirror for RedisPool {
    async fn save_worker(&self, record: &WorkerRecord) -> Result<(), PortError> {
        let mut conn = self.pool.get().await.map_err(MirrorError::from)?;
        let json = serde_json::to_string(record).map_err(MirrorError::from)?;
        conn.set::<_, _, ()>(worker_key(&record.id), json)
            .await
            .map_err(MirrorError::from)?;
        Ok(())
    }
}
