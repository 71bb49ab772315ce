//! Realtime change notifications for section writes.
//!
//! Subscribers (the browser, via a push gateway) only use these to invalidate
//! cached reads, so publishing is best-effort: a Redis failure is logged and
//! never fails the write that triggered it.

use redis::AsyncCommands;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperation {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionChange {
    pub table: &'static str,
    pub resume_id: Uuid,
    pub row_id: Uuid,
    pub operation: ChangeOperation,
}

/// Channel a user's clients subscribe to.
pub fn channel_for(user_id: Uuid) -> String {
    format!("resume_changes:{user_id}")
}

#[derive(Clone)]
pub struct ChangeNotifier {
    client: redis::Client,
}

impl ChangeNotifier {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub async fn publish(&self, user_id: Uuid, change: &SectionChange) {
        match self.try_publish(user_id, change).await {
            Ok(receivers) => debug!(
                "Published {:?} on {} to {receivers} subscriber(s)",
                change.operation, change.table
            ),
            Err(e) => warn!(
                "Change notification for {} {} dropped: {e}",
                change.table, change.row_id
            ),
        }
    }

    async fn try_publish(&self, user_id: Uuid, change: &SectionChange) -> anyhow::Result<i64> {
        let payload = serde_json::to_string(change)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let receivers: i64 = conn.publish(channel_for(user_id), payload).await?;
        Ok(receivers)
    }
}
