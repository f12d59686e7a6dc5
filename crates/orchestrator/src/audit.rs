//! Best-effort audit trail over the durable activity log queue.
//!
//! Publication is fire-and-forget: any failure is logged and swallowed so
//! the orchestration outcome never depends on the audit path. At-most-once
//! delivery, not a source of truth.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::PlayerId;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Connection, ConnectionProperties};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the durable queue consumed by the activity log service.
pub const ACTIVITY_LOG_QUEUE: &str = "activity_log_queue";

/// The record published for each completed reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub player_id: PlayerId,
    pub action: String,
    /// UTC timestamp, serialized as ISO-8601.
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Creates a record stamped with the current time.
    pub fn new(player_id: PlayerId, action: impl Into<String>) -> Self {
        Self {
            player_id,
            action: action.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Publishes an action record for later inspection.
#[async_trait]
pub trait AuditNotifier: Send + Sync {
    /// Records that `action` was performed for `player_id`. Infallible at
    /// the call site; implementations handle their own failures.
    async fn notify(&self, player_id: PlayerId, action: &str);
}

#[derive(Debug, Error)]
enum AuditError {
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// AMQP-backed notifier publishing to the durable activity log queue.
///
/// Each publish opens a fresh connection, declares the queue, publishes the
/// record with persistent delivery, and closes the connection on every path.
#[derive(Debug, Clone)]
pub struct AmqpAuditNotifier {
    addr: String,
    queue: String,
}

impl AmqpAuditNotifier {
    /// Creates a notifier for the given AMQP address.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            queue: ACTIVITY_LOG_QUEUE.to_string(),
        }
    }

    /// Reads `AMQP_ADDR` from the environment, defaulting to the compose
    /// hostname of the broker.
    pub fn from_env() -> Self {
        let addr = std::env::var("AMQP_ADDR")
            .unwrap_or_else(|_| "amqp://rabbitmq:5672/%2f".to_string());
        Self::new(addr)
    }

    /// Overrides the target queue name.
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = queue.into();
        self
    }

    async fn publish(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let connection =
            Connection::connect(&self.addr, ConnectionProperties::default()).await?;
        let result = self.publish_on(&connection, record).await;
        // Close regardless of how the publish went.
        let _ = connection.close(200, "audit publish done").await;
        result
    }

    async fn publish_on(
        &self,
        connection: &Connection,
        record: &AuditRecord,
    ) -> Result<(), AuditError> {
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                &self.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        let payload = serde_json::to_vec(record)?;
        channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await?
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuditNotifier for AmqpAuditNotifier {
    async fn notify(&self, player_id: PlayerId, action: &str) {
        let record = AuditRecord::new(player_id, action);
        match self.publish(&record).await {
            Ok(()) => tracing::debug!(%player_id, action, "activity log sent"),
            Err(e) => tracing::warn!(%player_id, error = %e, "failed to send activity log"),
        }
    }
}

/// Recording notifier for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditNotifier {
    entries: Arc<RwLock<Vec<(PlayerId, String)>>>,
}

impl RecordingAuditNotifier {
    /// Creates an empty recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `(player_id, action)` pairs.
    pub fn entries(&self) -> Vec<(PlayerId, String)> {
        self.entries.read().unwrap().clone()
    }

    /// Number of records published so far.
    pub fn count(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

#[async_trait]
impl AuditNotifier for RecordingAuditNotifier {
    async fn notify(&self, player_id: PlayerId, action: &str) {
        self.entries
            .write()
            .unwrap()
            .push((player_id, action.to_string()));
    }
}
