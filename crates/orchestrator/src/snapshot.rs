//! Read-only player view fetched once per reset request.

use common::PlayerId;
use serde_json::Value;

/// Snapshot of the player record at the start of an orchestration.
///
/// Used only to parameterize subsequent steps (the health value to restore)
/// and for human-readable reporting. Never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    /// Display name, falling back to `"Player {id}"` when absent upstream.
    pub name: String,
    /// Max health as reported by the player service, if present.
    pub max_health: Option<u32>,
}

impl PlayerSnapshot {
    /// Creates a snapshot from known values.
    pub fn new(id: PlayerId, name: impl Into<String>, max_health: Option<u32>) -> Self {
        Self {
            id,
            name: name.into(),
            max_health,
        }
    }

    /// Builds a snapshot from the player service's JSON payload.
    ///
    /// The upstream service has shipped both `max_health` and `MaxHealth`
    /// spellings; both are accepted.
    pub fn from_payload(id: PlayerId, payload: &Value) -> Self {
        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Player {id}"));

        let max_health = payload
            .get("max_health")
            .or_else(|| payload.get("MaxHealth"))
            .and_then(Value::as_u64)
            .map(|h| h as u32);

        Self {
            id,
            name,
            max_health,
        }
    }
}
