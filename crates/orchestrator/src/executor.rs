//! Step execution against collaborator services.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::PlayerId;
use reqwest::StatusCode;

use crate::config::CollaboratorEndpoints;
use crate::error::ResetError;
use crate::snapshot::PlayerSnapshot;
use crate::step::{Step, StepResult};

/// Gateway to the collaborator services.
///
/// `execute` never fails with an error: transport problems, timeouts and
/// unexpected statuses all come back as a classified [`StepResult`]. The
/// read-side precondition `fetch_player` is the one call that may error,
/// because a lookup that cannot complete leaves the orchestrator with
/// nothing safe to do.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Issues one step and classifies the outcome.
    async fn execute(&self, step: &Step) -> StepResult;

    /// Fetches the player record, `Ok(None)` when the service reports 404.
    async fn fetch_player(&self, player_id: PlayerId)
    -> Result<Option<PlayerSnapshot>, ResetError>;
}

/// reqwest-backed executor over the configured collaborator endpoints.
#[derive(Debug, Clone)]
pub struct HttpStepExecutor {
    client: reqwest::Client,
    endpoints: CollaboratorEndpoints,
    lookup_timeout: Duration,
}

impl HttpStepExecutor {
    /// Creates an executor over the given endpoints. `lookup_timeout` bounds
    /// the player lookup; each mutating step carries its own timeout.
    pub fn new(endpoints: CollaboratorEndpoints, lookup_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
            lookup_timeout,
        }
    }

    fn url_for(&self, step: &Step) -> String {
        format!("{}{}", self.endpoints.base_url(step.collaborator), step.path)
    }
}

/// Classifies a completed HTTP exchange into a step result.
fn classify(step: &Step, status: StatusCode, body: &str) -> StepResult {
    if status.is_success() {
        StepResult::success(&step.label)
    } else if step.acceptable_absence.contains(&status) {
        StepResult::already_absent(&step.label)
    } else {
        StepResult::failure(
            &step.label,
            format!("{} reset failed: {} {}", step.label, status.as_u16(), body),
        )
    }
}

#[async_trait]
impl StepExecutor for HttpStepExecutor {
    async fn execute(&self, step: &Step) -> StepResult {
        let url = self.url_for(step);
        let mut request = self
            .client
            .request(step.method.clone(), &url)
            .timeout(step.timeout);
        if let Some(body) = &step.body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                classify(step, status, &body)
            }
            Err(e) if e.is_timeout() => StepResult::failure(
                &step.label,
                format!(
                    "{} reset error: timed out after {}s",
                    step.label,
                    step.timeout.as_secs()
                ),
            ),
            Err(e) => {
                StepResult::failure(&step.label, format!("{} reset error: {e}", step.label))
            }
        }
    }

    async fn fetch_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<PlayerSnapshot>, ResetError> {
        let url = format!("{}/player/{player_id}", self.endpoints.player);
        let response = self
            .client
            .get(&url)
            .timeout(self.lookup_timeout)
            .send()
            .await
            .map_err(|e| ResetError::PlayerLookup(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ResetError::PlayerLookup(format!(
                "player service returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ResetError::PlayerLookup(e.to_string()))?;
        Ok(Some(PlayerSnapshot::from_payload(player_id, &payload)))
    }
}

#[derive(Debug, Default)]
struct ScriptedState {
    players: HashMap<PlayerId, PlayerSnapshot>,
    failures: HashMap<String, String>,
    absent: HashSet<String>,
    lookup_error: Option<String>,
    executed: Vec<String>,
}

/// In-memory executor for testing.
///
/// Steps succeed unless scripted otherwise; every execution is recorded in
/// order so tests can assert that plans run to completion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStepExecutor {
    state: Arc<RwLock<ScriptedState>>,
}

impl ScriptedStepExecutor {
    /// Creates a new scripted executor with no players and no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player the lookup will find.
    pub fn insert_player(&self, snapshot: PlayerSnapshot) {
        let mut state = self.state.write().unwrap();
        state.players.insert(snapshot.id, snapshot);
    }

    /// Scripts a failure for the step with the given label.
    pub fn fail_step(&self, label: impl Into<String>, detail: impl Into<String>) {
        self.state
            .write()
            .unwrap()
            .failures
            .insert(label.into(), detail.into());
    }

    /// Scripts a "not found" response for the step with the given label.
    pub fn absent_step(&self, label: impl Into<String>) {
        self.state.write().unwrap().absent.insert(label.into());
    }

    /// Scripts a transport-level failure for the player lookup.
    pub fn fail_player_lookup(&self, detail: impl Into<String>) {
        self.state.write().unwrap().lookup_error = Some(detail.into());
    }

    /// Returns the labels of executed steps, in execution order.
    pub fn executed_steps(&self) -> Vec<String> {
        self.state.read().unwrap().executed.clone()
    }
}

#[async_trait]
impl StepExecutor for ScriptedStepExecutor {
    async fn execute(&self, step: &Step) -> StepResult {
        let mut state = self.state.write().unwrap();
        state.executed.push(step.label.clone());

        if let Some(detail) = state.failures.get(&step.label) {
            return StepResult::failure(&step.label, detail.clone());
        }
        if state.absent.contains(&step.label) {
            return classify(step, StatusCode::NOT_FOUND, "");
        }
        StepResult::success(&step.label)
    }

    async fn fetch_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Option<PlayerSnapshot>, ResetError> {
        let state = self.state.read().unwrap();
        if let Some(detail) = &state.lookup_error {
            return Err(ResetError::PlayerLookup(detail.clone()));
        }
        Ok(state.players.get(&player_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Collaborator;
    use reqwest::Method;

    fn step(label: &str) -> Step {
        Step::new(
            label,
            Collaborator::Inventory,
            Method::DELETE,
            "/inventory/player/42",
            Duration::from_secs(5),
        )
    }

    #[test]
    fn classify_success_status() {
        let result = classify(&step("inventory"), StatusCode::OK, "");
        assert!(result.succeeded);
        assert!(!result.acceptable_absence);
    }

    #[test]
    fn classify_acceptable_absence() {
        let s = step("inventory").accept_absence(StatusCode::NOT_FOUND);
        let result = classify(&s, StatusCode::NOT_FOUND, "");
        assert!(result.succeeded);
        assert!(result.acceptable_absence);
    }

    #[test]
    fn classify_unexpected_status_carries_body() {
        let result = classify(&step("inventory"), StatusCode::BAD_GATEWAY, "upstream down");
        assert!(!result.succeeded);
        let detail = result.error.unwrap();
        assert!(detail.contains("502"));
        assert!(detail.contains("upstream down"));
    }

    #[test]
    fn classify_404_without_absence_set_is_failure() {
        let result = classify(&step("interactions"), StatusCode::NOT_FOUND, "");
        assert!(!result.succeeded);
    }

    #[tokio::test]
    async fn scripted_executor_records_order() {
        let executor = ScriptedStepExecutor::new();
        executor.execute(&step("player")).await;
        executor.execute(&step("inventory")).await;
        assert_eq!(executor.executed_steps(), vec!["player", "inventory"]);
    }

    #[tokio::test]
    async fn scripted_failure_and_absence() {
        let executor = ScriptedStepExecutor::new();
        executor.fail_step("inventory", "request timed out");
        executor.absent_step("rooms");

        let failed = executor.execute(&step("inventory")).await;
        assert!(!failed.succeeded);
        assert_eq!(failed.error.as_deref(), Some("request timed out"));

        let absent = executor
            .execute(&step("rooms").accept_absence(StatusCode::NOT_FOUND))
            .await;
        assert!(absent.succeeded);
        assert!(absent.acceptable_absence);
    }

    #[tokio::test]
    async fn scripted_player_lookup() {
        let executor = ScriptedStepExecutor::new();
        let player = PlayerSnapshot::new(PlayerId::new(42), "Ada", Some(100));
        executor.insert_player(player.clone());

        let found = executor.fetch_player(PlayerId::new(42)).await.unwrap();
        assert_eq!(found, Some(player));

        let missing = executor.fetch_player(PlayerId::new(999)).await.unwrap();
        assert!(missing.is_none());

        executor.fail_player_lookup("connection refused");
        let err = executor.fetch_player(PlayerId::new(42)).await.unwrap_err();
        assert!(matches!(err, ResetError::PlayerLookup(_)));
    }
}
