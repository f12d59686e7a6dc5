//! Reset coordinator driving the fixed step plans.

use common::PlayerId;

use crate::aggregator::{ResetAggregator, ResetReport, ResetStatus};
use crate::audit::AuditNotifier;
use crate::config::ResetConfig;
use crate::error::ResetError;
use crate::executor::StepExecutor;
use crate::plan::{ResetKind, ResetPlan};

/// Final result handed back to the transport layer.
#[derive(Debug, Clone)]
pub struct ResetOutcome {
    pub player_id: PlayerId,
    /// Display name of the resolved player; `None` when the lookup failed
    /// or found nothing.
    pub player_name: Option<String>,
    pub report: ResetReport,
}

/// Orchestrates a reset across the collaborator services.
///
/// The coordinator walks a fixed state machine per request:
/// resolve the player, build the plan for the requested kind, execute every
/// step in order without short-circuiting, finalize the aggregate report,
/// and publish one plan-level audit record. The collaborators share no
/// transaction boundary, so the guarantee is maximal partial progress with
/// honest reporting, never all-or-nothing consistency.
pub struct ResetCoordinator<E, A>
where
    E: StepExecutor,
    A: AuditNotifier,
{
    executor: E,
    audit: A,
    config: ResetConfig,
}

impl<E, A> ResetCoordinator<E, A>
where
    E: StepExecutor,
    A: AuditNotifier,
{
    /// Creates a coordinator over the given executor, notifier and config.
    pub fn new(executor: E, audit: A, config: ResetConfig) -> Self {
        Self {
            executor,
            audit,
            config,
        }
    }

    /// Executes a reset of the given kind for the player.
    ///
    /// Always produces a well-formed outcome: collaborator failures surface
    /// inside the report, and a fault that aborts the plan (for example a
    /// player-lookup transport error) is converted into a hard-failure
    /// report carrying whatever progress had been recorded.
    #[tracing::instrument(skip(self), fields(kind = %kind))]
    pub async fn execute(&self, kind: ResetKind, player_id: PlayerId) -> ResetOutcome {
        metrics::counter!("reset_requests_total", "kind" => kind.as_str()).increment(1);
        let start = std::time::Instant::now();

        let mut aggregator = ResetAggregator::new();
        let outcome = match self.run(kind, player_id, &mut aggregator).await {
            Ok(outcome) => outcome,
            Err(ResetError::PlayerNotFound(_)) => {
                tracing::info!(%player_id, "player not found, nothing reset");
                ResetOutcome {
                    player_id,
                    player_name: None,
                    report: ResetReport::player_not_found(),
                }
            }
            Err(e) => {
                tracing::error!(%player_id, error = %e, "reset aborted");
                aggregator.record_error(e.to_string());
                let mut report = aggregator.finalize();
                report.status = ResetStatus::HardFailure;
                ResetOutcome {
                    player_id,
                    player_name: None,
                    report,
                }
            }
        };

        metrics::histogram!("reset_duration_seconds").record(start.elapsed().as_secs_f64());
        metrics::counter!("reset_outcomes_total", "status" => outcome.report.status.as_str())
            .increment(1);
        outcome
    }

    async fn run(
        &self,
        kind: ResetKind,
        player_id: PlayerId,
        aggregator: &mut ResetAggregator,
    ) -> Result<ResetOutcome, ResetError> {
        // Precondition: the player must exist before anything mutates.
        let snapshot = self
            .executor
            .fetch_player(player_id)
            .await?
            .ok_or(ResetError::PlayerNotFound(player_id))?;
        tracing::debug!(player = %snapshot.name, "resolved player");

        let plan = ResetPlan::build(kind, &snapshot, &self.config);

        // No short-circuiting: a failed step is recorded and the remaining
        // steps still run, including the rest of the room loop.
        for step in &plan.steps {
            let result = self.executor.execute(step).await;
            if result.succeeded {
                tracing::debug!(step = %step.label, absence = result.acceptable_absence, "reset step ok");
            } else {
                tracing::warn!(step = %step.label, error = ?result.error, "reset step failed");
            }
            aggregator.record(result);
        }

        let report = std::mem::take(aggregator).finalize();
        tracing::info!(%player_id, status = %report.status, "reset finalized");

        let action = match kind {
            ResetKind::Partial => "Game progress reset".to_string(),
            ResetKind::Full => format!("Full game reset performed for {}", snapshot.name),
        };
        self.audit.notify(player_id, &action).await;

        Ok(ResetOutcome {
            player_id,
            player_name: Some(snapshot.name),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RecordingAuditNotifier;
    use crate::executor::ScriptedStepExecutor;
    use crate::snapshot::PlayerSnapshot;

    fn setup() -> (
        ResetCoordinator<ScriptedStepExecutor, RecordingAuditNotifier>,
        ScriptedStepExecutor,
        RecordingAuditNotifier,
    ) {
        let executor = ScriptedStepExecutor::new();
        let audit = RecordingAuditNotifier::new();
        let coordinator =
            ResetCoordinator::new(executor.clone(), audit.clone(), ResetConfig::default());
        (coordinator, executor, audit)
    }

    fn player_42() -> PlayerSnapshot {
        PlayerSnapshot::new(PlayerId::new(42), "Ada", Some(100))
    }

    #[tokio::test]
    async fn full_reset_happy_path() {
        let (coordinator, executor, audit) = setup();
        executor.insert_player(player_42());

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(42))
            .await;

        assert_eq!(outcome.report.status, ResetStatus::FullSuccess);
        assert_eq!(outcome.player_name.as_deref(), Some("Ada"));
        assert_eq!(outcome.report.collaborators.len(), 7);
        assert_eq!(outcome.report.collaborator("player"), Some(true));
        assert_eq!(outcome.report.collaborator("inventory"), Some(true));
        assert_eq!(outcome.report.rooms_ok(), Some(true));
        assert!(outcome.report.errors.is_empty());

        assert_eq!(
            executor.executed_steps(),
            vec![
                "player",
                "inventory",
                "interactions",
                "room-1",
                "room-2",
                "room-3",
                "enemies"
            ]
        );
        assert_eq!(audit.count(), 1);
        assert_eq!(audit.entries()[0].1, "Full game reset performed for Ada");
    }

    #[tokio::test]
    async fn inventory_timeout_yields_partial_success() {
        let (coordinator, executor, _audit) = setup();
        executor.insert_player(player_42());
        executor.fail_step("inventory", "inventory reset error: timed out after 5s");

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(42))
            .await;

        assert_eq!(outcome.report.status, ResetStatus::PartialSuccess);
        assert_eq!(outcome.report.collaborator("player"), Some(true));
        assert_eq!(outcome.report.collaborator("inventory"), Some(false));
        assert_eq!(outcome.report.rooms_ok(), Some(true));
        assert_eq!(outcome.report.errors.len(), 1);
        assert!(outcome.report.errors[0].contains("timed out"));
    }

    #[tokio::test]
    async fn player_not_found_runs_no_steps_and_no_audit() {
        let (coordinator, executor, audit) = setup();

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(999))
            .await;

        assert_eq!(outcome.report.status, ResetStatus::PlayerNotFound);
        assert!(outcome.player_name.is_none());
        assert!(outcome.report.collaborators.is_empty());
        assert!(executor.executed_steps().is_empty());
        assert_eq!(audit.count(), 0);
    }

    #[tokio::test]
    async fn one_room_failure_does_not_stop_the_others() {
        let (coordinator, executor, _audit) = setup();
        executor.insert_player(player_42());
        executor.fail_step("room-2", "Room 2 reset failed: 500 oops");

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(42))
            .await;

        assert_eq!(outcome.report.collaborator("room-1"), Some(true));
        assert_eq!(outcome.report.collaborator("room-2"), Some(false));
        assert_eq!(outcome.report.collaborator("room-3"), Some(true));
        assert_eq!(outcome.report.rooms_ok(), Some(false));
        assert_eq!(outcome.report.status, ResetStatus::PartialSuccess);

        let executed = executor.executed_steps();
        assert!(executed.contains(&"room-1".to_string()));
        assert!(executed.contains(&"room-3".to_string()));
    }

    #[tokio::test]
    async fn failed_player_step_does_not_short_circuit() {
        let (coordinator, executor, audit) = setup();
        executor.insert_player(player_42());
        executor.fail_step("player", "Player reset failed: 500");

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(42))
            .await;

        // All seven steps still ran.
        assert_eq!(executor.executed_steps().len(), 7);
        assert_eq!(outcome.report.collaborator("player"), Some(false));
        assert_eq!(outcome.report.collaborator("enemies"), Some(true));
        assert_eq!(outcome.report.status, ResetStatus::PartialSuccess);
        // The plan finished, so the audit record still fires.
        assert_eq!(audit.count(), 1);
    }

    #[tokio::test]
    async fn empty_inventory_is_not_an_error() {
        let (coordinator, executor, _audit) = setup();
        executor.insert_player(player_42());
        executor.absent_step("inventory");

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(42))
            .await;

        assert_eq!(outcome.report.status, ResetStatus::FullSuccess);
        assert_eq!(outcome.report.collaborator("inventory"), Some(true));
        assert!(outcome.report.errors.is_empty());
    }

    #[tokio::test]
    async fn partial_reset_touches_player_and_enemies() {
        let (coordinator, executor, audit) = setup();
        executor.insert_player(player_42());

        let outcome = coordinator
            .execute(ResetKind::Partial, PlayerId::new(42))
            .await;

        assert_eq!(outcome.report.status, ResetStatus::FullSuccess);
        assert_eq!(executor.executed_steps(), vec!["player", "enemies"]);
        assert_eq!(outcome.report.collaborators.len(), 2);
        assert_eq!(audit.entries()[0].1, "Game progress reset");
    }

    #[tokio::test]
    async fn lookup_transport_failure_is_a_hard_failure() {
        let (coordinator, executor, audit) = setup();
        executor.fail_player_lookup("connection refused");

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(42))
            .await;

        assert_eq!(outcome.report.status, ResetStatus::HardFailure);
        assert!(outcome.report.collaborators.is_empty());
        assert_eq!(outcome.report.errors.len(), 1);
        assert!(outcome.report.errors[0].contains("connection refused"));
        assert!(executor.executed_steps().is_empty());
        assert_eq!(audit.count(), 0);
    }

    #[tokio::test]
    async fn errors_reported_in_execution_order() {
        let (coordinator, executor, _audit) = setup();
        executor.insert_player(player_42());
        executor.fail_step("player", "player down");
        executor.fail_step("room-3", "room down");

        let outcome = coordinator
            .execute(ResetKind::Full, PlayerId::new(42))
            .await;

        assert_eq!(
            outcome.report.errors,
            vec!["player down".to_string(), "room down".to_string()]
        );
    }
}
