//! Per-collaborator outcome accumulation and the final reset report.

use serde::{Deserialize, Serialize};

use crate::step::StepResult;

/// Overall outcome of a reset orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResetStatus {
    /// Every collaborator was updated and no errors were recorded.
    FullSuccess,
    /// Some collaborators were updated, some were not.
    PartialSuccess,
    /// The player lookup came back empty; no mutation was attempted.
    PlayerNotFound,
    /// The orchestration aborted before any collaborator mutation ran.
    HardFailure,
}

impl ResetStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetStatus::FullSuccess => "full_success",
            ResetStatus::PartialSuccess => "partial_success",
            ResetStatus::PlayerNotFound => "player_not_found",
            ResetStatus::HardFailure => "hard_failure",
        }
    }
}

impl std::fmt::Display for ResetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accumulates step results while a plan executes.
///
/// Re-recording the same step label overwrites the previous boolean in
/// place; it never duplicates an entry. Failure details append to an
/// ordered error list, so the final report lists failures in execution
/// order.
#[derive(Debug, Default)]
pub struct ResetAggregator {
    outcomes: Vec<(String, bool)>,
    errors: Vec<String>,
}

impl ResetAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one step result into the aggregate.
    pub fn record(&mut self, result: StepResult) {
        if let Some(entry) = self.outcomes.iter_mut().find(|(name, _)| *name == result.step) {
            entry.1 = result.succeeded;
        } else {
            self.outcomes.push((result.step.clone(), result.succeeded));
        }

        if !result.succeeded {
            self.errors.push(
                result
                    .error
                    .unwrap_or_else(|| format!("{} step failed", result.step)),
            );
        }
    }

    /// Records a process-level error not attached to a collaborator.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Computes the overall status and produces the final report.
    pub fn finalize(self) -> ResetReport {
        let status = if self.outcomes.is_empty() {
            ResetStatus::HardFailure
        } else if self.outcomes.iter().all(|(_, ok)| *ok) && self.errors.is_empty() {
            ResetStatus::FullSuccess
        } else {
            ResetStatus::PartialSuccess
        };

        ResetReport {
            collaborators: self.outcomes,
            errors: self.errors,
            status,
        }
    }
}

/// The aggregate outcome of a reset orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    /// Per-collaborator outcome in execution order.
    pub collaborators: Vec<(String, bool)>,
    /// Failure details in execution order.
    pub errors: Vec<String>,
    /// The overall status.
    pub status: ResetStatus,
}

impl ResetReport {
    /// Report for the player-not-found early exit: nothing was attempted.
    pub fn player_not_found() -> Self {
        Self {
            collaborators: Vec::new(),
            errors: Vec::new(),
            status: ResetStatus::PlayerNotFound,
        }
    }

    /// Looks up the outcome recorded for a collaborator label.
    pub fn collaborator(&self, name: &str) -> Option<bool> {
        self.collaborators
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ok)| *ok)
    }

    /// Conjunction over the per-room entries, or `None` if the plan had no
    /// room steps.
    pub fn rooms_ok(&self) -> Option<bool> {
        let mut rooms = self
            .collaborators
            .iter()
            .filter(|(name, _)| name.starts_with("room-"))
            .peekable();
        rooms.peek()?;
        Some(rooms.all(|(_, ok)| *ok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepResult;

    #[test]
    fn all_success_finalizes_as_full_success() {
        let mut agg = ResetAggregator::new();
        agg.record(StepResult::success("player"));
        agg.record(StepResult::success("inventory"));

        let report = agg.finalize();
        assert_eq!(report.status, ResetStatus::FullSuccess);
        assert!(report.errors.is_empty());
        assert_eq!(report.collaborator("player"), Some(true));
        assert_eq!(report.collaborator("inventory"), Some(true));
    }

    #[test]
    fn mixed_outcomes_finalize_as_partial_success() {
        let mut agg = ResetAggregator::new();
        agg.record(StepResult::success("player"));
        agg.record(StepResult::failure("inventory", "request timed out"));

        let report = agg.finalize();
        assert_eq!(report.status, ResetStatus::PartialSuccess);
        assert_eq!(report.collaborator("inventory"), Some(false));
        assert_eq!(report.errors, vec!["request timed out".to_string()]);
    }

    #[test]
    fn acceptable_absence_counts_as_success() {
        let mut agg = ResetAggregator::new();
        agg.record(StepResult::already_absent("inventory"));

        let report = agg.finalize();
        assert_eq!(report.status, ResetStatus::FullSuccess);
        assert_eq!(report.collaborator("inventory"), Some(true));
    }

    #[test]
    fn re_recording_overwrites_instead_of_duplicating() {
        let mut agg = ResetAggregator::new();
        agg.record(StepResult::failure("player", "first attempt failed"));
        agg.record(StepResult::success("player"));

        let report = agg.finalize();
        assert_eq!(report.collaborators.len(), 1);
        assert_eq!(report.collaborator("player"), Some(true));
        // The earlier failure detail is preserved, not dropped silently.
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn entry_count_matches_distinct_steps() {
        let mut agg = ResetAggregator::new();
        for label in ["player", "inventory", "room-1", "room-2", "room-3"] {
            agg.record(StepResult::success(label));
        }
        let report = agg.finalize();
        assert_eq!(report.collaborators.len(), 5);
    }

    #[test]
    fn errors_keep_execution_order() {
        let mut agg = ResetAggregator::new();
        agg.record(StepResult::failure("player", "player down"));
        agg.record(StepResult::success("inventory"));
        agg.record(StepResult::failure("room-2", "room down"));

        let report = agg.finalize();
        assert_eq!(
            report.errors,
            vec!["player down".to_string(), "room down".to_string()]
        );
    }

    #[test]
    fn empty_aggregator_finalizes_as_hard_failure() {
        let mut agg = ResetAggregator::new();
        agg.record_error("player lookup transport failure");

        let report = agg.finalize();
        assert_eq!(report.status, ResetStatus::HardFailure);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn rooms_ok_is_conjunction_over_room_entries() {
        let mut agg = ResetAggregator::new();
        agg.record(StepResult::success("room-1"));
        agg.record(StepResult::failure("room-2", "boom"));
        agg.record(StepResult::success("room-3"));
        let report = agg.finalize();
        assert_eq!(report.rooms_ok(), Some(false));

        let mut agg = ResetAggregator::new();
        agg.record(StepResult::success("player"));
        let report = agg.finalize();
        assert_eq!(report.rooms_ok(), None);
    }

    #[test]
    fn process_error_alone_downgrades_full_success() {
        let mut agg = ResetAggregator::new();
        agg.record(StepResult::success("player"));
        agg.record_error("audit context lost");

        let report = agg.finalize();
        assert_eq!(report.status, ResetStatus::PartialSuccess);
    }
}
