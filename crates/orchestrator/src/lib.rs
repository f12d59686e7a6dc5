//! Reset orchestration across the game's collaborator services.
//!
//! A single "reset progress" request fans out into a fixed, ordered plan of
//! remote mutations against independent services (player, inventory, rooms,
//! interaction history, enemies). The services share no transaction boundary,
//! so a failed step never halts the plan; every outcome is folded into an
//! aggregate report that states honestly which collaborators were updated.
//!
//! The pieces, leaf to root:
//! 1. [`Step`] — one idempotent remote mutation with its own timeout.
//! 2. [`StepExecutor`] — issues a step and classifies the outcome; it never
//!    escalates a collaborator failure as an error.
//! 3. [`ResetAggregator`] — folds step results into a [`ResetReport`].
//! 4. [`ResetCoordinator`] — resolves the player, runs the plan, finalizes
//!    the report, and publishes a best-effort audit record.

pub mod aggregator;
pub mod audit;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod plan;
pub mod snapshot;
pub mod step;

pub use aggregator::{ResetAggregator, ResetReport, ResetStatus};
pub use audit::{AmqpAuditNotifier, AuditNotifier, AuditRecord, RecordingAuditNotifier};
pub use config::{CollaboratorEndpoints, ResetConfig};
pub use coordinator::{ResetCoordinator, ResetOutcome};
pub use error::ResetError;
pub use executor::{HttpStepExecutor, ScriptedStepExecutor, StepExecutor};
pub use plan::{ResetKind, ResetPlan, RoomDefault};
pub use snapshot::PlayerSnapshot;
pub use step::{Collaborator, Step, StepResult};
