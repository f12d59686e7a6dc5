//! Partial and full reset endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::PlayerId;
use orchestrator::{
    AuditNotifier, ResetCoordinator, ResetKind, ResetOutcome, ResetReport, ResetStatus,
    StepExecutor,
};
use orchestrator::plan::{STEP_ENEMIES, STEP_INTERACTIONS, STEP_INVENTORY, STEP_PLAYER};
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<E: StepExecutor, A: AuditNotifier> {
    pub coordinator: ResetCoordinator<E, A>,
}

// -- Response types --

/// Per-collaborator outcome mirror of the reset report.
///
/// A collaborator that was not part of the executed plan serializes as
/// `null`; `rooms` is the conjunction of the per-room entries.
#[derive(Serialize)]
pub struct ResetDetails {
    pub player: Option<bool>,
    pub inventory: Option<bool>,
    pub rooms: Option<bool>,
    pub interactions: Option<bool>,
    pub enemies: Option<bool>,
    pub errors: Vec<String>,
}

impl From<&ResetReport> for ResetDetails {
    fn from(report: &ResetReport) -> Self {
        Self {
            player: report.collaborator(STEP_PLAYER),
            inventory: report.collaborator(STEP_INVENTORY),
            rooms: report.rooms_ok(),
            interactions: report.collaborator(STEP_INTERACTIONS),
            enemies: report.collaborator(STEP_ENEMIES),
            errors: report.errors.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub player_id: u64,
    pub reset_details: ResetDetails,
}

#[derive(Serialize)]
pub struct ResetFailureResponse {
    pub error: String,
    pub player_id: u64,
    pub reset_details: ResetDetails,
}

// -- Handlers --

/// POST /game/reset/{player_id} — restore health, room and score, reset
/// enemies.
#[tracing::instrument(skip(state))]
pub async fn partial<E, A>(
    State(state): State<Arc<AppState<E, A>>>,
    Path(player_id): Path<u64>,
) -> Result<Response, ApiError>
where
    E: StepExecutor + 'static,
    A: AuditNotifier + 'static,
{
    let outcome = state
        .coordinator
        .execute(ResetKind::Partial, PlayerId::new(player_id))
        .await;
    respond(ResetKind::Partial, outcome)
}

/// POST /game/full-reset/{player_id} — reset the player, inventory,
/// interaction history, default rooms and enemies.
#[tracing::instrument(skip(state))]
pub async fn full<E, A>(
    State(state): State<Arc<AppState<E, A>>>,
    Path(player_id): Path<u64>,
) -> Result<Response, ApiError>
where
    E: StepExecutor + 'static,
    A: AuditNotifier + 'static,
{
    let outcome = state
        .coordinator
        .execute(ResetKind::Full, PlayerId::new(player_id))
        .await;
    respond(ResetKind::Full, outcome)
}

/// Maps an orchestration outcome to the HTTP response.
fn respond(kind: ResetKind, outcome: ResetOutcome) -> Result<Response, ApiError> {
    let player_id = outcome.player_id.value();
    let name = outcome
        .player_name
        .unwrap_or_else(|| format!("Player {player_id}"));
    let reset_details = ResetDetails::from(&outcome.report);

    match outcome.report.status {
        ResetStatus::PlayerNotFound => Err(ApiError::NotFound("Player not found".to_string())),
        ResetStatus::FullSuccess => {
            let message = match kind {
                ResetKind::Partial => format!("Progress reset for player {player_id}."),
                ResetKind::Full => format!("Game fully reset for {name}"),
            };
            Ok((
                StatusCode::OK,
                Json(ResetResponse {
                    message,
                    player_id,
                    reset_details,
                }),
            )
                .into_response())
        }
        ResetStatus::PartialSuccess => Ok((
            StatusCode::MULTI_STATUS,
            Json(ResetResponse {
                message: format!("Game partially reset for {name} - some errors occurred"),
                player_id,
                reset_details,
            }),
        )
            .into_response()),
        ResetStatus::HardFailure => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResetFailureResponse {
                error: format!("Failed to reset game for player {player_id}"),
                player_id,
                reset_details,
            }),
        )
            .into_response()),
    }
}
