//! Reset plan definitions.
//!
//! A plan is the fixed, ordered list of steps for one reset kind. Order is
//! significant: the player update runs first, and the per-room steps carry
//! individual labels so one room's failure never hides another's outcome.

use common::RoomId;
use reqwest::{Method, StatusCode};
use serde_json::json;

use crate::config::ResetConfig;
use crate::snapshot::PlayerSnapshot;
use crate::step::{Collaborator, Step};

/// Report key for the player update step.
pub const STEP_PLAYER: &str = "player";
/// Report key for the inventory clear step.
pub const STEP_INVENTORY: &str = "inventory";
/// Report key for the interaction history reset step.
pub const STEP_INTERACTIONS: &str = "interactions";
/// Report key for the enemy reset step.
pub const STEP_ENEMIES: &str = "enemies";

/// Report key for one room reset step.
pub fn room_label(room_id: RoomId) -> String {
    format!("room-{room_id}")
}

/// The kind of reset requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetKind {
    /// Restore health, room and score; reset enemies.
    Partial,
    /// Additionally restore full stats, clear inventory and interaction
    /// history, and restore the default rooms.
    Full,
}

impl ResetKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetKind::Partial => "partial",
            ResetKind::Full => "full",
        }
    }
}

impl std::fmt::Display for ResetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Default contents a room is restored to by a full reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDefault {
    pub room_id: RoomId,
    pub item_ids: Vec<u32>,
    pub enemy_ids: Vec<u32>,
    pub door_locked: bool,
}

/// An ordered, immutable sequence of steps for one reset kind.
#[derive(Debug, Clone)]
pub struct ResetPlan {
    pub kind: ResetKind,
    pub steps: Vec<Step>,
}

impl ResetPlan {
    /// Builds the plan for the requested kind, binding parameters from the
    /// player snapshot and the static configuration.
    pub fn build(kind: ResetKind, snapshot: &PlayerSnapshot, config: &ResetConfig) -> Self {
        let max_health = snapshot.max_health.unwrap_or(config.fallback_max_health);
        let timeout = config.step_timeout;
        let player_path = format!("/player/{}", snapshot.id);

        let mut steps = Vec::new();

        let player_body = match kind {
            ResetKind::Partial => json!({
                "current_health": max_health,
                "room_id": config.starting_room,
                "sum_score": 0,
            }),
            ResetKind::Full => json!({
                "current_health": max_health,
                "max_health": max_health,
                "damage": config.default_damage,
                "room_id": config.starting_room,
                "sum_score": 0,
            }),
        };
        steps.push(
            Step::new(STEP_PLAYER, Collaborator::Player, Method::PUT, player_path, timeout)
                .with_body(player_body),
        );

        if kind == ResetKind::Full {
            // An empty inventory answers 404, which is not an error.
            steps.push(
                Step::new(
                    STEP_INVENTORY,
                    Collaborator::Inventory,
                    Method::DELETE,
                    format!("/inventory/player/{}", snapshot.id),
                    timeout,
                )
                .accept_absence(StatusCode::NOT_FOUND),
            );

            steps.push(Step::new(
                STEP_INTERACTIONS,
                Collaborator::Interaction,
                Method::POST,
                format!("/player/{}/reset", snapshot.id),
                timeout,
            ));

            for room in &config.default_rooms {
                steps.push(
                    Step::new(
                        room_label(room.room_id),
                        Collaborator::Room,
                        Method::PUT,
                        format!("/room/{}", room.room_id),
                        timeout,
                    )
                    .with_body(json!({
                        "item_ids": room.item_ids,
                        "enemy_ids": room.enemy_ids,
                        "door_locked": room.door_locked,
                    })),
                );
            }
        }

        // Enemy reset is global, not scoped to the player's room.
        steps.push(Step::new(
            STEP_ENEMIES,
            Collaborator::Enemy,
            Method::GET,
            "/reset",
            timeout,
        ));

        Self { kind, steps }
    }
}
