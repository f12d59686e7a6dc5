//! Orchestration configuration and collaborator endpoints.

use std::time::Duration;

use common::RoomId;

use crate::plan::RoomDefault;
use crate::step::Collaborator;

/// Static reset parameters injected into the coordinator at construction.
///
/// The defaults reproduce the deployed game world: three starter rooms with
/// their original item/enemy layout, a 100 HP fallback when the player
/// service omits max health, and a 5 second budget per remote call.
#[derive(Debug, Clone)]
pub struct ResetConfig {
    /// Max health restored when the player record carries none.
    pub fallback_max_health: u32,
    /// Damage stat restored by a full reset.
    pub default_damage: u32,
    /// Room the player is moved back to.
    pub starting_room: RoomId,
    /// Rooms restored to their default contents by a full reset.
    pub default_rooms: Vec<RoomDefault>,
    /// Per-call timeout for each step.
    pub step_timeout: Duration,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            fallback_max_health: 100,
            default_damage: 10,
            starting_room: RoomId::new(0),
            default_rooms: vec![
                RoomDefault {
                    room_id: RoomId::new(1),
                    item_ids: vec![1, 2],
                    enemy_ids: vec![],
                    door_locked: false,
                },
                RoomDefault {
                    room_id: RoomId::new(2),
                    item_ids: vec![3, 5],
                    enemy_ids: vec![1],
                    door_locked: false,
                },
                RoomDefault {
                    room_id: RoomId::new(3),
                    item_ids: vec![4],
                    enemy_ids: vec![2],
                    door_locked: true,
                },
            ],
            step_timeout: Duration::from_secs(5),
        }
    }
}

/// Base URLs of the collaborator services.
///
/// Reads from environment variables, falling back to the compose-network
/// hostnames of the deployed stack:
/// - `PLAYER_SERVICE_URL` (default `http://player_service:5000`)
/// - `INVENTORY_SERVICE_URL` (default `http://inventory_service:5001`)
/// - `ROOM_SERVICE_URL` (default `http://room_service:5016`)
/// - `PLAYER_ROOM_INTERACTION_SERVICE_URL` (default `http://player_room_interaction_service:5040`)
/// - `ENEMY_SERVICE_URL` (default `http://enemy_service:5005`)
#[derive(Debug, Clone)]
pub struct CollaboratorEndpoints {
    pub player: String,
    pub inventory: String,
    pub room: String,
    pub interaction: String,
    pub enemy: String,
}

impl CollaboratorEndpoints {
    /// Loads endpoints from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            player: env_or("PLAYER_SERVICE_URL", defaults.player),
            inventory: env_or("INVENTORY_SERVICE_URL", defaults.inventory),
            room: env_or("ROOM_SERVICE_URL", defaults.room),
            interaction: env_or(
                "PLAYER_ROOM_INTERACTION_SERVICE_URL",
                defaults.interaction,
            ),
            enemy: env_or("ENEMY_SERVICE_URL", defaults.enemy),
        }
    }

    /// Returns the base URL for a collaborator.
    pub fn base_url(&self, collaborator: Collaborator) -> &str {
        match collaborator {
            Collaborator::Player => &self.player,
            Collaborator::Inventory => &self.inventory,
            Collaborator::Room => &self.room,
            Collaborator::Interaction => &self.interaction,
            Collaborator::Enemy => &self.enemy,
        }
    }
}

impl Default for CollaboratorEndpoints {
    fn default() -> Self {
        Self {
            player: "http://player_service:5000".to_string(),
            inventory: "http://inventory_service:5001".to_string(),
            room: "http://room_service:5016".to_string(),
            interaction: "http://player_room_interaction_service:5040".to_string(),
            enemy: "http://enemy_service:5005".to_string(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or(default)
}
