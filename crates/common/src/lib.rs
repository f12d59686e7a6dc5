//! Shared types for the game reset orchestrator.

mod types;

pub use types::{PlayerId, RoomId};
