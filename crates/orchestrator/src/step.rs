//! Step descriptors and classified step results.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;

/// The collaborator services a step can target.
///
/// Each variant corresponds to one independently deployed service with its
/// own base URL in [`crate::config::CollaboratorEndpoints`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Player profile service.
    Player,
    /// Inventory service.
    Inventory,
    /// Room/world state service.
    Room,
    /// Player-room interaction history service.
    Interaction,
    /// Enemy state service.
    Enemy,
}

impl Collaborator {
    /// Returns the collaborator name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::Player => "player",
            Collaborator::Inventory => "inventory",
            Collaborator::Room => "room",
            Collaborator::Interaction => "interactions",
            Collaborator::Enemy => "enemies",
        }
    }
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One idempotent remote mutation against a single collaborator.
///
/// The `label` is the key under which the outcome appears in the final
/// report. Room steps carry per-room labels (`room-1`, `room-2`, ...) so
/// each room's outcome is recorded independently.
#[derive(Debug, Clone)]
pub struct Step {
    /// Report key for this step's outcome.
    pub label: String,
    /// The service this step targets.
    pub collaborator: Collaborator,
    /// HTTP method of the request.
    pub method: Method,
    /// Request path relative to the collaborator's base URL.
    pub path: String,
    /// Optional JSON request payload.
    pub body: Option<Value>,
    /// Statuses treated as "already gone" rather than failure.
    ///
    /// Used for delete-style steps where a 404 means there was nothing
    /// to remove, which is not an error.
    pub acceptable_absence: Vec<StatusCode>,
    /// Per-call timeout; a timed-out call classifies as failure.
    pub timeout: Duration,
}

impl Step {
    /// Creates a step with no payload and no acceptable-absence statuses.
    pub fn new(
        label: impl Into<String>,
        collaborator: Collaborator,
        method: Method,
        path: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            label: label.into(),
            collaborator,
            method,
            path: path.into(),
            body: None,
            acceptable_absence: Vec::new(),
            timeout,
        }
    }

    /// Attaches a JSON payload to the step.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Marks a response status as an acceptable absence.
    pub fn accept_absence(mut self, status: StatusCode) -> Self {
        self.acceptable_absence.push(status);
        self
    }
}

/// Classified outcome of one step execution.
///
/// A step result is data, never an error: transport failures, timeouts and
/// unexpected statuses all land here with `succeeded == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// The step label this result belongs to.
    pub step: String,
    /// Whether the step counts as successful.
    pub succeeded: bool,
    /// True when success came from an acceptable "not found" response.
    pub acceptable_absence: bool,
    /// Human-readable failure cause when `succeeded` is false.
    pub error: Option<String>,
}

impl StepResult {
    /// A successful step.
    pub fn success(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            succeeded: true,
            acceptable_absence: false,
            error: None,
        }
    }

    /// A delete-style step that found nothing to remove.
    pub fn already_absent(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            succeeded: true,
            acceptable_absence: true,
            error: None,
        }
    }

    /// A failed step with a human-readable cause.
    pub fn failure(step: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            succeeded: false,
            acceptable_absence: false,
            error: Some(detail.into()),
        }
    }
}
