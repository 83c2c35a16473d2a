//! Action descriptor and result: the values exchanged with the upstream
//! policy layer.

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// What the upstream policy asks for: a strategy name plus an optional
/// position hint. `selector`, `quick_find` and `fast_query` are carried for
/// logging and for the upstream matcher; dispatch ignores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub selector: String,
    #[serde(default)]
    pub quick_find: bool,
    #[serde(default)]
    pub fast_query: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl ActionDescriptor {
    pub fn new(selector: impl Into<String>) -> Self {
        Self { selector: selector.into(), ..Default::default() }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Outcome of one dispatch.
///
/// For background strategies `result` means "accepted", not "completed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Name of the strategy that actually ran.
    pub action: String,
    pub result: bool,
    /// The privileged injector handled the click instead of a gesture.
    #[serde(default)]
    pub privileged: bool,
}

impl ActionResult {
    pub fn new(action: impl Into<String>, result: bool) -> Self {
        Self { action: action.into(), result, privileged: false }
    }

    pub fn privileged(action: impl Into<String>, result: bool) -> Self {
        Self { action: action.into(), result, privileged: true }
    }
}

impl std::fmt::Display for ActionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}{}",
            self.action,
            if self.result { "ok" } else { "failed" },
            if self.privileged { " (privileged)" } else { "" }
        )
    }
}
