//! UI tree collaborator: the node primitives the engine drives.
//!
//! The host platform owns the real accessibility tree. The engine only sees
//! it through [`UiNode`], which is implemented once per platform (and by
//! [`crate::mock_surface::MockNode`] for tests and replays).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Bounding rectangle of a node in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl UiRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Horizontal extent, saturating at the `i32` range.
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Vertical extent, saturating at the `i32` range.
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Geometric center.
    pub fn center(&self) -> Point {
        Point {
            x: ((f64::from(self.left) + f64::from(self.right)) / 2.0) as f32,
            y: ((f64::from(self.top) + f64::from(self.bottom)) / 2.0) as f32,
        }
    }
}

impl std::fmt::Display for UiRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}][{},{}]", self.left, self.top, self.right, self.bottom)
    }
}

/// Absolute screen point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Semantic actions a node natively supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum NodeAction {
    Click,
    LongClick,
    Focus,
    ClearFocus,
    SetText(String),
    ScrollForward,
    ScrollBackward,
}

impl std::fmt::Display for NodeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeAction::Click => write!(f, "click"),
            NodeAction::LongClick => write!(f, "long_click"),
            NodeAction::Focus => write!(f, "focus"),
            NodeAction::ClearFocus => write!(f, "clear_focus"),
            NodeAction::SetText(text) => write!(f, "set_text({} chars)", text.chars().count()),
            NodeAction::ScrollForward => write!(f, "scroll_forward"),
            NodeAction::ScrollBackward => write!(f, "scroll_backward"),
        }
    }
}

/// A live node in the host's UI tree.
///
/// Implementations must be shareable across threads: background strategies
/// keep a [`NodeRef`] alive after `perform` has returned.
pub trait UiNode: Send + Sync {
    /// Bounds in screen coordinates.
    fn bounds(&self) -> UiRect;

    fn child_count(&self) -> usize;

    /// Child at `index`, or `None` if the index is out of range or the
    /// child is no longer available.
    fn child(&self, index: usize) -> Option<NodeRef>;

    fn is_clickable(&self) -> bool;

    fn is_long_clickable(&self) -> bool;

    /// Invoke a semantic action. Returns whether the tree accepted it.
    fn perform(&self, action: &NodeAction) -> bool;
}

/// Shared handle to a node.
pub type NodeRef = Arc<dyn UiNode>;
