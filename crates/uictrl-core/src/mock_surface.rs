//! Mock node and surface: record every interaction instead of touching a
//! real device.
//!
//! Used by the unit tests and by the `uictrl` replay binary, which loads a
//! [`MockNodeSpec`] snapshot and reports what the engine would have done.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::surface::{
    Gesture, GestureCallback, GestureSink, Notifier, ScreenMetrics, ScreenSize, Surface, UiHost,
};
use crate::tree::{NodeAction, NodeRef, UiNode, UiRect};

fn locked<T: Clone>(m: &Mutex<T>) -> T {
    match m.lock() {
        Ok(g) => g.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn push<T>(m: &Mutex<Vec<T>>, item: T) {
    match m.lock() {
        Ok(mut g) => g.push(item),
        Err(poisoned) => poisoned.into_inner().push(item),
    }
}

// ── Node ───────────────────────────────────────────────────────────────────

/// Serializable description of a mock subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockNodeSpec {
    pub bounds: UiRect,
    #[serde(default)]
    pub clickable: bool,
    #[serde(default)]
    pub long_clickable: bool,
    /// Result every semantic action on this node reports.
    #[serde(default = "default_accept")]
    pub accept: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MockNodeSpec>,
}

fn default_accept() -> bool {
    true
}

/// In-memory node that records the semantic actions performed on it.
#[derive(Debug)]
pub struct MockNode {
    bounds: UiRect,
    clickable: bool,
    long_clickable: bool,
    accept: bool,
    children: Vec<Arc<MockNode>>,
    /// Children reported by `child_count` but never returned by `child`,
    /// as when the live tree changes under a walk.
    stale_children: usize,
    performed: Mutex<Vec<NodeAction>>,
    child_count_calls: AtomicUsize,
}

impl MockNode {
    pub fn new(bounds: UiRect) -> Self {
        Self {
            bounds,
            clickable: false,
            long_clickable: false,
            accept: true,
            children: Vec::new(),
            stale_children: 0,
            performed: Mutex::new(Vec::new()),
            child_count_calls: AtomicUsize::new(0),
        }
    }

    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    pub fn long_clickable(mut self) -> Self {
        self.long_clickable = true;
        self
    }

    /// Every semantic action reports failure.
    pub fn rejecting(mut self) -> Self {
        self.accept = false;
        self
    }

    pub fn with_children(mut self, children: Vec<Arc<MockNode>>) -> Self {
        self.children = children;
        self
    }

    pub fn with_stale_children(mut self, n: usize) -> Self {
        self.stale_children = n;
        self
    }

    pub fn build(self) -> Arc<MockNode> {
        Arc::new(self)
    }

    pub fn from_spec(spec: &MockNodeSpec) -> Arc<MockNode> {
        let mut node = MockNode::new(spec.bounds);
        node.clickable = spec.clickable;
        node.long_clickable = spec.long_clickable;
        node.accept = spec.accept;
        node.children = spec.children.iter().map(MockNode::from_spec).collect();
        node.build()
    }

    /// Semantic actions performed so far, in order.
    pub fn performed(&self) -> Vec<NodeAction> {
        locked(&self.performed)
    }

    /// Texts set on this node so far.
    pub fn texts(&self) -> Vec<String> {
        self.performed()
            .into_iter()
            .filter_map(|a| match a {
                NodeAction::SetText(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// How often `child_count` was queried.
    pub fn child_count_calls(&self) -> usize {
        self.child_count_calls.load(Ordering::SeqCst)
    }
}

impl UiNode for MockNode {
    fn bounds(&self) -> UiRect {
        self.bounds
    }

    fn child_count(&self) -> usize {
        self.child_count_calls.fetch_add(1, Ordering::SeqCst);
        self.children.len() + self.stale_children
    }

    fn child(&self, index: usize) -> Option<NodeRef> {
        self.children.get(index).map(|c| c.clone() as NodeRef)
    }

    fn is_clickable(&self) -> bool {
        self.clickable
    }

    fn is_long_clickable(&self) -> bool {
        self.long_clickable
    }

    fn perform(&self, action: &NodeAction) -> bool {
        log::debug!("MockNode {}: {action} -> {}", self.bounds, self.accept);
        push(&self.performed, action.clone());
        self.accept
    }
}

// ── Surface ────────────────────────────────────────────────────────────────

/// Surface that records gestures, notifications and back presses.
#[derive(Debug)]
pub struct MockSurface {
    screen: ScreenSize,
    package: Mutex<Option<String>>,
    gestures: Mutex<Vec<Gesture>>,
    notifications: Mutex<Vec<String>>,
    back_presses: AtomicUsize,
}

impl MockSurface {
    pub fn new(screen: ScreenSize) -> Self {
        Self {
            screen,
            package: Mutex::new(None),
            gestures: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            back_presses: AtomicUsize::new(0),
        }
    }

    /// A 1080x1920 mock wrapped into a [`Surface`], plus the handle to
    /// inspect it.
    pub fn shared() -> (Surface, Arc<MockSurface>) {
        Self::shared_with(ScreenSize { width: 1080, height: 1920 })
    }

    pub fn shared_with(screen: ScreenSize) -> (Surface, Arc<MockSurface>) {
        let mock = Arc::new(MockSurface::new(screen));
        (Surface::from_shared(mock.clone()), mock)
    }

    pub fn set_active_package(&self, package: Option<&str>) {
        match self.package.lock() {
            Ok(mut g) => *g = package.map(str::to_string),
            Err(poisoned) => *poisoned.into_inner() = package.map(str::to_string),
        }
    }

    pub fn gestures(&self) -> Vec<Gesture> {
        locked(&self.gestures)
    }

    pub fn taps(&self) -> Vec<Gesture> {
        self.gestures().into_iter().filter(Gesture::is_tap).collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        locked(&self.notifications)
    }

    pub fn back_presses(&self) -> usize {
        self.back_presses.load(Ordering::SeqCst)
    }
}

impl GestureSink for MockSurface {
    fn dispatch(&self, gesture: Gesture, on_complete: Option<GestureCallback>) -> bool {
        log::info!(
            "MockSurface: gesture {:?} over {}ms",
            gesture.path,
            gesture.duration.as_millis()
        );
        push(&self.gestures, gesture);
        if let Some(cb) = on_complete {
            cb(true);
        }
        true
    }
}

impl ScreenMetrics for MockSurface {
    fn screen_size(&self) -> ScreenSize {
        self.screen
    }
}

impl Notifier for MockSurface {
    fn notify(&self, message: &str) {
        log::info!("MockSurface: notify {message:?}");
        push(&self.notifications, message.to_string());
    }
}

impl UiHost for MockSurface {
    fn perform_global_back(&self) -> bool {
        self.back_presses.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn active_package(&self) -> Option<String> {
        locked(&self.package)
    }
}
