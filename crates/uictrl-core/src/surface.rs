//! Surface collaborators: gesture dispatch, screen metrics, notifications.
//!
//! Each platform provides implementations; the engine only depends on these
//! traits. [`Surface`] bundles the handles so strategies and background tasks
//! can carry them around as one cheaply clonable value.

use std::sync::Arc;
use std::time::Duration;

use crate::config::SwipeConfig;
use crate::tree::Point;

/// A synthesized touch stroke: a path of points walked over `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub path: Vec<Point>,
    pub duration: Duration,
}

impl Gesture {
    /// Single-point press held for `duration`.
    pub fn tap(at: Point, duration: Duration) -> Self {
        Self { path: vec![at], duration }
    }

    /// Straight stroke from `from` to `to`.
    pub fn swipe(from: Point, to: Point, duration: Duration) -> Self {
        Self { path: vec![from, to], duration }
    }

    pub fn from_swipe_config(cfg: &SwipeConfig) -> Self {
        Self::swipe(cfg.from, cfg.to, cfg.duration())
    }

    pub fn start(&self) -> Option<Point> {
        self.path.first().copied()
    }

    pub fn is_tap(&self) -> bool {
        self.path.len() == 1
    }
}

/// Completion callback for a dispatched gesture. Receives `true` when the
/// platform reports the stroke completed, `false` when it was cancelled.
pub type GestureCallback = Box<dyn FnOnce(bool) + Send>;

/// Low-level gesture dispatch sink.
pub trait GestureSink: Send + Sync {
    /// Queue a gesture. Returns whether the platform accepted it.
    fn dispatch(&self, gesture: Gesture, on_complete: Option<GestureCallback>) -> bool;
}

/// Current screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

pub trait ScreenMetrics: Send + Sync {
    fn screen_size(&self) -> ScreenSize;
}

/// Fire-and-forget user-visible status messages (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Window-level operations that are not tied to a node.
pub trait UiHost: Send + Sync {
    /// System "navigate back". Returns whether the platform accepted it.
    fn perform_global_back(&self) -> bool;

    /// Package name of the active window's root, if known.
    fn active_package(&self) -> Option<String>;
}

/// Optional higher-trust click injector.
///
/// Returns `Some(result)` when it performed the click out-of-band, or `None`
/// when it is unavailable and the caller should synthesize a gesture instead.
pub type PrivilegedClick = dyn Fn(f32, f32) -> Option<bool> + Send + Sync;

/// All surface collaborators a strategy may need.
#[derive(Clone)]
pub struct Surface {
    pub host: Arc<dyn UiHost>,
    pub gestures: Arc<dyn GestureSink>,
    pub screen: Arc<dyn ScreenMetrics>,
    pub notifier: Arc<dyn Notifier>,
}

impl Surface {
    /// Build a surface from one object that implements every collaborator,
    /// which is how most platform adapters are shaped.
    pub fn from_shared<T>(inner: Arc<T>) -> Self
    where
        T: UiHost + GestureSink + ScreenMetrics + Notifier + 'static,
    {
        Self {
            host: inner.clone(),
            gestures: inner.clone(),
            screen: inner.clone(),
            notifier: inner,
        }
    }

    pub fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }

    /// Dispatch without a completion callback.
    pub fn dispatch(&self, gesture: Gesture) -> bool {
        log::debug!(
            "dispatch gesture: {} point(s) from {:?} over {:?}",
            gesture.path.len(),
            gesture.start(),
            gesture.duration,
        );
        self.gestures.dispatch(gesture, None)
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").finish_non_exhaustive()
    }
}
