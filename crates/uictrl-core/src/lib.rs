//! uictrl-core: action dispatch and coordination for automated UI interaction.
//!
//! A matched rule hands the engine an [`ActionDescriptor`] and a target node;
//! the engine resolves the named strategy, drives the node or the gesture
//! surface, and reports an [`ActionResult`]. Some strategies run on background
//! threads and coordinate through a shared [`Signal`].

pub mod config;
pub mod descriptor;
pub mod engine;
pub mod mock_surface;
pub mod perform;
pub mod position;
pub mod signal;
pub mod surface;
pub mod task;
pub mod tree;

pub use config::Config;
pub use descriptor::{ActionDescriptor, ActionResult};
pub use engine::Engine;
pub use mock_surface::{MockNode, MockNodeSpec, MockSurface};
pub use perform::{ActionContext, ActionKind};
pub use position::{Offset, Position};
pub use signal::Signal;
pub use surface::{Gesture, GestureSink, Notifier, PrivilegedClick, ScreenMetrics, ScreenSize, Surface, UiHost};
pub use tree::{NodeAction, NodeRef, Point, UiNode, UiRect};
