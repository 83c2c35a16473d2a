//! Dispatch entry point for the upstream policy layer.

use std::sync::Arc;

use crate::config::Config;
use crate::descriptor::{ActionDescriptor, ActionResult};
use crate::perform::{ActionContext, ActionKind};
use crate::signal::Signal;
use crate::surface::{PrivilegedClick, Surface};
use crate::tree::NodeRef;

/// Resolves descriptors to strategies and runs them against one surface.
pub struct Engine {
    ctx: ActionContext,
}

impl Engine {
    pub fn new(surface: Surface, config: Config) -> Self {
        Self { ctx: ActionContext::new(surface, config) }
    }

    /// Use `signal` for the coordinated input stages instead of a private one.
    pub fn with_signal(mut self, signal: Arc<Signal>) -> Self {
        self.ctx = self.ctx.with_signal(signal);
        self
    }

    pub fn signal(&self) -> &Arc<Signal> {
        &self.ctx.signal
    }

    /// Run the strategy named by `descriptor` against `node`.
    ///
    /// Runs on the caller's thread. Background strategies return as soon as
    /// their worker is spawned, so `result` only means "accepted" for them.
    /// `onePathClickTab` blocks for its whole sequence.
    pub fn perform(
        &self,
        descriptor: &ActionDescriptor,
        node: &NodeRef,
        privileged: Option<&Arc<PrivilegedClick>>,
    ) -> ActionResult {
        let kind = ActionKind::resolve(descriptor.action.as_deref());
        if descriptor.action.as_deref().is_some_and(|name| name != kind.name()) {
            log::debug!(
                "unknown action {:?} for {:?}, using {}",
                descriptor.action,
                descriptor.selector,
                kind
            );
        }
        log::debug!("perform {kind} on {} ({:?})", node.bounds(), descriptor.selector);

        let result = kind.perform(&self.ctx, node, descriptor.position.as_ref(), privileged);

        if kind.is_background() {
            log::info!("{}: {result} (running in background)", descriptor.selector);
        } else {
            log::info!("{}: {result}", descriptor.selector);
        }
        result
    }

    /// Release any coordinated stage still waiting on the signal.
    pub fn shutdown(&self) {
        self.ctx.signal.close();
    }
}
