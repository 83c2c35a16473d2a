//! Single-step strategies: click, long click, back, scroll.
//!
//! Composite strategies try the node's semantic action first and fall back
//! to a synthesized press at the resolved point.

use std::sync::Arc;
use std::time::Duration;

use crate::descriptor::ActionResult;
use crate::position::{resolve_point, within_screen, Position};
use crate::surface::{Gesture, PrivilegedClick};
use crate::tree::{NodeAction, NodeRef};

use super::{ActionContext, ActionKind};

pub fn click_node(node: &NodeRef) -> ActionResult {
    ActionResult::new(ActionKind::ClickNode.name(), node.perform(&NodeAction::Click))
}

pub fn click_center(
    ctx: &ActionContext,
    node: &NodeRef,
    position: Option<&Position>,
    privileged: Option<&Arc<PrivilegedClick>>,
) -> ActionResult {
    press_at_node(
        ctx,
        ActionKind::ClickCenter,
        node,
        position,
        ctx.config.gesture.tap_duration(),
        privileged,
    )
}

pub fn click(
    ctx: &ActionContext,
    node: &NodeRef,
    position: Option<&Position>,
    privileged: Option<&Arc<PrivilegedClick>>,
) -> ActionResult {
    if node.is_clickable() {
        let result = click_node(node);
        if result.result {
            return result;
        }
        log::debug!("click: semantic click rejected, falling back to gesture");
    }
    click_center(ctx, node, position, privileged)
}

pub fn long_click_node(node: &NodeRef) -> ActionResult {
    ActionResult::new(ActionKind::LongClickNode.name(), node.perform(&NodeAction::LongClick))
}

/// Held press at the resolved point. The privileged injector only models a
/// plain click, so it is not consulted here.
pub fn long_click_center(
    ctx: &ActionContext,
    node: &NodeRef,
    position: Option<&Position>,
) -> ActionResult {
    press_at_node(
        ctx,
        ActionKind::LongClickCenter,
        node,
        position,
        ctx.config.gesture.long_press_duration(),
        None,
    )
}

pub fn long_click(ctx: &ActionContext, node: &NodeRef, position: Option<&Position>) -> ActionResult {
    if node.is_long_clickable() {
        let result = long_click_node(node);
        if result.result {
            return result;
        }
        log::debug!("longClick: semantic long click rejected, falling back to gesture");
    }
    long_click_center(ctx, node, position)
}

pub fn back(ctx: &ActionContext) -> ActionResult {
    ActionResult::new(ActionKind::Back.name(), ctx.surface.host.perform_global_back())
}

/// Focus then scroll. `kind` picks the direction: `HandleUp` scrolls
/// forward, anything else backward.
pub fn scroll(ctx: &ActionContext, node: &NodeRef, kind: ActionKind) -> ActionResult {
    node.perform(&NodeAction::Focus);
    let (action, message) = if kind == ActionKind::HandleUp {
        (NodeAction::ScrollForward, "Scrolling forward")
    } else {
        (NodeAction::ScrollBackward, "Scrolling backward")
    };
    ctx.surface.notify(message);
    ActionResult::new(kind.name(), node.perform(&action))
}

/// One fixed horizontal swipe, reported as accepted.
pub fn handle_start(ctx: &ActionContext) -> ActionResult {
    ctx.surface.notify("Swiping to start");
    ctx.surface
        .dispatch(Gesture::from_swipe_config(&ctx.config.gesture.handle_start_swipe));
    ActionResult::new(ActionKind::HandleStart.name(), true)
}

/// Press at the node's resolved point for `duration`.
///
/// Points outside the screen fail without dispatching anything.
fn press_at_node(
    ctx: &ActionContext,
    kind: ActionKind,
    node: &NodeRef,
    position: Option<&Position>,
    duration: Duration,
    privileged: Option<&Arc<PrivilegedClick>>,
) -> ActionResult {
    let point = resolve_point(&node.bounds(), position);
    let screen = ctx.surface.screen.screen_size();
    if !within_screen(point, screen) {
        log::warn!(
            "{kind}: point {point} outside {}x{} screen, not dispatching",
            screen.width,
            screen.height
        );
        return ActionResult::new(kind.name(), false);
    }

    if let Some(inject) = privileged {
        if let Some(result) = inject(point.x, point.y) {
            log::debug!("{kind}: privileged click at {point} -> {result}");
            return ActionResult::privileged(kind.name(), result);
        }
    }

    let accepted = ctx.surface.dispatch(Gesture::tap(point, duration));
    ActionResult::new(kind.name(), accepted)
}
