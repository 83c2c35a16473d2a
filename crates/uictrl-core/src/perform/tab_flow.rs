//! Tab validation: find a container of tall children and walk through it
//! with a scripted swipe/tap choreography.
//!
//! [`run_tab_validation_flow`] runs synchronously and blocks its thread for
//! the whole choreography plus a completion wait proportional to the number
//! of children (tens of seconds with the default timings). Dispatch it from a
//! worker thread.

use anyhow::Context;

use crate::config::SwipeConfig;
use crate::descriptor::ActionResult;
use crate::position::resolve_point;
use crate::surface::Gesture;
use crate::task::{pause, spawn_task};
use crate::tree::{NodeRef, Point};

use super::{ActionContext, ActionKind};

/// First node, depth-first pre-order, that has more than one child and whose
/// immediate children are all strictly taller than `min_child_height`.
///
/// Each node is visited once. A node with a child the tree can no longer
/// return does not qualify, but its remaining children are still searched.
pub fn find_qualifying_subtree(node: &NodeRef, min_child_height: i32) -> Option<NodeRef> {
    let count = node.child_count();
    let children: Vec<NodeRef> = (0..count).filter_map(|i| node.child(i)).collect();

    if count > 1
        && children.len() == count
        && children.iter().all(|c| c.bounds().height() > min_child_height)
    {
        return Some(node.clone());
    }

    children
        .iter()
        .find_map(|child| find_qualifying_subtree(child, min_child_height))
}

/// Run the choreography for child `index` of `container`, then recurse into
/// the next child. After the last child, two swipe-to-start gestures reset
/// the view.
///
/// Blocks between steps. Fails if a child disappears mid-sequence.
pub fn drive_sequence(ctx: &ActionContext, container: &NodeRef, index: usize) -> anyhow::Result<()> {
    let flow = &ctx.config.tab_flow;

    for i in 0..flow.swipe_up_count {
        if i > 0 {
            pause(flow.step_pause());
        }
        swipe(ctx, &flow.swipe_up);
    }
    pause(flow.step_pause());

    // On the launcher a downward swipe opens the notification shade.
    let package = ctx.surface.host.active_package().unwrap_or_default();
    if package != flow.home_package {
        swipe(ctx, &flow.swipe_down);
    } else {
        log::debug!("tab flow: on {package}, skipping swipe down");
    }
    pause(flow.step_pause());

    let count = container.child_count();
    let item = container
        .child(index)
        .with_context(|| format!("child {index} of {count} is no longer available"))?;
    let point = resolve_point(&item.bounds(), None);
    log::debug!("tab flow: tapping child {}/{} at {point}", index + 1, count);
    ctx.surface.dispatch(Gesture::tap(point, flow.tap_duration()));

    if index + 1 < count {
        pause(flow.step_pause());
        drive_sequence(ctx, container, index + 1)
    } else {
        ctx.surface.notify("Tab validation finished");
        swipe(ctx, &flow.swipe_start);
        swipe(ctx, &flow.swipe_start);
        Ok(())
    }
}

/// Search from `node`, drive the sequence over the first match, then wait
/// for it to settle. Always reports accepted.
pub fn run_tab_validation_flow(ctx: &ActionContext, node: &NodeRef) -> ActionResult {
    let kind = ActionKind::OnePathClickTab;
    let flow = &ctx.config.tab_flow;
    ctx.surface.notify("Starting tab validation");

    match find_qualifying_subtree(node, flow.child_height_threshold) {
        Some(container) => {
            let children = container.child_count();
            log::info!("{kind}: container {} with {children} children", container.bounds());
            if let Err(e) = drive_sequence(ctx, &container, 0) {
                log::error!("{kind}: sequence aborted: {e:#}");
                ctx.surface.notify(&format!("Tab validation failed: {e}"));
            }
            pause(flow.completion_wait(children));
        }
        None => log::info!("{kind}: no qualifying container under {}", node.bounds()),
    }

    ActionResult::new(kind.name(), true)
}

/// Tap across a tab strip on a worker thread: every interval, tap the
/// `i`-th slot of the node's width, just below its top edge.
pub fn click_position(ctx: &ActionContext, node: &NodeRef) -> ActionResult {
    let kind = ActionKind::ClickPosition;
    ctx.surface.notify("Switching tabs");
    let surface = ctx.surface.clone();
    let config = ctx.config.clone();
    let node = node.clone();

    let spawned = spawn_task(kind.name(), &ctx.surface, std::time::Duration::ZERO, move || {
        let cfg = &config.click_position;
        for i in 0..cfg.repeat as usize {
            pause(cfg.interval());
            let rect = node.bounds();
            let count = node.child_count();
            if count <= i {
                continue;
            }
            let slot = rect.width() / count as i32;
            let point = Point::new((slot * (i as i32 + 1)) as f32, (rect.top + cfg.y_offset) as f32);
            log::debug!("{kind}: tab {}/{} at {point}", i + 1, count);
            surface.dispatch(Gesture::tap(point, cfg.duration()));
        }
        Ok(())
    });
    ActionResult::new(kind.name(), spawned)
}

fn swipe(ctx: &ActionContext, cfg: &SwipeConfig) {
    ctx.surface.dispatch(Gesture::from_swipe_config(cfg));
}
