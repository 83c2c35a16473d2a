//! Text-injection strategies that run on worker threads.
//!
//! The coordinated pair models a form where each field is matched and
//! dispatched independently, yet the second field must only be filled after
//! the first one is done:
//!
//! - the producer (`inputUserNameMutex`) fills its field, then raises the
//!   context's [`Signal`](crate::signal::Signal);
//! - a consumer (`inputPassWordMutex`, `inputCodeMutex`) blocks until the
//!   signal is raised, fills its field, then lowers the signal.
//!
//! The legacy loops fill a field a fixed number of times with no
//! coordination. Every strategy here returns an accepted result at once.

use std::sync::Arc;
use std::time::Duration;

use crate::config::InputConfig;
use crate::descriptor::ActionResult;
use crate::position::{resolve_point, within_screen, Position};
use crate::surface::{Gesture, PrivilegedClick, Surface};
use crate::task::{pause, spawn_task};
use crate::tree::{NodeAction, NodeRef};

use super::{ActionContext, ActionKind};

/// Which payload a stage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserName,
    Password,
    Code,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::UserName => "Username",
            Field::Password => "Password",
            Field::Code => "Verification code",
        }
    }

    pub fn payload(self, cfg: &InputConfig) -> &str {
        match self {
            Field::UserName => &cfg.username,
            Field::Password => &cfg.password,
            Field::Code => &cfg.code,
        }
    }
}

/// Focus → activate → settle → set text → settle → clear focus.
///
/// Every step is best-effort; rejections are reported, not fatal.
pub fn enter_text(surface: &Surface, node: &NodeRef, field: Field, text: &str, settle: Duration) {
    let label = field.label();
    if node.perform(&NodeAction::Focus) {
        surface.notify(&format!("{label} field focused"));
    } else {
        surface.notify(&format!("{label} field could not be focused"));
    }
    if !node.perform(&NodeAction::Click) {
        log::debug!("{label}: activate rejected");
    }
    pause(settle);

    if node.perform(&NodeAction::SetText(text.to_string())) {
        log::debug!("{label}: set {} chars", text.chars().count());
    } else {
        log::warn!("{label}: set text rejected");
    }
    surface.notify(&format!("{label} entered"));
    pause(settle);

    if node.perform(&NodeAction::ClearFocus) {
        surface.notify(&format!("{label} field released"));
    } else {
        surface.notify(&format!("{label} field could not be released"));
    }
}

/// Fill `field`, then raise the signal for the waiting consumer.
pub fn input_producer(ctx: &ActionContext, node: &NodeRef, kind: ActionKind, field: Field) -> ActionResult {
    let surface = ctx.surface.clone();
    let config = ctx.config.clone();
    let signal = ctx.signal.clone();
    let node = node.clone();

    let spawned = spawn_task(kind.name(), &ctx.surface, config.input.handshake_settle(), move || {
        surface.notify(&format!("Entering {}", field.label().to_lowercase()));
        enter_text(
            &surface,
            &node,
            field,
            field.payload(&config.input),
            config.input.focus_settle(),
        );
        signal.set(true);
        log::info!("{}: stage complete, signal raised", kind);
        Ok(())
    });
    ActionResult::new(kind.name(), spawned)
}

/// Wait for the producer's signal, fill `field`, then lower the signal.
///
/// A consumer started while the signal is already raised proceeds at once.
pub fn input_consumer(ctx: &ActionContext, node: &NodeRef, kind: ActionKind, field: Field) -> ActionResult {
    let surface = ctx.surface.clone();
    let config = ctx.config.clone();
    let signal = ctx.signal.clone();
    let node = node.clone();

    let spawned = spawn_task(kind.name(), &ctx.surface, Duration::ZERO, move || {
        surface.notify(&format!("Waiting to enter {}", field.label().to_lowercase()));
        if !signal.wait_true() {
            log::info!("{}: signal closed before the previous stage completed", kind);
            return Ok(());
        }
        surface.notify(&format!("Entering {}", field.label().to_lowercase()));
        enter_text(
            &surface,
            &node,
            field,
            field.payload(&config.input),
            config.input.focus_settle(),
        );
        signal.set(false);
        log::info!("{}: stage complete, signal lowered", kind);
        Ok(())
    });
    ActionResult::new(kind.name(), spawned)
}

/// Focus, click, wait, set text; `repeat` times, uncoordinated.
pub fn input_loop(
    ctx: &ActionContext,
    node: &NodeRef,
    kind: ActionKind,
    field: Field,
    repeat: u32,
) -> ActionResult {
    ctx.surface.notify("Starting text input");
    let surface = ctx.surface.clone();
    let config = ctx.config.clone();
    let node = node.clone();

    let spawned = spawn_task(kind.name(), &ctx.surface, Duration::ZERO, move || {
        let text = field.payload(&config.input);
        for i in 0..repeat {
            node.perform(&NodeAction::Focus);
            node.perform(&NodeAction::Click);
            pause(config.input.legacy_interval());

            surface.notify(&format!("Entering {}", field.label().to_lowercase()));
            log::debug!("{}: iteration {}/{}, {} children", kind, i + 1, repeat, node.child_count());
            node.perform(&NodeAction::SetText(text.to_string()));
        }
        Ok(())
    });
    ActionResult::new(kind.name(), spawned)
}

/// Click the node's resolved point after the configured delay.
///
/// The point is validated up front so an off-screen target fails
/// synchronously; the click itself happens on a worker thread.
pub fn login_bind(
    ctx: &ActionContext,
    node: &NodeRef,
    position: Option<&Position>,
    privileged: Option<&Arc<PrivilegedClick>>,
) -> ActionResult {
    let kind = ActionKind::LoginBind;
    let point = resolve_point(&node.bounds(), position);
    let screen = ctx.surface.screen.screen_size();
    if !within_screen(point, screen) {
        log::warn!("{kind}: point {point} outside {}x{} screen", screen.width, screen.height);
        return ActionResult::new(kind.name(), false);
    }

    let surface = ctx.surface.clone();
    let config = ctx.config.clone();
    let privileged = privileged.cloned();

    let spawned = spawn_task(kind.name(), &ctx.surface, Duration::ZERO, move || {
        pause(config.input.login_bind_delay());
        let result = match privileged.as_ref().and_then(|inject| inject(point.x, point.y)) {
            Some(result) => result,
            None => surface.dispatch(Gesture::tap(point, config.gesture.tap_duration())),
        };
        log::info!("{kind}: delayed click at {point} -> {result}");
        Ok(())
    });
    ActionResult::new(kind.name(), spawned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mock_surface::{MockNode, MockSurface};
    use crate::signal::Signal;
    use crate::tree::{Point, UiRect};

    fn wait_for(cond: impl Fn() -> bool) -> bool {
        for _ in 0..200 {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        cond()
    }

    fn config() -> Config {
        let mut cfg = Config::instant();
        cfg.input.username = "alice".into();
        cfg.input.password = "hunter2".into();
        cfg.input.code = "123456".into();
        cfg
    }

    fn ctx() -> (ActionContext, Arc<MockSurface>) {
        let (surface, mock) = MockSurface::shared();
        (ActionContext::new(surface, config()), mock)
    }

    fn field_node() -> Arc<MockNode> {
        MockNode::new(UiRect::new(0, 100, 1080, 200)).build()
    }

    #[test]
    fn enter_text_sequence() {
        let (ctx, mock) = ctx();
        let node = field_node();
        enter_text(&ctx.surface, &(node.clone() as NodeRef), Field::Password, "pw", Duration::ZERO);
        assert_eq!(
            node.performed(),
            vec![
                NodeAction::Focus,
                NodeAction::Click,
                NodeAction::SetText("pw".into()),
                NodeAction::ClearFocus
            ]
        );
        assert_eq!(
            mock.notifications(),
            vec!["Password field focused", "Password entered", "Password field released"]
        );
    }

    #[test]
    fn enter_text_reports_rejections() {
        let (ctx, mock) = ctx();
        let node = MockNode::new(UiRect::default()).rejecting().build();
        enter_text(&ctx.surface, &(node as NodeRef), Field::Code, "1", Duration::ZERO);
        let notes = mock.notifications();
        assert!(notes.contains(&"Verification code field could not be focused".to_string()));
        assert!(notes.contains(&"Verification code field could not be released".to_string()));
    }

    #[test]
    fn producer_then_consumer_in_order() {
        let (ctx, _mock) = ctx();
        let user = field_node();
        let pass = field_node();

        let consumer = input_consumer(&ctx, &(pass.clone() as NodeRef), ActionKind::InputPassWordMutex, Field::Password);
        assert_eq!(consumer, ActionResult::new("inputPassWordMutex", true));

        std::thread::sleep(Duration::from_millis(30));
        assert!(pass.performed().is_empty(), "consumer must wait for the signal");

        let producer = input_producer(&ctx, &(user.clone() as NodeRef), ActionKind::InputUserNameMutex, Field::UserName);
        assert_eq!(producer, ActionResult::new("inputUserNameMutex", true));

        assert!(wait_for(|| pass.performed().len() == 4));
        let stage = |text: &str| {
            vec![
                NodeAction::Focus,
                NodeAction::Click,
                NodeAction::SetText(text.into()),
                NodeAction::ClearFocus,
            ]
        };
        assert_eq!(user.performed(), stage("alice"));
        assert_eq!(pass.performed(), stage("hunter2"));
        assert!(wait_for(|| !ctx.signal.get()), "consumer lowers the signal");

        // One raise, one reaction.
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(pass.texts().len(), 1);
    }

    #[test]
    fn producer_activates_field_before_raising() {
        let (ctx, _mock) = ctx();
        let user = field_node();

        input_producer(&ctx, &(user.clone() as NodeRef), ActionKind::InputUserNameMutex, Field::UserName);

        assert!(wait_for(|| ctx.signal.get()));
        assert_eq!(&user.performed()[..2], &[NodeAction::Focus, NodeAction::Click]);
    }

    #[test]
    fn late_consumer_reacts_immediately() {
        let (ctx, _mock) = ctx();
        ctx.signal.set(true);
        let code = field_node();

        input_consumer(&ctx, &(code.clone() as NodeRef), ActionKind::InputCodeMutex, Field::Code);

        assert!(wait_for(|| code.texts() == vec!["123456".to_string()]));
        assert!(wait_for(|| !ctx.signal.get()));
    }

    #[test]
    fn closed_signal_ends_consumer_without_input() {
        let (surface, _mock) = MockSurface::shared();
        let signal = Arc::new(Signal::new());
        let ctx = ActionContext::new(surface, config()).with_signal(signal.clone());
        let pass = field_node();

        input_consumer(&ctx, &(pass.clone() as NodeRef), ActionKind::InputPassWordMutex, Field::Password);
        signal.close();

        std::thread::sleep(Duration::from_millis(50));
        assert!(pass.performed().is_empty());
    }

    #[test]
    fn independent_signals_do_not_cross() {
        let (surface, _mock) = MockSurface::shared();
        let a = ActionContext::new(surface.clone(), config());
        let b = ActionContext::new(surface, config());
        let user = field_node();
        let pass = field_node();

        input_consumer(&b, &(pass.clone() as NodeRef), ActionKind::InputPassWordMutex, Field::Password);
        input_producer(&a, &(user.clone() as NodeRef), ActionKind::InputUserNameMutex, Field::UserName);

        assert!(wait_for(|| a.signal.get()));
        std::thread::sleep(Duration::from_millis(30));
        assert!(pass.performed().is_empty());
        b.signal.close();
    }

    #[test]
    fn legacy_loop_repeats() {
        let (ctx, _mock) = ctx();
        let node = field_node();

        let result = input_loop(&ctx, &(node.clone() as NodeRef), ActionKind::InputPassWord, Field::Password, 5);

        assert_eq!(result, ActionResult::new("inputPassWord", true));
        assert!(wait_for(|| node.texts().len() == 5));
        assert!(node.texts().iter().all(|t| t == "hunter2"));
        let performed = node.performed();
        assert_eq!(&performed[..3], &[NodeAction::Focus, NodeAction::Click, NodeAction::SetText("hunter2".into())]);
    }

    #[test]
    fn login_bind_off_screen_fails_synchronously() {
        let (ctx, mock) = ctx();
        let node = MockNode::new(UiRect::new(-50, -50, -10, -10)).build();

        let result = login_bind(&ctx, &(node as NodeRef), None, None);

        assert_eq!(result, ActionResult::new("loginBind", false));
        std::thread::sleep(Duration::from_millis(30));
        assert!(mock.gestures().is_empty());
    }

    #[test]
    fn login_bind_taps_later() {
        let (ctx, mock) = ctx();
        let node = MockNode::new(UiRect::new(10, 10, 110, 60)).build();

        assert!(login_bind(&ctx, &(node as NodeRef), None, None).result);

        assert!(wait_for(|| mock.taps().len() == 1));
        assert_eq!(mock.taps()[0].start(), Some(Point::new(60.0, 35.0)));
    }

    #[test]
    fn login_bind_prefers_privileged_click() {
        let (ctx, mock) = ctx();
        let node = MockNode::new(UiRect::new(10, 10, 110, 60)).build();
        let (tx, rx) = std::sync::mpsc::channel();
        let tx = std::sync::Mutex::new(tx);
        let inject: Arc<PrivilegedClick> = Arc::new(move |x: f32, y: f32| {
            tx.lock().unwrap().send((x, y)).unwrap();
            Some(true)
        });

        assert!(login_bind(&ctx, &(node as NodeRef), None, Some(&inject)).result);

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), (60.0, 35.0));
        std::thread::sleep(Duration::from_millis(20));
        assert!(mock.gestures().is_empty());
    }
}
