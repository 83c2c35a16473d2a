//! Strategy registry: the closed set of named actions and their dispatch.
//!
//! Every strategy is a stateless variant of [`ActionKind`]. Names are the
//! wire identifiers the upstream policy sends; an absent or unknown name
//! resolves to [`ActionKind::DEFAULT`] so resolution never fails.

pub mod input;
pub mod primitive;
pub mod tab_flow;

use std::sync::Arc;

use crate::config::Config;
use crate::descriptor::ActionResult;
use crate::position::Position;
use crate::signal::Signal;
use crate::surface::{PrivilegedClick, Surface};
use crate::tree::NodeRef;

/// Everything a strategy may touch besides the target node.
#[derive(Clone, Debug)]
pub struct ActionContext {
    pub surface: Surface,
    pub config: Arc<Config>,
    /// Rendezvous between the coordinated input stages.
    pub signal: Arc<Signal>,
}

impl ActionContext {
    pub fn new(surface: Surface, config: Config) -> Self {
        Self {
            surface,
            config: Arc::new(config),
            signal: Arc::new(Signal::new()),
        }
    }

    /// Share `signal` with other contexts so their coordinated stages pair up.
    pub fn with_signal(mut self, signal: Arc<Signal>) -> Self {
        self.signal = signal;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ClickNode,
    ClickCenter,
    Click,
    LongClickNode,
    LongClickCenter,
    LongClick,
    Back,
    HandleUp,
    HandleDown,
    HandleStart,
    InputUserNameMutex,
    InputPassWordMutex,
    InputCodeMutex,
    InputUserName,
    InputPassWord,
    InputCode,
    LoginBind,
    ClickPosition,
    OnePathClickTab,
}

impl ActionKind {
    pub const DEFAULT: ActionKind = ActionKind::Click;

    pub const ALL: [ActionKind; 19] = [
        ActionKind::ClickNode,
        ActionKind::ClickCenter,
        ActionKind::Click,
        ActionKind::LongClickNode,
        ActionKind::LongClickCenter,
        ActionKind::LongClick,
        ActionKind::Back,
        ActionKind::HandleUp,
        ActionKind::HandleDown,
        ActionKind::HandleStart,
        ActionKind::InputUserNameMutex,
        ActionKind::InputPassWordMutex,
        ActionKind::InputCodeMutex,
        ActionKind::InputUserName,
        ActionKind::InputPassWord,
        ActionKind::InputCode,
        ActionKind::LoginBind,
        ActionKind::ClickPosition,
        ActionKind::OnePathClickTab,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::ClickNode => "clickNode",
            ActionKind::ClickCenter => "clickCenter",
            ActionKind::Click => "click",
            ActionKind::LongClickNode => "longClickNode",
            ActionKind::LongClickCenter => "longClickCenter",
            ActionKind::LongClick => "longClick",
            ActionKind::Back => "back",
            ActionKind::HandleUp => "handleUp",
            ActionKind::HandleDown => "handleDown",
            ActionKind::HandleStart => "handleStart",
            ActionKind::InputUserNameMutex => "inputUserNameMutex",
            ActionKind::InputPassWordMutex => "inputPassWordMutex",
            ActionKind::InputCodeMutex => "inputCodeMutex",
            ActionKind::InputUserName => "inputUserName",
            ActionKind::InputPassWord => "inputPassWord",
            ActionKind::InputCode => "inputCode",
            ActionKind::LoginBind => "loginBind",
            ActionKind::ClickPosition => "clickPosition",
            ActionKind::OnePathClickTab => "onePathClickTab",
        }
    }

    /// Exact-name lookup, falling back to [`ActionKind::DEFAULT`].
    pub fn resolve(name: Option<&str>) -> ActionKind {
        name.and_then(|n| Self::ALL.iter().copied().find(|k| k.name() == n))
            .unwrap_or(Self::DEFAULT)
    }

    /// Strategies whose effect completes on a worker thread after
    /// `perform` has returned an accepted result.
    pub fn is_background(self) -> bool {
        matches!(
            self,
            ActionKind::InputUserNameMutex
                | ActionKind::InputPassWordMutex
                | ActionKind::InputCodeMutex
                | ActionKind::InputUserName
                | ActionKind::InputPassWord
                | ActionKind::InputCode
                | ActionKind::LoginBind
                | ActionKind::ClickPosition
        )
    }

    /// Run the strategy against `node`.
    ///
    /// [`ActionKind::OnePathClickTab`] blocks the calling thread for the whole
    /// scripted sequence; call it from a worker, never from a latency
    /// sensitive path.
    pub fn perform(
        self,
        ctx: &ActionContext,
        node: &NodeRef,
        position: Option<&Position>,
        privileged: Option<&Arc<PrivilegedClick>>,
    ) -> ActionResult {
        let cfg = &ctx.config;
        match self {
            ActionKind::ClickNode => primitive::click_node(node),
            ActionKind::ClickCenter => primitive::click_center(ctx, node, position, privileged),
            ActionKind::Click => primitive::click(ctx, node, position, privileged),
            ActionKind::LongClickNode => primitive::long_click_node(node),
            ActionKind::LongClickCenter => primitive::long_click_center(ctx, node, position),
            ActionKind::LongClick => primitive::long_click(ctx, node, position),
            ActionKind::Back => primitive::back(ctx),
            ActionKind::HandleUp => primitive::scroll(ctx, node, self),
            ActionKind::HandleDown => primitive::scroll(ctx, node, self),
            ActionKind::HandleStart => primitive::handle_start(ctx),
            ActionKind::InputUserNameMutex => input::input_producer(ctx, node, self, input::Field::UserName),
            ActionKind::InputPassWordMutex => input::input_consumer(ctx, node, self, input::Field::Password),
            ActionKind::InputCodeMutex => input::input_consumer(ctx, node, self, input::Field::Code),
            ActionKind::InputUserName => {
                input::input_loop(ctx, node, self, input::Field::UserName, cfg.input.legacy_repeat)
            }
            ActionKind::InputPassWord => {
                input::input_loop(ctx, node, self, input::Field::Password, cfg.input.legacy_repeat)
            }
            ActionKind::InputCode => {
                input::input_loop(ctx, node, self, input::Field::Code, cfg.input.code_repeat)
            }
            ActionKind::LoginBind => input::login_bind(ctx, node, position, privileged),
            ActionKind::ClickPosition => tab_flow::click_position(ctx, node),
            ActionKind::OnePathClickTab => tab_flow::run_tab_validation_flow(ctx, node),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = anyhow::Error;

    /// Strict lookup; use [`ActionKind::resolve`] for the lenient form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown action: {s}"))
    }
}
