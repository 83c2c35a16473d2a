//! Config: nested sections for each strategy family.
//!
//! Every timing, coordinate and threshold the strategies use lives here so it
//! can be retuned without touching code. The defaults are the values the
//! strategies were tuned against on a 1080x1920 device.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::tree::Point;

// ── Shared shapes ──────────────────────────────────────────────────────────

/// A fixed straight swipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    pub from: Point,
    pub to: Point,
    pub duration_ms: u64,
}

impl SwipeConfig {
    pub fn new(from: (f32, f32), to: (f32, f32), duration_ms: u64) -> Self {
        Self {
            from: Point::new(from.0, from.1),
            to: Point::new(to.0, to.1),
            duration_ms,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Same stroke walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            duration_ms: self.duration_ms,
        }
    }
}

// ── Sub-configs ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Press duration of a synthesized tap (the platform tap timeout).
    #[serde(default = "default_tap_duration_ms")]
    pub tap_duration_ms: u64,
    /// Press duration of a synthesized long press. Must stay above the
    /// platform's long-press threshold or the press registers as a tap.
    #[serde(default = "default_long_press_duration_ms")]
    pub long_press_duration_ms: u64,
    #[serde(default = "default_handle_start_swipe")]
    pub handle_start_swipe: SwipeConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_duration_ms: default_tap_duration_ms(),
            long_press_duration_ms: default_long_press_duration_ms(),
            handle_start_swipe: default_handle_start_swipe(),
        }
    }
}

impl GestureConfig {
    pub fn tap_duration(&self) -> Duration {
        Duration::from_millis(self.tap_duration_ms)
    }

    pub fn long_press_duration(&self) -> Duration {
        Duration::from_millis(self.long_press_duration_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub code: String,
    /// Pause after focusing and after setting text.
    #[serde(default = "default_focus_settle_ms")]
    pub focus_settle_ms: u64,
    /// Pause the producer takes after raising the signal.
    #[serde(default = "default_handshake_settle_ms")]
    pub handshake_settle_ms: u64,
    #[serde(default = "default_legacy_repeat")]
    pub legacy_repeat: u32,
    #[serde(default = "default_code_repeat")]
    pub code_repeat: u32,
    #[serde(default = "default_legacy_interval_ms")]
    pub legacy_interval_ms: u64,
    #[serde(default = "default_login_bind_delay_ms")]
    pub login_bind_delay_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            code: String::new(),
            focus_settle_ms: default_focus_settle_ms(),
            handshake_settle_ms: default_handshake_settle_ms(),
            legacy_repeat: default_legacy_repeat(),
            code_repeat: default_code_repeat(),
            legacy_interval_ms: default_legacy_interval_ms(),
            login_bind_delay_ms: default_login_bind_delay_ms(),
        }
    }
}

impl InputConfig {
    pub fn focus_settle(&self) -> Duration {
        Duration::from_millis(self.focus_settle_ms)
    }

    pub fn handshake_settle(&self) -> Duration {
        Duration::from_millis(self.handshake_settle_ms)
    }

    pub fn legacy_interval(&self) -> Duration {
        Duration::from_millis(self.legacy_interval_ms)
    }

    pub fn login_bind_delay(&self) -> Duration {
        Duration::from_millis(self.login_bind_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabFlowConfig {
    /// Every child of a qualifying container must be strictly taller than this.
    #[serde(default = "default_child_height_threshold")]
    pub child_height_threshold: i32,
    #[serde(default = "default_swipe_up_count")]
    pub swipe_up_count: u32,
    #[serde(default = "default_step_pause_ms")]
    pub step_pause_ms: u64,
    #[serde(default = "default_swipe_up")]
    pub swipe_up: SwipeConfig,
    #[serde(default = "default_swipe_down")]
    pub swipe_down: SwipeConfig,
    #[serde(default = "default_swipe_start")]
    pub swipe_start: SwipeConfig,
    /// Launcher package on which the swipe-down step is skipped.
    #[serde(default = "default_home_package")]
    pub home_package: String,
    #[serde(default = "default_tab_tap_duration_ms")]
    pub tap_duration_ms: u64,
    /// Post-sequence wait per child of the matched container.
    #[serde(default = "default_per_child_wait_ms")]
    pub per_child_wait_ms: u64,
}

impl Default for TabFlowConfig {
    fn default() -> Self {
        Self {
            child_height_threshold: default_child_height_threshold(),
            swipe_up_count: default_swipe_up_count(),
            step_pause_ms: default_step_pause_ms(),
            swipe_up: default_swipe_up(),
            swipe_down: default_swipe_down(),
            swipe_start: default_swipe_start(),
            home_package: default_home_package(),
            tap_duration_ms: default_tab_tap_duration_ms(),
            per_child_wait_ms: default_per_child_wait_ms(),
        }
    }
}

impl TabFlowConfig {
    pub fn step_pause(&self) -> Duration {
        Duration::from_millis(self.step_pause_ms)
    }

    pub fn tap_duration(&self) -> Duration {
        Duration::from_millis(self.tap_duration_ms)
    }

    /// How long the flow blocks after the sequence for a container with
    /// `children` children.
    pub fn completion_wait(&self, children: usize) -> Duration {
        Duration::from_millis(self.per_child_wait_ms.saturating_mul(children as u64))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickPositionConfig {
    #[serde(default = "default_click_position_repeat")]
    pub repeat: u32,
    #[serde(default = "default_click_position_interval_ms")]
    pub interval_ms: u64,
    /// Offset below the container's top edge where the taps land.
    #[serde(default = "default_click_position_y_offset")]
    pub y_offset: i32,
    #[serde(default = "default_click_position_duration_ms")]
    pub duration_ms: u64,
}

impl Default for ClickPositionConfig {
    fn default() -> Self {
        Self {
            repeat: default_click_position_repeat(),
            interval_ms: default_click_position_interval_ms(),
            y_offset: default_click_position_y_offset(),
            duration_ms: default_click_position_duration_ms(),
        }
    }
}

impl ClickPositionConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

// ── Top-level config ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub tab_flow: TabFlowConfig,
    #[serde(default)]
    pub click_position: ClickPositionConfig,
}

impl Config {
    /// Defaults with every pause and wait set to zero. Gesture durations are
    /// kept since they describe strokes, not waits.
    pub fn instant() -> Self {
        let mut cfg = Self::default();
        cfg.input.focus_settle_ms = 0;
        cfg.input.handshake_settle_ms = 0;
        cfg.input.legacy_interval_ms = 0;
        cfg.input.login_bind_delay_ms = 0;
        cfg.tab_flow.step_pause_ms = 0;
        cfg.tab_flow.per_child_wait_ms = 0;
        cfg.click_position.interval_ms = 0;
        cfg
    }
}

// ── Defaults ───────────────────────────────────────────────────────────────

fn default_tap_duration_ms() -> u64 { 100 }
fn default_long_press_duration_ms() -> u64 { 400 }
fn default_handle_start_swipe() -> SwipeConfig { SwipeConfig::new((950.0, 1400.0), (120.0, 1333.0), 500) }
fn default_focus_settle_ms() -> u64 { 500 }
fn default_handshake_settle_ms() -> u64 { 200 }
fn default_legacy_repeat() -> u32 { 5 }
fn default_code_repeat() -> u32 { 1 }
fn default_legacy_interval_ms() -> u64 { 1000 }
fn default_login_bind_delay_ms() -> u64 { 6000 }
fn default_child_height_threshold() -> i32 { 50 }
fn default_swipe_up_count() -> u32 { 4 }
fn default_step_pause_ms() -> u64 { 1000 }
fn default_swipe_up() -> SwipeConfig { SwipeConfig::new((724.0, 1840.0), (622.0, 733.0), 150) }
fn default_swipe_down() -> SwipeConfig { default_swipe_up().reversed() }
fn default_swipe_start() -> SwipeConfig { SwipeConfig::new((1050.0, 1050.0), (722.0, 1050.0), 150) }
fn default_home_package() -> String { "com.miui.home".into() }
fn default_tab_tap_duration_ms() -> u64 { 1 }
fn default_per_child_wait_ms() -> u64 { 7000 }
fn default_click_position_repeat() -> u32 { 5 }
fn default_click_position_interval_ms() -> u64 { 3000 }
fn default_click_position_y_offset() -> i32 { 90 }
fn default_click_position_duration_ms() -> u64 { 200 }

// ── Load ───────────────────────────────────────────────────────────────────

/// `config.json` next to the running binary.
pub fn config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("config.json")))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// Load config from `config.json` next to the binary.
pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(&config_path())
}

/// Load config from `path`. A missing file yields the defaults; a file that
/// exists but does not parse is an error.
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    let cfg: Config = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Loaded config from {:?}", path);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_tuned_values() {
        let cfg = Config::default();
        assert_eq!(cfg.gesture.tap_duration_ms, 100);
        assert_eq!(cfg.gesture.long_press_duration_ms, 400);
        assert_eq!(cfg.tab_flow.child_height_threshold, 50);
        assert_eq!(cfg.tab_flow.swipe_up_count, 4);
        assert_eq!(cfg.tab_flow.home_package, "com.miui.home");
        assert_eq!(cfg.tab_flow.per_child_wait_ms, 7000);
        assert_eq!(cfg.input.legacy_repeat, 5);
        assert_eq!(cfg.input.code_repeat, 1);
        assert_eq!(cfg.click_position.y_offset, 90);
    }

    #[test]
    fn long_press_exceeds_tap() {
        let cfg = GestureConfig::default();
        assert!(cfg.long_press_duration() > cfg.tap_duration());
    }

    #[test]
    fn swipe_down_is_reverse_of_up() {
        let cfg = TabFlowConfig::default();
        assert_eq!(cfg.swipe_down.from, cfg.swipe_up.to);
        assert_eq!(cfg.swipe_down.to, cfg.swipe_up.from);
        assert_eq!(cfg.swipe_down.duration_ms, cfg.swipe_up.duration_ms);
    }

    #[test]
    fn completion_wait_scales_with_children() {
        let cfg = TabFlowConfig::default();
        assert_eq!(cfg.completion_wait(3), Duration::from_secs(21));
        assert_eq!(cfg.completion_wait(0), Duration::ZERO);
    }

    #[test]
    fn instant_zeroes_waits_only() {
        let cfg = Config::instant();
        assert_eq!(cfg.input.focus_settle_ms, 0);
        assert_eq!(cfg.tab_flow.step_pause_ms, 0);
        assert_eq!(cfg.tab_flow.per_child_wait_ms, 0);
        assert_eq!(cfg.click_position.interval_ms, 0);
        assert_eq!(cfg.gesture.long_press_duration_ms, 400);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let json = r#"{ "gesture": { "long_press_duration_ms": 600 }, "input": { "username": "alice" } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.gesture.long_press_duration_ms, 600);
        assert_eq!(cfg.gesture.tap_duration_ms, 100);
        assert_eq!(cfg.input.username, "alice");
        assert_eq!(cfg.input.focus_settle_ms, 500);
        assert_eq!(cfg.tab_flow.swipe_up_count, 4);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(cfg.gesture.tap_duration_ms, 100);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tab_flow": {{ "home_package": "org.example.launcher" }} }}"#).unwrap();
        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.tab_flow.home_package, "org.example.launcher");
    }

    #[test]
    fn load_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
