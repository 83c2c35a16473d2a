//! Background tasks: fire-and-forget worker threads for strategies that
//! outlive their dispatch call.
//!
//! Each task owns everything it touches, reports faults only through the log
//! and the notifier, and always runs its cleanup step via [`TaskGuard`].

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use crate::surface::Surface;

/// Sleep for `d`, skipping the syscall for zero.
pub fn pause(d: Duration) {
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}

/// Cleanup step of a background task. Runs on drop, so it also runs when
/// the body returned an error or panicked.
pub struct TaskGuard {
    name: String,
    settle: Duration,
}

impl TaskGuard {
    pub fn new(name: impl Into<String>, settle: Duration) -> Self {
        Self { name: name.into(), settle }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        pause(self.settle);
        log::debug!("task {}: finished", self.name);
    }
}

/// Spawn `body` on a named worker thread.
///
/// Returns `false` only when the thread could not be spawned. An `Err` or a
/// panic from `body` is logged and surfaced through the notifier; it never
/// reaches the caller.
pub fn spawn_task<F>(name: &str, surface: &Surface, settle: Duration, body: F) -> bool
where
    F: FnOnce() -> anyhow::Result<()> + Send + 'static,
{
    let task_name = name.to_string();
    let surface = surface.clone();
    let spawned = std::thread::Builder::new()
        .name(format!("uictrl-{name}"))
        .spawn(move || {
            let _guard = TaskGuard::new(task_name.clone(), settle);
            log::debug!("task {task_name}: started");
            match std::panic::catch_unwind(AssertUnwindSafe(body)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    log::error!("task {task_name} failed: {e:#}");
                    surface.notify(&format!("Action failed: {e}"));
                }
                Err(panic) => {
                    let msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".into());
                    log::error!("task {task_name} panicked: {msg}");
                    surface.notify(&format!("Action failed: {msg}"));
                }
            }
        });

    match spawned {
        Ok(_) => true,
        Err(e) => {
            log::error!("could not spawn task {name}: {e}");
            false
        }
    }
}
