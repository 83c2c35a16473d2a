//! Cross-invocation signal: a boolean rendezvous between background tasks
//! launched by unrelated dispatch calls.
//!
//! A producer raises the flag when its stage is done; a consumer blocks until
//! it sees the flag raised, does its own stage, then lowers it again. The
//! flag carries no identity: two consumers waiting at once both wake on one
//! raise, and a consumer that starts while the flag is already up proceeds
//! immediately. One producer/consumer pair at a time is the supported usage.

use std::sync::{Condvar, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    value: bool,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct Signal {
    state: Mutex<State>,
    changed: Condvar,
}

impl Signal {
    /// New signal, lowered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.lock().value
    }

    /// Set the flag and wake every waiter.
    pub fn set(&self, value: bool) {
        let mut state = self.lock();
        state.value = value;
        self.changed.notify_all();
    }

    /// Block until the flag is raised. Returns immediately if it already is.
    ///
    /// Returns `false` if the signal was closed before the flag was observed
    /// raised; the waiter should then tear down without acting.
    pub fn wait_true(&self) -> bool {
        let mut state = self.lock();
        loop {
            if state.value {
                return true;
            }
            if state.closed {
                return false;
            }
            state = match self.changed.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Release every current and future waiter that has not yet seen the
    /// flag raised.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.changed.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // The state is two bools; a panicking holder cannot leave it torn.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn starts_lowered() {
        assert!(!Signal::new().get());
    }

    #[test]
    fn raised_flag_returns_immediately() {
        let signal = Signal::new();
        signal.set(true);
        assert!(signal.wait_true());
    }

    #[test]
    fn waiter_wakes_on_raise() {
        let signal = Arc::new(Signal::new());
        let waiter = {
            let signal = signal.clone();
            std::thread::spawn(move || signal.wait_true())
        };
        std::thread::sleep(Duration::from_millis(20));
        signal.set(true);
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn lowering_does_not_wake_as_raised() {
        let signal = Arc::new(Signal::new());
        let waiter = {
            let signal = signal.clone();
            std::thread::spawn(move || signal.wait_true())
        };
        signal.set(false);
        std::thread::sleep(Duration::from_millis(20));
        assert!(!waiter.is_finished());
        signal.close();
        assert!(!waiter.join().unwrap());
    }

    #[test]
    fn close_releases_waiters() {
        let signal = Arc::new(Signal::new());
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let signal = signal.clone();
                std::thread::spawn(move || signal.wait_true())
            })
            .collect();
        signal.close();
        for w in waiters {
            assert!(!w.join().unwrap());
        }
        assert!(signal.is_closed());
    }

    #[test]
    fn one_raise_wakes_all_waiters() {
        let signal = Arc::new(Signal::new());
        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let signal = signal.clone();
                std::thread::spawn(move || signal.wait_true())
            })
            .collect();
        std::thread::sleep(Duration::from_millis(20));
        signal.set(true);
        for w in waiters {
            assert!(w.join().unwrap());
        }
    }
}
