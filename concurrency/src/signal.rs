// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! One-shot, level-triggered broadcast flag.

use parking_lot::{Condvar, Mutex};

/// A flag that is raised once and observed by any number of waiters.
///
/// Waiting on a signal that was already raised returns immediately, so late waiters never
/// miss it.  Raising it again has no effect.
#[derive(Debug, Default)]
pub struct Signal {
    raised: Mutex<bool>,
    cvar: Condvar,
}

impl Signal {
    #[must_use]
    pub fn new() -> Signal {
        Signal::default()
    }

    /// Raise the signal and wake up all waiters.
    pub fn set(&self) {
        let mut raised = self.raised.lock();
        if !*raised {
            *raised = true;
            self.cvar.notify_all();
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        *self.raised.lock()
    }

    /// Block until the signal has been raised.  No timeout.
    pub fn wait(&self) {
        let mut raised = self.raised.lock();
        while !*raised {
            self.cvar.wait(&mut raised);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::Signal;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wakes_all_waiters() {
        let signal = Arc::new(Signal::new());
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let signal = signal.clone();
                thread::spawn(move || signal.wait())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        assert!(!signal.is_set());
        assert!(waiters.iter().all(|w| !w.is_finished()));
        signal.set();
        for w in waiters {
            w.join().unwrap();
        }
        assert!(signal.is_set());
    }

    #[test]
    fn late_waiter_returns_immediately() {
        let signal = Signal::new();
        signal.set();
        signal.set();
        signal.wait();
        assert!(signal.is_set());
    }
}
