// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Single-use rendezvous barrier.

use parking_lot::{Condvar, Mutex};
use tracing::trace;

#[derive(Debug)]
struct Gate {
    arrived: usize,
    open: bool,
}

/// A counted rendezvous gate for a fixed number of parties.
///
/// The gate opens when the last party arrives and then stays open: it is never re-armed.
/// Parties arriving after that point pass through without blocking.
///
/// Unlike [`std::sync::Barrier`], a party may also [`arrive`](Barrier::arrive) without
/// waiting.  Tasks that have nothing to measure use this to be counted without holding
/// their thread.
#[derive(Debug)]
pub struct Barrier {
    parties: usize,
    gate: Mutex<Gate>,
    cvar: Condvar,
}

/// Outcome of [`Barrier::wait`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BarrierWaitResult(bool);

impl BarrierWaitResult {
    /// True for the one party whose arrival opened the gate.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.0
    }
}

impl Barrier {
    #[must_use]
    pub fn new(parties: usize) -> Barrier {
        Barrier {
            parties,
            gate: Mutex::new(Gate {
                arrived: 0,
                open: parties == 0,
            }),
            cvar: Condvar::new(),
        }
    }

    #[must_use]
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Whether all parties have arrived.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.gate.lock().open
    }

    /// Count one arrival, opening the gate if it was the last one.
    /// Returns true if this arrival opened the gate.
    fn enter(&self, gate: &mut Gate) -> bool {
        if gate.open {
            return false;
        }
        gate.arrived += 1;
        trace!("barrier: {}/{} parties arrived", gate.arrived, self.parties);
        if gate.arrived >= self.parties {
            gate.open = true;
            self.cvar.notify_all();
            return true;
        }
        false
    }

    /// Arrive at the barrier and block until all parties have arrived.
    ///
    /// There is no timeout: a party that never shows up hangs the others.
    pub fn wait(&self) -> BarrierWaitResult {
        let mut gate = self.gate.lock();
        let leader = self.enter(&mut gate);
        while !gate.open {
            self.cvar.wait(&mut gate);
        }
        BarrierWaitResult(leader)
    }

    /// Arrive at the barrier without waiting for the other parties.
    pub fn arrive(&self) -> BarrierWaitResult {
        let mut gate = self.gate.lock();
        BarrierWaitResult(self.enter(&mut gate))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::Barrier;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn releases_all_after_last_arrival() {
        const PARTIES: usize = 4;
        let barrier = Arc::new(Barrier::new(PARTIES));
        let released = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        let handles: Vec<_> = (0..PARTIES - 1)
            .map(|_| {
                let barrier = barrier.clone();
                let released = released.clone();
                let tx = tx.clone();
                thread::spawn(move || {
                    let result = barrier.wait();
                    released.fetch_add(1, Ordering::SeqCst);
                    tx.send(result.is_leader()).unwrap();
                })
            })
            .collect();

        // nobody gets through while a party is missing
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(released.load(Ordering::SeqCst), 0);
        assert!(!barrier.is_open());

        let last = barrier.wait();
        assert!(last.is_leader());
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), PARTIES - 1);
        let leaders = rx.try_iter().filter(|leader| *leader).count();
        assert_eq!(leaders, 0);
        assert!(barrier.is_open());
    }

    #[test]
    fn arrive_counts_without_blocking() {
        let barrier = Arc::new(Barrier::new(2));
        let waiter = {
            let barrier = barrier.clone();
            thread::spawn(move || barrier.wait().is_leader())
        };
        thread::sleep(Duration::from_millis(20));
        assert!(barrier.arrive().is_leader());
        assert!(!waiter.join().unwrap());
    }

    #[test]
    fn stays_open_once_released() {
        let barrier = Barrier::new(1);
        assert!(barrier.wait().is_leader());
        // single use: late callers pass straight through
        assert!(!barrier.wait().is_leader());
        assert!(!barrier.arrive().is_leader());
        assert!(barrier.is_open());
    }

    #[test]
    fn zero_parties_is_open() {
        let barrier = Barrier::new(0);
        assert!(barrier.is_open());
        assert!(!barrier.wait().is_leader());
    }
}
