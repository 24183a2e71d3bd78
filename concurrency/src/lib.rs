// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Synchronization primitives shared by the tasks of one test iteration.
//!
//! Tasks of an iteration never talk to each other directly.  They line up on a [`Barrier`]
//! so that measurements start from a comparable instant, and the task that drives traffic
//! raises a [`Signal`] when the traffic window closes.  Both primitives are single use: they
//! are created for one iteration and thrown away with it.

#![deny(clippy::all, clippy::pedantic, clippy::unwrap_used)]

mod barrier;
mod signal;

pub use barrier::{Barrier, BarrierWaitResult};
pub use signal::Signal;

/// The primitives of one test iteration, shared behind an [`std::sync::Arc`].
#[derive(Debug)]
pub struct SyncFabric {
    /// Rendezvous of all tasks before traffic starts.
    pub barrier: Barrier,
    /// Raised by the traffic driver once the traffic client finished.
    pub client_finished: Signal,
}

impl SyncFabric {
    /// Create the primitives for an iteration with `parties` tasks meeting at the barrier.
    #[must_use]
    pub fn new(parties: usize) -> SyncFabric {
        SyncFabric {
            barrier: Barrier::new(parties),
            client_finished: Signal::new(),
        }
    }
}
