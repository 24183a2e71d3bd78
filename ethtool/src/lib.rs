// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet counters from `ethtool -S` output.
//!
//! The text printed by `ethtool -S <iface>` is a loose convention rather than a format: each
//! driver chooses its own counter names, some print an aggregate `rx_packets`/`tx_packets`
//! while others only report per-queue counters, and section headings are interleaved with
//! the data.  This crate reduces such a dump to the one quantity the offload validation
//! cares about (packets per direction) and records it around a traffic window.
//!
//! - [`CounterMap`]: best-effort parse of the raw text.
//! - [`CounterMap::packets`]: logical packet count for a [`Direction`].
//! - [`SamplePair`] and [`record_edge`]: start / end snapshots around a test window.
//!
//! Nothing here returns an error.  Missing or malformed data shows up as an absent value
//! ([`None`]) which callers are expected to fold into their own verdict.

#![deny(clippy::all, clippy::pedantic, clippy::unwrap_used)]

mod packets;
mod stats;
mod window;

pub use packets::Direction;
pub use stats::CounterMap;
pub use window::{CompleteSamples, Edge, SamplePair, record_edge};
