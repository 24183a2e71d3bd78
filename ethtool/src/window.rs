// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Counter snapshots around a traffic window.

use std::fmt::Display;

use tracing::debug;

use crate::packets::Direction;
use crate::stats::CounterMap;

/// Which side of the traffic window a snapshot was taken on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Edge {
    Start,
    End,
}

/// Packet counts taken at the start and at the end of a traffic window.
///
/// Displays on a single line, with `N/A` for a count that is missing.
///
/// A field is only ever set from a successfully extracted count.  [`None`] means "not
/// measured", which is not the same thing as zero packets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SamplePair {
    #[cfg_attr(any(test, feature = "serde"), serde(skip_serializing_if = "Option::is_none", default))]
    pub rx_start: Option<u64>,
    #[cfg_attr(any(test, feature = "serde"), serde(skip_serializing_if = "Option::is_none", default))]
    pub tx_start: Option<u64>,
    #[cfg_attr(any(test, feature = "serde"), serde(skip_serializing_if = "Option::is_none", default))]
    pub rx_end: Option<u64>,
    #[cfg_attr(any(test, feature = "serde"), serde(skip_serializing_if = "Option::is_none", default))]
    pub tx_end: Option<u64>,
}

/// All four counts of a [`SamplePair`], available only once both edges were fully recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompleteSamples {
    pub rx_start: u64,
    pub tx_start: u64,
    pub rx_end: u64,
    pub tx_end: u64,
}

impl SamplePair {
    fn slot(&mut self, direction: Direction, edge: Edge) -> &mut Option<u64> {
        match (direction, edge) {
            (Direction::Rx, Edge::Start) => &mut self.rx_start,
            (Direction::Tx, Edge::Start) => &mut self.tx_start,
            (Direction::Rx, Edge::End) => &mut self.rx_end,
            (Direction::Tx, Edge::End) => &mut self.tx_end,
        }
    }

    /// The four counts, if all of them were recorded.
    #[must_use]
    pub fn complete(&self) -> Option<CompleteSamples> {
        Some(CompleteSamples {
            rx_start: self.rx_start?,
            tx_start: self.tx_start?,
            rx_end: self.rx_end?,
            tx_end: self.tx_end?,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == SamplePair::default()
    }
}

fn fmt_count(count: Option<u64>) -> String {
    count.map_or_else(|| "N/A".to_string(), |c| c.to_string())
}

impl Display for SamplePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rx_packet_start: {} tx_packet_start: {} rx_packet_end: {} tx_packet_end: {}",
            fmt_count(self.rx_start),
            fmt_count(self.tx_start),
            fmt_count(self.rx_end),
            fmt_count(self.tx_end)
        )
    }
}

/// Record the rx and tx packet counts found in `raw` (the output of `ethtool -S`) as the
/// `edge` snapshot of `pair`.
///
/// Returns `true` only if both directions could be extracted.  On partial failure the
/// direction that could be extracted is still recorded, and `false` is returned so that the
/// caller fails the measurement.
pub fn record_edge(pair: &mut SamplePair, raw: &str, edge: Edge) -> bool {
    let counters = CounterMap::parse(raw);
    let mut complete = true;
    for direction in [Direction::Rx, Direction::Tx] {
        match counters.packets(direction) {
            Some(count) => *pair.slot(direction, edge) = Some(count),
            None => {
                debug!("no {direction} packet count at {edge} of window");
                complete = false;
            }
        }
    }
    complete
}
