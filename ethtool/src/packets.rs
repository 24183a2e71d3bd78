// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet count extraction.

use tracing::debug;

use crate::stats::CounterMap;

/// Traffic direction, as spelled in `ethtool` counter names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Rx,
    Tx,
}

const QUEUE_XDP_SUFFIX: &str = "_xdp_packets";

impl CounterMap {
    /// Logical number of packets seen in `direction`.
    ///
    /// Drivers report this in one of two ways:
    ///
    /// 1. an aggregate `{rx,tx}_packets` counter, used as is when it holds an integer;
    /// 2. per-queue `{rx,tx}_queue_<n>_xdp_packets` counters, which are summed.
    ///
    /// A per-queue sum is all or nothing: if any matching queue counter is not an integer (or
    /// the sum overflows) the count is unknown and [`None`] is returned.  [`None`] is also
    /// returned when neither form is present.
    #[must_use]
    pub fn packets(&self, direction: Direction) -> Option<u64> {
        let aggregate = format!("{direction}_packets");
        if let Some(count) = self.get(&aggregate).and_then(|v| v.parse::<u64>().ok()) {
            return Some(count);
        }

        let prefix = format!("{direction}_queue_");
        let mut total: Option<u64> = None;
        for (name, value) in self.iter() {
            if !(name.starts_with(&prefix) && name.ends_with(QUEUE_XDP_SUFFIX)) {
                continue;
            }
            let Ok(count) = value.parse::<u64>() else {
                debug!("bad value '{value}' for counter {name}: no {direction} packet count");
                return None;
            };
            total = Some(total.unwrap_or(0).checked_add(count)?);
        }
        total
    }
}
