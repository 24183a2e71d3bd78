// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Pass / fail policy for a measured traffic window.

use ethtool::{CompleteSamples, Edge, SamplePair, record_edge};
use tracing::info;

/// Packets a VF representor must see, in at least one direction, during the test window.
pub const VF_REP_TRAFFIC_THRESHOLD: i128 = 1000;

/// Failure message for a window without traffic on the representor.
pub const NO_TRAFFIC_MSG: &str = "no traffic on VF rep detected";

/// True if neither direction saw [`VF_REP_TRAFFIC_THRESHOLD`] packets during the window.
///
/// A counter that went backwards (reset during the window) counts as no traffic.
#[must_use]
pub fn no_traffic_on_vf_rep(samples: &CompleteSamples) -> bool {
    let rx = i128::from(samples.rx_end) - i128::from(samples.rx_start);
    let tx = i128::from(samples.tx_end) - i128::from(samples.tx_start);
    rx < VF_REP_TRAFFIC_THRESHOLD && tx < VF_REP_TRAFFIC_THRESHOLD
}

/// Outcome of judging one traffic window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowJudgement {
    pub success: bool,
    pub msg: Option<String>,
    pub counters: SamplePair,
}

/// Judge a traffic window from the `ethtool -S` output taken at its start and at its end.
///
/// `None` stands for a sample whose command failed.  The window fails if a sample is missing,
/// if a count could not be extracted from either sample, or (with complete data) if the
/// representor saw no traffic.  Only the last case sets a message.
#[must_use]
pub fn judge_window(start: Option<&str>, end: Option<&str>) -> WindowJudgement {
    let mut counters = SamplePair::default();
    let mut success = start.is_some() && end.is_some();
    success &= record_edge(&mut counters, start.unwrap_or_default(), Edge::Start);
    success &= record_edge(&mut counters, end.unwrap_or_default(), Edge::End);

    info!(
        rx_start = ?counters.rx_start,
        tx_start = ?counters.tx_start,
        rx_end = ?counters.rx_end,
        tx_end = ?counters.tx_end,
        "{counters}"
    );

    let mut msg = None;
    if success
        && let Some(samples) = counters.complete()
        && no_traffic_on_vf_rep(&samples)
    {
        success = false;
        msg = Some(NO_TRAFFIC_MSG.to_string());
    }
    WindowJudgement {
        success,
        msg,
        counters,
    }
}
