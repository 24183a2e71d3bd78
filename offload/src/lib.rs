// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Validation that traffic-flow test traffic was hardware offloaded.
//!
//! When the traffic of an SR-IOV pod is offloaded, its VF representor still accounts for the
//! packets.  For each endpoint of a test iteration, a [`MeasurementTask`] samples the
//! representor's packet counters when traffic starts and again once the client is done,
//! then judges from the difference whether traffic went through the representor.

#![deny(clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod endpoint;
pub mod judge;
pub mod output;
pub mod plugin;
pub mod representor;
pub mod task;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod testing;

pub use ethtool::SamplePair;

pub use endpoint::{EXTERNAL_PERF_SERVER, Endpoint, EndpointRole, EndpointSide};
pub use judge::{NO_TRAFFIC_MSG, VF_REP_TRAFFIC_THRESHOLD, WindowJudgement, judge_window};
pub use output::{FlowTestOutput, PluginMetadata, PluginOutput, TftAggregateOutput};
pub use plugin::{PLUGIN_NAME, PluginValidateOffload, TestSettings};
pub use representor::{Representor, RepresentorResolver};
pub use task::{MeasurementTask, Phase};
