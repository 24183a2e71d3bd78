// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Result records of a test iteration.

use ethtool::SamplePair;
use serde::{Deserialize, Serialize};

use crate::endpoint::EndpointSide;

/// Identifies the plugin task a [`PluginOutput`] comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub plugin_name: String,
    pub node_name: String,
    pub pod_name: String,
    pub side: EndpointSide,
}

/// Verdict of one offload validation task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginOutput {
    pub plugin_metadata: PluginMetadata,
    pub success: bool,
    pub msg: Option<String>,
    /// The exact `ethtool` command used, empty if no representor was looked at.
    pub command: String,
    /// Packet counters recorded around the traffic window.
    pub result: SamplePair,
}

/// Outcome of the traffic run which defined the test window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTestOutput {
    pub success: bool,
    pub msg: Option<String>,
    pub command: String,
    pub stdout: String,
}

/// Everything produced by one test iteration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TftAggregateOutput {
    pub flow_test: Option<FlowTestOutput>,
    pub plugins: Vec<PluginOutput>,
}

impl TftAggregateOutput {
    /// True if the traffic run (when there is one) and every plugin verdict succeeded.
    #[must_use]
    pub fn success(&self) -> bool {
        self.flow_test.as_ref().is_none_or(|f| f.success) && self.plugins.iter().all(|p| p.success)
    }
}
