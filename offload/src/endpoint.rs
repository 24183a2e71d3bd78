// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Traffic endpoints under test.

use serde::{Deserialize, Serialize};

/// Name given by the harness to the pod of a traffic server running outside the cluster.
pub const EXTERNAL_PERF_SERVER: &str = "external-perf-server";

/// How a traffic endpoint is attached to the network.
///
/// This decides whether there is a VF representor to watch at all.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIs,
)]
#[strum(serialize_all = "kebab-case")]
pub enum EndpointRole {
    /// Pod on the host network: its traffic never crosses a VF representor.
    #[strum(to_string = "hostbacked", serialize = "host-backed")]
    #[serde(rename = "hostbacked")]
    HostBacked,
    /// SR-IOV pod, whose VF traffic is mirrored in the counters of its representor.
    #[strum(to_string = "sriov", serialize = "representor-backed")]
    #[serde(rename = "sriov")]
    RepresentorBacked,
    /// Peer outside the cluster, without any representor we could look at.
    #[strum(to_string = "external", serialize = "external-peer")]
    #[serde(rename = "external")]
    ExternalPeer,
}

/// Which end of the traffic flow an endpoint is.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EndpointSide {
    Server,
    Client,
}

/// A workload instance taking part in a test iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub node_name: String,
    pub pod_name: String,
    pub role: EndpointRole,
    pub side: EndpointSide,
}

impl Endpoint {
    #[must_use]
    pub fn new(
        side: EndpointSide,
        node_name: impl Into<String>,
        pod_name: impl Into<String>,
        role: EndpointRole,
    ) -> Endpoint {
        Endpoint {
            node_name: node_name.into(),
            pod_name: pod_name.into(),
            role,
            side,
        }
    }

    /// The effective role of the endpoint.
    ///
    /// The harness names the pod of an out-of-cluster server [`EXTERNAL_PERF_SERVER`]
    /// regardless of the pod type it was configured with, so the name wins.
    #[must_use]
    pub fn effective_role(&self) -> EndpointRole {
        match self.role {
            EndpointRole::HostBacked => EndpointRole::HostBacked,
            _ if self.pod_name == EXTERNAL_PERF_SERVER => EndpointRole::ExternalPeer,
            role => role,
        }
    }
}
