// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Discovery of the VF representor of a pod.
//!
//! The cluster's network plugin names the representor of a pod's VF after the pod sandbox:
//! the interface name is the sandbox id cut down to what fits in a linux interface name.
//! The sandbox id is looked up with `crictl`, from a tools pod running on the same node.

use std::fmt::Display;

use exec::{CommandRunner, ContainerRef};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Longest linux interface name (`IFNAMSIZ` minus the terminating nul).
pub const MAX_IFNAME_LEN: usize = 15;

const CRIO_RUNTIME_ENDPOINT: &str = "unix:///host/run/crio/crio.sock";

/// Name of a VF representor interface.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Representor(String);

impl Representor {
    /// Derive the representor name from a pod sandbox id.
    ///
    /// Returns [`None`] for an empty id.
    #[must_use]
    pub fn from_sandbox_id(sandbox_id: &str) -> Option<Representor> {
        let name: String = sandbox_id.chars().take(MAX_IFNAME_LEN).collect();
        if name.is_empty() {
            return None;
        }
        Some(Representor(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Representor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subset of `crictl ps -o json` we rely on.
#[derive(Debug, Deserialize)]
struct CrictlPs {
    containers: Vec<CrictlContainer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrictlContainer {
    pod_sandbox_id: String,
}

/// The `crictl` command listing the containers named `container_name`.
#[must_use]
pub fn crictl_ps_cmd(container_name: &str) -> String {
    format!("crictl --runtime-endpoint={CRIO_RUNTIME_ENDPOINT} ps -a --name={container_name} -o json")
}

/// Representor of the first container in a `crictl ps -o json` reply.
///
/// Returns [`None`] if the reply is not what we expect or lists no container.
#[must_use]
pub fn parse_crictl_ps(reply: &str) -> Option<Representor> {
    let ps: CrictlPs = serde_json::from_str(reply)
        .inspect_err(|e| debug!("unexpected crictl reply: {e}"))
        .ok()?;
    let first = ps.containers.first()?;
    Representor::from_sandbox_id(&first.pod_sandbox_id)
}

/// Finds the VF representor of a pod by asking the container runtime of its node.
pub struct RepresentorResolver<'a> {
    runner: &'a dyn CommandRunner,
    tools: &'a ContainerRef,
}

impl<'a> RepresentorResolver<'a> {
    /// `tools` is a privileged pod on the node of the pods to resolve, with access to the
    /// host's container runtime socket.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, tools: &'a ContainerRef) -> RepresentorResolver<'a> {
        RepresentorResolver { runner, tools }
    }

    /// The representor of the container named `container_name`, if it can be determined.
    ///
    /// Failing to run the query and failing to make sense of its reply both give [`None`]:
    /// a missing representor is not an error at this level.
    #[must_use]
    pub fn resolve(&self, container_name: &str) -> Option<Representor> {
        let reply = match self.runner.exec(self.tools, &crictl_ps_cmd(container_name)) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Failed to look up sandbox of {container_name}: {e}");
                return None;
            }
        };
        let representor = parse_crictl_ps(&reply);
        match &representor {
            Some(iface) => info!("The VF representor is: {iface}"),
            None => info!("Error parsing VF representor"),
        }
        representor
    }
}
