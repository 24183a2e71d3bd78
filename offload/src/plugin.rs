// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Wiring of the offload validation into a test iteration.

use std::sync::Arc;

use concurrency::SyncFabric;
use exec::{CommandRunner, ContainerRef};
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::task::MeasurementTask;

/// Name under which the verdicts of this plugin are reported.
pub const PLUGIN_NAME: &str = "validate_offload";

/// What an iteration shares with all of its plugin tasks.
#[derive(Clone)]
pub struct TestSettings {
    /// Barrier and completion signal of the iteration.
    pub fabric: Arc<SyncFabric>,
    /// Runs commands inside the cluster's pods.
    pub runner: Arc<dyn CommandRunner>,
    /// Namespace of the tools pods.
    pub namespace: String,
}

impl TestSettings {
    #[must_use]
    pub fn new(
        fabric: Arc<SyncFabric>,
        runner: Arc<dyn CommandRunner>,
        namespace: impl Into<String>,
    ) -> TestSettings {
        TestSettings {
            fabric,
            runner,
            namespace: namespace.into(),
        }
    }
}

/// The offload validation plugin.
pub struct PluginValidateOffload;

impl PluginValidateOffload {
    /// Name of the privileged tools pod this plugin runs its commands from on `node`.
    #[must_use]
    pub fn tools_pod(node: &str) -> String {
        format!("tools-pod-{node}-validate-offload")
    }

    /// Create the server and client tasks of one iteration.
    ///
    /// The tasks are returned unstarted, server first.  Both take part in the iteration's
    /// barrier, so its party count must include them.
    #[must_use]
    pub fn enable(
        ts: &TestSettings,
        server: Endpoint,
        client: Endpoint,
    ) -> [MeasurementTask; 2] {
        [server, client].map(|endpoint| {
            let tools = ContainerRef::new(
                ts.namespace.clone(),
                PluginValidateOffload::tools_pod(&endpoint.node_name),
            );
            debug!("{PLUGIN_NAME}: {} measured from {tools}", endpoint.pod_name);
            MeasurementTask::new(ts.clone(), endpoint, tools)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PluginValidateOffload, TestSettings};
    use crate::endpoint::{Endpoint, EndpointRole, EndpointSide};
    use crate::testing::ScriptedRunner;
    use concurrency::SyncFabric;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn enable_creates_server_then_client() {
        let ts = TestSettings::new(
            Arc::new(SyncFabric::new(3)),
            Arc::new(ScriptedRunner::default()),
            "tft",
        );
        let [server, client] = PluginValidateOffload::enable(
            &ts,
            Endpoint::new(
                EndpointSide::Server,
                "worker-0",
                "tft-server-0",
                EndpointRole::RepresentorBacked,
            ),
            Endpoint::new(
                EndpointSide::Client,
                "worker-1",
                "tft-client-0",
                EndpointRole::HostBacked,
            ),
        );
        assert_eq!(server.endpoint().side, EndpointSide::Server);
        assert_eq!(server.log_name(), "validate_offload-server");
        assert_eq!(client.endpoint().role, EndpointRole::HostBacked);
        assert_eq!(client.log_name(), "validate_offload-client");
        assert_eq!(
            PluginValidateOffload::tools_pod("worker-1"),
            "tools-pod-worker-1-validate-offload"
        );
    }
}
