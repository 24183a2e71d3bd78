// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The offload validation task of one traffic endpoint.

use exec::ContainerRef;
use tracing::{debug, info, instrument, warn};

use crate::TestSettings;
use crate::endpoint::{Endpoint, EndpointRole, EndpointSide};
use crate::judge::judge_window;
use crate::output::{PluginMetadata, PluginOutput, TftAggregateOutput};
use crate::plugin::PLUGIN_NAME;
use crate::representor::{Representor, RepresentorResolver};

/// Interface name used in the `ethtool` command when the representor could not be found.
pub const VF_REP_PLACEHOLDER: &str = "VF_REP";

/// Representor of host-backed pods, which this validation does not look at.
const HOST_BACKED_REP: &str = "ovn-k8s-mp0";

/// Steps of a [`MeasurementTask`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum Phase {
    Init,
    Resolve,
    AwaitBarrier,
    SampleStart,
    AwaitSignal,
    SampleEnd,
    Judge,
    Done,
}

/// The `ethtool` command dumping the counters of `representor`.
#[must_use]
pub fn ethtool_cmd(representor: Option<&Representor>) -> String {
    let iface = representor.map_or(VF_REP_PLACEHOLDER, Representor::as_str);
    format!("ethtool -S {iface}")
}

/// Measures the packets seen by the VF representor of one endpoint during the traffic window.
///
/// The task runs from a tools pod on the endpoint's node.  It meets the other tasks of the
/// iteration at the barrier, samples the representor counters, waits for the traffic client
/// to finish and samples them again.
pub struct MeasurementTask {
    ts: TestSettings,
    endpoint: Endpoint,
    tools: ContainerRef,
}

impl MeasurementTask {
    #[must_use]
    pub fn new(ts: TestSettings, endpoint: Endpoint, tools: ContainerRef) -> MeasurementTask {
        MeasurementTask {
            ts,
            endpoint,
            tools,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Name of the task in logs and thread names.
    #[must_use]
    pub fn log_name(&self) -> String {
        format!("{PLUGIN_NAME}-{}", self.endpoint.side)
    }

    fn enter(&self, phase: Phase) {
        debug!(%phase, "{}: entering {phase}", self.log_name());
    }

    fn output(&self, success: bool, msg: Option<String>, command: String) -> PluginOutput {
        PluginOutput {
            plugin_metadata: PluginMetadata {
                plugin_name: PLUGIN_NAME.to_string(),
                node_name: self.endpoint.node_name.clone(),
                pod_name: self.endpoint.pod_name.clone(),
                side: self.endpoint.side,
            },
            success,
            msg,
            command,
            result: ethtool::SamplePair::default(),
        }
    }

    /// Run the task to completion.
    ///
    /// Never fails: failures to run commands or to read counters are reported through the
    /// returned verdict.  Blocks on the iteration's barrier and completion signal, without
    /// timeout.
    #[instrument(
        name = "validate_offload",
        skip(self),
        fields(node = %self.endpoint.node_name, pod = %self.endpoint.pod_name)
    )]
    pub fn run(&self) -> PluginOutput {
        self.enter(Phase::Init);
        let output = match self.endpoint.effective_role() {
            EndpointRole::HostBacked => {
                info!("The VF representor is: {HOST_BACKED_REP}");
                self.skip_window("Hostbacked pod")
            }
            EndpointRole::ExternalPeer => {
                info!("There is no VF on an external server");
                self.skip_window("External Iperf Server")
            }
            EndpointRole::RepresentorBacked => self.measure_window(),
        };
        self.enter(Phase::Done);
        output
    }

    /// Nothing to measure: be counted at the barrier without holding it up.
    fn skip_window(&self, msg: &str) -> PluginOutput {
        self.ts.fabric.barrier.arrive();
        self.output(true, Some(msg.to_string()), String::new())
    }

    fn sample(&self, cmd: &str) -> Option<String> {
        self.ts
            .runner
            .exec(&self.tools, cmd)
            .inspect_err(|e| warn!("'{cmd}' failed: {e}"))
            .ok()
    }

    fn measure_window(&self) -> PluginOutput {
        self.enter(Phase::Resolve);
        let representor = RepresentorResolver::new(self.ts.runner.as_ref(), &self.tools)
            .resolve(&self.endpoint.pod_name);
        let cmd = ethtool_cmd(representor.as_ref());

        self.enter(Phase::AwaitBarrier);
        self.ts.fabric.barrier.wait();

        self.enter(Phase::SampleStart);
        let start = self.sample(&cmd);

        self.enter(Phase::AwaitSignal);
        self.ts.fabric.client_finished.wait();

        self.enter(Phase::SampleEnd);
        let end = self.sample(&cmd);

        self.enter(Phase::Judge);
        let judgement = judge_window(start.as_deref(), end.as_deref());

        let mut output = self.output(judgement.success, judgement.msg, cmd);
        output.result = judgement.counters;
        output
    }

    /// Hand the verdict of this task over to the iteration's results.
    pub fn aggregate_output(&self, output: PluginOutput, out: &mut TftAggregateOutput) {
        if self.endpoint.effective_role().is_host_backed() {
            match self.endpoint.side {
                EndpointSide::Client => {
                    info!("The client VF representor {HOST_BACKED_REP}_0 does not exist");
                }
                EndpointSide::Server => {
                    info!("The server VF representor {HOST_BACKED_REP}_0 does not exist");
                }
            }
        }
        info!(
            "validateOffload results on {}: {:?}",
            self.endpoint.pod_name, output.result
        );
        out.plugins.push(output);
    }
}
