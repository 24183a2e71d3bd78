// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The party that defines the test window.

use exec::ContainerRef;
use offload::{FlowTestOutput, TestSettings};
use tracing::{error, info, instrument};

/// Run the traffic of one iteration from `client`.
///
/// Waits for the measurement tasks at the barrier, runs `cmd` to completion and then raises
/// the completion signal.  The signal is raised whatever the outcome of the command, so that
/// the measurement tasks always take their end samples.
#[instrument(name = "traffic", skip(ts, client), fields(client = %client))]
pub(crate) fn drive_traffic(ts: &TestSettings, client: &ContainerRef, cmd: &str) -> FlowTestOutput {
    ts.fabric.barrier.wait();
    info!("Starting traffic: {cmd}");
    let result = ts.runner.exec(client, cmd);
    ts.fabric.client_finished.set();

    match result {
        Ok(stdout) => {
            info!("Traffic done");
            FlowTestOutput {
                success: true,
                msg: None,
                command: cmd.to_string(),
                stdout,
            }
        }
        Err(e) => {
            error!("Traffic failed: {e}");
            FlowTestOutput {
                success: false,
                msg: Some(e.to_string()),
                command: cmd.to_string(),
                stdout: String::new(),
            }
        }
    }
}
