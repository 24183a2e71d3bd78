// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! [`CommandRunner`] on top of `kubectl exec`.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, instrument, warn};

use crate::{CommandRunner, ContainerRef, ExecError};

/// Executes commands through the cluster client binary (`kubectl` or `oc`).
///
/// Every command is wrapped in `/bin/sh -c` so that it may use pipes and redirections.
#[derive(Clone, Debug)]
pub struct KubectlExec {
    program: String,
    kubeconfig: Option<PathBuf>,
}

impl Default for KubectlExec {
    fn default() -> Self {
        KubectlExec::new("kubectl")
    }
}

impl KubectlExec {
    #[must_use]
    pub fn new(program: impl Into<String>) -> KubectlExec {
        KubectlExec {
            program: program.into(),
            kubeconfig: None,
        }
    }

    #[must_use]
    pub fn with_kubeconfig(mut self, kubeconfig: impl Into<PathBuf>) -> KubectlExec {
        self.kubeconfig = Some(kubeconfig.into());
        self
    }

    fn command(&self, container: &ContainerRef, cmd: &str) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(kubeconfig) = &self.kubeconfig {
            command.arg("--kubeconfig").arg(kubeconfig);
        }
        command
            .args(["exec", "-n", &container.namespace, &container.pod])
            .args(container.container.iter().flat_map(|c| ["-c", c.as_str()]))
            .args(["--", "/bin/sh", "-c", cmd])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl CommandRunner for KubectlExec {
    #[instrument(level = "debug", skip(self, container), fields(container = %container))]
    fn exec(&self, container: &ContainerRef, cmd: &str) -> Result<String, ExecError> {
        let output = self
            .command(container, cmd)
            .output()
            .map_err(|source| ExecError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(ExecError::Status {
                container: container.to_string(),
                cmd: cmd.to_string(),
                status: output.status,
                stderr: stderr.trim_end().to_string(),
            });
        }
        // kubectl warnings land on stderr even when the command succeeds
        if !stderr.is_empty() {
            warn!("'{cmd}' in {container} printed to stderr: {}", stderr.trim_end());
        }
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("'{cmd}' in {container} returned {} bytes", stdout.len());
        Ok(stdout)
    }
}
