// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Running shell commands inside cluster pods.
//!
//! The measurement code only needs "run this command in that container and give me its
//! output".  [`CommandRunner`] is that seam; [`KubectlExec`] is the implementation that goes
//! through `kubectl exec` (or `oc exec`).

#![deny(clippy::all, clippy::pedantic, clippy::unwrap_used)]

mod kubectl;

pub use kubectl::KubectlExec;

use std::fmt::Display;
use std::process::ExitStatus;

/// A container in the cluster that commands can be executed in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    pub namespace: String,
    pub pod: String,
    /// Container within the pod, if the pod has more than one.
    pub container: Option<String>,
}

impl ContainerRef {
    #[must_use]
    pub fn new(namespace: impl Into<String>, pod: impl Into<String>) -> ContainerRef {
        ContainerRef {
            namespace: namespace.into(),
            pod: pod.into(),
            container: None,
        }
    }

    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> ContainerRef {
        self.container = Some(container.into());
        self
    }
}

impl Display for ContainerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.pod)?;
        if let Some(container) = &self.container {
            write!(f, ":{container}")?;
        }
        Ok(())
    }
}

/// Errors from executing a command in a container.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command '{cmd}' in {container} exited with {status}: {stderr}")]
    Status {
        container: String,
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Runs a shell command in a container and returns its standard output.
///
/// Implementations must be callable from several threads at once: each measurement task
/// drives its own commands, concurrently with the other tasks of the iteration.
pub trait CommandRunner: Send + Sync {
    /// Run `cmd` in `container`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecError`] if the command could not be run or did not succeed.
    fn exec(&self, container: &ContainerRef, cmd: &str) -> Result<String, ExecError>;
}

#[cfg(test)]
mod tests {
    use super::ContainerRef;

    #[test]
    fn container_ref_display() {
        let c = ContainerRef::new("default", "tools-pod-worker-0-validate-offload");
        assert_eq!(c.to_string(), "default/tools-pod-worker-0-validate-offload");
        let c = c.with_container("tools");
        assert_eq!(
            c.to_string(),
            "default/tools-pod-worker-0-validate-offload:tools"
        );
    }
}
