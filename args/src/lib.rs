// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub use clap::Parser;
use offload::{Endpoint, EndpointRole, EndpointSide};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Errors parsing an [`EndpointArg`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointArgError {
    #[error("Bad syntax: expected NODE:POD[:POD-TYPE]")]
    Syntax,
    #[error("Empty node name")]
    EmptyNode,
    #[error("Empty pod name")]
    EmptyPod,
    #[error("Unknown pod type '{0}': allowed values are hostbacked|sriov|external")]
    PodType(String),
}

/// A traffic endpoint as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointArg {
    pub node: String,
    pub pod: String,
    pub role: EndpointRole,
}

impl EndpointArg {
    #[must_use]
    pub fn to_endpoint(&self, side: EndpointSide) -> Endpoint {
        Endpoint::new(side, self.node.as_str(), self.pod.as_str(), self.role)
    }
}

impl FromStr for EndpointArg {
    type Err = EndpointArgError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.splitn(3, ':');
        let (Some(node), Some(pod)) = (parts.next(), parts.next()) else {
            return Err(EndpointArgError::Syntax);
        };
        if node.is_empty() {
            return Err(EndpointArgError::EmptyNode);
        }
        if pod.is_empty() {
            return Err(EndpointArgError::EmptyPod);
        }
        let role = match parts.next() {
            None => EndpointRole::RepresentorBacked,
            Some(kind) => EndpointRole::from_str(kind)
                .map_err(|_| EndpointArgError::PodType(kind.to_string()))?,
        };
        Ok(EndpointArg {
            node: node.to_string(),
            pod: pod.to_string(),
            role,
        })
    }
}

#[derive(Parser)]
#[command(name = "tft-validate-offload")]
#[command(version)]
#[command(
    about = "Checks that traffic-flow test traffic crossed the VF representors of its pods",
    long_about = None
)]
pub struct CmdArgs {
    #[arg(
        long,
        value_name = "NODE:POD[:POD-TYPE]",
        value_parser = EndpointArg::from_str,
        help = "Server endpoint of the traffic flow. POD-TYPE is one of hostbacked, sriov (the default) or external.
Example:
   --server worker-0:tft-server-0:sriov"
    )]
    server: EndpointArg,

    #[arg(
        long,
        value_name = "NODE:POD[:POD-TYPE]",
        value_parser = EndpointArg::from_str,
        help = "Client endpoint of the traffic flow, with the same syntax as --server"
    )]
    client: EndpointArg,

    #[arg(
        long,
        value_name = "NAMESPACE",
        default_value = "default",
        help = "Namespace of the traffic and tools pods"
    )]
    namespace: String,

    #[arg(long, value_name = "PATH", help = "kubeconfig to pass to kubectl")]
    kubeconfig: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PROGRAM",
        default_value = "kubectl",
        help = "kubectl binary used to run commands in pods"
    )]
    kubectl: String,

    #[arg(
        long,
        value_name = "COMMAND",
        help = "Command run in the client pod to generate the traffic of the test window"
    )]
    traffic_cmd: String,

    #[arg(
        long,
        value_name = "PATH",
        help = "File to write the JSON results to, instead of stdout"
    )]
    output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "LEVEL",
        default_value_t = Level::INFO,
        help = "Log level, one of [error,warn,info,debug,trace]. RUST_LOG takes precedence when set"
    )]
    log_level: Level,
}

impl CmdArgs {
    pub fn server(&self) -> Endpoint {
        self.server.to_endpoint(EndpointSide::Server)
    }
    pub fn client(&self) -> Endpoint {
        self.client.to_endpoint(EndpointSide::Client)
    }
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
    pub fn kubeconfig(&self) -> Option<&Path> {
        self.kubeconfig.as_deref()
    }
    pub fn kubectl(&self) -> &str {
        &self.kubectl
    }
    pub fn traffic_cmd(&self) -> &str {
        &self.traffic_cmd
    }
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
    pub fn log_level(&self) -> Level {
        self.log_level
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{CmdArgs, EndpointArg, EndpointArgError, Parser};
    use offload::{EndpointRole, EndpointSide};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::str::FromStr;
    use tracing::Level;

    #[test]
    fn test_parse_endpoint() {
        let ep = EndpointArg::from_str("worker-0:tft-server-0").unwrap();
        assert_eq!(ep.node, "worker-0");
        assert_eq!(ep.pod, "tft-server-0");
        assert_eq!(ep.role, EndpointRole::RepresentorBacked);

        let ep = EndpointArg::from_str("worker-1:tft-client-0:hostbacked").unwrap();
        assert_eq!(ep.role, EndpointRole::HostBacked);

        let ep = EndpointArg::from_str("worker-1:external-perf-server:external").unwrap();
        assert_eq!(ep.role, EndpointRole::ExternalPeer);

        let ep = EndpointArg::from_str("worker-1:tft-client-0:representor-backed").unwrap();
        assert_eq!(ep.role, EndpointRole::RepresentorBacked);

        assert_eq!(
            EndpointArg::from_str("worker-0"),
            Err(EndpointArgError::Syntax)
        );
        assert_eq!(
            EndpointArg::from_str(":tft-server-0"),
            Err(EndpointArgError::EmptyNode)
        );
        assert_eq!(
            EndpointArg::from_str("worker-0:"),
            Err(EndpointArgError::EmptyPod)
        );
        assert_eq!(
            EndpointArg::from_str("worker-0:tft-server-0:vhost"),
            Err(EndpointArgError::PodType("vhost".to_string()))
        );
    }

    #[test]
    fn test_cmd_args() {
        let args = CmdArgs::try_parse_from([
            "tft-validate-offload",
            "--server",
            "worker-0:tft-server-0",
            "--client",
            "worker-1:tft-client-0:hostbacked",
            "--traffic-cmd",
            "iperf3 -c 10.0.0.1 -t 10",
            "--kubeconfig",
            "/etc/kubeconfig",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let server = args.server();
        assert_eq!(server.side, EndpointSide::Server);
        assert_eq!(server.node_name, "worker-0");
        let client = args.client();
        assert_eq!(client.side, EndpointSide::Client);
        assert_eq!(client.role, EndpointRole::HostBacked);
        assert_eq!(args.namespace(), "default");
        assert_eq!(args.kubectl(), "kubectl");
        assert_eq!(args.kubeconfig(), Some(Path::new("/etc/kubeconfig")));
        assert_eq!(args.traffic_cmd(), "iperf3 -c 10.0.0.1 -t 10");
        assert_eq!(args.output(), None);
        assert_eq!(args.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_cmd_args_required() {
        assert!(
            CmdArgs::try_parse_from(["tft-validate-offload", "--server", "worker-0:tft-server-0"])
                .is_err()
        );
        assert!(
            CmdArgs::try_parse_from([
                "tft-validate-offload",
                "--server",
                "worker-0",
                "--client",
                "worker-1:tft-client-0",
                "--traffic-cmd",
                "true",
            ])
            .is_err()
        );
    }
}
