// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic, clippy::unwrap_used)]

mod traffic;

use std::io::Write;
use std::sync::Arc;
use std::thread::JoinHandle;

use args::{CmdArgs, Parser};
use concurrency::SyncFabric;
use exec::{ContainerRef, KubectlExec};
use miette::{Context, IntoDiagnostic, miette};
use offload::{
    MeasurementTask, PLUGIN_NAME, PluginOutput, PluginValidateOffload, TestSettings,
    TftAggregateOutput,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Exit code of an iteration in which some verdict failed.
const EXIT_CODE_VALIDATION: i32 = 1;

/// Barrier parties of an iteration: the two measurement tasks and the traffic driver.
const ITERATION_PARTIES: usize = 3;

fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_line_number(true)
        .init();
}

fn start_task(
    task: MeasurementTask,
) -> miette::Result<(Arc<MeasurementTask>, JoinHandle<PluginOutput>)> {
    let task = Arc::new(task);
    let runner = task.clone();
    let handle = std::thread::Builder::new()
        .name(task.log_name())
        .spawn(move || runner.run())
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to start {}", task.log_name()))?;
    Ok((task, handle))
}

fn summary(out: &mut impl Write, agg: &TftAggregateOutput) -> std::io::Result<()> {
    if let Some(flow) = &agg.flow_test {
        if flow.success {
            writeln!(out, "flow test '{}', succeeded", flow.command)?;
        } else {
            writeln!(
                out,
                "flow test '{}', failed: {}",
                flow.command,
                flow.msg.as_deref().unwrap_or_default()
            )?;
        }
    }
    for plugin in &agg.plugins {
        let pod = &plugin.plugin_metadata.pod_name;
        if plugin.success {
            writeln!(out, "plugin {PLUGIN_NAME} on {pod}, succeeded")?;
        } else {
            writeln!(
                out,
                "plugin {PLUGIN_NAME} on {pod}, failed: {}",
                plugin.msg.as_deref().unwrap_or("incomplete measurement")
            )?;
        }
    }
    Ok(())
}

/// Process exit code for the results of an iteration, if it failed.
fn exit_code(agg: &TftAggregateOutput) -> Option<i32> {
    (!agg.success()).then_some(EXIT_CODE_VALIDATION)
}

fn run(args: &CmdArgs) -> miette::Result<TftAggregateOutput> {
    let mut runner = KubectlExec::new(args.kubectl());
    if let Some(kubeconfig) = args.kubeconfig() {
        runner = runner.with_kubeconfig(kubeconfig);
    }
    let ts = TestSettings::new(
        Arc::new(SyncFabric::new(ITERATION_PARTIES)),
        Arc::new(runner),
        args.namespace(),
    );
    let client = args.client();
    let client_pod = ContainerRef::new(args.namespace(), client.pod_name.as_str());

    let mut running = Vec::with_capacity(2);
    for task in PluginValidateOffload::enable(&ts, args.server(), client) {
        running.push(start_task(task)?);
    }

    let mut agg = TftAggregateOutput {
        flow_test: Some(traffic::drive_traffic(&ts, &client_pod, args.traffic_cmd())),
        plugins: Vec::new(),
    };

    for (task, handle) in running {
        let output = handle
            .join()
            .map_err(|_| miette!("{} panicked", task.log_name()))?;
        task.aggregate_output(output, &mut agg);
    }
    Ok(agg)
}

fn main() -> miette::Result<()> {
    let args = CmdArgs::parse();
    init_logging(args.log_level());
    info!("Starting offload validation");

    let agg = run(&args)?;

    let json = serde_json::to_string_pretty(&agg)
        .into_diagnostic()
        .wrap_err("Failed to serialize results")?;
    match args.output() {
        Some(path) => std::fs::write(path, json)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write results to {}", path.display()))?,
        None => println!("{json}"),
    }
    summary(&mut std::io::stdout().lock(), &agg)
        .into_diagnostic()
        .wrap_err("Failed to print summary")?;

    if let Some(code) = exit_code(&agg) {
        error!("Offload validation failed");
        std::process::exit(code);
    }
    Ok(())
}
