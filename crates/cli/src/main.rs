//! dashops - dashboard and chat automation tools
//!
//! Every subcommand loads the configuration once, wires the dashboard and
//! Webex clients through [`context::AppContext`] and runs one core service.
//! Exit codes: `0` success, `2` missing or invalid credentials, `1` any
//! other failure.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashops_domain::DashOpsError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use commands::bot::{PortArgs, ProvisionArgs, SnapshotArgs};
use commands::demo::DemoArgs;
use commands::sense::{MotionArgs, ScanReceiverArgs};

/// dashops - dashboard reporting, alerting and provisioning
#[derive(Parser, Debug)]
#[command(name = "dashops")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML or JSON configuration file
    #[arg(short, long, global = true, env = "DASHOPS_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Reporting ===
    /// Post a device status summary for every organization
    Status,

    /// Alert on appliance uplinks above the loss/latency thresholds
    Perf,

    /// Alert when tagged always-on devices are not online
    AlwaysOn,

    // === Provisioning ===
    /// Interactive demo: create networks, claim devices, configure, reset
    Demo(DemoArgs),

    /// Create one network from form values and claim the selected devices
    Provision(ProvisionArgs),

    // === Chatbot actions ===
    /// Enable or disable a switch port
    Port(PortArgs),

    /// Post camera snapshots of a network
    Snapshots(SnapshotArgs),

    // === Sensing ===
    /// Receive scanning API pushes
    ScanReceiver(ScanReceiverArgs),

    /// Motion alert with snapshot, muted while someone is home
    MotionAlert(MotionArgs),
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = dashops_infra::config::load(cli.config).context("failed to load configuration")?;
    let ctx = context::AppContext::new(config)?;

    match cli.command {
        Commands::Status => commands::report::status(&ctx).await,
        Commands::Perf => commands::report::perf(&ctx).await,
        Commands::AlwaysOn => commands::report::always_on(&ctx).await,
        Commands::Demo(args) => commands::demo::run(&ctx, &args).await,
        Commands::Provision(args) => commands::bot::provision(&ctx, &args).await,
        Commands::Port(args) => commands::bot::port(&ctx, &args).await,
        Commands::Snapshots(args) => commands::bot::snapshots(&ctx, &args).await,
        Commands::ScanReceiver(args) => commands::sense::scan_receiver(&ctx, &args).await,
        Commands::MotionAlert(args) => commands::sense::motion_alert(&ctx, &args).await,
    }
}

/// `2` when the failure is a configuration problem anywhere in the chain.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    let config_error = err
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<DashOpsError>(), Some(DashOpsError::Config(_))));
    if config_error {
        2
    } else {
        1
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(dispatch(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
