//! Chatbot-triggered actions: provisioning, port trigger, snapshots

use anyhow::Result;
use clap::Args;
use dashops_core::bot::{wants_all_cameras, PortOutcome, ProvisionForm, ProvisionOutcome};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Print the unclaimed inventory instead of provisioning
    #[arg(long)]
    pub choices: bool,

    /// City, state/country used for the network name
    #[arg(long)]
    pub location: Option<String>,

    /// Street address for the claimed devices
    #[arg(long)]
    pub address: Option<String>,

    /// Security appliance serial (`none` to skip)
    #[arg(long)]
    pub mx: Option<String>,

    /// Switch serial (`none` to skip)
    #[arg(long)]
    pub ms: Option<String>,

    /// Access point serial (`none` to skip)
    #[arg(long)]
    pub mr: Option<String>,

    /// Camera serial (`none` to skip)
    #[arg(long)]
    pub mv: Option<String>,
}

impl ProvisionArgs {
    fn form(&self) -> ProvisionForm {
        ProvisionForm {
            location: self.location.clone(),
            address: self.address.clone(),
            mx: self.mx.clone(),
            ms: self.ms.clone(),
            mr: self.mr.clone(),
            mv: self.mv.clone(),
        }
    }
}

pub async fn provision(ctx: &AppContext, args: &ProvisionArgs) -> Result<()> {
    let bot = ctx.provision_bot()?;
    let org_id = ctx.org_id()?;

    if args.choices {
        println!("{}", bot.choices(org_id).await?.render());
        return Ok(());
    }

    match bot.handle(org_id, &args.form()).await? {
        ProvisionOutcome::Rejected(reason) => println!("{reason}"),
        ProvisionOutcome::Created { name, net_id, devices } => {
            println!("Created {name} ({net_id}) with {devices} device(s)");
        }
    }
    Ok(())
}

#[derive(Args, Debug)]
pub struct PortArgs {
    /// Switch serial
    #[arg(long)]
    pub serial: String,

    /// Port number
    #[arg(long)]
    pub port: u32,

    /// Enable the port
    #[arg(long, conflicts_with = "disable", required_unless_present = "disable")]
    pub enable: bool,

    /// Disable the port
    #[arg(long)]
    pub disable: bool,
}

pub async fn port(ctx: &AppContext, args: &PortArgs) -> Result<()> {
    let outcome = ctx.port_trigger()?.set_port(&args.serial, args.port, args.enable).await?;
    let word = if args.enable { "enabled" } else { "disabled" };
    match outcome {
        PortOutcome::AlreadySet => println!("Port {} already {word}", args.port),
        PortOutcome::Changed => println!("Port {} {word}", args.port),
        PortOutcome::Mismatch => anyhow::bail!("port {} did not report the {word} state", args.port),
    }
    Ok(())
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Network of the cameras
    #[arg(long)]
    pub network: String,

    /// ISO-8601 time of the snapshot; now when omitted
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Camera name or tag filters, or a chat message mentioning "all"
    pub filters: Vec<String>,
}

pub async fn snapshots(ctx: &AppContext, args: &SnapshotArgs) -> Result<()> {
    let all = wants_all_cameras(&args.filters.join(" "));
    let sent = ctx
        .snapshot_bot()?
        .send_snapshots(&args.network, args.timestamp.as_deref(), &args.filters, all)
        .await?;
    println!("Posted {sent} snapshot(s)");
    Ok(())
}
