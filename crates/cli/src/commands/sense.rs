//! Scanning receiver and motion alert commands

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use clap::Args;
use dashops_core::MotionOutcome;
use dashops_domain::DashOpsError;
use dashops_infra::{serve_scanning, ScanningState};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct ScanReceiverArgs {
    /// Listen port; the configured `sense.port` when omitted
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,
}

pub async fn scan_receiver(ctx: &AppContext, args: &ScanReceiverArgs) -> Result<()> {
    let sense = &ctx.config.sense;
    if sense.validator.trim().is_empty() || sense.secret.trim().is_empty() {
        return Err(DashOpsError::Config("sense.validator and sense.secret must be set".into()).into());
    }
    let addr = SocketAddr::new(args.bind, args.port.unwrap_or(sense.port));
    println!("Scanning receiver listening on {addr}, logs in {}", sense.log_dir.display());
    serve_scanning(addr, ScanningState::from_config(sense)).await?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct MotionArgs {
    /// People counted by the camera
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// Camera serial; the configured `sense.camera_serial` when omitted
    #[arg(long)]
    pub serial: Option<String>,

    /// Network of the camera; looked up from the organization when omitted
    #[arg(long)]
    pub network: Option<String>,

    /// Camera name used in the message; the dashboard name when omitted
    #[arg(long)]
    pub name: Option<String>,
}

pub async fn motion_alert(ctx: &AppContext, args: &MotionArgs) -> Result<()> {
    let serial = args
        .serial
        .clone()
        .or_else(|| ctx.config.sense.camera_serial.clone())
        .ok_or_else(|| DashOpsError::Config("no camera serial given or configured".into()))?;

    let (network, name) = match (&args.network, &args.name) {
        (Some(network), Some(name)) => (network.clone(), name.clone()),
        _ => {
            let devices = ctx.dashboard().get_org_devices(ctx.org_id()?).await?;
            let camera = devices
                .iter()
                .find(|d| d.serial == serial)
                .with_context(|| format!("camera {serial} is not in the organization"))?;
            let network = match (&args.network, &camera.network_id) {
                (Some(network), _) | (None, Some(network)) => network.clone(),
                (None, None) => anyhow::bail!("camera {serial} is not assigned to a network"),
            };
            let name = args.name.clone().unwrap_or_else(|| camera.display_name().to_string());
            (network, name)
        }
    };

    match ctx.motion_alert()?.run(args.count, &network, &serial, &name).await? {
        MotionOutcome::Muted(source) => println!("Alert muted, home devices seen ({source:?})"),
        MotionOutcome::Alerted { message, snapshot } => {
            let attachment = if snapshot { "with snapshot" } else { "without snapshot" };
            println!("Sent {attachment}: {message}");
        }
    }
    Ok(())
}
