//! Reporting and alerting commands

use anyhow::Result;

use crate::context::AppContext;

pub async fn status(ctx: &AppContext) -> Result<()> {
    let responded = ctx.status_reporter()?.run().await?;
    println!("Status reports sent for {responded} organization(s)");
    Ok(())
}

pub async fn perf(ctx: &AppContext) -> Result<()> {
    let alerts = ctx.perf_checker()?.run(ctx.org_id()?).await?;
    if alerts.is_empty() {
        println!("All appliance uplinks are within thresholds");
    }
    for alert in alerts {
        println!("{alert}");
    }
    Ok(())
}

pub async fn always_on(ctx: &AppContext) -> Result<()> {
    match ctx.always_on_checker()?.run(ctx.org_id()?).await? {
        Some(message) => println!("{message}"),
        None => println!("All always-on devices are online"),
    }
    Ok(())
}
