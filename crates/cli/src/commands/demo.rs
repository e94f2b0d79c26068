//! Interactive demo menu around the provisioning sequencer

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dashops_core::{DemoStage, StageOutcome};
use dashops_domain::DemoState;
use dashops_infra::config::load_inventory;

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Inventory file; the configured `demo.inventory_path` when omitted
    #[arg(long)]
    pub inventory: Option<PathBuf>,

    /// Run one stage (number or keyword) and exit instead of showing the menu
    #[arg(long)]
    pub stage: Option<String>,

    /// Name recorded in device notes
    #[arg(long)]
    pub user: Option<String>,

    /// Comma separated tags mixed into the network tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

pub async fn run(ctx: &AppContext, args: &DemoArgs) -> Result<()> {
    let inventory_path = args.inventory.clone().unwrap_or_else(|| ctx.config.demo.inventory_path.clone());
    let inventory = load_inventory(&inventory_path)
        .with_context(|| format!("failed to load inventory {}", inventory_path.display()))?;
    let sequencer = ctx.sequencer()?;
    let mut state = sequencer.load_state(ctx.api_key(), ctx.org_id()?).await?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    if let Some(user) = &args.user {
        state.user_name = Some(user.clone());
    }
    if let Some(tags) = &args.tags {
        state.custom_tags = Some(clean_tags(tags.iter().map(String::as_str)));
    }
    if args.stage.is_none() {
        ask_identity(&mut state, &mut input, &mut output)?;
    }
    sequencer.save_state(&state).await?;

    if let Some(stage) = &args.stage {
        let stage = DemoStage::from_menu_input(stage)
            .with_context(|| format!("unknown demo stage {stage:?}"))?;
        let outcome = sequencer.run(stage, &mut state, &inventory).await?;
        writeln!(output, "{}", describe(&outcome))?;
        return Ok(());
    }

    loop {
        write!(output, "{}", menu())?;
        output.flush()?;
        let Some(choice) = read_line(&mut input)? else { break };
        if matches!(choice.to_lowercase().as_str(), "q" | "quit" | "exit") {
            break;
        }
        let Some(stage) = DemoStage::from_menu_input(&choice) else {
            writeln!(output, "Please pick one of the menu options")?;
            continue;
        };

        let outcome = sequencer.run(stage, &mut state, &inventory).await?;
        writeln!(output, "{}", describe(&outcome))?;
        if matches!(outcome, StageOutcome::TornDown(_)) {
            break;
        }
    }
    Ok(())
}

/// Prompt for the user name and custom tags when the state has none yet.
fn ask_identity(state: &mut DemoState, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    if state.user_name.as_deref().map_or(true, str::is_empty) {
        write!(output, "What is your name? ")?;
        output.flush()?;
        state.user_name = read_line(input)?.filter(|name| !name.is_empty());
    }
    if state.custom_tags.is_none() {
        write!(output, "Any tags for your networks (comma separated)? ")?;
        output.flush()?;
        let tags = read_line(input)?.unwrap_or_default();
        state.custom_tags = Some(clean_tags(tags.split(',')));
    }
    Ok(())
}

/// Trimmed line, or `None` at end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Tags may not contain spaces on the dashboard.
fn clean_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    tags.map(|tag| tag.trim().replace(' ', "_")).filter(|tag| !tag.is_empty()).collect()
}

fn menu() -> String {
    let mut menu = String::from("\nWhat would you like to do?\n");
    for (index, stage) in DemoStage::ALL.iter().enumerate() {
        menu.push_str(&format!("  {}. {}\n", index + 1, stage.menu_label()));
    }
    menu.push_str("> ");
    menu
}

fn describe(outcome: &StageOutcome) -> String {
    match outcome {
        StageOutcome::Skipped(reason) => reason.to_string(),
        StageOutcome::Batches(results) => results
            .iter()
            .map(|result| result.outcome.describe(&result.batch_id))
            .collect::<Vec<_>>()
            .join("\n"),
        StageOutcome::Fun(report) => format!(
            "Blinked {} device(s), camera {}, {} snapshot(s) sent",
            report.blinked.len(),
            if report.camera_online { "online" } else { "offline" },
            report.snapshots_sent
        ),
        StageOutcome::TornDown(report) => format!(
            "Deleted {} network(s) and removed {} file(s). Thanks for trying the demo!",
            report.deleted_networks.len(),
            report.removed_files.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use dashops_core::{BatchOutcome, BatchResult, SkipReason};

    use super::*;

    #[test]
    fn identity_prompts_fill_missing_fields() {
        let mut state = DemoState::new("key", "123");
        let mut input = io::Cursor::new("Ada\nlab, west coast ,\n");
        let mut output = Vec::new();

        ask_identity(&mut state, &mut input, &mut output).unwrap();

        assert_eq!(state.user_name.as_deref(), Some("Ada"));
        assert_eq!(state.custom_tags, Some(vec!["lab".to_string(), "west_coast".to_string()]));
        assert!(String::from_utf8(output).unwrap().contains("What is your name?"));
    }

    #[test]
    fn identity_is_not_asked_twice() {
        let mut state = DemoState::new("key", "123");
        state.user_name = Some("Ada".into());
        state.custom_tags = Some(Vec::new());
        let mut output = Vec::new();

        ask_identity(&mut state, &mut io::Cursor::new(""), &mut output).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn menu_lists_every_stage() {
        let menu = menu();
        assert!(menu.contains("1. Create your networks"));
        assert!(menu.contains("5. Reset & end this demo!"));
    }

    #[test]
    fn outcomes_are_described_for_the_operator() {
        assert_eq!(describe(&StageOutcome::Skipped(SkipReason::NetworksExist)), "Networks already created!");
        let batches = StageOutcome::Batches(vec![BatchResult {
            batch_id: "42".into(),
            outcome: BatchOutcome::Completed,
        }]);
        assert_eq!(describe(&batches), "Action batch 42 completed!");
    }
}
