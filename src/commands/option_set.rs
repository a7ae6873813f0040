use anyhow::Result;
use colored::Colorize;
use log::info;
use std::path::PathBuf;
use uuid::Uuid;

use survey_cli::model::{MissionId, OptionItemBuilder};
use survey_cli::operations;
use survey_cli::ranking::RankFix;
use survey_cli::replication::ReplicationContext;
use survey_cli::store::Store;

use super::{Workspace, print_replication_summary, scope_arg};

pub fn list_command(store: Option<PathBuf>, mission: Option<MissionId>) -> Result<()> {
    let workspace = Workspace::load(store)?;
    let mut sets = workspace.store.option_sets(mission)?;
    sets.sort_by(|a, b| a.name.cmp(&b.name));

    if sets.is_empty() {
        println!("No option sets in {}.", scope_arg(mission));
        return Ok(());
    }

    println!("{:<38} {:<30} Options", "ID", "Name");
    println!("{}", "-".repeat(80));
    for set in &sets {
        let count = workspace.store.optionings(set.id)?.len();
        println!("{:<38} {:<30} {}", set.id, set.name, count);
    }
    println!("\nTotal option sets: {}", sets.len());
    Ok(())
}

pub fn show_command(store: Option<PathBuf>, option_set_id: Uuid) -> Result<()> {
    let workspace = Workspace::load(store)?;
    let set = workspace.store.option_set(option_set_id)?;

    println!("{} ({})", set.name.bold(), scope_arg(set.mission_id));
    for optioning in workspace.store.optionings(set.id)? {
        let option = workspace.store.option_item(optioning.option_id)?;
        let rank = optioning.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>3}. {:<30} option {}  optioning {}",
            rank,
            workspace.text(&option.name),
            option.id.to_string().dimmed(),
            optioning.id.to_string().dimmed()
        );
    }
    Ok(())
}

/// Create one option per label, then a set ranking them in order
pub fn create_command(
    store: Option<PathBuf>,
    name: String,
    labels: Vec<String>,
    locale: Option<String>,
    mission: Option<MissionId>,
) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let locale = workspace.locale(locale);

    let mut option_ids = Vec::with_capacity(labels.len());
    for label in &labels {
        let option = OptionItemBuilder::new().mission(mission).name(&locale, label).build()?;
        option_ids.push(operations::create_option_item(&mut workspace.store, option)?.id);
    }
    let (set, optionings) = operations::create_option_set(&mut workspace.store, &name, mission, &option_ids)?;
    workspace.save()?;

    println!("{} option set '{}' with {} options ({})", "Created".green(), set.name, optionings.len(), set.id);
    Ok(())
}

/// Copy several sets with one context so options they share are copied once
pub fn replicate_command(store: Option<PathBuf>, option_set_ids: Vec<Uuid>, mission: Option<MissionId>) -> Result<()> {
    info!("Replicating {} option set(s) into {}", option_set_ids.len(), scope_arg(mission));

    let mut workspace = Workspace::load(store)?;
    let mut ctx = ReplicationContext::new();
    let copies = workspace.replicate(|replicator| {
        option_set_ids
            .iter()
            .map(|id| replicator.replicate_option_set(*id, mission, &mut ctx))
            .collect::<survey_cli::Result<Vec<_>>>()
    })?;
    workspace.save()?;

    for copy in &copies {
        println!("{} option set as '{}' ({})", "Copied".green(), copy.name, copy.id);
    }
    print_replication_summary(&ctx);
    Ok(())
}

pub fn remove_options_command(store: Option<PathBuf>, option_set_id: Uuid, optioning_ids: Vec<Uuid>) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let remaining = operations::remove_optionings(&mut workspace.store, option_set_id, &optioning_ids)?;
    workspace.save()?;

    println!("{} {} option(s), {} left", "Removed".green(), optioning_ids.len(), remaining.len());
    Ok(())
}

pub fn fix_ranks_command(store: Option<PathBuf>, option_set_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let fixed = workspace.store.transaction(|tx| {
        tx.option_set(option_set_id)?;
        operations::fix_optioning_ranks(tx, option_set_id, Vec::new(), RankFix::default())
    })?;
    workspace.save()?;

    println!("Renumbered {} option(s)", fixed.len());
    Ok(())
}

pub fn delete_option_command(store: Option<PathBuf>, option_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    operations::delete_option_item(&mut workspace.store, option_id)?;
    workspace.save()?;

    println!("{} option {}", "Deleted".red(), option_id);
    Ok(())
}
