use anyhow::Result;
use colored::Colorize;
use log::info;
use std::path::PathBuf;

use survey_cli::operations;
use survey_cli::store::Store;

use super::Workspace;

/// List all missions
pub fn list_command(store: Option<PathBuf>) -> Result<()> {
    let workspace = Workspace::load(store)?;
    let missions = workspace.store.missions()?;

    if missions.is_empty() {
        println!("No missions configured.");
        return Ok(());
    }

    println!("{:<38} Name", "ID");
    println!("{}", "-".repeat(60));
    for mission in &missions {
        println!("{:<38} {}", mission.id, mission.name.bold());
    }
    println!("\nTotal missions: {}", missions.len());
    Ok(())
}

/// Add a new mission
pub fn add_command(store: Option<PathBuf>, name: String) -> Result<()> {
    info!("Adding mission: {}", name);

    let mut workspace = Workspace::load(store)?;
    let mission = operations::create_mission(&mut workspace.store, &name)?;
    workspace.save()?;

    println!("{} mission '{}' ({})", "Added".green(), mission.name, mission.id);
    Ok(())
}
