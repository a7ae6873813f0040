use anyhow::Result;
use colored::Colorize;
use log::info;
use std::path::PathBuf;
use uuid::Uuid;

use survey_cli::model::{Condition, ConditionOp, MissionId};
use survey_cli::operations;
use survey_cli::ranking::RankFix;
use survey_cli::replication::ReplicationContext;
use survey_cli::store::Store;

use super::{Workspace, print_replication_summary, scope_arg};

/// List forms in a scope
pub fn list_command(store: Option<PathBuf>, mission: Option<MissionId>) -> Result<()> {
    let workspace = Workspace::load(store)?;
    let mut forms = workspace.store.forms(mission)?;
    forms.sort_by(|a, b| a.name.cmp(&b.name));

    if forms.is_empty() {
        println!("No forms in {}.", scope_arg(mission));
        return Ok(());
    }

    println!("{:<38} {:<30} {:<10} {:>9} Version", "ID", "Name", "Status", "Downloads");
    println!("{}", "-".repeat(100));
    for form in &forms {
        let status = if form.published { "published".green() } else { "draft".yellow() };
        let upgrade = if form.upgrade_needed { " (upgrade pending)" } else { "" };
        println!(
            "{:<38} {:<30} {:<10} {:>9} {}{}",
            form.id, form.name, status, form.downloads, form.current_version.sequence, upgrade
        );
    }
    println!("\nTotal forms: {}", forms.len());
    Ok(())
}

/// Show a form with its questions in rank order
pub fn show_command(store: Option<PathBuf>, form_id: Uuid) -> Result<()> {
    let workspace = Workspace::load(store)?;
    let form = workspace.store.form(form_id)?;
    let questionings = workspace.store.questionings(form_id)?;

    println!("{}", form.name.bold());
    println!("  ID:        {}", form.id);
    println!("  Scope:     {}", scope_arg(form.mission_id));
    if let Some(standard_id) = form.standard_id {
        println!("  Copied from standard form {}", standard_id);
    }
    println!("  Published: {}", form.published);
    println!(
        "  Version:   {} ({}), {} download(s)",
        form.current_version.sequence, form.current_version.code, form.downloads
    );
    println!();

    for qing in &questionings {
        let question = workspace.store.question(qing.question_id)?;
        let rank = qing.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
        let mut flags = Vec::new();
        if qing.hidden {
            flags.push("hidden".to_string());
        }
        if qing.required {
            flags.push("required".to_string());
        }
        if let Some(condition) = &qing.condition {
            flags.push(format!("if {} {:?}", condition.ref_qing_id, condition.op));
        }
        println!(
            "  {:>3}. {:<20} {:<40} {} {}",
            rank,
            question.code,
            workspace.text(&question.name),
            qing.id.to_string().dimmed(),
            flags.join(", ")
        );
    }
    if questionings.is_empty() {
        println!("  (no questions)");
    }
    Ok(())
}

/// Create an empty form
pub fn create_command(store: Option<PathBuf>, name: String, mission: Option<MissionId>) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let form = operations::create_form(&mut workspace.store, &name, mission)?;
    workspace.save()?;

    println!("{} form '{}' ({})", "Created".green(), form.name, form.id);
    Ok(())
}

/// Copy a form into a mission, or alongside itself
pub fn replicate_command(store: Option<PathBuf>, form_id: Uuid, mission: Option<MissionId>) -> Result<()> {
    info!("Replicating form {} into {}", form_id, scope_arg(mission));

    let mut workspace = Workspace::load(store)?;
    let mut ctx = ReplicationContext::new();
    let copy = workspace.replicate(|replicator| replicator.replicate_form(form_id, mission, &mut ctx))?;
    workspace.save()?;

    println!("{} form as '{}' ({})", "Copied".green(), copy.name, copy.id);
    print_replication_summary(&ctx);
    Ok(())
}

pub fn add_question_command(store: Option<PathBuf>, form_id: Uuid, question_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let qing = operations::add_questioning(&mut workspace.store, form_id, question_id)?;
    workspace.save()?;

    println!(
        "Added question at rank {} (questioning {})",
        qing.rank.unwrap_or_default(),
        qing.id
    );
    Ok(())
}

pub fn remove_question_command(store: Option<PathBuf>, questioning_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let remaining = operations::remove_questioning(&mut workspace.store, questioning_id)?;
    workspace.save()?;

    println!("{} questioning {}, {} question(s) left", "Removed".green(), questioning_id, remaining.len());
    Ok(())
}

pub fn move_question_command(store: Option<PathBuf>, questioning_id: Uuid, position: u32) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let ordered = operations::move_questioning(&mut workspace.store, questioning_id, position)?;
    workspace.save()?;

    let rank = ordered
        .iter()
        .find(|q| q.id == questioning_id)
        .and_then(|q| q.rank)
        .unwrap_or_default();
    println!("Moved questioning {} to rank {}", questioning_id, rank);
    Ok(())
}

pub fn condition_command(
    store: Option<PathBuf>,
    questioning_id: Uuid,
    ref_questioning_id: Uuid,
    op: ConditionOp,
    value: Option<String>,
    option: Option<Uuid>,
) -> Result<()> {
    let condition = Condition {
        ref_qing_id: ref_questioning_id,
        op,
        value,
        option_id: option,
    };

    let mut workspace = Workspace::load(store)?;
    operations::set_condition(&mut workspace.store, questioning_id, Some(condition))?;
    workspace.save()?;

    println!("Questioning {} now depends on {}", questioning_id, ref_questioning_id);
    Ok(())
}

pub fn clear_condition_command(store: Option<PathBuf>, questioning_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    operations::set_condition(&mut workspace.store, questioning_id, None)?;
    workspace.save()?;

    println!("Cleared condition on questioning {}", questioning_id);
    Ok(())
}

pub fn fix_ranks_command(store: Option<PathBuf>, form_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let fixed = workspace.store.transaction(|tx| {
        tx.form(form_id)?;
        operations::fix_questioning_ranks(tx, form_id, Vec::new(), RankFix::default())
    })?;
    workspace.save()?;

    println!("Renumbered {} question(s)", fixed.len());
    Ok(())
}

pub fn publish_command(store: Option<PathBuf>, form_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let form = operations::publish_form(&mut workspace.store, form_id)?;
    workspace.save()?;

    println!(
        "{} '{}' at version {} ({})",
        "Published".green(),
        form.name,
        form.current_version.sequence,
        form.current_version.code
    );
    Ok(())
}

pub fn unpublish_command(store: Option<PathBuf>, form_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let form = operations::unpublish_form(&mut workspace.store, form_id)?;
    workspace.save()?;

    println!("Unpublished '{}'", form.name);
    Ok(())
}

pub fn download_command(store: Option<PathBuf>, form_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let form = operations::record_download(&mut workspace.store, form_id)?;
    workspace.save()?;

    println!("'{}' downloaded {} time(s)", form.name, form.downloads);
    Ok(())
}

pub fn delete_command(store: Option<PathBuf>, form_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    operations::delete_form(&mut workspace.store, form_id)?;
    workspace.save()?;

    println!("{} form {}", "Deleted".red(), form_id);
    Ok(())
}
