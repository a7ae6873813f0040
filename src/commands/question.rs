use anyhow::Result;
use colored::Colorize;
use log::info;
use std::path::PathBuf;
use uuid::Uuid;

use survey_cli::model::{MissionId, QuestionBuilder, QuestionType};
use survey_cli::operations;
use survey_cli::replication::ReplicationContext;
use survey_cli::store::Store;

use super::{Workspace, print_replication_summary, scope_arg};

pub fn list_command(store: Option<PathBuf>, mission: Option<MissionId>) -> Result<()> {
    let workspace = Workspace::load(store)?;
    let mut questions = workspace.store.questions(mission)?;
    questions.sort_by(|a, b| a.code.cmp(&b.code));

    if questions.is_empty() {
        println!("No questions in {}.", scope_arg(mission));
        return Ok(());
    }

    println!("{:<38} {:<20} {:<16} Title", "ID", "Code", "Type");
    println!("{}", "-".repeat(100));
    for question in &questions {
        println!(
            "{:<38} {:<20} {:<16} {}",
            question.id,
            question.code,
            format!("{:?}", question.qtype),
            workspace.text(&question.name)
        );
    }
    println!("\nTotal questions: {}", questions.len());
    Ok(())
}

pub fn create_command(
    store: Option<PathBuf>,
    code: String,
    qtype: QuestionType,
    title: String,
    locale: Option<String>,
    option_set: Option<Uuid>,
    mission: Option<MissionId>,
) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    let locale = workspace.locale(locale);

    let mut builder = QuestionBuilder::new(&code, qtype).mission(mission).title(&locale, &title);
    if let Some(set_id) = option_set {
        builder = builder.option_set(set_id);
    }
    let question = operations::create_question(&mut workspace.store, builder.build()?)?;
    workspace.save()?;

    println!("{} question '{}' ({})", "Created".green(), question.code, question.id);
    Ok(())
}

pub fn replicate_command(store: Option<PathBuf>, question_id: Uuid, mission: Option<MissionId>) -> Result<()> {
    info!("Replicating question {} into {}", question_id, scope_arg(mission));

    let mut workspace = Workspace::load(store)?;
    let mut ctx = ReplicationContext::new();
    let copy = workspace.replicate(|replicator| replicator.replicate_question(question_id, mission, &mut ctx))?;
    workspace.save()?;

    println!("{} question as '{}' ({})", "Copied".green(), copy.code, copy.id);
    print_replication_summary(&ctx);
    Ok(())
}

pub fn delete_command(store: Option<PathBuf>, question_id: Uuid) -> Result<()> {
    let mut workspace = Workspace::load(store)?;
    operations::delete_question(&mut workspace.store, question_id)?;
    workspace.save()?;

    println!("{} question {}", "Deleted".red(), question_id);
    Ok(())
}
