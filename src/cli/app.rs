use super::commands::{
    FormCommands, MissionCommands, OptionCommands, OptionSetCommands, QuestionCommands,
    ResponseCommands, SettingsCommands,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "survey-cli")]
#[command(about = "Manage survey forms, questions and option sets, and copy standard ones into missions")]
pub struct Cli {
    /// Store snapshot to operate on (overrides the store_path setting)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mission (tenant) management
    Mission(MissionCommands),
    /// Forms, their questions and publication
    Form(FormCommands),
    /// Question bank management
    Question(QuestionCommands),
    /// Option set management
    OptionSet(OptionSetCommands),
    /// Individual options
    Option(OptionCommands),
    /// Record responses (used to exercise deletion checks)
    Response(ResponseCommands),
    /// Application settings management
    Settings(SettingsCommands),
}
