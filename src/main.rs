use anyhow::Result;
use clap::Parser;
use log::{debug, info};

mod cli;
mod commands;

use cli::Cli;
use cli::app::Commands;
use cli::commands::{
    FormSubcommands, MissionSubcommands, OptionSetSubcommands, OptionSubcommands, QuestionSubcommands,
    ResponseSubcommands, SettingsSubcommands,
};
use survey_cli::config::Config;

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.settings.log_file)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting survey-cli");
    let store = cli.store;

    match cli.command {
        Commands::Mission(mission_cmd) => match mission_cmd.command {
            MissionSubcommands::List => commands::mission::list_command(store),
            MissionSubcommands::Add { name } => commands::mission::add_command(store, name),
        },
        Commands::Form(form_cmd) => {
            debug!("Running form command");
            match form_cmd.command {
                FormSubcommands::List { mission } => commands::form::list_command(store, mission),
                FormSubcommands::Show { form_id } => commands::form::show_command(store, form_id),
                FormSubcommands::Create { name, mission } => commands::form::create_command(store, name, mission),
                FormSubcommands::Replicate { form_id, mission } => {
                    commands::form::replicate_command(store, form_id, mission)
                }
                FormSubcommands::AddQuestion { form_id, question_id } => {
                    commands::form::add_question_command(store, form_id, question_id)
                }
                FormSubcommands::RemoveQuestion { questioning_id } => {
                    commands::form::remove_question_command(store, questioning_id)
                }
                FormSubcommands::MoveQuestion { questioning_id, position } => {
                    commands::form::move_question_command(store, questioning_id, position)
                }
                FormSubcommands::Condition { questioning_id, ref_questioning_id, op, value, option } => {
                    commands::form::condition_command(store, questioning_id, ref_questioning_id, op, value, option)
                }
                FormSubcommands::ClearCondition { questioning_id } => {
                    commands::form::clear_condition_command(store, questioning_id)
                }
                FormSubcommands::FixRanks { form_id } => commands::form::fix_ranks_command(store, form_id),
                FormSubcommands::Publish { form_id } => commands::form::publish_command(store, form_id),
                FormSubcommands::Unpublish { form_id } => commands::form::unpublish_command(store, form_id),
                FormSubcommands::Download { form_id } => commands::form::download_command(store, form_id),
                FormSubcommands::Delete { form_id } => commands::form::delete_command(store, form_id),
            }
        }
        Commands::Question(question_cmd) => match question_cmd.command {
            QuestionSubcommands::List { mission } => commands::question::list_command(store, mission),
            QuestionSubcommands::Create { code, qtype, title, locale, option_set, mission } => {
                commands::question::create_command(store, code, qtype, title, locale, option_set, mission)
            }
            QuestionSubcommands::Replicate { question_id, mission } => {
                commands::question::replicate_command(store, question_id, mission)
            }
            QuestionSubcommands::Delete { question_id } => commands::question::delete_command(store, question_id),
        },
        Commands::OptionSet(set_cmd) => match set_cmd.command {
            OptionSetSubcommands::List { mission } => commands::option_set::list_command(store, mission),
            OptionSetSubcommands::Show { option_set_id } => commands::option_set::show_command(store, option_set_id),
            OptionSetSubcommands::Create { name, options, locale, mission } => {
                commands::option_set::create_command(store, name, options, locale, mission)
            }
            OptionSetSubcommands::Replicate { option_set_ids, mission } => {
                commands::option_set::replicate_command(store, option_set_ids, mission)
            }
            OptionSetSubcommands::RemoveOptions { option_set_id, optioning_ids } => {
                commands::option_set::remove_options_command(store, option_set_id, optioning_ids)
            }
            OptionSetSubcommands::FixRanks { option_set_id } => {
                commands::option_set::fix_ranks_command(store, option_set_id)
            }
        },
        Commands::Option(option_cmd) => match option_cmd.command {
            OptionSubcommands::Delete { option_id } => commands::option_set::delete_option_command(store, option_id),
        },
        Commands::Response(response_cmd) => match response_cmd.command {
            ResponseSubcommands::Add { form_id, answers } => commands::response::add_command(store, form_id, answers),
        },
        Commands::Settings(settings_cmd) => match settings_cmd.command {
            SettingsSubcommands::Show => commands::settings::show_command(),
            SettingsSubcommands::Set { name, value } => commands::settings::set_command(name, value),
        },
    }
}
