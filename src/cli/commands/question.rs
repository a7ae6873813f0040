use clap::{Args, Subcommand};
use uuid::Uuid;

use survey_cli::model::QuestionType;

#[derive(Args)]
pub struct QuestionCommands {
    #[command(subcommand)]
    pub command: QuestionSubcommands,
}

#[derive(Subcommand)]
pub enum QuestionSubcommands {
    /// List questions in a mission, or standard questions when no mission is given
    List {
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Create a question
    Create {
        /// Question code (letter first, 2-20 letters, digits or underscores)
        code: String,
        #[arg(short = 't', long = "type", value_enum)]
        qtype: QuestionType,
        /// Question title in the chosen locale
        #[arg(long)]
        title: String,
        /// Locale of the title (defaults to the default_locale setting)
        #[arg(long)]
        locale: Option<String>,
        /// Option set for select questions
        #[arg(long)]
        option_set: Option<Uuid>,
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Copy a question: into a mission when --mission is given, otherwise alongside itself
    Replicate {
        question_id: Uuid,
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Delete a question and take it off every form (refused when answered)
    Delete {
        question_id: Uuid,
    },
}
