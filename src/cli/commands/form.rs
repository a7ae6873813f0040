use clap::{Args, Subcommand};
use uuid::Uuid;

use survey_cli::model::ConditionOp;

#[derive(Args)]
pub struct FormCommands {
    #[command(subcommand)]
    pub command: FormSubcommands,
}

#[derive(Subcommand)]
pub enum FormSubcommands {
    /// List forms in a mission, or standard forms when no mission is given
    List {
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Show a form with its questions in rank order
    Show {
        form_id: Uuid,
    },
    /// Create an empty form
    Create {
        name: String,
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Copy a form: into a mission when --mission is given, otherwise alongside itself
    Replicate {
        form_id: Uuid,
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Append a question to a form
    AddQuestion {
        form_id: Uuid,
        question_id: Uuid,
    },
    /// Remove a question from its form (refused when it has answers)
    RemoveQuestion {
        questioning_id: Uuid,
    },
    /// Move a question to a new 1-based position
    MoveQuestion {
        questioning_id: Uuid,
        position: u32,
    },
    /// Only show a question when another question's answer matches
    Condition {
        questioning_id: Uuid,
        /// Questioning the condition depends on
        #[arg(long = "on")]
        ref_questioning_id: Uuid,
        #[arg(long, value_enum, default_value_t = ConditionOp::Eq)]
        op: ConditionOp,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        option: Option<Uuid>,
    },
    /// Remove a question's display condition
    ClearCondition {
        questioning_id: Uuid,
    },
    /// Renumber question ranks to 1..N
    FixRanks {
        form_id: Uuid,
    },
    /// Publish a form, upgrading its version when needed
    Publish {
        form_id: Uuid,
    },
    /// Unpublish a form
    Unpublish {
        form_id: Uuid,
    },
    /// Record a download of a published form
    Download {
        form_id: Uuid,
    },
    /// Delete a form without responses
    Delete {
        form_id: Uuid,
    },
}

