use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Args)]
pub struct OptionSetCommands {
    #[command(subcommand)]
    pub command: OptionSetSubcommands,
}

#[derive(Subcommand)]
pub enum OptionSetSubcommands {
    /// List option sets in a mission, or standard sets when no mission is given
    List {
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Show a set's options in rank order
    Show {
        option_set_id: Uuid,
    },
    /// Create an option set with new options
    Create {
        name: String,
        /// Option label (repeatable, in order)
        #[arg(short, long = "option", required = true)]
        options: Vec<String>,
        /// Locale of the labels (defaults to the default_locale setting)
        #[arg(long)]
        locale: Option<String>,
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Copy option sets. Sets copied in one call share copies of common options.
    Replicate {
        #[arg(required = true)]
        option_set_ids: Vec<Uuid>,
        #[arg(short, long)]
        mission: Option<Uuid>,
    },
    /// Remove options from a set (the set must keep at least one)
    RemoveOptions {
        option_set_id: Uuid,
        #[arg(required = true)]
        optioning_ids: Vec<Uuid>,
    },
    /// Renumber option ranks to 1..N
    FixRanks {
        option_set_id: Uuid,
    },
}

#[derive(Args)]
pub struct OptionCommands {
    #[command(subcommand)]
    pub command: OptionSubcommands,
}

#[derive(Subcommand)]
pub enum OptionSubcommands {
    /// Delete an option from every set using it (refused when answered)
    Delete {
        option_id: Uuid,
    },
}
