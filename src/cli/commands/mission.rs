use clap::{Args, Subcommand};

#[derive(Args)]
pub struct MissionCommands {
    #[command(subcommand)]
    pub command: MissionSubcommands,
}

#[derive(Subcommand)]
pub enum MissionSubcommands {
    /// List all missions
    List,
    /// Add a new mission
    Add {
        /// Mission name
        name: String,
    },
}
