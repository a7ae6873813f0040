use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Args)]
pub struct ResponseCommands {
    #[command(subcommand)]
    pub command: ResponseSubcommands,
}

#[derive(Subcommand)]
pub enum ResponseSubcommands {
    /// Record a response to a form
    Add {
        /// Form ID
        form_id: Uuid,
        /// Answer as QUESTIONING_ID or QUESTIONING_ID=OPTION_ID (repeatable)
        #[arg(short, long = "answer", required = true)]
        answers: Vec<String>,
    },
}
