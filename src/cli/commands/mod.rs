pub mod form;
pub mod mission;
pub mod option_set;
pub mod question;
pub mod response;
pub mod settings;

pub use form::{FormCommands, FormSubcommands};
pub use mission::{MissionCommands, MissionSubcommands};
pub use option_set::{OptionCommands, OptionSetCommands, OptionSetSubcommands, OptionSubcommands};
pub use question::{QuestionCommands, QuestionSubcommands};
pub use response::{ResponseCommands, ResponseSubcommands};
pub use settings::{SettingsCommands, SettingsSubcommands};
