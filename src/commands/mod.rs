pub mod form;
pub mod mission;
pub mod option_set;
pub mod question;
pub mod response;
pub mod settings;

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use survey_cli::config::Config;
use survey_cli::model::{MissionId, Translations};
use survey_cli::replication::{ReplicationContext, Replicator};
use survey_cli::store::{MemoryStore, Store};

/// Config plus the loaded store snapshot a command works against
pub struct Workspace {
    pub config: Config,
    pub store: MemoryStore,
    store_path: PathBuf,
}

impl Workspace {
    /// Load config and the store snapshot; `store_override` wins over the setting
    pub fn load(store_override: Option<PathBuf>) -> Result<Self> {
        let config = Config::load()?;
        let store_path = match store_override {
            Some(path) => path,
            None => config.store_path()?,
        };
        debug!("Using store snapshot {:?}", store_path);

        let mut store = MemoryStore::open(&store_path)
            .with_context(|| format!("Failed to open store snapshot: {:?}", store_path))?;
        store.precompute_usage();

        Ok(Self { config, store, store_path })
    }

    pub fn save(&self) -> Result<()> {
        self.store
            .save_to(&self.store_path)
            .with_context(|| format!("Failed to save store snapshot: {:?}", self.store_path))
    }

    pub fn locale(&self, explicit: Option<String>) -> String {
        explicit.unwrap_or_else(|| self.config.settings.default_locale.clone())
    }

    /// Run replication calls in one store transaction, honoring the naming limit
    pub fn replicate<T, F>(&mut self, f: F) -> survey_cli::Result<T>
    where
        F: FnOnce(&mut Replicator<'_, MemoryStore>) -> survey_cli::Result<T>,
    {
        let max_name_attempts = self.config.settings.max_name_attempts;
        self.store.transaction(|tx| {
            let mut replicator = Replicator::new(tx).with_max_name_attempts(max_name_attempts);
            f(&mut replicator)
        })
    }

    /// Text of `translations` in the configured locale
    pub fn text<'t>(&self, translations: &'t Translations) -> &'t str {
        let locale = &self.config.settings.default_locale;
        translations.best(locale, locale).unwrap_or("")
    }
}

pub fn scope_arg(mission: Option<MissionId>) -> String {
    match mission {
        Some(id) => format!("mission {}", id),
        None => "the standard library".to_string(),
    }
}

/// One line per kind of record a replication created
pub fn print_replication_summary(ctx: &ReplicationContext) {
    for (kind, count) in ctx.created_counts() {
        println!("  {:<14} {}", kind.to_string(), count);
    }
    println!("  {:<14} {}", "total", ctx.total_created());
}
