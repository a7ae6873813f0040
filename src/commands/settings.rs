use anyhow::Result;
use log::info;

use survey_cli::config::Config;

/// Show current settings
pub fn show_command() -> Result<()> {
    let config = Config::load()?;
    let settings = &config.settings;

    println!("Settings ({:?}):", Config::get_config_path()?);
    println!("  store_path        = {:?}", config.store_path()?);
    println!("  default_locale    = {}", settings.default_locale);
    println!("  max_name_attempts = {}", settings.max_name_attempts);
    println!("  log_file          = {}", settings.log_file);
    Ok(())
}

/// Set the value of a specific setting
pub fn set_command(name: String, value: String) -> Result<()> {
    info!("Setting {} = {}", name, value);

    let mut config = Config::load()?;
    config.set(&name, &value)?;
    config.save()?;

    println!("Set {} = {}", name, value);
    Ok(())
}
