//! `choreio config`: read and edit `config.toml`.
//!
//! Values are addressed by dot path (`display.final_week_days`). The stored
//! Resend key is never echoed back.

use clap::Subcommand;
use choreio_core::Config;

use super::print_json;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value, e.g. `display.final_week_days`
    Get { key: String },
    /// Change one value and save
    Set { key: String, value: String },
    /// Print the whole configuration as JSON
    List,
    /// Overwrite the file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .redacted()
                .get(&key)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            Config::load()?.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => print_json(&Config::load()?.redacted())?,
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
