// Configuration inspection

use super::{load_config, GlobalOpts};
use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Print the effective configuration as TOML
    Show,

    /// Validate the configuration and exit
    Check,
}

/// Dispatch a config subcommand.
pub fn handle_config_command(opts: &GlobalOpts, command: &ConfigSubcommand) -> anyhow::Result<()> {
    let config = load_config(opts)?;
    match command {
        ConfigSubcommand::Show => print!("{}", toml::to_string_pretty(&config)?),
        ConfigSubcommand::Check => println!("{}: OK", opts.config_path.display()),
    }
    Ok(())
}
