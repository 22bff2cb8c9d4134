//! Config commands

use crate::config::Config;
use crate::output::OutputFormat;
use crate::ConfigCommands;
use colored::Colorize;

pub fn handle(
    action: ConfigCommands,
    config: &Config,
    profile: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => match format {
            OutputFormat::Table => print!("{}", config.to_toml()?),
            other => other.print(config, |_| String::new())?,
        },
        ConfigCommands::Init { force } => {
            let path = Config::config_path(profile)?;
            if path.exists() && !force {
                anyhow::bail!("{} already exists, use --force to overwrite", path.display());
            }
            Config::default().save_to(&path)?;
            println!("{} {}", "Configuration initialized at".green(), path.display());
        }
    }
    Ok(())
}
