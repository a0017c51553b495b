use clap::{Args, Subcommand};

use crate::commands::shared::configuration_error;
use crate::config;

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand, Clone)]
enum ConfigSubcommand {
    #[command(about = "Validate the config file and optionally one profile")]
    Check {
        #[arg(long)]
        profile: Option<String>,
    },
    #[command(about = "Print the config file path in use")]
    Path,
}

pub fn run(args: ConfigArgs) -> Result<(), String> {
    match args.command {
        ConfigSubcommand::Check { profile } => {
            let path = config::validate_config(profile.as_deref()).map_err(configuration_error)?;
            println!("config OK: {}", path.display());
        }
        ConfigSubcommand::Path => {
            let path = config::config_path().map_err(configuration_error)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
