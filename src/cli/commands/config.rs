//! Handlers for `apiprobe config *` subcommands.

use crate::cli::ConfigCommands;
use crate::config::{ConfigManager, GlobalConfig};
use crate::error::Error;
use crate::fs::FileSystem;

pub fn execute<F: FileSystem>(
    manager: &ConfigManager<F>,
    command: &ConfigCommands,
) -> Result<(), Error> {
    match command {
        ConfigCommands::Show => {
            // ast-grep-ignore: no-println
            print!("{}", manager.load_global_config()?.to_toml()?);
        }
        ConfigCommands::Path => {
            // ast-grep-ignore: no-println
            println!("{}", manager.config_path().display());
        }
        ConfigCommands::Init { force } => {
            if manager.has_config_file() && !force {
                return Err(Error::invalid_config(format!(
                    "{} already exists (use --force to overwrite)",
                    manager.config_path().display()
                )));
            }
            manager.save_global_config(&GlobalConfig::default())?;
            // ast-grep-ignore: no-println
            println!("Wrote {}", manager.config_path().display());
        }
    }
    Ok(())
}
