use apiprobe::cli::errors::print_error_with_json;
use apiprobe::cli::tracing_init::init_tracing;
use apiprobe::cli::{commands, Cli, Commands};
use apiprobe::config::ConfigManager;
use apiprobe::error::Error;
use apiprobe::fs::OsFileSystem;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "error"
    };
    init_tracing(cli.verbosity, default_level);

    let manager = match ConfigManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            print_error_with_json(&e, json_errors);
            std::process::exit(1);
        }
    };

    match run_command(cli, &manager).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            print_error_with_json(&e, json_errors);
            std::process::exit(1);
        }
    }
}

/// Dispatches the command; `Ok(false)` means it completed but reported failures.
async fn run_command(cli: Cli, manager: &ConfigManager<OsFileSystem>) -> Result<bool, Error> {
    let format = cli.format;
    match cli.command {
        Commands::Config { command } => {
            commands::config::execute(manager, &command)?;
            Ok(true)
        }
        Commands::Generate { spec, offline } => {
            let config = manager.load_global_config()?;
            commands::generate::execute(&OsFileSystem, &spec, offline, &config, format).await?;
            Ok(true)
        }
        Commands::Run {
            spec,
            base_url,
            offline,
        } => {
            let config = manager.load_global_config()?;
            commands::run::execute(&OsFileSystem, &spec, &base_url, offline, &config, format).await
        }
        Commands::Serve {
            host,
            port,
            offline,
        } => {
            let config = manager.load_global_config()?;
            commands::serve::execute(host, port, offline, &config).await?;
            Ok(true)
        }
    }
}
