pub mod commands;
pub mod errors;
pub mod render;
pub mod tracing_init;

use crate::constants;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Output as JSON (default)
    Json,
    /// Output as YAML
    Yaml,
    /// Output as formatted table
    Table,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "apiprobe: generate and run HTTP API tests from a specification",
    long_about = "apiprobe reads an OpenAPI-style specification, derives test cases for its\n\
                  operations (AI-assisted when a text-generation backend is configured,\n\
                  deterministically otherwise) and runs them against a live base URL.\n\n\
                  Examples:\n  \
                  apiprobe generate api.yaml --offline\n  \
                  apiprobe run api.yaml --base-url http://localhost:8080\n  \
                  apiprobe serve --port 3000"
)]
pub struct Cli {
    /// Output all errors as structured JSON to stderr
    #[arg(long, global = true, help = "Output errors in JSON format")]
    pub json_errors: bool,

    /// Increase logging verbosity
    #[arg(
        short = 'v',
        global = true,
        action = ArgAction::Count,
        help = "Increase logging verbosity (-v for debug, -vv for trace)"
    )]
    pub verbosity: u8,

    /// Output format for generated cases and suite results
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "json",
        help = "Output format for results"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate test cases for a specification and print them
    #[command(long_about = "Generate test cases for every operation in a specification.\n\n\
                      The AI stage runs when a key for the text-generation backend is\n\
                      available; otherwise, or when it fails, a deterministic case is\n\
                      derived for each operation.\n\n\
                      Example:\n  \
                      apiprobe generate ./api.yaml --offline")]
    Generate {
        /// Path to the specification file (JSON or YAML)
        spec: PathBuf,
        /// Skip the AI stage and use deterministic generation only
        #[arg(long, help = "Use deterministic generation only")]
        offline: bool,
    },
    /// Generate test cases and run them against a base URL
    #[command(long_about = "Generate test cases for a specification and execute them.\n\n\
                      Exits with status 1 when any test case fails.\n\n\
                      Example:\n  \
                      apiprobe run ./api.yaml --base-url http://localhost:8080")]
    Run {
        /// Path to the specification file (JSON or YAML)
        spec: PathBuf,
        /// Base URL of the API under test
        #[arg(
            long,
            env = constants::ENV_APIPROBE_BASE_URL,
            value_name = "URL",
            help = "Base URL of the API under test"
        )]
        base_url: String,
        /// Skip the AI stage and use deterministic generation only
        #[arg(long, help = "Use deterministic generation only")]
        offline: bool,
    },
    /// Serve the generation and execution API over HTTP
    Serve {
        /// Address to bind (overrides `server.host`)
        #[arg(long, value_name = "HOST")]
        host: Option<String>,
        /// Port to bind (overrides `server.port`)
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,
        /// Skip the AI stage and use deterministic generation only
        #[arg(long, help = "Use deterministic generation only")]
        offline: bool,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the location of the configuration file
    Path,
    /// Write the default configuration if no file exists yet
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}
