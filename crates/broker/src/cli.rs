use std::path::PathBuf;

use broker_core::kernel::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};

/// Broker: configuration-driven source -> interceptors -> destination tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml, .yaml/.yml or .json)
    #[arg(
        short,
        long,
        global = true,
        env = CONFIG_ENV_VAR,
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Build and execute every configured task (default)
    #[default]
    Run,
    /// Build every task without executing any, then print the task list
    Check,
    /// List registered plugin identifiers
    Plugins,
}
