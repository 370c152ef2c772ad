mod cli;

use std::process::ExitCode;

use broker_core::kernel::constants::{APP_NAME, APP_VERSION};
use broker_core::{BrokerConfig, KernelError, PluginRegistry, Runner};
use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Registry holding every bundled plugin namespace.
fn bundled_registry() -> Result<PluginRegistry, KernelError> {
    let mut registry = PluginRegistry::with_current_api()?;
    // --- Statically Register Core Plugin Namespaces ---
    registry.register_namespace(core_endpoints::namespace()?)?;
    registry.register_namespace(core_interceptors::namespace()?)?;
    registry.register_namespace(core_logging::namespace()?)?;
    Ok(registry)
}

async fn dispatch(cli: Cli) -> Result<(), KernelError> {
    let registry = bundled_registry()?;

    match cli.command.unwrap_or_default() {
        Command::Plugins => {
            for identifier in registry.identifiers() {
                println!("{}", identifier);
            }
        }
        Command::Check => {
            let config = BrokerConfig::load(&cli.config)?;
            let tasks = Runner::new(registry).check(&config)?;
            println!("{} v{}: {} task(s) valid", APP_NAME, APP_VERSION, tasks.len());
            for task in &tasks {
                println!("  {}", task);
            }
        }
        Command::Run => {
            let config = BrokerConfig::load(&cli.config)?;
            // Task failures are logged by the runner and do not change the exit code.
            Runner::new(registry).run(&config).await?;
        }
    }
    Ok(())
}
