pub mod cli;
pub mod controller;
pub mod core;
pub mod providers;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::controller::FormController;
use crate::core::config::AppConfig;

pub enum AppCommand {
    Simulate {
        from: String,
        to: String,
        amount: String,
    },
    Accounts,
    Interactive,
}

/// Builds a controller wired to the sources named in the config.
pub fn build_controller(config: &AppConfig) -> FormController {
    FormController::new(
        providers::account_source(&config.sources.accounts),
        providers::rate_source(&config.sources.rates),
        config.debounce(),
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxform starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut controller = build_controller(&config);
    match command {
        AppCommand::Simulate { from, to, amount } => {
            let output = cli::simulate::simulate(&mut controller, &from, &to, &amount).await;
            println!("{output}");
            if let Some(err) = controller.state().error.clone() {
                return Err(err).context("No conversion was simulated");
            }
        }
        AppCommand::Accounts => {
            let output = cli::simulate::accounts(&mut controller).await;
            println!("{output}");
        }
        AppCommand::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::interactive::run(&mut controller, stdin).await;
        }
    }
    Ok(())
}
