use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxform::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxform::AppCommand {
    fn from(cmd: Commands) -> fxform::AppCommand {
        match cmd {
            Commands::Simulate { from, to, amount } => {
                fxform::AppCommand::Simulate { from, to, amount }
            }
            Commands::Accounts => fxform::AppCommand::Accounts,
            Commands::Interactive => fxform::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Simulate a single conversion
    Simulate {
        /// Source account id
        #[arg(long)]
        from: String,
        /// Destination account id
        #[arg(long)]
        to: String,
        /// Amount to convert, in the source account's currency
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
    /// List accounts and exchange rates
    Accounts,
    /// Edit the form line by line and watch conversions settle
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxform::cli::setup::setup(),
        Some(cmd) => fxform::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
