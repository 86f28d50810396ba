use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::log::init_logging;

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

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Currencies => fxconv::AppCommand::Currencies,
            Commands::Convert { amount, from, to } => {
                fxconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Interactive => fxconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Convert an amount and show popular currency equivalents
    Convert {
        /// Amount to convert (defaults to the configured amount)
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,

        /// Source currency code
        #[arg(short, long)]
        from: Option<String>,

        /// Target currency code
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Start an interactive conversion session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
