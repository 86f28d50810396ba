pub mod cli;
pub mod core;
pub mod providers;

use crate::core::Orchestrator;
use crate::core::config::AppConfig;
use crate::core::currency::is_supported;
use crate::core::error::ConversionError;
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    Interactive,
}

fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator> {
    let provider =
        ExchangeRateApiProvider::new(&config.provider.base_url, config.provider.timeout())?;
    Ok(Orchestrator::new(Arc::new(provider), config.initial_state()))
}

fn ensure_supported(code: &str) -> Result<()> {
    if !is_supported(code) {
        return Err(ConversionError::UnsupportedCurrency(code.to_string()).into());
    }
    Ok(())
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Currencies => {
            cli::currencies::run();
            Ok(())
        }
        AppCommand::Convert { amount, from, to } => {
            if let Some(amount) = amount {
                config.defaults.amount = amount;
            }
            if let Some(from) = from {
                ensure_supported(&from)?;
                config.defaults.from = from;
            }
            if let Some(to) = to {
                ensure_supported(&to)?;
                config.defaults.to = to;
            }
            let orchestrator = build_orchestrator(&config)?;
            cli::convert::run(&orchestrator).await
        }
        AppCommand::Interactive => {
            let orchestrator = build_orchestrator(&config)?;
            cli::interactive::run(&orchestrator).await
        }
    }
}
