use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::commands::{self, OutputFormat};
use crate::config::{AppConfig, ProfileBook, DEFAULT_ENDPOINT, DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::error::Result;

#[derive(Parser)]
#[command(name = "stock-dashboard")]
#[command(about = "Stock prediction dashboard: indicators, signals and risk report", long_about = None)]
pub struct Cli {
    /// Prediction endpoint
    #[arg(long, env = "STOCK_DASHBOARD_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[arg(long, env = "STOCK_DASHBOARD_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Retries after a network failure
    #[arg(long, env = "STOCK_DASHBOARD_RETRIES", default_value_t = DEFAULT_RETRIES, global = true)]
    pub retries: u32,

    /// JSON file with extra company profiles and tickers
    #[arg(long, env = "STOCK_DASHBOARD_PROFILES", global = true)]
    pub profiles: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request a prediction and show the dashboard
    Predict {
        ticker: String,
    },
    /// Analyze a saved prediction reply without calling the service
    Analyze {
        file: PathBuf,
        #[arg(short, long)]
        ticker: Option<String>,
    },
    /// List known tickers starting with a prefix
    Suggest {
        prefix: String,
    },
}

impl Cli {
    pub fn config(&self) -> Result<AppConfig> {
        let profiles = match &self.profiles {
            Some(path) => ProfileBook::from_json_file(path)?,
            None => ProfileBook::default(),
        };
        let config = AppConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout),
            retries: self.retries,
            profiles,
        };
        config.validate()?;
        Ok(config)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.config()?;

    match cli.command {
        Commands::Predict { ticker } => commands::predict::run(&config, &ticker, cli.format).await,
        Commands::Analyze { file, ticker } => {
            commands::analyze::run(&config, &file, ticker.as_deref(), cli.format)
        }
        Commands::Suggest { prefix } => commands::suggest::run(&config, &prefix, cli.format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict_with_overrides() {
        let cli = Cli::try_parse_from([
            "stock-dashboard",
            "--endpoint",
            "https://models.example.com/predict",
            "--timeout",
            "5",
            "predict",
            "aapl",
        ])
        .unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.endpoint, "https://models.example.com/predict");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(matches!(cli.command, Commands::Predict { ref ticker } if ticker == "aapl"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from(["stock-dashboard", "--timeout", "0", "suggest", "A"]).unwrap();
        assert!(cli.config().is_err());
    }
}
