use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use stock_dashboard::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stock_dashboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    // Renderers already showed the user-facing notice; only log and set the status.
    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("stock-dashboard failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
