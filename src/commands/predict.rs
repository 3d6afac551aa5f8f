use std::io;

use super::{Dashboard, OutputFormat};
use crate::config::AppConfig;
use crate::error::Result;
use crate::render::{JsonRenderer, TerminalRenderer};
use crate::stock_api::HttpPredictionClient;

pub async fn run(config: &AppConfig, ticker: &str, format: OutputFormat) -> Result<()> {
    let client = HttpPredictionClient::new(config)?;
    let dashboard = Dashboard::new(client, config.profiles.clone());

    match format {
        OutputFormat::Text => {
            let mut renderer = TerminalRenderer::new(io::stdout());
            dashboard.predict(ticker, &mut renderer).await?;
        }
        OutputFormat::Json => {
            let mut renderer = JsonRenderer::new(io::stdout());
            let outcome = dashboard.predict(ticker, &mut renderer).await;
            // the document carries the error notice too
            renderer.finish()?;
            outcome?;
        }
    }
    Ok(())
}
