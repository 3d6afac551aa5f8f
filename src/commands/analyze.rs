use serde_json::Value;
use std::io;
use std::path::Path;
use tracing::{error, info};

use super::dashboard::show_notice;
use super::{present_prediction, OutputFormat};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::render::{JsonRenderer, Notice, RenderTarget, TerminalRenderer};

/// Ticker for a saved reply: explicit flag, then the payload, then the file name.
pub fn resolve_ticker(explicit: Option<&str>, json: &Value, path: &Path) -> Result<String> {
    let ticker = explicit
        .map(str::to_string)
        .or_else(|| json["ticker"].as_str().map(str::to_string))
        .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .unwrap_or_default()
        .trim()
        .to_uppercase();

    if ticker.is_empty() {
        return Err(AppError::Validation("Please enter a stock ticker".to_string()));
    }
    Ok(ticker)
}

/// Replays a saved prediction reply through the analysis and renderer.
pub fn run(config: &AppConfig, path: &Path, ticker: Option<&str>, format: OutputFormat) -> Result<()> {
    let text = std::fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&text)?;
    let ticker = resolve_ticker(ticker, &json, path)?;
    info!("analyzing saved reply {} as {}", path.display(), ticker);

    match format {
        OutputFormat::Text => {
            let mut renderer = TerminalRenderer::new(io::stdout());
            render(&json, &ticker, config, &mut renderer)
        }
        OutputFormat::Json => {
            let mut renderer = JsonRenderer::new(io::stdout());
            let outcome = render(&json, &ticker, config, &mut renderer);
            renderer.finish()?;
            outcome
        }
    }
}

fn render<R: RenderTarget>(json: &Value, ticker: &str, config: &AppConfig, target: &mut R) -> Result<()> {
    match present_prediction(json, ticker, &config.profiles, None, target) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("analysis of saved reply failed: {}", e);
            show_notice(target, &Notice::error(e.user_message()));
            Err(e)
        }
    }
}
