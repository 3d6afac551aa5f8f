use std::io::{self, Write};

use super::OutputFormat;
use crate::config::AppConfig;
use crate::error::Result;

pub fn run(config: &AppConfig, prefix: &str, format: OutputFormat) -> Result<()> {
    let matches = config.profiles.suggest(prefix);
    let mut out = io::stdout().lock();

    match format {
        OutputFormat::Text => {
            for ticker in &matches {
                let profile = config.profiles.profile(ticker);
                writeln!(out, "{:<6} {}", ticker, profile.name)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, &matches)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
