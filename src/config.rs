use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::stock_api::CompanyProfile;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRIES: u32 = 2;
pub const MAX_SUGGESTIONS: usize = 8;

const SAMPLE_TICKERS: [&str; 20] = [
    "AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "NFLX", "NVDA", "JPM", "META", "AMD",
    "INTC", "CSCO", "ORCL", "IBM", "UBER", "LYFT", "SNAP", "TWTR", "SPOT", "ZM",
];

const BUILTIN_PROFILES: [(&str, &str, &str, &str); 10] = [
    ("AAPL", "Apple Inc.", "Technology", "consumer electronics and software"),
    ("GOOGL", "Alphabet Inc.", "Technology", "digital advertising and cloud services"),
    ("MSFT", "Microsoft Corporation", "Technology", "cloud computing and enterprise software"),
    ("AMZN", "Amazon.com Inc.", "E-commerce & Cloud", "retail and AWS services"),
    ("TSLA", "Tesla Inc.", "Automotive & Energy", "electric vehicles and renewables"),
    ("NFLX", "Netflix Inc.", "Entertainment", "streaming content"),
    ("NVDA", "NVIDIA Corporation", "Semiconductors", "GPUs and AI chips"),
    ("JPM", "JPMorgan Chase", "Finance", "banking and investment services"),
    ("META", "Meta Platforms", "Technology", "social media and metaverse"),
    ("AMD", "AMD Inc.", "Semiconductors", "processors and graphics"),
];

/// Company profiles and the tickers the dashboard accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileBook {
    #[serde(default)]
    pub profiles: HashMap<String, CompanyProfile>,
    #[serde(default)]
    pub tickers: Vec<String>,
    /// Used for tickers without a profile. An empty name means "use the ticker".
    #[serde(default = "default_fallback")]
    pub fallback: CompanyProfile,
}

fn default_fallback() -> CompanyProfile {
    CompanyProfile {
        name: String::new(),
        sector: "Unknown".to_string(),
        focus: "business operations".to_string(),
    }
}

impl Default for ProfileBook {
    fn default() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|(ticker, name, sector, focus)| {
                (
                    ticker.to_string(),
                    CompanyProfile {
                        name: name.to_string(),
                        sector: sector.to_string(),
                        focus: focus.to_string(),
                    },
                )
            })
            .collect();

        Self {
            profiles,
            tickers: SAMPLE_TICKERS.iter().map(|t| t.to_string()).collect(),
            fallback: default_fallback(),
        }
    }
}

impl ProfileBook {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Entries from the file are merged over the built-in book.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: ProfileBook = serde_json::from_str(text)?;
        let mut book = ProfileBook::default();
        book.fallback = overrides.fallback;
        for (ticker, profile) in overrides.profiles {
            book.profiles.insert(ticker.to_uppercase(), profile);
        }
        for ticker in overrides.tickers {
            let ticker = ticker.to_uppercase();
            if !book.tickers.contains(&ticker) {
                book.tickers.push(ticker);
            }
        }
        Ok(book)
    }

    pub fn profile(&self, ticker: &str) -> CompanyProfile {
        match self.profiles.get(ticker) {
            Some(profile) => profile.clone(),
            None => {
                let mut fallback = self.fallback.clone();
                if fallback.name.is_empty() {
                    fallback.name = ticker.to_string();
                }
                fallback
            }
        }
    }

    pub fn is_known(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }

    /// Known tickers starting with `prefix`, at most eight.
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        let query = prefix.trim().to_uppercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.tickers
            .iter()
            .filter(|t| t.starts_with(&query))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub retries: u32,
    pub profiles: ProfileBook,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            profiles: ProfileBook::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(AppError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}
