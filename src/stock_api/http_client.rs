use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};

const FALLBACK_SERVER_ERROR: &str = "Server error";

/// Anything that can answer a prediction request with the raw JSON reply.
#[allow(async_fn_in_trait)]
pub trait PredictionSource {
    async fn fetch_prediction(&self, ticker: &str) -> Result<Value>;
}

pub struct HttpPredictionClient {
    client: reqwest::Client,
    endpoint: String,
    retries: u32,
}

impl HttpPredictionClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stock-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Client error: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            retries: config.retries,
        })
    }

    async fn post_once(&self, ticker: &str) -> std::result::Result<(StatusCode, String), reqwest::Error> {
        let form = Form::new().text("ticker", ticker.to_string());
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl PredictionSource for HttpPredictionClient {
    async fn fetch_prediction(&self, ticker: &str) -> Result<Value> {
        info!("requesting prediction for {} from {}", ticker, self.endpoint);

        // Only transport failures are retried; an answer from the server is final.
        let mut last_error = None;
        for attempt in 0..=self.retries {
            match self.post_once(ticker).await {
                Ok((status, body)) => {
                    debug!("{} answered {} ({} bytes)", self.endpoint, status, body.len());
                    return interpret_response(status, &body);
                }
                Err(e) => {
                    warn!("prediction request attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                    if attempt < self.retries {
                        tokio::time::sleep(Duration::from_millis(500 * (attempt as u64 + 1))).await;
                    }
                }
            }
        }

        Err(last_error
            .map(AppError::from)
            .unwrap_or_else(|| AppError::Transport("Unknown error".to_string())))
    }
}

/// Classifies a reply: non-2xx or an `error` field is a server error carrying
/// the server's own message when it sent one.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Value> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| FALLBACK_SERVER_ERROR.to_string());
        return Err(AppError::Server(message));
    }

    let json = parsed.ok_or_else(|| {
        AppError::Transport(format!("response from server is not valid JSON ({} bytes)", body.len()))
    })?;

    if let Some(message) = error_message(&json) {
        return Err(AppError::Server(message));
    }

    Ok(json)
}

fn error_message(json: &Value) -> Option<String> {
    match &json["error"] {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => Some(FALLBACK_SERVER_ERROR.to_string()),
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
