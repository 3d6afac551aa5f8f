use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    /// Rejected before any request is sent.
    #[error("{0}")]
    Validation(String),

    /// Non-OK status or an explicit `error` field in the reply.
    #[error("{0}")]
    Server(String),

    #[error("Network error: {0}")]
    Transport(String),

    /// The reply arrived but could not be turned into a report.
    #[error("Error processing prediction data: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Text shown to the user in the notification area.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Server(msg) => msg.clone(),
            AppError::Transport(_) => "Error analyzing stock data".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
