// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaznError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Input text is empty")]
    EmptyInput,

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WaznError {
    /// True for failures of the round trip itself, as opposed to local
    /// validation or configuration problems.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            WaznError::Request(_) | WaznError::JsonParse(_) | WaznError::ApiError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WaznError>;
