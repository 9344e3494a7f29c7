//! Error types for the stock checker

use thiserror::Error;

/// Unified error type for stock checker operations
#[derive(Debug, Error)]
pub enum StockError {
    /// HTTP request failed (network error, timeout, undecodable body)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Failed to parse a JSON document
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Broken configuration, polling must not start
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration problems detected before the poll loop starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("You have not set up any wanted models. Polling has NOT started!")]
    NoWantedModels,

    #[error("There are no models in the models catalog. Polling has NOT started!")]
    EmptyCatalog,

    #[error("Invalid wanted models were found. Polling has NOT started! {}", .0.join(" "))]
    UnknownModels(Vec<String>),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result alias for stock checker operations
pub type Result<T> = std::result::Result<T, StockError>;
