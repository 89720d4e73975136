//! Error types for the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Errors related to the Well API client.
#[derive(Error, Debug)]
pub enum WellError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("the well rejected the entry (status {status}): {body}")]
    Rejected { status: u16, body: String },
}
