// Error types for the exam coach.
// Separates fatal startup errors from recoverable completion-service errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Startup configuration errors. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GROQ_API_KEY environment variable not found.")]
    MissingApiKey,

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Failure of a single call to the completion service.
///
/// The detail is only ever written to diagnostics; callers of the
/// coordinator see a fixed message instead.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed ({status}): {body}")]
    Unauthorized { status: StatusCode, body: String },

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response contained no answer")]
    EmptyResponse,
}

/// Errors that end the application.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
