//! Error types for the harness

use thiserror::Error;

/// Result type alias using the harness error
pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("context field `{0}` was read before any step populated it")]
    MissingContext(&'static str),

    #[error("expected status {expected} but got {actual}. Response: {body}")]
    StatusMismatch {
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("field `{field}` missing in response body: {body}")]
    MissingField { field: &'static str, body: String },

    #[error("fixture setup failed: {0}")]
    Fixture(String),

    #[error("scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
