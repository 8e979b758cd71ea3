use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No table matched the expected headers: {0}")]
    TableNotFound(String),

    #[error("Could not map column '{field}' from headers {headers:?}")]
    MissingColumn { field: String, headers: Vec<String> },

    #[error("File not found: {0}")]
    MissingFile(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
