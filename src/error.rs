use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Upstream fetch errors. Most call sites degrade these to "no data"
/// instead of propagating; they surface only in logs.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("endpoint {endpoint} returned code {code}")]
    BadStatus { endpoint: String, code: i64 },

    #[error("endpoint {endpoint} returned a malformed payload: {reason}")]
    MalformedPayload { endpoint: String, reason: String },

    #[error("transport failure for {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The analysis cycle cannot proceed without its reference entities.
    #[error("missing reference data: {0}")]
    MissingReferenceData(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
