use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Record {index} has no version label")]
    MissingVersion { index: usize },

    #[error("Record source error: {0}")]
    Source(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Whether the error was caused by bad configuration or arguments rather
    /// than by the data or the environment.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Toml(_) | Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
