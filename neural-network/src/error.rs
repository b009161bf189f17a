use thiserror::Error;

/// Errors that can occur while configuring or building a network
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The configuration cannot describe a network (too few layers, empty
    /// layer, non-positive learning rate, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for a `NetworkConfig`
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
