/// Configuration types
///
/// Configuration is plain data passed by value into the steps. It is read
/// from JSON with every field defaulted and validated once after parsing.

mod pagination;
mod root;

pub use pagination::PaginationConfig;
pub use root::{ModelConfig, OperationConfig};

use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Invalid configuration: {0}")]
    Rule(String),
}

impl ConfigError {
    /// Create an error for a broken configuration rule
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Rule(message.into())
    }
}
