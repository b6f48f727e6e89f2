use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while a pipeline runs
///
/// Rejected input is not an error here: invalid pagination parameters,
/// denied policies and missing models halt the pipeline with a response.
/// These variants cover the failures no response builder can shape.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A provider (model finder, collection source) failed
    #[error("Provider error in {provider}: {message}")]
    Provider { provider: String, message: String },

    /// A validation schema could not be compiled
    #[error("Failed to compile schema for '{field}': {message}")]
    Schema { field: String, message: String },

    /// A step needed the collection but none was loaded
    #[error("No collection loaded before step '{step}'")]
    MissingCollection { step: String },

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ExecutionError {
    /// Create a Provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a Schema error
    pub fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a MissingCollection error
    pub fn missing_collection(step: impl Into<String>) -> Self {
        Self::MissingCollection { step: step.into() }
    }
}
