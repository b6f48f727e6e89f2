use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use super::{ConfigError, PaginationConfig};

/// Top-level configuration for the bundled operations
///
/// ```json
/// {
///   "pagination": { "maxPerPage": 50 },
///   "model": { "idParam": "post_id" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationConfig {
    /// Pagination parameter names and limits
    #[validate(nested)]
    pub pagination: PaginationConfig,

    /// Model lookup settings
    #[validate(nested)]
    pub model: ModelConfig,
}

/// Model lookup configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// Request parameter holding the model id
    #[validate(length(min = 1, message = "id_param must not be empty"))]
    pub id_param: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id_param: "id".to_string(),
        }
    }
}

impl OperationConfig {
    /// Parse and validate a JSON configuration
    ///
    /// # Example
    /// ```
    /// use opsteps::config::OperationConfig;
    ///
    /// let config = OperationConfig::from_json_str(r#"{"pagination": {"maxPerPage": 50}}"#).unwrap();
    /// assert_eq!(config.pagination.max_per_page, 50);
    /// assert_eq!(config.pagination.default_per_page, 30);
    /// assert_eq!(config.model.id_param, "id");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
