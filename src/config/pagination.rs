use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Pagination configuration
///
/// Every field has a default, so a config only lists its overrides:
///
/// ```json
/// { "perPageParam": "limit", "maxPerPage": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_pagination"))]
pub struct PaginationConfig {
    /// Name of the page-number parameter
    #[validate(length(min = 1, message = "page_param must not be empty"))]
    pub page_param: String,

    /// Name of the per-page parameter
    #[validate(length(min = 1, message = "per_page_param must not be empty"))]
    pub per_page_param: String,

    /// Page size used when the request does not ask for one
    pub default_per_page: u32,

    /// Largest page size a request may ask for
    #[validate(range(min = 1, message = "max_per_page must be at least 1"))]
    pub max_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
            per_page_param: "per_page".to_string(),
            default_per_page: 30,
            max_per_page: 100,
        }
    }
}

impl PaginationConfig {
    pub fn with_page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }

    pub fn with_per_page_param(mut self, name: impl Into<String>) -> Self {
        self.per_page_param = name.into();
        self
    }

    pub fn with_default_per_page(mut self, value: u32) -> Self {
        self.default_per_page = value;
        self
    }

    pub fn with_max_per_page(mut self, value: u32) -> Self {
        self.max_per_page = value;
        self
    }
}

fn validate_pagination(config: &PaginationConfig) -> Result<(), ValidationError> {
    if config.page_param == config.per_page_param {
        return Err(ValidationError::new("distinct_params")
            .with_message(Cow::from("page_param and per_page_param must differ")));
    }

    if config.default_per_page < 1 || config.default_per_page > config.max_per_page {
        return Err(ValidationError::new("default_per_page_range")
            .with_message(Cow::from("default_per_page must be between 1 and max_per_page")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PaginationConfig::default();
        assert_eq!(config.page_param, "page");
        assert_eq!(config.per_page_param, "per_page");
        assert_eq!(config.default_per_page, 30);
        assert_eq!(config.max_per_page, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override_from_json() {
        let config: PaginationConfig =
            serde_json::from_str(r#"{"perPageParam": "limit", "maxPerPage": 50}"#).unwrap();

        assert_eq!(config.page_param, "page");
        assert_eq!(config.per_page_param, "limit");
        assert_eq!(config.default_per_page, 30);
        assert_eq!(config.max_per_page, 50);
    }

    #[test]
    fn test_default_above_max_is_invalid() {
        let config = PaginationConfig::default().with_max_per_page(10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_default_is_invalid() {
        let config = PaginationConfig::default().with_default_per_page(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_is_invalid() {
        let config = PaginationConfig::default()
            .with_default_per_page(0)
            .with_max_per_page(0);
        let errors = config.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("max_per_page"));
    }

    #[test]
    fn test_same_param_names_are_invalid() {
        let config = PaginationConfig::default().with_per_page_param("page");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_param_name_is_invalid() {
        let config = PaginationConfig::default().with_page_param("");
        let errors = config.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page_param"));
    }
}
