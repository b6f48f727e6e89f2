use jsonschema::Validator;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::config::{ConfigError, PaginationConfig};
use crate::pipeline::{Context, ExecutionError, Params, PipelineStep, StepOutcome};
use crate::providers::{CollectionProvider, ResponseBuilder};

/// A rejected request parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the parameter as it appeared in the request
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result of resolving pagination parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Parameters are usable; `page >= 1` and `1 <= per_page <= max_per_page`
    Valid { page: u64, per_page: u32 },
    /// One error per rejected field, page before per-page
    Invalid { errors: Vec<FieldError> },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    /// Errors of an invalid outcome; empty when valid
    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationOutcome::Valid { .. } => &[],
            ValidationOutcome::Invalid { errors } => errors,
        }
    }
}

/// Validates and normalizes page / per-page request parameters
///
/// The validation rules are JSON Schema documents compiled once per
/// resolver:
///
/// - page: `{"type": "integer", "minimum": 1}`
/// - per-page: `{"type": "integer", "minimum": 1, "maximum": max_per_page}`
///
/// Both parameters are optional, but a present one must be filled: a null
/// or blank value is rejected rather than treated as absent.
pub struct PaginationResolver {
    config: PaginationConfig,
    page_rule: Validator,
    per_page_rule: Validator,
}

impl PaginationResolver {
    /// Validate the configuration and compile the parameter rules
    ///
    /// # Example
    /// ```
    /// use opsteps::config::PaginationConfig;
    /// use opsteps::macros::{PaginationResolver, ValidationOutcome};
    /// use opsteps::pipeline::Params;
    /// use serde_json::json;
    ///
    /// let resolver = PaginationResolver::new(PaginationConfig::default()).unwrap();
    ///
    /// let outcome = resolver.resolve(&Params::new().with("page", json!("2")));
    /// assert_eq!(outcome, ValidationOutcome::Valid { page: 2, per_page: 30 });
    ///
    /// let outcome = resolver.resolve(&Params::new().with("per_page", json!(500)));
    /// assert!(!outcome.is_valid());
    /// ```
    pub fn new(config: PaginationConfig) -> Result<Self, ExecutionError> {
        config.validate().map_err(ConfigError::from)?;

        let page_rule = compile_rule(&config.page_param, json!({
            "type": "integer",
            "minimum": 1
        }))?;
        let per_page_rule = compile_rule(&config.per_page_param, json!({
            "type": "integer",
            "minimum": 1,
            "maximum": config.max_per_page
        }))?;

        Ok(Self {
            config,
            page_rule,
            per_page_rule,
        })
    }

    /// Decide whether the request's pagination is well-formed
    ///
    /// Pure: the same params always give the same outcome.
    pub fn resolve(&self, params: &Params) -> ValidationOutcome {
        let page = check_field(params, &self.config.page_param, &self.page_rule);
        let per_page = check_field(params, &self.config.per_page_param, &self.per_page_rule);

        match (page, per_page) {
            (Ok(page), Ok(per_page)) => {
                // The rule already bounds per-page; the default is checked at construction
                let max = self.config.max_per_page;
                let per_page = per_page.map_or(self.config.default_per_page, |value| {
                    u32::try_from(value).map_or(max, |value| value.min(max))
                });

                ValidationOutcome::Valid {
                    page: page.unwrap_or(1),
                    per_page,
                }
            }
            (page, per_page) => ValidationOutcome::Invalid {
                errors: [page.err(), per_page.err()].into_iter().flatten().collect(),
            },
        }
    }
}

impl std::fmt::Debug for PaginationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationResolver")
            .field("config", &self.config)
            .field("rules", &"<compiled>")
            .finish()
    }
}

/// Resolve pagination parameters against a configuration
///
/// Compiles the rules on every call; build a [`PaginationResolver`] to
/// reuse them.
pub fn resolve(params: &Params, config: &PaginationConfig) -> Result<ValidationOutcome, ExecutionError> {
    Ok(PaginationResolver::new(config.clone())?.resolve(params))
}

fn compile_rule(field: &str, schema: Value) -> Result<Validator, ExecutionError> {
    jsonschema::validator_for(&schema).map_err(|e| ExecutionError::schema(field, e.to_string()))
}

/// Check one optional parameter; `Ok(None)` means it was not sent
fn check_field(params: &Params, field: &str, rule: &Validator) -> Result<Option<u64>, FieldError> {
    let Some(raw) = params.get(field) else {
        return Ok(None);
    };

    if is_blank(raw) {
        return Err(FieldError::new(field, "must be filled"));
    }

    let value = normalize(raw);
    let reasons: Vec<String> = rule.iter_errors(&value).map(|e| e.to_string()).collect();
    if !reasons.is_empty() {
        return Err(FieldError::new(field, reasons.join("; ")));
    }

    // Integral but too large for an i64, e.g. 1e20
    value
        .as_u64()
        .map(Some)
        .ok_or_else(|| FieldError::new(field, "must be an integer"))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Turn numeric-like values into integers
///
/// Query strings carry every value as a string, so "2" becomes 2.
/// Integral floats such as 2.0 become 2 as well. Anything else is left
/// untouched for the type check to reject.
fn normalize(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let s = s.trim();
            match (s.parse::<i64>(), s.parse::<u64>()) {
                (Ok(n), _) => Value::from(n),
                (_, Ok(n)) => Value::from(n),
                _ => value.clone(),
            }
        }
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Pagination step
///
/// Resolves the request's pagination parameters, answers 422 when they are
/// rejected, and otherwise pages the loaded collection.
pub struct Paginate {
    resolver: PaginationResolver,
    paginator: Arc<dyn CollectionProvider>,
    responses: Arc<dyn ResponseBuilder>,
}

impl Paginate {
    pub fn new(
        config: PaginationConfig,
        paginator: Arc<dyn CollectionProvider>,
        responses: Arc<dyn ResponseBuilder>,
    ) -> Result<Self, ExecutionError> {
        Ok(Self {
            resolver: PaginationResolver::new(config)?,
            paginator,
            responses,
        })
    }
}

impl PipelineStep for Paginate {
    fn name(&self) -> &str {
        "pagination"
    }

    fn call(&self, context: Context) -> Result<StepOutcome, ExecutionError> {
        match self.resolver.resolve(context.params()) {
            ValidationOutcome::Invalid { errors } => {
                debug!(errors = errors.len(), "pagination parameters rejected");
                Ok(StepOutcome::Halt(self.responses.build_validation_error(&errors)))
            }
            ValidationOutcome::Valid { page, per_page } => {
                let mut context = context;
                let items = context
                    .take_collection()
                    .ok_or_else(|| ExecutionError::missing_collection(self.name()))?;

                let page = self.paginator.paginate(items, page, per_page);
                Ok(StepOutcome::Continue(context.with_page(page)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{JsonResponses, SlicePaginator};

    fn resolver() -> PaginationResolver {
        PaginationResolver::new(PaginationConfig::default()).unwrap()
    }

    fn valid(page: u64, per_page: u32) -> ValidationOutcome {
        ValidationOutcome::Valid { page, per_page }
    }

    fn error_fields(outcome: &ValidationOutcome) -> Vec<&str> {
        outcome.errors().iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_empty_params_use_defaults() {
        assert_eq!(resolver().resolve(&Params::new()), valid(1, 30));
    }

    #[test]
    fn test_empty_params_follow_configured_default() {
        for (default, max) in [(1, 1), (10, 10), (25, 50), (30, 100)] {
            let config = PaginationConfig::default()
                .with_default_per_page(default)
                .with_max_per_page(max);
            let outcome = PaginationResolver::new(config).unwrap().resolve(&Params::new());
            assert_eq!(outcome, valid(1, default));
        }
    }

    #[test]
    fn test_integer_params() {
        let params = Params::new().with("page", json!(2)).with("per_page", json!(1));
        assert_eq!(resolver().resolve(&params), valid(2, 1));
    }

    #[test]
    fn test_string_params() {
        let params = Params::new().with("page", json!("2")).with("per_page", json!("1"));
        assert_eq!(resolver().resolve(&params), valid(2, 1));
    }

    #[test]
    fn test_strings_resolve_like_integers() {
        let resolver = resolver();
        for page in [1_u64, 2, 7, 1000, i64::MAX as u64 + 1, u64::MAX] {
            for per_page in [1_u32, 30, 99, 100] {
                let as_strings = Params::new()
                    .with("page", json!(page.to_string()))
                    .with("per_page", json!(per_page.to_string()));
                let as_integers = Params::new()
                    .with("page", json!(page))
                    .with("per_page", json!(per_page));

                assert_eq!(resolver.resolve(&as_strings), resolver.resolve(&as_integers));
                assert_eq!(resolver.resolve(&as_integers), valid(page, per_page));
            }
        }
    }

    #[test]
    fn test_padded_string_is_numeric() {
        let params = Params::new().with("page", json!(" 3 "));
        assert_eq!(resolver().resolve(&params), valid(3, 30));
    }

    #[test]
    fn test_zero_page() {
        let outcome = resolver().resolve(&Params::new().with("page", json!(0)));
        assert_eq!(error_fields(&outcome), vec!["page"]);
        assert!(outcome.errors()[0].reason.contains("minimum"));
    }

    #[test]
    fn test_non_positive_pages_are_rejected() {
        let resolver = resolver();
        for page in [json!(0), json!(-1), json!(-50), json!("0"), json!("-3")] {
            let outcome = resolver.resolve(&Params::new().with("page", page.clone()));
            assert_eq!(error_fields(&outcome), vec!["page"], "page = {}", page);
        }
    }

    #[test]
    fn test_zero_per_page_string() {
        let outcome = resolver().resolve(&Params::new().with("per_page", json!("0")));
        assert_eq!(error_fields(&outcome), vec!["per_page"]);
    }

    #[test]
    fn test_out_of_range_per_page_is_rejected() {
        let resolver = resolver();
        for per_page in [json!(0), json!(-1), json!(101), json!("101"), json!(100_000)] {
            let outcome = resolver.resolve(&Params::new().with("per_page", per_page.clone()));
            assert_eq!(error_fields(&outcome), vec!["per_page"], "per_page = {}", per_page);
        }
    }

    #[test]
    fn test_per_page_above_max_is_not_clamped() {
        let outcome = resolver().resolve(&Params::new().with("per_page", json!(101)));
        assert!(!outcome.is_valid());
        assert!(outcome.errors()[0].reason.contains("maximum"));
    }

    #[test]
    fn test_per_page_at_max() {
        let outcome = resolver().resolve(&Params::new().with("per_page", json!(100)));
        assert_eq!(outcome, valid(1, 100));
    }

    #[test]
    fn test_page_errors_come_first() {
        let params = Params::new().with("per_page", json!(0)).with("page", json!(0));
        let outcome = resolver().resolve(&params);
        assert_eq!(error_fields(&outcome), vec!["page", "per_page"]);
    }

    #[test]
    fn test_non_numeric_string_is_a_type_error() {
        let outcome = resolver().resolve(&Params::new().with("page", json!("two")));
        assert_eq!(error_fields(&outcome), vec!["page"]);
        assert!(outcome.errors()[0].reason.contains("integer"));
    }

    #[test]
    fn test_malformed_types_are_field_errors() {
        let resolver = resolver();
        for value in [json!([1, 2]), json!({"n": 1}), json!(true), json!(2.5), json!("2.5")] {
            let outcome = resolver.resolve(&Params::new().with("per_page", value.clone()));
            assert_eq!(error_fields(&outcome), vec!["per_page"], "per_page = {}", value);
        }
    }

    #[test]
    fn test_blank_values_must_be_filled() {
        let resolver = resolver();
        for value in [Value::Null, json!(""), json!("   ")] {
            let outcome = resolver.resolve(&Params::new().with("page", value));
            assert_eq!(outcome.errors(), &[FieldError::new("page", "must be filled")]);
        }
    }

    #[test]
    fn test_integral_float_is_normalized() {
        let params = Params::new().with("page", json!(2.0)).with("per_page", json!(10.0));
        assert_eq!(resolver().resolve(&params), valid(2, 10));
    }

    #[test]
    fn test_huge_integral_float_is_rejected() {
        let outcome = resolver().resolve(&Params::new().with("page", json!(1e20)));
        assert_eq!(error_fields(&outcome), vec!["page"]);
    }

    #[test]
    fn test_huge_page_number() {
        let params = Params::new().with("page", json!(u64::MAX));
        assert_eq!(resolver().resolve(&params), valid(u64::MAX, 30));
    }

    #[test]
    fn test_huge_page_number_as_string() {
        let params = Params::new().with("page", json!("9223372036854775808"));
        assert_eq!(resolver().resolve(&params), valid(9_223_372_036_854_775_808, 30));

        let params = Params::new().with("page", json!("18446744073709551616"));
        assert_eq!(error_fields(&resolver().resolve(&params)), vec!["page"]);
    }

    #[test]
    fn test_per_page_default_and_bounds() {
        let config = PaginationConfig::default()
            .with_default_per_page(5)
            .with_max_per_page(5);
        let resolver = PaginationResolver::new(config).unwrap();

        assert_eq!(resolver.resolve(&Params::new()), valid(1, 5));
        assert_eq!(resolver.resolve(&Params::new().with("per_page", json!(1))), valid(1, 1));
        assert_eq!(resolver.resolve(&Params::new().with("per_page", json!("5"))), valid(1, 5));
        assert!(!resolver.resolve(&Params::new().with("per_page", json!(6))).is_valid());
    }

    #[test]
    fn test_other_params_are_ignored() {
        let params = Params::new()
            .with("expand", json!("foo"))
            .with("sort", json!(["a", "b"]));
        assert_eq!(resolver().resolve(&params), valid(1, 30));
    }

    #[test]
    fn test_custom_param_names() {
        let config = PaginationConfig::default()
            .with_page_param("p")
            .with_per_page_param("limit")
            .with_default_per_page(5)
            .with_max_per_page(20);
        let resolver = PaginationResolver::new(config).unwrap();

        let params = Params::new().with("page", json!(0)).with("limit", json!("20"));
        assert_eq!(resolver.resolve(&params), valid(1, 20));

        let outcome = resolver.resolve(&Params::new().with("limit", json!(21)));
        assert_eq!(error_fields(&outcome), vec!["limit"]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = resolver();
        for params in [
            Params::new(),
            Params::new().with("page", json!("4")).with("per_page", json!(12)),
            Params::new().with("page", json!(0)).with("per_page", json!("x")),
        ] {
            assert_eq!(resolver.resolve(&params), resolver.resolve(&params));
        }
    }

    #[test]
    fn test_free_function() {
        let params = Params::new().with("page", json!("3"));
        let outcome = resolve(&params, &PaginationConfig::default()).unwrap();
        assert_eq!(outcome, valid(3, 30));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PaginationConfig::default().with_default_per_page(500);
        let result = PaginationResolver::new(config);
        assert!(matches!(result, Err(ExecutionError::Config(_))));
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_value(valid(2, 10)).unwrap(),
            json!({"outcome": "valid", "page": 2, "per_page": 10})
        );

        let invalid = ValidationOutcome::Invalid {
            errors: vec![FieldError::new("page", "must be filled")],
        };
        assert_eq!(
            serde_json::to_value(invalid).unwrap(),
            json!({
                "outcome": "invalid",
                "errors": [{"field": "page", "reason": "must be filled"}]
            })
        );
    }

    fn paginate_step() -> Paginate {
        Paginate::new(
            PaginationConfig::default(),
            Arc::new(SlicePaginator),
            Arc::new(JsonResponses),
        )
        .unwrap()
    }

    #[test]
    fn test_step_pages_collection() {
        let items = (1..=5).map(|id| json!({"id": id})).collect();
        let context = Context::new(Params::new().with("page", json!("2")).with("per_page", json!("2")))
            .with_collection(items);

        let outcome = paginate_step().call(context).unwrap();

        let StepOutcome::Continue(context) = outcome else {
            panic!("expected the step to continue");
        };
        let page = context.page().unwrap();
        assert_eq!(page.items, vec![json!({"id": 3}), json!({"id": 4})]);
        assert_eq!(page.meta.total_entries, 5);
        assert!(context.collection().is_none());
    }

    #[test]
    fn test_step_halts_with_422() {
        let context = Context::new(Params::new().with("page", json!(0))).with_collection(vec![]);

        let outcome = paginate_step().call(context).unwrap();

        let StepOutcome::Halt(response) = outcome else {
            panic!("expected the step to halt");
        };
        assert_eq!(response.status, 422);
        assert!(response.body["meta"]["errors"]["page"].is_array());
    }

    #[test]
    fn test_step_without_collection_fails() {
        let result = paginate_step().call(Context::new(Params::new()));
        assert!(matches!(result, Err(ExecutionError::MissingCollection { .. })));
    }
}
