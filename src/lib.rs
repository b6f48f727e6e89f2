/// opsteps - reusable steps for CRUD operation pipelines
///
/// This library provides the model lookup, pagination and policy steps
/// that list and show endpoints are assembled from, plus a small typed
/// pipeline to run them in.

pub mod config;
pub mod http;
pub mod macros;
pub mod operations;
pub mod pipeline;
pub mod providers;
pub mod response;

// Re-export commonly used types
pub use config::{OperationConfig, PaginationConfig};
pub use macros::{FieldError, Operation, PaginationResolver, ValidationOutcome};
pub use pipeline::{Context, ExecutionError, Params, Pipeline, PipelineStep, StepOutcome};
pub use response::Response;
