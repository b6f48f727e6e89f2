use super::{Context, ExecutionError};
use crate::response::Response;

/// What a step hands back to the pipeline
#[derive(Debug)]
pub enum StepOutcome {
    /// Run the next step with this context
    Continue(Context),
    /// Stop here and answer with this response
    Halt(Response),
}

/// A single step in a pipeline
///
/// Steps are built once with their dependencies and shared across
/// requests, so `call` takes `&self` and all per-request state lives in the
/// context.
pub trait PipelineStep: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Run the step against the current context
    fn call(&self, context: Context) -> Result<StepOutcome, ExecutionError>;
}
