use std::sync::Arc;
use tracing::debug;

use super::{Context, ExecutionError, PipelineStep, StepOutcome};
use crate::providers::ResponseBuilder;
use crate::response::Response;

/// An ordered list of steps that short-circuits on the first halt
///
/// When every step continues, the final context is turned into a success
/// response: the paginated page if one was produced, otherwise the loaded
/// model, otherwise an empty 204.
pub struct Pipeline {
    name: String,
    steps: Vec<Box<dyn PipelineStep>>,
    responses: Arc<dyn ResponseBuilder>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, responses: Arc<dyn ResponseBuilder>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            responses,
        }
    }

    /// Append a step
    pub fn step(mut self, step: impl PipelineStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the steps in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step in order
    pub fn run(&self, context: Context) -> Result<Response, ExecutionError> {
        let mut context = context;

        for step in &self.steps {
            debug!(pipeline = %self.name, step = step.name(), "running step");

            context = match step.call(context)? {
                StepOutcome::Continue(next) => next,
                StepOutcome::Halt(response) => {
                    debug!(
                        pipeline = %self.name,
                        step = step.name(),
                        status = response.status,
                        "pipeline halted"
                    );
                    return Ok(response);
                }
            };
        }

        Ok(self.finish(&context))
    }

    fn finish(&self, context: &Context) -> Response {
        if let Some(page) = context.page() {
            self.responses.build_page(page)
        } else if let Some(model) = context.model() {
            self.responses.build_resource(model)
        } else {
            Response::no_content()
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .finish()
    }
}
