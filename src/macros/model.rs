use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::pipeline::{Context, ExecutionError, Params, PipelineStep, StepOutcome};
use crate::providers::{ModelFinder, PolicyProvider, ResponseBuilder};

/// Look up the model whose id is in `params[id_param]`
///
/// Returns `Ok(None)` when the parameter is missing or null, without
/// asking the finder.
pub fn find_model(
    finder: &dyn ModelFinder,
    params: &Params,
    id_param: &str,
) -> Result<Option<Value>, ExecutionError> {
    match params.get(id_param) {
        None | Some(Value::Null) => Ok(None),
        Some(id) => finder.find_by_id(id),
    }
}

/// Model step
///
/// Loads the model into the context, or answers 404 when there is none.
pub struct FindModel {
    finder: Arc<dyn ModelFinder>,
    responses: Arc<dyn ResponseBuilder>,
    id_param: String,
}

impl FindModel {
    pub fn new(
        finder: Arc<dyn ModelFinder>,
        responses: Arc<dyn ResponseBuilder>,
        id_param: impl Into<String>,
    ) -> Self {
        Self {
            finder,
            responses,
            id_param: id_param.into(),
        }
    }
}

impl PipelineStep for FindModel {
    fn name(&self) -> &str {
        "model"
    }

    fn call(&self, context: Context) -> Result<StepOutcome, ExecutionError> {
        match find_model(self.finder.as_ref(), context.params(), &self.id_param)? {
            Some(model) => Ok(StepOutcome::Continue(context.with_model(model))),
            None => {
                debug!(id_param = %self.id_param, "model not found");
                Ok(StepOutcome::Halt(self.responses.build_not_found()))
            }
        }
    }
}

/// Collection step
///
/// Loads every record and, when a policy is configured, keeps only the
/// ones the current user may see.
pub struct LoadCollection {
    finder: Arc<dyn ModelFinder>,
    policy: Option<Arc<dyn PolicyProvider>>,
}

impl LoadCollection {
    pub fn new(finder: Arc<dyn ModelFinder>, policy: Option<Arc<dyn PolicyProvider>>) -> Self {
        Self { finder, policy }
    }
}

impl PipelineStep for LoadCollection {
    fn name(&self) -> &str {
        "collection"
    }

    fn call(&self, context: Context) -> Result<StepOutcome, ExecutionError> {
        let items = self.finder.all()?;
        let items = match &self.policy {
            Some(policy) => policy.scope(context.current_user(), items),
            None => items,
        };

        debug!(records = items.len(), "collection loaded");
        Ok(StepOutcome::Continue(context.with_collection(items)))
    }
}
