use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::pipeline::{Context, ExecutionError, PipelineStep, StepOutcome};
use crate::providers::{PolicyProvider, ResponseBuilder};

/// Operation a policy is asked about
///
/// The bundled pipelines only ask about `Index` and `Show`. The write
/// operations are for callers that assemble their own pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Index,
    Show,
    Create,
    Update,
    Destroy,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Index => "index",
            Operation::Show => "show",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ask the policy whether `user` may perform `operation` on `resource`
///
/// Without a policy everything is permitted.
///
/// # Example
/// ```
/// use opsteps::macros::{Operation, authorize};
/// use opsteps::providers::OwnerPolicy;
/// use serde_json::json;
///
/// let user = json!({"id": 1});
/// let post = json!({"id": 9, "user_id": 2});
///
/// assert!(authorize(None, Some(&user), Some(&post), Operation::Destroy));
/// assert!(!authorize(Some(&OwnerPolicy::new()), Some(&user), Some(&post), Operation::Destroy));
/// ```
pub fn authorize(
    policy: Option<&dyn PolicyProvider>,
    user: Option<&Value>,
    resource: Option<&Value>,
    operation: Operation,
) -> bool {
    match policy {
        Some(policy) => policy.authorize(user, resource, operation),
        None => true,
    }
}

/// Policy step
///
/// Checks the current user against the loaded model (if any) and answers
/// 403 on deny.
pub struct Authorize {
    operation: Operation,
    policy: Option<Arc<dyn PolicyProvider>>,
    responses: Arc<dyn ResponseBuilder>,
}

impl Authorize {
    pub fn new(
        operation: Operation,
        policy: Option<Arc<dyn PolicyProvider>>,
        responses: Arc<dyn ResponseBuilder>,
    ) -> Self {
        Self {
            operation,
            policy,
            responses,
        }
    }
}

impl PipelineStep for Authorize {
    fn name(&self) -> &str {
        "authorize"
    }

    fn call(&self, context: Context) -> Result<StepOutcome, ExecutionError> {
        let permitted = authorize(
            self.policy.as_deref(),
            context.current_user(),
            context.model(),
            self.operation,
        );

        if permitted {
            Ok(StepOutcome::Continue(context))
        } else {
            info!(operation = %self.operation, "operation denied by policy");
            Ok(StepOutcome::Halt(self.responses.build_forbidden()))
        }
    }
}
