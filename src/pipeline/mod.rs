/// Pipeline execution types
///
/// This module contains the typed context, the step contract and the
/// short-circuiting pipeline that runs steps in order.

mod chain;
mod context;
mod error;
mod params;
mod step;

pub use chain::Pipeline;
pub use context::Context;
pub use error::ExecutionError;
pub use params::Params;
pub use step::{PipelineStep, StepOutcome};
