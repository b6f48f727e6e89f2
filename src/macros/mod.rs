/// Reusable pipeline steps
///
/// Each macro comes as a plain function doing the work and a step that
/// wires the function into a pipeline:
///
/// - `model`: [`find_model`] / [`FindModel`], plus [`LoadCollection`]
/// - `pagination`: [`resolve`] / [`PaginationResolver`] / [`Paginate`]
/// - `policy`: [`authorize`] / [`Authorize`]

mod model;
mod pagination;
mod policy;

pub use model::{FindModel, LoadCollection, find_model};
pub use pagination::{FieldError, Paginate, PaginationResolver, ValidationOutcome, resolve};
pub use policy::{Authorize, Operation, authorize};
