use serde_json::Value;

use super::Page;
use crate::macros::{FieldError, Operation};
use crate::pipeline::ExecutionError;
use crate::response::Response;

/// Trait for loading models
///
/// This trait keeps the steps decoupled from any specific storage
/// backend. Implementations can be mocked for testing or backed by an ORM.
pub trait ModelFinder: Send + Sync {
    /// Find a single record by id
    ///
    /// The id is passed as it came from the request, so a string "3" must
    /// be able to find a record whose id is the integer 3.
    fn find_by_id(&self, id: &Value) -> Result<Option<Value>, ExecutionError>;

    /// Load every record of the resource
    fn all(&self) -> Result<Vec<Value>, ExecutionError>;
}

/// Trait for paging a collection
pub trait CollectionProvider: Send + Sync {
    /// Cut one page out of `items`
    ///
    /// `page` and `per_page` are always at least 1.
    fn paginate(&self, items: Vec<Value>, page: u64, per_page: u32) -> Page;
}

/// Trait for authorization policies
pub trait PolicyProvider: Send + Sync {
    /// Decide whether `user` may perform `operation` on `resource`
    ///
    /// `resource` is `None` for operations on the whole collection.
    fn authorize(&self, user: Option<&Value>, resource: Option<&Value>, operation: Operation) -> bool;

    /// Restrict a collection to the records `user` may see
    fn scope(&self, _user: Option<&Value>, items: Vec<Value>) -> Vec<Value> {
        items
    }
}

/// Trait for shaping pipeline results into responses
pub trait ResponseBuilder: Send + Sync {
    /// 200 with a paginated collection
    fn build_page(&self, page: &Page) -> Response;

    /// 200 with a single model
    fn build_resource(&self, model: &Value) -> Response;

    /// 422 for rejected parameters
    fn build_validation_error(&self, errors: &[FieldError]) -> Response;

    /// 403 for a denied policy
    fn build_forbidden(&self) -> Response;

    /// 404 for a missing model
    fn build_not_found(&self) -> Response;
}
