use serde_json::Value;

use super::Params;
use crate::providers::Page;

/// Per-request state threaded through a pipeline
///
/// The context is immutable - methods that modify it return a new Context.
/// Each step receives the context by value and hands back the one the next
/// step should see, so there is no shared map of loosely named keys.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Raw request parameters
    params: Params,
    /// The authenticated user, if any
    current_user: Option<Value>,
    /// Model loaded by the model step
    model: Option<Value>,
    /// Records loaded by the collection step, before pagination
    collection: Option<Vec<Value>>,
    /// Paginated collection produced by the pagination step
    page: Option<Page>,
}

impl Context {
    /// Create a context for the given request parameters
    ///
    /// # Example
    /// ```
    /// use opsteps::pipeline::{Context, Params};
    /// use serde_json::json;
    ///
    /// let ctx = Context::new(Params::new().with("id", json!("3")))
    ///     .with_current_user(json!({"id": 1}));
    ///
    /// assert_eq!(ctx.params().get("id"), Some(&json!("3")));
    /// assert!(ctx.model().is_none());
    /// ```
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn with_current_user(mut self, user: Value) -> Self {
        self.current_user = Some(user);
        self
    }

    pub fn with_model(mut self, model: Value) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_collection(mut self, items: Vec<Value>) -> Self {
        self.collection = Some(items);
        self
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn current_user(&self) -> Option<&Value> {
        self.current_user.as_ref()
    }

    pub fn model(&self) -> Option<&Value> {
        self.model.as_ref()
    }

    pub fn collection(&self) -> Option<&[Value]> {
        self.collection.as_deref()
    }

    /// Move the loaded collection out, leaving none behind
    pub fn take_collection(&mut self) -> Option<Vec<Value>> {
        self.collection.take()
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }
}
