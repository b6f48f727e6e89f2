use serde_json::Value;

use super::PolicyProvider;
use crate::macros::Operation;

/// Ownership policy: users act on the records they own
///
/// A record is owned when its owner field (`user_id` by default) equals
/// the user's id field (`id` by default). Listing the collection is always
/// allowed; `scope` narrows it to owned records. Anonymous users are
/// denied everything but the listing, which scopes to nothing.
#[derive(Debug, Clone)]
pub struct OwnerPolicy {
    owner_field: String,
    user_id_field: String,
}

impl Default for OwnerPolicy {
    fn default() -> Self {
        Self {
            owner_field: "user_id".to_string(),
            user_id_field: "id".to_string(),
        }
    }
}

impl OwnerPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = field.into();
        self
    }

    pub fn with_user_id_field(mut self, field: impl Into<String>) -> Self {
        self.user_id_field = field.into();
        self
    }

    fn owns(&self, user: &Value, record: &Value) -> bool {
        match (user.get(&self.user_id_field), record.get(&self.owner_field)) {
            (Some(user_id), Some(owner_id)) => !user_id.is_null() && user_id == owner_id,
            _ => false,
        }
    }
}

impl PolicyProvider for OwnerPolicy {
    fn authorize(&self, user: Option<&Value>, resource: Option<&Value>, operation: Operation) -> bool {
        match (operation, user, resource) {
            (Operation::Index, _, _) => true,
            // Nothing to own yet
            (Operation::Create, Some(_), _) => true,
            (_, Some(user), Some(resource)) => self.owns(user, resource),
            _ => false,
        }
    }

    fn scope(&self, user: Option<&Value>, items: Vec<Value>) -> Vec<Value> {
        match user {
            Some(user) => items.into_iter().filter(|item| self.owns(user, item)).collect(),
            None => Vec::new(),
        }
    }
}
