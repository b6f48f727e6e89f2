use serde_json::{Map, Value, json};

use super::{Page, ResponseBuilder};
use crate::macros::FieldError;
use crate::response::Response;

/// Plain JSON response shapes
///
/// Pages render as `{"data": [...], "current_page": .., ...}` with the
/// metadata flattened next to the data; errors use the
/// `error_type` / `error_message` / `meta` envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponses;

impl ResponseBuilder for JsonResponses {
    fn build_page(&self, page: &Page) -> Response {
        let meta = &page.meta;
        Response::ok(json!({
            "data": page.items,
            "current_page": meta.current_page,
            "per_page": meta.per_page,
            "total_entries": meta.total_entries,
            "total_pages": meta.total_pages,
            "previous_page": meta.previous_page,
            "next_page": meta.next_page,
        }))
    }

    fn build_resource(&self, model: &Value) -> Response {
        Response::ok(model.clone())
    }

    fn build_validation_error(&self, errors: &[FieldError]) -> Response {
        // {"page": ["must be ..."], "per_page": [...]}
        let mut by_field = Map::new();
        for error in errors {
            let entry = by_field
                .entry(error.field.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(reasons) = entry {
                reasons.push(Value::String(error.reason.clone()));
            }
        }

        Response::error(
            422,
            "unprocessable_entity",
            "The contract for this operation was not respected.",
            json!({ "errors": by_field }),
        )
    }

    fn build_forbidden(&self) -> Response {
        Response::error(
            403,
            "forbidden",
            "You are not authorized to access the requested resource.",
            json!({}),
        )
    }

    fn build_not_found(&self) -> Response {
        Response::error(
            404,
            "not_found",
            "The requested resource could not be found.",
            json!({}),
        )
    }
}
