use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::OperationConfig;
use crate::operations::{self, Resources};
use crate::pipeline::{Context, ExecutionError, Params, Pipeline};
use crate::response::Response;

/// Header carrying the id of the current user
pub const USER_HEADER: &str = "x-user-id";

/// Pipelines served by the router
#[derive(Clone)]
pub struct AppState {
    index: Arc<Pipeline>,
    show: Arc<Pipeline>,
    id_param: String,
}

impl AppState {
    pub fn new(config: &OperationConfig, resources: &Resources) -> Result<Self, ExecutionError> {
        Ok(Self {
            index: Arc::new(operations::index(config, resources)?),
            show: Arc::new(operations::show(config, resources)),
            id_param: config.model.id_param.clone(),
        })
    }
}

/// Routes `GET {base}` to the index pipeline and `GET {base}/{id}` to show
pub fn router(state: AppState, base: &str) -> Router {
    let base = base.trim_end_matches('/');
    let collection = if base.is_empty() { "/" } else { base };

    Router::new()
        .route(collection, get(list))
        .route(&format!("{base}/{{id}}"), get(show))
        .with_state(state)
}

async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    run(&state.index, Params::from(query), &headers)
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    // The path segment wins over a query parameter of the same name
    let path = Params::new().with(state.id_param.clone(), Value::String(id));
    let params = Params::from(query).merge(path);
    run(&state.show, params, &headers)
}

fn run(pipeline: &Pipeline, params: Params, headers: &HeaderMap) -> Response {
    debug!(pipeline = pipeline.name(), params = params.len(), "handling request");

    let mut context = Context::new(params);
    if let Some(user) = current_user(headers) {
        context = context.with_current_user(user);
    }

    match pipeline.run(context) {
        Ok(response) => {
            debug!(pipeline = pipeline.name(), status = response.status, "request handled");
            response
        }
        Err(err) => {
            error!(pipeline = pipeline.name(), error = %err, "pipeline failed");
            Response::error(
                500,
                "internal_error",
                "An internal error occurred while processing the request.",
                json!({}),
            )
        }
    }
}

/// Read the current user from the request headers
///
/// Numeric ids become JSON numbers so they compare equal to numeric owner
/// fields.
fn current_user(headers: &HeaderMap) -> Option<Value> {
    let raw = headers.get(USER_HEADER)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }

    let id = match raw.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(raw.to_string()),
    };
    Some(json!({ "id": id }))
}
