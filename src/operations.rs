use std::sync::Arc;

use crate::config::OperationConfig;
use crate::macros::{Authorize, FindModel, LoadCollection, Operation, Paginate};
use crate::pipeline::{ExecutionError, Pipeline};
use crate::providers::{CollectionProvider, ModelFinder, PolicyProvider, ResponseBuilder};

/// Collaborators shared by every operation of one resource
#[derive(Clone)]
pub struct Resources {
    pub finder: Arc<dyn ModelFinder>,
    pub paginator: Arc<dyn CollectionProvider>,
    pub policy: Option<Arc<dyn PolicyProvider>>,
    pub responses: Arc<dyn ResponseBuilder>,
}

impl Resources {
    pub fn new(
        finder: Arc<dyn ModelFinder>,
        paginator: Arc<dyn CollectionProvider>,
        responses: Arc<dyn ResponseBuilder>,
    ) -> Self {
        Self {
            finder,
            paginator,
            policy: None,
            responses,
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn PolicyProvider>) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// List a resource: authorize, load the visible records, paginate
pub fn index(config: &OperationConfig, resources: &Resources) -> Result<Pipeline, ExecutionError> {
    let paginate = Paginate::new(
        config.pagination.clone(),
        Arc::clone(&resources.paginator),
        Arc::clone(&resources.responses),
    )?;

    Ok(Pipeline::new("index", Arc::clone(&resources.responses))
        .step(Authorize::new(
            Operation::Index,
            resources.policy.clone(),
            Arc::clone(&resources.responses),
        ))
        .step(LoadCollection::new(
            Arc::clone(&resources.finder),
            resources.policy.clone(),
        ))
        .step(paginate))
}

/// Show one record: find it by id, then authorize against it
pub fn show(config: &OperationConfig, resources: &Resources) -> Pipeline {
    Pipeline::new("show", Arc::clone(&resources.responses))
        .step(FindModel::new(
            Arc::clone(&resources.finder),
            Arc::clone(&resources.responses),
            config.model.id_param.clone(),
        ))
        .step(Authorize::new(
            Operation::Show,
            resources.policy.clone(),
            Arc::clone(&resources.responses),
        ))
}
