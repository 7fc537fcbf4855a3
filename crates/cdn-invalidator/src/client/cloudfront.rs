use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudfront::{
    error::DisplayErrorContext,
    types::{InvalidationBatch, Paths},
    Client,
};
use tracing::debug;

use crate::{
    client::{Invalidate, InvalidationRequest, InvalidationResult},
    error::ServiceError,
};

/// [`Invalidate`] backed by the CloudFront API.
#[derive(Clone, Debug)]
pub struct CloudFrontInvalidator {
    client: Client,
}

impl CloudFrontInvalidator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(sdk_config: &SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

pub(crate) fn invalidation_batch(
    request: &InvalidationRequest,
) -> Result<InvalidationBatch, ServiceError> {
    let quantity = i32::try_from(request.paths.len())
        .map_err(|_| ServiceError::new("too many invalidation paths"))?;
    let paths = Paths::builder()
        .quantity(quantity)
        .set_items(Some(request.paths.clone()))
        .build()
        .map_err(|e| ServiceError::new(e.to_string()))?;
    InvalidationBatch::builder()
        .paths(paths)
        .caller_reference(request.caller_reference.clone())
        .build()
        .map_err(|e| ServiceError::new(e.to_string()))
}

#[async_trait]
impl Invalidate for CloudFrontInvalidator {
    async fn create_invalidation(
        &self,
        request: &InvalidationRequest,
    ) -> Result<InvalidationResult, ServiceError> {
        let batch = invalidation_batch(request)?;
        debug!(
            distribution_id = %request.distribution_id,
            caller_reference = %request.caller_reference,
            "Sending CreateInvalidation"
        );
        let output = self
            .client
            .create_invalidation()
            .distribution_id(request.distribution_id.clone())
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| ServiceError::new(DisplayErrorContext(&e).to_string()))?;
        let invalidation = output
            .invalidation()
            .ok_or_else(|| ServiceError::new("CreateInvalidation returned no invalidation"))?;
        Ok(InvalidationResult {
            id: invalidation.id().to_string(),
        })
    }
}
