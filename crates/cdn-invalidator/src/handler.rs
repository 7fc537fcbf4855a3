use lambda_runtime::LambdaEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::{
    client::{Invalidate, InvalidationRequest, JobReporter, PipelineOutcome},
    config::InvalidatorConfig,
    error::{Error, Result},
    event::{InvocationContext, InvocationEvent, JobId},
};

pub const SUCCESS_MESSAGE: &str = "CloudFront invalidation submitted successfully";
pub const FAILURE_PREFIX: &str = "Error invalidating CloudFront distribution";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Succeeded,
}

/// Returned to the invoker once the invalidation is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationResponse {
    pub status: Status,
    pub invalidation_id: String,
    pub message: String,
}

impl InvalidationResponse {
    pub fn succeeded(invalidation_id: impl Into<String>) -> Self {
        Self {
            status: Status::Succeeded,
            invalidation_id: invalidation_id.into(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Succeeded(InvalidationResponse),
    Failed(Error),
}

impl Outcome {
    pub fn into_result(self) -> Result<InvalidationResponse> {
        match self {
            Outcome::Succeeded(response) => Ok(response),
            Outcome::Failed(err) => Err(err),
        }
    }
}

/// Invalidates every path of one distribution per invocation and relays the
/// result to CodePipeline when the invocation came from a pipeline job.
pub struct InvalidationHandler<I, R> {
    config: InvalidatorConfig,
    invalidator: I,
    reporter: R,
}

impl<I: Invalidate, R: JobReporter> InvalidationHandler<I, R> {
    pub fn new(config: InvalidatorConfig, invalidator: I, reporter: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            invalidator,
            reporter,
        })
    }

    pub fn config(&self) -> &InvalidatorConfig {
        &self.config
    }

    pub async fn handle(
        &self,
        event: &InvocationEvent,
        ctx: &InvocationContext,
    ) -> Result<InvalidationResponse> {
        self.process(event, ctx).await.into_result()
    }

    /// Entry point for the Lambda runtime.
    pub async fn handle_lambda(&self, event: LambdaEvent<Value>) -> Result<InvalidationResponse> {
        let (payload, context) = event.into_parts();
        let ctx = InvocationContext::from(&context);
        let event = InvocationEvent::from_value(payload).map_err(|err| {
            error!(request_id = %ctx.request_id, error = %err, "Rejecting invocation");
            err
        })?;
        self.handle(&event, &ctx).await
    }

    #[instrument(skip_all, fields(request_id = %ctx.request_id))]
    pub async fn process(&self, event: &InvocationEvent, ctx: &InvocationContext) -> Outcome {
        let job_id = event.job_id();
        if let Some(job_id) = job_id {
            info!(%job_id, "CodePipeline job detected");
        }

        let request =
            InvalidationRequest::invalidate_all(&self.config.distribution_id, &ctx.request_id);
        match self.invalidator.create_invalidation(&request).await {
            Ok(result) => {
                info!(
                    invalidation_id = %result.id,
                    distribution_id = %request.distribution_id,
                    "Invalidation submitted, it will process in the background"
                );
                if let Some(job_id) = job_id {
                    self.notify_pipeline(job_id, &PipelineOutcome::Success).await;
                }
                Outcome::Succeeded(InvalidationResponse::succeeded(result.id))
            }
            Err(err) => {
                let message = format!("{FAILURE_PREFIX}: {err}");
                error!("{message}");
                if let Some(job_id) = job_id {
                    self.notify_pipeline(job_id, &PipelineOutcome::job_failed(message))
                        .await;
                }
                Outcome::Failed(Error::Invalidation(err))
            }
        }
    }

    /// Reporting errors are logged and never change the invocation result.
    async fn notify_pipeline(&self, job_id: &JobId, outcome: &PipelineOutcome) {
        match self.reporter.report(job_id, outcome).await {
            Ok(()) => info!(%job_id, outcome = outcome.label(), "Notified CodePipeline"),
            Err(err) => {
                let err = Error::JobReport(err);
                error!(%job_id, outcome = outcome.label(), error = %err, "CodePipeline notification dropped");
            }
        }
    }
}
