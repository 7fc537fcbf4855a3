pub mod cloudfront;
pub mod codepipeline;

use async_trait::async_trait;
use std::sync::Arc;

use crate::{error::ServiceError, event::JobId};

/// Path pattern matching every cached object.
pub const INVALIDATE_ALL: &str = "/*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationRequest {
    pub distribution_id: String,
    pub paths: Vec<String>,
    /// Idempotency token; CloudFront dedupes batches by it.
    pub caller_reference: String,
}

impl InvalidationRequest {
    pub fn invalidate_all(
        distribution_id: impl Into<String>,
        caller_reference: impl Into<String>,
    ) -> Self {
        Self {
            distribution_id: distribution_id.into(),
            paths: vec![INVALIDATE_ALL.to_string()],
            caller_reference: caller_reference.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationResult {
    pub id: String,
}

/// CodePipeline failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    JobFailed,
    ConfigurationError,
    PermissionError,
    RevisionOutOfSync,
    RevisionUnavailable,
    SystemUnavailable,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::JobFailed => "JobFailed",
            FailureKind::ConfigurationError => "ConfigurationError",
            FailureKind::PermissionError => "PermissionError",
            FailureKind::RevisionOutOfSync => "RevisionOutOfSync",
            FailureKind::RevisionUnavailable => "RevisionUnavailable",
            FailureKind::SystemUnavailable => "SystemUnavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Success,
    Failure { kind: FailureKind, message: String },
}

impl PipelineOutcome {
    /// Failure in the generic `JobFailed` category.
    pub fn job_failed(message: impl Into<String>) -> Self {
        PipelineOutcome::Failure {
            kind: FailureKind::JobFailed,
            message: message.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::Success => "success",
            PipelineOutcome::Failure { .. } => "failure",
        }
    }
}

/// A service able to invalidate cached paths of a distribution.
#[async_trait]
pub trait Invalidate: Send + Sync + 'static {
    async fn create_invalidation(
        &self,
        request: &InvalidationRequest,
    ) -> Result<InvalidationResult, ServiceError>;
}

/// A tracker that must be told how a pipeline job ended.
#[async_trait]
pub trait JobReporter: Send + Sync + 'static {
    async fn report_job_success(&self, job_id: &JobId) -> Result<(), ServiceError>;

    async fn report_job_failure(
        &self,
        job_id: &JobId,
        kind: FailureKind,
        message: &str,
    ) -> Result<(), ServiceError>;

    async fn report(&self, job_id: &JobId, outcome: &PipelineOutcome) -> Result<(), ServiceError> {
        match outcome {
            PipelineOutcome::Success => self.report_job_success(job_id).await,
            PipelineOutcome::Failure { kind, message } => {
                self.report_job_failure(job_id, *kind, message).await
            }
        }
    }
}

#[async_trait]
impl<T: Invalidate> Invalidate for Arc<T> {
    async fn create_invalidation(
        &self,
        request: &InvalidationRequest,
    ) -> Result<InvalidationResult, ServiceError> {
        (**self).create_invalidation(request).await
    }
}

#[async_trait]
impl<T: JobReporter> JobReporter for Arc<T> {
    async fn report_job_success(&self, job_id: &JobId) -> Result<(), ServiceError> {
        (**self).report_job_success(job_id).await
    }

    async fn report_job_failure(
        &self,
        job_id: &JobId,
        kind: FailureKind,
        message: &str,
    ) -> Result<(), ServiceError> {
        (**self).report_job_failure(job_id, kind, message).await
    }
}
