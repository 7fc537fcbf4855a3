use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_codepipeline::{
    error::DisplayErrorContext,
    types::{FailureDetails, FailureType},
    Client,
};
use tracing::debug;

use crate::{
    client::{FailureKind, JobReporter},
    error::ServiceError,
    event::JobId,
};

/// CodePipeline rejects failure messages longer than this.
pub const MAX_FAILURE_MESSAGE_CHARS: usize = 5000;

/// [`JobReporter`] backed by the CodePipeline job API.
#[derive(Clone, Debug)]
pub struct CodePipelineReporter {
    client: Client,
}

impl CodePipelineReporter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(sdk_config: &SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

impl From<FailureKind> for FailureType {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::JobFailed => FailureType::JobFailed,
            FailureKind::ConfigurationError => FailureType::ConfigurationError,
            FailureKind::PermissionError => FailureType::PermissionError,
            FailureKind::RevisionOutOfSync => FailureType::RevisionOutOfSync,
            FailureKind::RevisionUnavailable => FailureType::RevisionUnavailable,
            FailureKind::SystemUnavailable => FailureType::SystemUnavailable,
        }
    }
}

pub(crate) fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_FAILURE_MESSAGE_CHARS).collect()
}

pub(crate) fn failure_details(
    kind: FailureKind,
    message: &str,
) -> Result<FailureDetails, ServiceError> {
    FailureDetails::builder()
        .r#type(kind.into())
        .message(truncate_message(message))
        .build()
        .map_err(|e| ServiceError::new(e.to_string()))
}

#[async_trait]
impl JobReporter for CodePipelineReporter {
    async fn report_job_success(&self, job_id: &JobId) -> Result<(), ServiceError> {
        debug!(%job_id, "Sending PutJobSuccessResult");
        self.client
            .put_job_success_result()
            .job_id(job_id.as_str())
            .send()
            .await
            .map_err(|e| ServiceError::new(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn report_job_failure(
        &self,
        job_id: &JobId,
        kind: FailureKind,
        message: &str,
    ) -> Result<(), ServiceError> {
        debug!(%job_id, kind = kind.as_str(), "Sending PutJobFailureResult");
        let details = failure_details(kind, message)?;
        self.client
            .put_job_failure_result()
            .job_id(job_id.as_str())
            .failure_details(details)
            .send()
            .await
            .map_err(|e| ServiceError::new(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
