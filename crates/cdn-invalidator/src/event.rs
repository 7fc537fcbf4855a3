use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Key under which CodePipeline nests the job record.
pub const PIPELINE_JOB_KEY: &str = "CodePipeline.job";

/// Identifier of a CodePipeline job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineJob {
    pub id: JobId,
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
}

/// The invocation payload. Only the pipeline job is read, everything else is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvocationEvent {
    #[serde(rename = "CodePipeline.job", default)]
    pub pipeline_job: Option<PipelineJob>,
}

impl InvocationEvent {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| Error::Event(format!("{PIPELINE_JOB_KEY}: {e}"))),
            other => Err(Error::Event(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.pipeline_job.as_ref().map(|job| &job.id)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Per-invocation metadata supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Unique request id, also used as the invalidation caller reference.
    pub request_id: String,
    pub function_arn: Option<String>,
    /// Deadline in epoch millis.
    pub deadline_ms: Option<u64>,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            function_arn: None,
            deadline_ms: None,
        }
    }

    /// Context for an invocation started outside Lambda.
    pub fn local() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

impl From<&lambda_runtime::Context> for InvocationContext {
    fn from(context: &lambda_runtime::Context) -> Self {
        Self {
            request_id: context.request_id.clone(),
            function_arn: Some(context.invoked_function_arn.clone()),
            deadline_ms: Some(context.deadline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_event_has_no_job() {
        let event = InvocationEvent::from_value(json!({})).unwrap();
        assert_eq!(event.job_id(), None);
        assert_eq!(InvocationEvent::from_value(Value::Null).unwrap(), event);
    }

    #[test]
    fn reads_nested_job_id_and_ignores_the_rest() {
        let event = InvocationEvent::from_value(json!({
            "CodePipeline.job": {
                "id": "job-42",
                "accountId": "111111111111",
                "data": { "actionConfiguration": {} }
            },
            "unrelated": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(event.job_id().map(JobId::as_str), Some("job-42"));
        assert_eq!(
            event.pipeline_job.unwrap().account_id.as_deref(),
            Some("111111111111")
        );
    }

    #[test]
    fn null_job_is_no_job() {
        let event = InvocationEvent::from_value(json!({ "CodePipeline.job": null })).unwrap();
        assert_eq!(event.job_id(), None);
    }

    #[test]
    fn job_without_id_is_rejected() {
        let err = InvocationEvent::from_value(json!({ "CodePipeline.job": {} })).unwrap_err();
        assert!(matches!(err, Error::Event(_)));
        assert!(err.to_string().contains("CodePipeline.job"));
    }

    #[test]
    fn non_object_event_is_rejected() {
        let err = InvocationEvent::from_value(json!("invalidate")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed invocation event: expected a JSON object, got a string"
        );
    }

    #[test]
    fn context_from_lambda() {
        let mut context = lambda_runtime::Context::default();
        context.request_id = "8476a536-e9f4-11e8-9739-2dfe598c3fcd".to_string();
        context.invoked_function_arn = "arn:aws:lambda:us-east-1:123:function:invalidate".to_string();
        context.deadline = 1_542_409_706_888;

        let ctx = InvocationContext::from(&context);
        assert_eq!(ctx.request_id, "8476a536-e9f4-11e8-9739-2dfe598c3fcd");
        assert_eq!(ctx.deadline_ms, Some(1_542_409_706_888));
    }

    #[test]
    fn local_contexts_are_unique() {
        assert_ne!(InvocationContext::local().request_id, InvocationContext::local().request_id);
    }
}
