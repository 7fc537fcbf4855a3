
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::{
    client::{FailureKind, Invalidate, InvalidationRequest, InvalidationResult, JobReporter},
    config::InvalidatorConfig,
    error::ServiceError,
    event::JobId,
    handler::InvalidationHandler,
};

pub fn setup_logger() {
    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
    {
        warn!("Logger already set {:?}:", err)
    }
}

/// Records every request and answers with a fixed result.
pub struct RecordingInvalidator {
    calls: Mutex<Vec<InvalidationRequest>>,
    result: Result<InvalidationResult, ServiceError>,
}

impl RecordingInvalidator {
    pub fn succeeding(id: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            result: Ok(InvalidationResult { id: id.to_string() }),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            result: Err(ServiceError::new(message)),
        })
    }

    pub fn calls(&self) -> Vec<InvalidationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Invalidate for RecordingInvalidator {
    async fn create_invalidation(
        &self,
        request: &InvalidationRequest,
    ) -> Result<InvalidationResult, ServiceError> {
        self.calls.lock().unwrap().push(request.clone());
        self.result.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCall {
    Success(String),
    Failure {
        job_id: String,
        kind: FailureKind,
        message: String,
    },
}

/// Records every report, optionally failing each one.
pub struct RecordingReporter {
    calls: Mutex<Vec<ReportCall>>,
    error: Option<ServiceError>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            error: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            error: Some(ServiceError::new(message)),
        })
    }

    pub fn calls(&self) -> Vec<ReportCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self) -> Result<(), ServiceError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobReporter for RecordingReporter {
    async fn report_job_success(&self, job_id: &JobId) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(ReportCall::Success(job_id.to_string()));
        self.answer()
    }

    async fn report_job_failure(
        &self,
        job_id: &JobId,
        kind: FailureKind,
        message: &str,
    ) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(ReportCall::Failure {
            job_id: job_id.to_string(),
            kind,
            message: message.to_string(),
        });
        self.answer()
    }
}

pub type TestHandler = InvalidationHandler<Arc<RecordingInvalidator>, Arc<RecordingReporter>>;

pub fn handler(
    invalidator: &Arc<RecordingInvalidator>,
    reporter: &Arc<RecordingReporter>,
) -> TestHandler {
    InvalidationHandler::new(
        InvalidatorConfig::new("E123ABC"),
        Arc::clone(invalidator),
        Arc::clone(reporter),
    )
    .unwrap()
}
