use lambda_runtime::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure returned by a remote service, rendered with its error code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ServiceError(String);

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("malformed invocation event: {0}")]
    Event(String),
    /// The invalidation request was rejected. Displays the service error as-is.
    #[error(transparent)]
    Invalidation(ServiceError),
    #[error("failed to report to CodePipeline: {0}")]
    JobReport(ServiceError),
}

impl Error {
    /// Error type reported to the Lambda runtime.
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "ConfigError",
            Error::Event(_) => "EventError",
            Error::Invalidation(_) => "InvalidationError",
            Error::JobReport(_) => "JobReportError",
        }
    }
}

impl From<Error> for Diagnostic {
    fn from(err: Error) -> Diagnostic {
        Diagnostic {
            error_type: err.error_type().into(),
            error_message: err.to_string().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_error_keeps_service_text() {
        let err = Error::Invalidation(ServiceError::new("AccessDenied: not authorized"));
        assert_eq!(err.to_string(), "AccessDenied: not authorized");
        assert_eq!(err.error_type(), "InvalidationError");
    }

    #[test]
    fn diagnostic_carries_type_and_message() {
        let diagnostic = Diagnostic::from(Error::Config("DISTRIBUTION_ID is not set".into()));
        assert_eq!(diagnostic.error_type, "ConfigError");
        assert_eq!(
            diagnostic.error_message,
            "invalid configuration: DISTRIBUTION_ID is not set"
        );
    }
}
