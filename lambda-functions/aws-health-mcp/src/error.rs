use std::error::Error as StdError;
use std::fmt;

use aws_sdk_health::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Every way a single request can fail. All of them end up in the error envelope.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("{0}")]
    Validation(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Internal(String),
}

impl McpError {
    pub fn missing(param: &str) -> Self {
        Self::Validation(format!("{} is required", param))
    }
}

/// A failure reported by the Health API (or by the SDK while trying to reach it).
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    pub operation: &'static str,
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Keeps the provider's message text as-is when the service answered with one,
    /// otherwise falls back to the whole error chain.
    pub fn from_sdk<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
        R: fmt::Debug + Send + Sync + 'static,
    {
        if let Some(service_err) = err.as_service_error() {
            if let Some(message) = service_err.message() {
                return Self {
                    operation,
                    code: service_err.code().map(str::to_string),
                    message: message.to_string(),
                };
            }
        }

        Self::new(operation, DisplayErrorContext(&err).to_string())
    }

    pub fn from_build(operation: &'static str, err: BuildError) -> Self {
        Self::new(operation, err.to_string())
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for RemoteError {}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_health::error::ErrorMetadata;
    use aws_sdk_health::operation::describe_events::DescribeEventsError;

    #[test]
    fn test_unknown_command_text() {
        let err = McpError::UnknownCommand("invalid_command".to_string());
        assert_eq!(err.to_string(), "Unknown command: invalid_command");
    }

    #[test]
    fn test_missing_param_text() {
        assert_eq!(McpError::missing("eventArn").to_string(), "eventArn is required");
    }

    #[test]
    fn test_remote_error_displays_message_verbatim() {
        let err = RemoteError::new("DescribeEvents", "AWS API Error").with_code("ThrottlingException");
        assert_eq!(err.to_string(), "AWS API Error");
        assert_eq!(err.code.as_deref(), Some("ThrottlingException"));

        let wrapped = McpError::from(err);
        assert_eq!(wrapped.to_string(), "AWS API Error");
    }

    #[test]
    fn test_service_error_message_verbatim() {
        let err: SdkError<DescribeEventsError, ()> = SdkError::service_error(
            DescribeEventsError::generic(
                ErrorMetadata::builder()
                    .code("AWS API Error")
                    .message("AWS API Error")
                    .build(),
            ),
            (),
        );

        let remote = RemoteError::from_sdk("DescribeEvents", err);
        assert_eq!(remote.operation, "DescribeEvents");
        assert_eq!(remote.code.as_deref(), Some("AWS API Error"));
        assert_eq!(remote.to_string(), "AWS API Error");
    }

    #[test]
    fn test_sdk_error_without_message_uses_full_context() {
        let err: SdkError<DescribeEventsError, ()> =
            SdkError::timeout_error("request timed out after 3s");

        let remote = RemoteError::from_sdk("DescribeEvents", err);
        assert_eq!(remote.code, None);
        assert!(remote.message.contains("request timed out after 3s"));
    }

    #[test]
    fn test_build_error_is_remote() {
        let err = RemoteError::from_build(
            "DescribeAffectedEntities",
            BuildError::missing_field("event_arns", "eventArns is required"),
        );
        assert_eq!(err.operation, "DescribeAffectedEntities");
        assert!(err.message.contains("event_arns"));
    }
}
