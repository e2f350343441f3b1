use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::client::HealthApi;
use crate::error::McpError;
use crate::model::{Envelope, EventFilter, EventsQuery, McpRequest, Parameters, Payload};

pub const DESCRIBE_EVENTS: &str = "describe_events";
pub const DESCRIBE_AFFECTED_ENTITIES: &str = "describe_affected_entities";
pub const DESCRIBE_EVENT_DETAILS: &str = "describe_event_details";

/// Routes commands to the Health API. Holds the one client shared by every request.
#[derive(Clone)]
pub struct HealthMcpServer {
    client: Arc<dyn HealthApi>,
}

impl HealthMcpServer {
    pub fn new(client: impl HealthApi + 'static) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Never fails: any error, including a panic inside a handler, comes back as an error envelope.
    pub async fn handle_request(&self, request: McpRequest) -> Envelope {
        let McpRequest {
            command,
            parameters,
        } = request;

        info!("Handling command: {}", command);

        let outcome = AssertUnwindSafe(self.dispatch(&command, &parameters))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let reason = panic_message(panic.as_ref());
                error!("Handler for {} panicked: {}", command, reason);
                Err(McpError::Internal(reason))
            });

        match &outcome {
            Err(McpError::Remote(remote)) => warn!(
                operation = remote.operation,
                code = remote.code.as_deref().unwrap_or("-"),
                "Command {} failed: {}",
                command,
                remote
            ),
            Err(e) => warn!("Command {} failed: {}", command, e),
            Ok(_) => {}
        }

        Envelope::from(outcome)
    }

    pub async fn dispatch(&self, command: &str, params: &Parameters) -> Result<Payload, McpError> {
        match command {
            DESCRIBE_EVENTS => self.describe_events(params).await,
            DESCRIBE_AFFECTED_ENTITIES => self.describe_affected_entities(params).await,
            DESCRIBE_EVENT_DETAILS => self.describe_event_details(params).await,
            _ => Err(McpError::UnknownCommand(command.to_string())),
        }
    }

    pub async fn describe_events(&self, params: &Parameters) -> Result<Payload, McpError> {
        let filter = EventFilter::from(EventsQuery::from_parameters(params)?);
        let events = self.client.describe_events(filter).await?;
        Ok(Payload::Events(events))
    }

    pub async fn describe_affected_entities(
        &self,
        params: &Parameters,
    ) -> Result<Payload, McpError> {
        let event_arn = required_event_arn(params)?;
        let entities = self
            .client
            .describe_affected_entities(vec![event_arn])
            .await?;
        Ok(Payload::Entities(entities))
    }

    pub async fn describe_event_details(&self, params: &Parameters) -> Result<Payload, McpError> {
        let event_arn = required_event_arn(params)?;
        let output = self.client.describe_event_details(vec![event_arn]).await?;

        // failedSet is not part of the response contract
        Ok(Payload::EventDetails(output.successful_set))
    }
}

fn required_event_arn(params: &Parameters) -> Result<String, McpError> {
    match params.get("eventArn") {
        None => Err(McpError::missing("eventArn")),
        Some(Value::String(arn)) => Ok(arn.clone()),
        Some(other) => Err(McpError::Validation(format!(
            "eventArn must be a string, got {}",
            other
        ))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockHealthApi;
    use crate::error::RemoteError;
    use crate::model::{EventDetails, EventDetailsErrorItem, EventDetailsOutput, HealthEvent};
    use mockall::predicate::eq;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_event_arn() {
        assert_eq!(
            required_event_arn(&params(json!({"eventArn": "arn:a"}))).unwrap(),
            "arn:a"
        );
        assert_eq!(
            required_event_arn(&Parameters::new()).unwrap_err().to_string(),
            "eventArn is required"
        );
        assert!(matches!(
            required_event_arn(&params(json!({"eventArn": 7}))),
            Err(McpError::Validation(_))
        ));
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(3_u8);
        assert_eq!(panic_message(boxed.as_ref()), "handler panicked");
    }

    #[test]
    fn test_events_use_defaults() {
        let mut mock = MockHealthApi::new();
        mock.expect_describe_events()
            .with(eq(EventFilter {
                event_type_categories: vec!["issue".to_string()],
                regions: vec!["us-east-1".to_string()],
                services: vec!["EC2".to_string()],
            }))
            .times(1)
            .returning(|_| {
                Ok(vec![HealthEvent {
                    service: Some("EC2".to_string()),
                    ..Default::default()
                }])
            });

        let server = HealthMcpServer::new(mock);
        let envelope = tokio_test::block_on(
            server.handle_request(McpRequest::new(DESCRIBE_EVENTS, Parameters::new())),
        );
        assert!(envelope.is_success());
    }

    #[test]
    fn test_event_details_drops_failed_set() {
        let mut mock = MockHealthApi::new();
        mock.expect_describe_event_details()
            .with(eq(vec!["arn:event/ABC123".to_string()]))
            .returning(|_| {
                Ok(EventDetailsOutput {
                    successful_set: vec![EventDetails::default()],
                    failed_set: vec![EventDetailsErrorItem {
                        event_arn: Some("arn:event/OTHER".to_string()),
                        error_name: Some("NotFound".to_string()),
                        error_message: None,
                    }],
                })
            });

        let server = HealthMcpServer::new(mock);
        let payload = tokio_test::block_on(
            server.describe_event_details(&params(json!({"eventArn": "arn:event/ABC123"}))),
        )
        .unwrap();
        assert_eq!(payload, Payload::EventDetails(vec![EventDetails::default()]));
    }

    #[test]
    fn test_remote_error_text_surfaces() {
        let mut mock = MockHealthApi::new();
        mock.expect_describe_affected_entities()
            .returning(|_| {
                Err(RemoteError::new("DescribeAffectedEntities", "AWS API Error")
                    .with_code("ThrottlingException"))
            });

        let server = HealthMcpServer::new(mock);
        let envelope = tokio_test::block_on(server.handle_request(McpRequest::new(
            DESCRIBE_AFFECTED_ENTITIES,
            params(json!({"eventArn": "arn:event/ABC123"})),
        )));
        assert_eq!(envelope, Envelope::error("AWS API Error"));
    }

    struct ExplodingClient;

    #[async_trait::async_trait]
    impl HealthApi for ExplodingClient {
        async fn describe_events(&self, _: EventFilter) -> Result<Vec<HealthEvent>, RemoteError> {
            panic!("client exploded")
        }

        async fn describe_affected_entities(
            &self,
            _: Vec<String>,
        ) -> Result<Vec<crate::model::AffectedEntity>, RemoteError> {
            panic!("client exploded")
        }

        async fn describe_event_details(
            &self,
            _: Vec<String>,
        ) -> Result<EventDetailsOutput, RemoteError> {
            panic!("client exploded")
        }
    }

    #[test]
    fn test_panicking_client_becomes_error_envelope() {
        let server = HealthMcpServer::new(ExplodingClient);
        let envelope = tokio_test::block_on(
            server.handle_request(McpRequest::new(DESCRIBE_EVENTS, Parameters::new())),
        );
        assert_eq!(envelope, Envelope::error("client exploded"));
    }

    #[test]
    fn test_unknown_command() {
        let server = HealthMcpServer::new(MockHealthApi::new());
        let err = tokio_test::block_on(server.dispatch("DESCRIBE_EVENTS", &Parameters::new()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: DESCRIBE_EVENTS");
    }
}
