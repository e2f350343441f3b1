use std::collections::HashMap;

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::McpError;

pub type Parameters = Map<String, Value>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct McpRequest {
    pub command: String,
    pub parameters: Parameters,
}

impl McpRequest {
    pub fn new(command: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            command: command.into(),
            parameters,
        }
    }
}

/// Parameters of `describe_events`. Every field falls back to a default when absent.
#[derive(Builder, Deserialize, Debug, Clone, PartialEq)]
pub struct EventsQuery {
    #[builder(default = EventsQuery::default_categories())]
    #[serde(default = "EventsQuery::default_categories")]
    pub categories: Vec<String>,

    #[builder(default = EventsQuery::default_regions())]
    #[serde(default = "EventsQuery::default_regions")]
    pub regions: Vec<String>,

    #[builder(default = EventsQuery::default_services())]
    #[serde(default = "EventsQuery::default_services")]
    pub services: Vec<String>,
}

impl EventsQuery {
    fn default_categories() -> Vec<String> {
        vec!["issue".to_string()]
    }

    fn default_regions() -> Vec<String> {
        vec!["us-east-1".to_string()]
    }

    fn default_services() -> Vec<String> {
        vec!["EC2".to_string()]
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self, McpError> {
        serde_json::from_value(Value::Object(params.clone()))
            .map_err(|e| McpError::Validation(format!("Invalid parameters: {}", e)))
    }
}

impl Default for EventsQuery {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Filter handed to the remote `DescribeEvents` call.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct EventFilter {
    pub event_type_categories: Vec<String>,
    pub regions: Vec<String>,
    pub services: Vec<String>,
}

impl From<EventsQuery> for EventFilter {
    fn from(query: EventsQuery) -> Self {
        EventFilter::builder()
            .event_type_categories(query.categories)
            .regions(query.regions)
            .services(query.services)
            .build()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_scope_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personas: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AffectedEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_metadata: Option<HashMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<HealthEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_description: Option<EventDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_metadata: Option<HashMap<String, String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsErrorItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Both halves of a `DescribeEventDetails` answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDetailsOutput {
    pub successful_set: Vec<EventDetails>,
    pub failed_set: Vec<EventDetailsErrorItem>,
}

/// Success payload; the variant name becomes the JSON key next to `status`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Payload {
    #[serde(rename = "events")]
    Events(Vec<HealthEvent>),
    #[serde(rename = "entities")]
    Entities(Vec<AffectedEntity>),
    #[serde(rename = "eventDetails")]
    EventDetails(Vec<EventDetails>),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success(Payload),
    Error { message: String },
}

impl Envelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<Payload, McpError>> for Envelope {
    fn from(result: Result<Payload, McpError>) -> Self {
        match result {
            Ok(payload) => Self::Success(payload),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
