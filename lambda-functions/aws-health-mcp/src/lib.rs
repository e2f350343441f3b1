//! HTTP and Lambda front end that forwards `describe_events`, `describe_affected_entities`
//! and `describe_event_details` commands to the AWS Health API and answers with a
//! `{status, ...}` envelope.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod server;

pub use client::{make_client, HealthApi};
pub use config::ServerConfig;
pub use error::{McpError, RemoteError};
pub use model::{
    AffectedEntity, Envelope, EventDescription, EventDetails, EventDetailsErrorItem,
    EventDetailsOutput, EventFilter, EventsQuery, HealthEvent, HealthStatus, McpRequest,
    Parameters, Payload,
};
pub use server::HealthMcpServer;
