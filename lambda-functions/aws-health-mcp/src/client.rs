use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_health::primitives::DateTime as AwsDateTime;
use aws_sdk_health::types as sdk;
use aws_sdk_health::Client as HealthClient;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::RemoteError;
use crate::model::{
    AffectedEntity, EventDescription, EventDetails, EventDetailsErrorItem, EventDetailsOutput,
    EventFilter, HealthEvent,
};

/// The three AWS Health operations this service forwards to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthApi: Send + Sync {
    async fn describe_events(&self, filter: EventFilter) -> Result<Vec<HealthEvent>, RemoteError>;

    async fn describe_affected_entities(
        &self,
        event_arns: Vec<String>,
    ) -> Result<Vec<AffectedEntity>, RemoteError>;

    async fn describe_event_details(
        &self,
        event_arns: Vec<String>,
    ) -> Result<EventDetailsOutput, RemoteError>;
}

/// Build a Health client. An explicit region wins; otherwise the SDK's default
/// chain (env, profile, IMDS) decides.
pub async fn make_client(region: Option<&str>) -> HealthClient {
    let region_provider = match region {
        Some(explicit) => {
            RegionProviderChain::first_try(Region::new(explicit.to_string())).or_default_provider()
        }
        None => RegionProviderChain::default_provider(),
    };

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    HealthClient::new(&config)
}

#[async_trait]
impl HealthApi for HealthClient {
    async fn describe_events(&self, filter: EventFilter) -> Result<Vec<HealthEvent>, RemoteError> {
        let sdk_filter = sdk::EventFilter::builder()
            .set_event_type_categories(Some(
                filter
                    .event_type_categories
                    .iter()
                    .map(|c| sdk::EventTypeCategory::from(c.as_str()))
                    .collect(),
            ))
            .set_regions(Some(filter.regions))
            .set_services(Some(filter.services))
            .build();

        let output = self
            .describe_events()
            .filter(sdk_filter)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("DescribeEvents", e))?;

        let events: Vec<HealthEvent> = output
            .events
            .unwrap_or_default()
            .into_iter()
            .map(HealthEvent::from)
            .collect();
        debug!("DescribeEvents returned {} events", events.len());

        Ok(events)
    }

    async fn describe_affected_entities(
        &self,
        event_arns: Vec<String>,
    ) -> Result<Vec<AffectedEntity>, RemoteError> {
        let sdk_filter = sdk::EntityFilter::builder()
            .set_event_arns(Some(event_arns))
            .build()
            .map_err(|e| RemoteError::from_build("DescribeAffectedEntities", e))?;

        let output = self
            .describe_affected_entities()
            .filter(sdk_filter)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("DescribeAffectedEntities", e))?;

        Ok(output
            .entities
            .unwrap_or_default()
            .into_iter()
            .map(AffectedEntity::from)
            .collect())
    }

    async fn describe_event_details(
        &self,
        event_arns: Vec<String>,
    ) -> Result<EventDetailsOutput, RemoteError> {
        let output = self
            .describe_event_details()
            .set_event_arns(Some(event_arns))
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("DescribeEventDetails", e))?;

        Ok(EventDetailsOutput {
            successful_set: output
                .successful_set
                .unwrap_or_default()
                .into_iter()
                .map(EventDetails::from)
                .collect(),
            failed_set: output
                .failed_set
                .unwrap_or_default()
                .into_iter()
                .map(EventDetailsErrorItem::from)
                .collect(),
        })
    }
}

fn to_chrono(ts: AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

impl From<sdk::Event> for HealthEvent {
    fn from(event: sdk::Event) -> Self {
        Self {
            arn: event.arn,
            service: event.service,
            event_type_code: event.event_type_code,
            event_type_category: event.event_type_category.map(|c| c.as_str().to_string()),
            region: event.region,
            availability_zone: event.availability_zone,
            start_time: event.start_time.and_then(to_chrono),
            end_time: event.end_time.and_then(to_chrono),
            last_updated_time: event.last_updated_time.and_then(to_chrono),
            status_code: event.status_code.map(|s| s.as_str().to_string()),
            event_scope_code: event.event_scope_code.map(|s| s.as_str().to_string()),
            actionability: event.actionability.map(|a| a.as_str().to_string()),
            personas: event
                .personas
                .map(|p| p.iter().map(|persona| persona.as_str().to_string()).collect()),
        }
    }
}

impl From<sdk::AffectedEntity> for AffectedEntity {
    fn from(entity: sdk::AffectedEntity) -> Self {
        Self {
            entity_arn: entity.entity_arn,
            event_arn: entity.event_arn,
            entity_value: entity.entity_value,
            entity_url: entity.entity_url,
            aws_account_id: entity.aws_account_id,
            last_updated_time: entity.last_updated_time.and_then(to_chrono),
            status_code: entity.status_code.map(|s| s.as_str().to_string()),
            tags: entity.tags,
            entity_metadata: entity.entity_metadata,
        }
    }
}

impl From<sdk::EventDetails> for EventDetails {
    fn from(details: sdk::EventDetails) -> Self {
        Self {
            event: details.event.map(HealthEvent::from),
            event_description: details.event_description.map(|d| EventDescription {
                latest_description: d.latest_description,
            }),
            event_metadata: details.event_metadata,
        }
    }
}

impl From<sdk::EventDetailsErrorItem> for EventDetailsErrorItem {
    fn from(item: sdk::EventDetailsErrorItem) -> Self {
        Self {
            event_arn: item.event_arn,
            error_name: item.error_name,
            error_message: item.error_message,
        }
    }
}
