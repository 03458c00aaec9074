use std::net::{Ipv4Addr, SocketAddr};

use crate::errors::ConsumerError;

/// Region used when `AWS_REGION` is unset.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Port the health endpoint listens on when `HEALTH_PORT` is unset.
pub const DEFAULT_HEALTH_PORT: u16 = 5000;

/// Parameters of every `ReceiveMessage` call.
///
/// A [`Consumer`](crate::consumer::Consumer) always sends the default value;
/// it is not configurable.
///
/// # Fields
/// - `max_number_of_messages`: always 1, so at most one message is in flight.
/// - `wait_time_seconds`: long-poll duration, the only throttle on the loop.
/// - `visibility_timeout`: 0, so an unacknowledged message is redeliverable at once.
/// - `message_attribute_names`: attributes requested with each message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveSettings {
    pub max_number_of_messages: i32,
    pub wait_time_seconds: i32,
    pub visibility_timeout: i32,
    pub message_attribute_names: Vec<String>,
}

impl Default for ReceiveSettings {
    fn default() -> Self {
        ReceiveSettings {
            max_number_of_messages: 1,
            wait_time_seconds: 20,
            visibility_timeout: 0,
            message_attribute_names: vec!["All".to_string()],
        }
    }
}

/// Process configuration, read once at startup and immutable afterward.
///
/// Queue URL and credentials are passed to the SQS client as-is. A missing
/// value surfaces as a receive error on the first poll, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    pub queue_url: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub health_addr: SocketAddr,
}

impl ConsumerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `QUEUE` | none |
    /// | `AWS_REGION` | `us-east-1` |
    /// | `AWS_ACCESS_KEY_ID` | none |
    /// | `AWS_SECRET_ACCESS_KEY` | none |
    /// | `HEALTH_PORT` | `5000` |
    pub fn from_env() -> Result<Self, ConsumerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConsumerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let health_port = match lookup("HEALTH_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConsumerError::InvalidConfig {
                    key: "HEALTH_PORT",
                    reason: format!("{raw:?}: {e}"),
                })?,
            None => DEFAULT_HEALTH_PORT,
        };

        Ok(ConsumerConfig {
            queue_url: lookup("QUEUE"),
            region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key_id: lookup("AWS_ACCESS_KEY_ID"),
            secret_access_key: lookup("AWS_SECRET_ACCESS_KEY"),
            health_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, health_port)),
        })
    }
}
