//! Inbound event receiver configuration.

use serde::{Deserialize, Serialize};

/// Event type emitted by the policy controller when a record changes.
pub const POLICY_CHANGED_EVENT_TYPE: &str = "dev.chainguard.policy.validation.changed.v1";

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

fn default_event_type() -> String {
    String::from(POLICY_CHANGED_EVENT_TYPE)
}

/// Default request body limit (1 MiB).
const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReceiverConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Only events with this type are processed; others are acknowledged and dropped.
    #[serde(default = "default_event_type")]
    pub event_type: String,

    /// Deliveries with a larger body are rejected.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            event_type: default_event_type(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ReceiverConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
