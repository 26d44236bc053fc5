//! Delivery error taxonomy.
//!
//! Client-class errors mean the publisher sent something unusable and
//! redelivery cannot help. Dependency-class errors mean the tracker failed and
//! redelivery may succeed.

use opener_jira::TrackerError;
use thiserror::Error;

/// Who is at fault for a failed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed or unusable event (HTTP 400 class, not retryable).
    Client,
    /// The tracker failed (HTTP 500 class, retryable).
    Dependency,
}

impl ErrorClass {
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Client => 400,
            Self::Dependency => 500,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Dependency)
    }
}

/// The transport envelope could not be read as a CloudEvent.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("missing CloudEvents attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("malformed structured event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid data_base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("unsupported content mode: {0}")]
    UnsupportedMode(String),
}

impl EventError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Client
    }
}

/// Processing a policy-changed event failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("event '{event_id}' carries no data")]
    MissingData { event_id: String },

    #[error("unable to unmarshal data: {0}")]
    Decode(#[source] serde_json::Error),

    /// Tickets opened earlier in the same event are kept.
    #[error("unable to create Jira issue for policy '{policy}': {source}")]
    Dependency {
        policy: String,
        #[source]
        source: TrackerError,
    },
}

impl DispatchError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingData { .. } | Self::Decode(_) => ErrorClass::Client,
            Self::Dependency { .. } => ErrorClass::Dependency,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.class().status_code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}
