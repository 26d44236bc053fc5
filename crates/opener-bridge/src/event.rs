//! Inbound events and the CloudEvents HTTP protocol binding.
//!
//! Two content modes are accepted:
//! - **binary**: attributes in `ce-*` headers, body is the event data
//! - **structured**: `Content-Type: application/cloudevents+json`, the body is
//!   a JSON object holding the attributes and `data` or `data_base64`

use base64::Engine;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{DispatchError, EventError};

const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";
const BATCH_CONTENT_TYPE: &str = "application/cloudevents-batch+json";

/// One delivery from the event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub id: String,
    pub source: String,
    /// CloudEvents `type` attribute; selects whether the event is handled.
    pub event_type: String,
    pub subject: Option<String>,
    /// Raw event data, expected to be JSON.
    pub data: Option<Vec<u8>>,
}

#[derive(Deserialize)]
struct StructuredEvent {
    #[serde(rename = "type")]
    event_type: Option<String>,
    #[serde(default)]
    id: String,
    #[serde(default)]
    source: String,
    subject: Option<String>,
    data: Option<serde_json::Value>,
    data_base64: Option<String>,
}

impl InboundEvent {
    /// An event with the given type and JSON data; other attributes empty.
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id: String::new(),
            source: String::new(),
            event_type: event_type.into(),
            subject: None,
            data: Some(data.into()),
        }
    }

    /// Decode the event data as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingData`] when the event has no data and
    /// [`DispatchError::Decode`] when the data does not decode into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, DispatchError> {
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| DispatchError::MissingData {
                event_id: self.id.clone(),
            })?;
        serde_json::from_slice(data).map_err(DispatchError::Decode)
    }

    /// Decode an HTTP delivery in either content mode.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if required attributes are missing, the
    /// structured body is not a CloudEvent, or batch mode is used.
    pub fn from_http<'a>(
        headers: impl IntoIterator<Item = (&'a str, &'a str)>,
        body: Vec<u8>,
    ) -> Result<Self, EventError> {
        let headers: Vec<(String, &str)> = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
            .collect();
        let header = |name: &str| {
            headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| *value)
        };

        let content_type = header("content-type")
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .unwrap_or_default();

        if content_type == BATCH_CONTENT_TYPE {
            return Err(EventError::UnsupportedMode("batch".into()));
        }
        if content_type == STRUCTURED_CONTENT_TYPE {
            return Self::from_structured(&body);
        }

        let event_type = header("ce-type")
            .filter(|v| !v.is_empty())
            .ok_or(EventError::MissingAttribute("type"))?;
        Ok(Self {
            id: header("ce-id").unwrap_or_default().to_string(),
            source: header("ce-source").unwrap_or_default().to_string(),
            event_type: event_type.to_string(),
            subject: header("ce-subject").map(str::to_string),
            data: (!body.is_empty()).then_some(body),
        })
    }

    /// Decode a structured-mode CloudEvent document.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if the document is not JSON, lacks `type`, or
    /// has an undecodable `data_base64`.
    pub fn from_structured(body: &[u8]) -> Result<Self, EventError> {
        let structured: StructuredEvent = serde_json::from_slice(body)?;
        let event_type = structured
            .event_type
            .filter(|v| !v.is_empty())
            .ok_or(EventError::MissingAttribute("type"))?;

        let data = match (structured.data, structured.data_base64) {
            (_, Some(encoded)) => Some(base64::engine::general_purpose::STANDARD.decode(encoded)?),
            (Some(serde_json::Value::Null) | None, None) => None,
            (Some(value), None) => Some(serde_json::to_vec(&value)?),
        };

        Ok(Self {
            id: structured.id,
            source: structured.source,
            event_type,
            subject: structured.subject,
            data,
        })
    }
}
