use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::enums::Change;

/// One artifact's policy-evaluation snapshot, as published on the event bus.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Digest or reference of the scanned image.
    pub image_id: String,
    /// Cluster the image is deployed to.
    pub cluster_id: String,
    /// Evaluation results keyed by policy name. Iterates in name order.
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyResult>,
}

/// A single policy's evaluation outcome.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResult {
    /// `true` when the image complies with the policy.
    pub valid: bool,
    pub change: Change,
    pub last_checked: DateTime<Utc>,
    #[serde(default)]
    pub diagnostic: String,
}

/// Identity that caused the occurrence on the event bus.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub subject: String,
    #[serde(default)]
    pub act: BTreeMap<String, String>,
}

/// Inbound payload: either the bus envelope `{actor, body}` or a bare
/// [`Occurrence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccurrencePayload {
    Envelope { actor: Option<Actor>, body: Occurrence },
    Bare(Occurrence),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    actor: Option<Actor>,
    body: Occurrence,
}

impl OccurrencePayload {
    /// Decode a JSON payload. A top-level `body` key selects the envelope form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or a body that does
    /// not match the [`Occurrence`] shape.
    pub fn from_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        match self {
            Self::Envelope { actor, .. } => actor.as_ref(),
            Self::Bare(_) => None,
        }
    }

    #[must_use]
    pub fn into_occurrence(self) -> Occurrence {
        match self {
            Self::Envelope { body, .. } | Self::Bare(body) => body,
        }
    }
}

impl<'de> Deserialize<'de> for OccurrencePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("body").is_some() {
            let Envelope { actor, body } =
                serde_json::from_value(value).map_err(de::Error::custom)?;
            Ok(Self::Envelope { actor, body })
        } else {
            serde_json::from_value(value)
                .map(Self::Bare)
                .map_err(de::Error::custom)
        }
    }
}
